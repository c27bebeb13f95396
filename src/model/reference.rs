use serde::{Deserialize, Serialize};

/// League table row. Supplied by the season file and shown as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub name: String,
    pub played: u32,
    pub won: u32,
    #[serde(alias = "draw")]
    pub drawn: u32,
    pub lost: u32,
    pub points: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub goals: u32,
    pub assists: u32,
    pub matches: u32,
    pub wins: u32,
}

/// Static reference data owned by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceData {
    #[serde(default)]
    pub standings: Vec<StandingsRow>,
    #[serde(default)]
    pub player_stats: PlayerStats,
    /// League points from the most recent results, oldest first.
    #[serde(default)]
    pub recent_form: Vec<u8>,
}
