use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::chat::ChatLog;
use crate::config::Config;
use crate::error::SeedError;
use crate::ical::CalendarImport;
use crate::league::League;
use crate::model::{ChatMessage, Fixture, FixtureId, Participant, ReferenceData, Side};
use crate::roster::{FixtureStore, RosterOutcome};

/// Fixture as written in a season file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureSeed {
    pub id: u32,
    pub opponent: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, local time
    pub time: String,
    pub location: String,
    #[serde(rename = "type")]
    pub side: Side,
    #[serde(default)]
    pub registered: Vec<String>,
    pub max_players: usize,
    #[serde(default)]
    pub local_user_registered: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSeed {
    pub id: u64,
    pub author: String,
    pub text: String,
    pub time: String,
    #[serde(default)]
    pub from_local_user: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonFile {
    #[serde(default)]
    pub fixtures: Vec<FixtureSeed>,
    #[serde(default)]
    pub messages: Vec<MessageSeed>,
    #[serde(flatten)]
    pub reference: ReferenceData,
}

/// Initial state handed to the dashboard at startup.
#[derive(Debug, Clone, Default)]
pub struct Season {
    pub fixtures: FixtureStore,
    pub chat: ChatLog,
    pub reference: ReferenceData,
}

impl Season {
    /// Parse a JSON season file.
    pub fn from_json(body: &str) -> Result<Self, SeedError> {
        let file: SeasonFile = serde_json::from_str(body)?;
        Self::try_from(file)
    }

    /// Load the season configured by `config.fixtures_path` (empty when none
    /// is configured), then fill in whatever it lacks from `config.league_url`.
    /// Blocking when a league page is configured.
    #[instrument(level = "info", skip(config), fields(path = ?config.fixtures_path))]
    pub fn load(config: &Config) -> Result<Self, SeedError> {
        let mut season = match config.fixtures_path.as_deref() {
            Some(path) => Self::from_path(path, config)?,
            None => {
                info!("No season file configured");
                Season::default()
            }
        };

        if let Some(url) = config.league_url.as_deref() {
            season.merge_league(League::fetch(url, &config.team_name));
        }
        info!(
            fixtures = season.fixtures.len(),
            messages = season.chat.len(),
            "Season loaded"
        );
        Ok(season)
    }

    fn from_path(path: &Path, config: &Config) -> Result<Self, SeedError> {
        let body = read(path)?;
        if is_calendar(path) {
            let import = CalendarImport::from_ics(&body)?;
            let fixtures = import.fixtures(&config.team_name, config.default_max_players, None)?;
            Ok(Season { fixtures, ..Season::default() })
        } else {
            Self::from_json(&body)
        }
    }

    /// Take the league's fixtures and standings where the season has none.
    pub fn merge_league(&mut self, league: League) {
        if self.fixtures.is_empty() {
            self.fixtures = league.fixtures;
        }
        if self.reference.standings.is_empty() {
            self.reference.standings = league.standings;
        }
    }
}

impl TryFrom<SeasonFile> for Season {
    type Error = SeedError;

    fn try_from(file: SeasonFile) -> Result<Self, Self::Error> {
        let mut fixtures = FixtureStore::new();
        for seed in file.fixtures {
            seed_fixture(&mut fixtures, seed)?;
        }

        let history = file
            .messages
            .into_iter()
            .map(|m| ChatMessage {
                id: m.id,
                author: if m.from_local_user { Participant::LocalUser } else { Participant::Member(m.author) },
                text: m.text,
                time: m.time,
            })
            .collect();

        Ok(Season { fixtures, chat: ChatLog::with_history(history), reference: file.reference })
    }
}

/// Insert the fixture and fill its roster through the roster engine, so
/// duplicate names collapse and capacity is enforced.
fn seed_fixture(store: &mut FixtureStore, seed: FixtureSeed) -> Result<(), SeedError> {
    let id = FixtureId(seed.id);
    let date = NaiveDate::parse_from_str(&seed.date, "%Y-%m-%d")
        .map_err(|source| SeedError::DateTime { id, source })?;
    let time = NaiveTime::parse_from_str(&seed.time, "%H:%M")
        .map_err(|source| SeedError::DateTime { id, source })?;

    if store.get(id).is_some() {
        return Err(SeedError::DuplicateId { id });
    }
    store.insert(Fixture::new(id, seed.opponent, date, time, seed.location, seed.side, seed.max_players));

    let mut players: Vec<Participant> = seed.registered.into_iter().map(Participant::Member).collect();
    if seed.local_user_registered {
        players.push(Participant::LocalUser);
    }
    let requested = players.len();
    for player in &players {
        if store.register(id, player) == RosterOutcome::Full {
            return Err(SeedError::OverCapacity { id, roster: requested, max_players: seed.max_players });
        }
    }
    Ok(())
}

fn read(path: &Path) -> Result<String, SeedError> {
    fs::read_to_string(path).map_err(|source| SeedError::Io { path: path.to_path_buf(), source })
}

fn is_calendar(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ics"))
}
