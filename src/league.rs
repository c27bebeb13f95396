use chrono::{NaiveDate, NaiveTime};
use scraper::{ElementRef, Html, Selector};
use tracing::{error, info, info_span, instrument, warn};

use crate::model::{Fixture, FixtureId, Side, StandingsRow};
use crate::roster::FixtureStore;

/// Capacity given to fixtures scraped from the league page.
pub const LEAGUE_MAX_PLAYERS: usize = 11;

const MAX_ROWS: usize = 10;
const DATE_FORMAT: &str = "%d.%m.%Y";
const TIME_FORMAT: &str = "%H:%M";

/// Schedule containers tried in order; the first one that matches anything wins.
const SCHEDULE_SELECTORS: [&str; 3] = [r#"div[class*="game"]"#, r#"tr[class*="match"]"#, r#"article[class*="fixture"]"#];

/// Standings and schedule read from the league's tournament page.
///
/// Each half falls back to built-in data independently when the page can't be
/// fetched or that half yields nothing.
#[derive(Debug, Clone)]
pub struct League {
    pub standings: Vec<StandingsRow>,
    pub fixtures: FixtureStore,
    pub standings_fallback: bool,
    pub fixtures_fallback: bool,
}

impl League {
    /// Fetch and parse the tournament page. Never fails: request and body
    /// errors are logged and the built-in data is returned.
    #[instrument(level = "info", skip(team_name))]
    pub fn fetch(url: &str, team_name: &str) -> Self {
        let response_result = {
            let _span = info_span!("league_fetch", url = %url).entered();
            ureq::get(url)
                .header("User-Agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
                .call()
        };
        match response_result {
            Ok(response) => match response.into_body().read_to_string() {
                Ok(body) => Self::from_html(&body, team_name),
                Err(e) => {
                    error!(error = %e, "Failed to read league page body");
                    Self::fallback()
                }
            },
            Err(e) => {
                error!(error = %e, url = %url, "League page request failed");
                Self::fallback()
            }
        }
    }

    /// Parse a tournament page (no network).
    pub fn from_html(html: &str, team_name: &str) -> Self {
        let document = Html::parse_document(html);

        let mut standings = parse_standings(&document);
        let standings_fallback = standings.is_empty();
        if standings_fallback {
            warn!("No standings rows found on league page; using built-in table");
            standings = fallback_standings();
        }

        let mut fixtures = parse_schedule(&document, team_name);
        let fixtures_fallback = fixtures.is_empty();
        if fixtures_fallback {
            warn!("No fixtures found on league page; using built-in schedule");
            fixtures = fallback_fixtures();
        }

        info!(
            standings = standings.len(),
            fixtures = fixtures.len(),
            standings_fallback,
            fixtures_fallback,
            "Parsed league page"
        );
        Self { standings, fixtures, standings_fallback, fixtures_fallback }
    }

    pub fn fallback() -> Self {
        Self {
            standings: fallback_standings(),
            fixtures: fallback_fixtures(),
            standings_fallback: true,
            fixtures_fallback: true,
        }
    }
}

fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(s) => Some(s),
        Err(e) => {
            error!(css, error = %e, "Invalid selector");
            None
        }
    }
}

/// Text of an element with markup stripped and whitespace collapsed.
fn cell_text(element: &ElementRef) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

/// Rows marked `team-row`, or else any row whose first cell is a number and
/// second cell has letters. Rows with fewer than seven cells or
/// non-numeric counts are skipped.
fn parse_standings(document: &Html) -> Vec<StandingsRow> {
    let (Some(marked), Some(any_row), Some(td)) = (selector("tr.team-row"), selector("tr"), selector("td")) else {
        return Vec::new();
    };

    let mut rows: Vec<ElementRef> = document.select(&marked).collect();
    if rows.is_empty() {
        rows = document
            .select(&any_row)
            .filter(|row| {
                let cells: Vec<String> = row.select(&td).map(|c| cell_text(&c)).collect();
                cells.len() >= 2
                    && cells[0].chars().any(|c| c.is_ascii_digit())
                    && cells[1].chars().any(char::is_alphabetic)
            })
            .collect();
    }

    rows.into_iter()
        .take(MAX_ROWS)
        .filter_map(|row| {
            let cells: Vec<String> = row.select(&td).map(|c| cell_text(&c)).collect();
            if cells.len() < 7 {
                return None;
            }
            let count = |i: usize| -> Option<u32> {
                if cells[i].is_empty() { Some(0) } else { cells[i].parse().ok() }
            };
            Some(StandingsRow {
                name: cells[1].clone(),
                played: count(2)?,
                won: count(3)?,
                drawn: count(4)?,
                lost: count(5)?,
                points: count(6)?,
            })
        })
        .collect()
}

fn parse_schedule(document: &Html, team_name: &str) -> FixtureStore {
    let entries: Vec<ElementRef> = SCHEDULE_SELECTORS
        .iter()
        .filter_map(|css| selector(css))
        .map(|s| document.select(&s).collect::<Vec<_>>())
        .find(|found| !found.is_empty())
        .unwrap_or_default();

    entries
        .iter()
        .take(MAX_ROWS)
        .filter_map(|entry| parse_entry(entry, team_name))
        .zip(1u32..)
        .map(|(entry, id)| {
            Fixture::new(FixtureId(id), entry.opponent, entry.date, entry.time, entry.venue, entry.side, LEAGUE_MAX_PLAYERS)
        })
        .collect()
}

struct ScheduleEntry {
    opponent: String,
    date: NaiveDate,
    time: NaiveTime,
    venue: String,
    side: Side,
}

/// Read one schedule entry from its text pieces: a `dd.mm.yyyy` date, an
/// `HH:MM` time, a "stadium:" venue label, a home marker and the first name
/// that isn't ours.
fn parse_entry(entry: &ElementRef, team_name: &str) -> Option<ScheduleEntry> {
    let pieces: Vec<&str> = entry.text().map(str::trim).filter(|t| !t.is_empty()).collect();
    let words = || pieces.iter().flat_map(|p| p.split_whitespace());
    let strip = |w: &str| w.trim_matches(|c: char| !c.is_ascii_digit()).to_string();

    let date = words().find_map(|w| NaiveDate::parse_from_str(&strip(w), DATE_FORMAT).ok())?;
    let time = words().find_map(|w| NaiveTime::parse_from_str(&strip(w), TIME_FORMAT).ok())?;

    let team = team_name.to_lowercase();
    let opponent = pieces.iter().find(|p| {
        let lower = p.to_lowercase();
        p.chars().count() > 3
            && p.chars().all(|c| c.is_alphanumeric() || c.is_whitespace() || c == '-')
            && !lower.contains(&team)
            && !is_side_marker(&lower)
    })?;

    let venue = pieces
        .iter()
        .find_map(|p| {
            let (label, name) = p.split_once(':')?;
            let label = label.to_lowercase();
            ["stadium", "стадион"]
                .iter()
                .any(|l| label.contains(l))
                .then(|| name.trim().to_string())
        })
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "Stadium".to_string());

    let all = pieces.join(" ").to_lowercase();
    let side = if all.contains("home") || all.contains("дома") { Side::Home } else { Side::Away };

    Some(ScheduleEntry { opponent: opponent.to_string(), date, time, venue, side })
}

fn is_side_marker(lower: &str) -> bool {
    ["home", "away", "дома", "в гостях"].contains(&lower)
}

fn fallback_standings() -> Vec<StandingsRow> {
    [
        ("Our team", 15, 11, 2, 2, 35),
        ("Spartak W", 15, 10, 3, 2, 33),
        ("Dynamo W", 15, 9, 2, 4, 29),
        ("Zenit W", 15, 7, 4, 4, 25),
    ]
    .into_iter()
    .map(|(name, played, won, drawn, lost, points)| StandingsRow {
        name: name.to_string(),
        played,
        won,
        drawn,
        lost,
        points,
    })
    .collect()
}

fn fallback_fixtures() -> FixtureStore {
    [
        (1, "Spartak W", (2025, 11, 20), (18, 0), "Luch Stadium", Side::Home),
        (2, "Dynamo W", (2025, 11, 27), (19, 0), "Central Stadium", Side::Away),
    ]
    .into_iter()
    .filter_map(|(id, opponent, (y, m, d), (h, min), venue, side)| {
        let date = NaiveDate::from_ymd_opt(y, m, d)?;
        let time = NaiveTime::from_hms_opt(h, min, 0)?;
        Some(Fixture::new(FixtureId(id), opponent, date, time, venue, side, LEAGUE_MAX_PLAYERS))
    })
    .collect()
}
