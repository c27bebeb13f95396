use chrono::NaiveDateTime;
use icalendar::Component;
use tracing::{debug, info};

use crate::error::SeedError;
use crate::model::{Fixture, FixtureId, Side};
use crate::roster::FixtureStore;

/// Fixture import from an iCalendar league schedule.
pub struct CalendarImport {
    calendar: icalendar::Calendar,
}

/// A calendar event that names our team in its matchup.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScheduledMatch {
    start: NaiveDateTime,
    opponent: String,
    side: Side,
    venue: String,
}

impl CalendarImport {
    /// Parse a raw ICS string (no network).
    pub fn from_ics(ics: &str) -> Result<Self, SeedError> {
        let parsed = icalendar::parser::read_calendar(ics).map_err(|e| SeedError::Ical(e.to_string()))?;
        Ok(Self { calendar: parsed.into() })
    }

    /// Build fixtures for `team_name` from every VEVENT whose matchup includes
    /// that team and that starts strictly after `cutoff` (all events when
    /// `None`). Ids are assigned from 1 in kick-off order; rosters start empty.
    pub fn fixtures(
        &self,
        team_name: &str,
        max_players: usize,
        cutoff: Option<NaiveDateTime>,
    ) -> Result<FixtureStore, SeedError> {
        let mut matches: Vec<ScheduledMatch> = Vec::new();

        for comp in &self.calendar.components {
            if let icalendar::CalendarComponent::Event(e) = comp {
                let summary = e.property_value("SUMMARY").unwrap_or("");
                let (home, away) = split_home_away(summary);
                let (side, opponent) = if home.eq_ignore_ascii_case(team_name) {
                    (Side::Home, away)
                } else if away.eq_ignore_ascii_case(team_name) {
                    (Side::Away, home)
                } else {
                    debug!(summary = %summary, "Skipping event without our team");
                    continue;
                };

                let dtstart = e.property_value("DTSTART").unwrap_or("");
                let start = parse_dt(dtstart).ok_or_else(|| SeedError::EventStart(dtstart.to_string()))?;
                if cutoff.is_some_and(|c| start <= c) {
                    continue;
                }

                let venue = venue_name(e.property_value("LOCATION").unwrap_or(""));
                matches.push(ScheduledMatch { start, opponent, side, venue });
            }
        }

        matches.sort_by_key(|m| m.start);
        info!(count = matches.len(), team = %team_name, "Imported fixtures from calendar");

        Ok(matches
            .into_iter()
            .zip(1u32..)
            .map(|(m, id)| {
                Fixture::new(FixtureId(id), m.opponent, m.start.date(), m.start.time(), m.venue, m.side, max_players)
            })
            .collect())
    }
}

fn parse_dt(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    // Trailing Z is dropped; schedule times are taken as local wall-clock times.
    let s2 = s.strip_suffix('Z').unwrap_or(s);
    for pat in ["%Y%m%dT%H%M%S", "%Y%m%dT%H%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s2, pat) {
            return Some(dt);
        }
    }
    // All-day dates (no time)
    if let Ok(date) = chrono::NaiveDate::parse_from_str(s2, "%Y%m%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    None
}

fn split_home_away(summary: &str) -> (String, String) {
    // Drop a non-team prefix such as "League Game - " when the tail is a matchup.
    let trimmed = match summary.rfind(" - ") {
        Some(idx) if summary[idx + 3..].contains(" @ ") || summary[idx + 3..].contains(" vs ") => &summary[idx + 3..],
        _ => summary,
    };

    if let Some((home, away)) = trimmed.split_once(" vs ") {
        (home.trim().to_string(), away.trim().to_string())
    } else if let Some((away, home)) = trimmed.split_once(" @ ") {
        // Away @ Home
        (home.trim().to_string(), away.trim().to_string())
    } else {
        (String::new(), String::new())
    }
}

/// First line of a LOCATION value; the street address after it is not kept.
fn venue_name(location: &str) -> String {
    let first = location.split('\n').next().unwrap_or_default();
    first.split("\\n").next().unwrap_or_default().trim().to_string()
}
