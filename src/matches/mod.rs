//! Match records as served by the backend, plus the derived values the
//! views render from them.
//!
//! Records are replaced wholesale on every fetch and never patched in place.
//! `ValidMatch` is the only way the detail view reaches individual teams, so
//! a short `teams` list surfaces as `MatchError::Malformed` instead of an
//! out-of-range index.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Shown in place of a missing team on list cards.
const PLACEHOLDER_TEAM_NAME: &str = "TBD";
const PLACEHOLDER_TEAM_SCORE: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    /// Display only, never parsed.
    #[serde(default)]
    pub score: String,
}

impl Team {
    pub fn placeholder() -> Self {
        Self {
            name: PLACEHOLDER_TEAM_NAME.to_string(),
            score: PLACEHOLDER_TEAM_SCORE.to_string(),
        }
    }

    /// First character of the name, used as the card avatar.
    pub fn initial(&self) -> String {
        self.name.chars().next().map(String::from).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Source video URL. Doubles as the match identifier.
    pub url: String,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub round: String,
    #[serde(default)]
    pub teams: Vec<Team>,
}

/// `GET /api/matches`
#[derive(Debug, Clone, Deserialize)]
pub struct MatchesResponse {
    #[serde(default)]
    pub matches: Vec<Match>,
}

/// `GET /api/round-winner?url=...`
#[derive(Debug, Clone, Deserialize)]
pub struct RoundWinnerResponse {
    #[serde(default)]
    pub winner: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("malformed match {url}: expected two teams, found {found}")]
    Malformed { url: String, found: usize },
}

/// A match known to carry two teams. Entries past the second are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMatch {
    pub url: String,
    pub event: String,
    pub round: String,
    teams: [Team; 2],
}

impl TryFrom<&Match> for ValidMatch {
    type Error = MatchError;

    fn try_from(m: &Match) -> Result<Self, Self::Error> {
        match m.teams.as_slice() {
            [first, second, ..] => Ok(Self {
                url: m.url.clone(),
                event: m.event.clone(),
                round: m.round.clone(),
                teams: [first.clone(), second.clone()],
            }),
            other => Err(MatchError::Malformed {
                url: m.url.clone(),
                found: other.len(),
            }),
        }
    }
}

impl ValidMatch {
    pub fn teams(&self) -> &[Team; 2] {
        &self.teams
    }

    /// "A vs B"
    pub fn title(&self) -> String {
        format!("{} vs {}", self.teams[0].name, self.teams[1].name)
    }

    /// "Event • Round"
    pub fn subtitle(&self) -> String {
        format!("{} • {}", self.event, self.round)
    }
}

impl Match {
    /// The two teams a list card shows, padding with placeholders.
    pub fn card_teams(&self) -> (Team, Team) {
        let mut teams = self.teams.iter().cloned();
        let first = teams.next().unwrap_or_else(Team::placeholder);
        let second = teams.next().unwrap_or_else(Team::placeholder);
        (first, second)
    }
}

/// Route id for a match: the fourth `/`-separated segment of its URL
/// (the path head for `scheme://host/<id>/...`), else the list position.
pub fn display_id(url: &str, index: usize) -> String {
    url.split('/')
        .nth(3)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| index.to_string())
}

/// YouTube video id from the `v` query parameter.
pub fn video_id(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
}

/// Aggregates shown above the match list. Recomputed on every render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchSummary {
    pub matches: usize,
    pub teams: usize,
    pub tournaments: usize,
}

impl MatchSummary {
    pub fn of(matches: &[Match]) -> Self {
        let tournaments: HashSet<&str> = matches.iter().map(|m| m.event.as_str()).collect();
        Self {
            matches: matches.len(),
            teams: matches.iter().map(|m| m.teams.len()).sum(),
            tournaments: tournaments.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(name: &str, score: &str) -> Team {
        Team {
            name: name.to_string(),
            score: score.to_string(),
        }
    }

    fn sample(url: &str, event: &str, teams: Vec<Team>) -> Match {
        Match {
            url: url.to_string(),
            event: event.to_string(),
            round: "R1".to_string(),
            teams,
        }
    }

    #[test]
    fn test_summary_of_empty_list() {
        assert_eq!(MatchSummary::of(&[]), MatchSummary::default());
    }

    #[test]
    fn test_summary_single_match() {
        let m = sample("http://x/1", "Cup", vec![team("A", "5"), team("B", "3")]);
        let summary = MatchSummary::of(&[m]);
        assert_eq!(
            summary,
            MatchSummary {
                matches: 1,
                teams: 2,
                tournaments: 1
            }
        );
    }

    #[test]
    fn test_summary_counts_duplicate_events_once() {
        let matches = vec![
            sample("http://x/1", "Cup", vec![team("A", "1"), team("B", "0")]),
            sample("http://x/2", "Cup", vec![team("C", "1"), team("D", "0")]),
            sample("http://x/3", "League", vec![team("E", "1")]),
        ];
        let summary = MatchSummary::of(&matches);
        assert_eq!(summary.matches, 3);
        assert_eq!(summary.teams, 5);
        assert_eq!(summary.tournaments, 2);
    }

    #[test]
    fn test_valid_match_requires_two_teams() {
        let m = sample("http://x/1", "Cup", vec![team("A", "5")]);
        assert_eq!(
            ValidMatch::try_from(&m),
            Err(MatchError::Malformed {
                url: "http://x/1".to_string(),
                found: 1
            })
        );

        let m = sample("http://x/1", "Cup", vec![team("A", "5"), team("B", "3")]);
        let valid = ValidMatch::try_from(&m).unwrap();
        assert_eq!(valid.title(), "A vs B");
        assert_eq!(valid.subtitle(), "Cup • R1");
        assert_eq!(valid.teams()[0], team("A", "5"));
        assert_eq!(valid.teams()[1], team("B", "3"));
    }

    #[test]
    fn test_card_teams_fall_back_to_placeholders() {
        let m = sample("http://x/1", "Cup", vec![]);
        let (first, second) = m.card_teams();
        assert_eq!(first, Team::placeholder());
        assert_eq!(second.name, "TBD");
        assert_eq!(second.score, "0");
    }

    #[test]
    fn test_display_id() {
        assert_eq!(display_id("http://x/1", 0), "1");
        assert_eq!(display_id("https://www.vlr.gg/12345/team-a-vs-team-b", 4), "12345");
        assert_eq!(display_id("http://x", 7), "7");
        assert_eq!(display_id("http://x/", 2), "2");
    }

    #[test]
    fn test_video_id() {
        assert_eq!(
            video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(video_id("https://www.youtube.com/watch"), None);
        assert_eq!(video_id("not a url"), None);
    }

    #[test]
    fn test_deserialize_backend_payload() {
        let body = r#"{"matches":[{"url":"http://x/1","event":"Cup","round":"R1",
            "teams":[{"name":"A","score":"5"},{"name":"B","score":"3"}]}]}"#;
        let parsed: MatchesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.matches.len(), 1);
        assert_eq!(parsed.matches[0].teams[1].name, "B");

        let winner: RoundWinnerResponse = serde_json::from_str(r#"{"winner":"A"}"#).unwrap();
        assert_eq!(winner.winner.as_deref(), Some("A"));
        let none: RoundWinnerResponse = serde_json::from_str("{}").unwrap();
        assert!(none.winner.is_none());
    }
}
