//! Match list view state.
//!
//! One read of the match collection on mount (and on manual refresh), one
//! card per match, and the summary aggregates. Cards hand off to the detail
//! view through the source URL in the query string only.

use crate::api::ApiError;
use crate::matches::{display_id, Match, MatchSummary, Team};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCard {
    pub id: String,
    pub url: String,
    pub event: String,
    pub round: String,
    pub home: Team,
    pub away: Team,
}

impl MatchCard {
    fn new(index: usize, m: &Match) -> Self {
        let (home, away) = m.card_teams();
        Self {
            id: display_id(&m.url, index),
            url: m.url.clone(),
            event: m.event.clone(),
            round: m.round.clone(),
            home,
            away,
        }
    }

    /// `/matches/<id>?url=<percent-encoded source url>`. The id is escaped
    /// as a path segment so a `?` or `#` in it cannot start the query early.
    pub fn detail_href(&self) -> String {
        format!(
            "/matches/{}?{}",
            encode_path_segment(&self.id),
            encode_target_query(&self.url)
        )
    }
}

fn encode_path_segment(segment: &str) -> String {
    let Ok(mut url) = reqwest::Url::parse("http://localhost/") else {
        return String::new();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push(segment);
    }
    url.path().trim_start_matches('/').to_string()
}

/// `url=<percent-encoded>` query string carrying the match source URL.
pub fn encode_target_query(url: &str) -> String {
    reqwest::Url::parse_with_params("http://localhost/", &[("url", url)])
        .ok()
        .and_then(|u| u.query().map(str::to_string))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchListState {
    loading: bool,
    matches: Vec<Match>,
    error: Option<String>,
}

impl MatchListState {
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Replace the collection wholesale. A failed read keeps whatever was
    /// shown before.
    pub fn finish_load(&mut self, result: Result<Vec<Match>, ApiError>) {
        self.loading = false;
        match result {
            Ok(matches) => {
                info!(matches = matches.len(), "match list loaded");
                self.matches = matches;
            }
            Err(e) => {
                warn!(error = %e, "failed to load match list");
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn summary(&self) -> MatchSummary {
        MatchSummary::of(&self.matches)
    }

    pub fn cards(&self) -> Vec<MatchCard> {
        self.matches
            .iter()
            .enumerate()
            .map(|(index, m)| MatchCard::new(index, m))
            .collect()
    }

    /// Nothing to show and nothing in flight or failed.
    pub fn is_empty(&self) -> bool {
        !self.loading && self.error.is_none() && self.matches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MatchSource;
    use crate::detail::target_from_query;
    use futures::executor::block_on;
    use futures::future::{ready, LocalBoxFuture};
    use futures::FutureExt;

    struct StaticSource(Vec<Match>);

    impl MatchSource for StaticSource {
        fn fetch_matches(&self) -> LocalBoxFuture<'_, Result<Vec<Match>, ApiError>> {
            ready(Ok(self.0.clone())).boxed_local()
        }

        fn fetch_round_winner<'a>(
            &'a self,
            _url: &'a str,
        ) -> LocalBoxFuture<'a, Result<Option<String>, ApiError>> {
            ready(Ok(None)).boxed_local()
        }
    }

    struct DownSource;

    fn load_matches(source: &dyn MatchSource, state: &mut MatchListState) {
        state.begin_load();
        assert!(state.is_loading());
        let result = block_on(source.fetch_matches());
        state.finish_load(result);
    }

    impl MatchSource for DownSource {
        fn fetch_matches(&self) -> LocalBoxFuture<'_, Result<Vec<Match>, ApiError>> {
            ready(Err(ApiError::Status {
                endpoint: "/api/matches",
                status: 500,
                body: String::new(),
            }))
            .boxed_local()
        }

        fn fetch_round_winner<'a>(
            &'a self,
            _url: &'a str,
        ) -> LocalBoxFuture<'a, Result<Option<String>, ApiError>> {
            ready(Ok(None)).boxed_local()
        }
    }

    fn cup_match() -> Match {
        Match {
            url: "http://x/1".to_string(),
            event: "Cup".to_string(),
            round: "R1".to_string(),
            teams: vec![
                Team {
                    name: "A".to_string(),
                    score: "5".to_string(),
                },
                Team {
                    name: "B".to_string(),
                    score: "3".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_empty_collection() {
        let mut state = MatchListState::loading();
        assert!(!state.is_empty());
        load_matches(&StaticSource(vec![]), &mut state);
        assert!(state.is_empty());
        assert_eq!(state.summary(), MatchSummary::default());
        assert!(state.cards().is_empty());
    }

    #[test]
    fn test_cards_from_collection() {
        let mut state = MatchListState::loading();
        let no_path = Match {
            url: "http://x".to_string(),
            teams: vec![],
            ..cup_match()
        };
        load_matches(&StaticSource(vec![cup_match(), no_path]), &mut state);

        let cards = state.cards();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].id, "1");
        assert_eq!(cards[0].home.name, "A");
        assert_eq!(cards[1].id, "1");
        assert_eq!(cards[1].away, Team::placeholder());
        assert_eq!(cards[0].detail_href(), "/matches/1?url=http%3A%2F%2Fx%2F1");
        assert_eq!(state.summary().teams, 2);
    }

    #[test]
    fn test_youtube_url_survives_detail_href() {
        let mut state = MatchListState::loading();
        let url = "https://www.youtube.com/watch?v=abc";
        let watch = Match {
            url: url.to_string(),
            ..cup_match()
        };
        load_matches(&StaticSource(vec![watch]), &mut state);

        let href = state.cards()[0].detail_href();
        let (path, query) = href.split_once('?').unwrap();
        assert_eq!(path, "/matches/watch%3Fv=abc");
        assert_eq!(target_from_query(query).as_deref(), Some(url));
    }

    #[test]
    fn test_failed_load_keeps_previous_matches() {
        let mut state = MatchListState::loading();
        load_matches(&StaticSource(vec![cup_match()]), &mut state);
        load_matches(&DownSource, &mut state);
        assert!(!state.is_loading());
        assert_eq!(state.error(), Some("failed to fetch /api/matches: HTTP 500"));
        assert_eq!(state.matches(), &[cup_match()]);
        assert!(!state.is_empty());
    }
}
