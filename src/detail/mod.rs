//! Match detail view state.
//!
//! The target match is named by the `url` query parameter. Each time that
//! value changes, two reads go out together:
//!
//! 1. the match collection, searched for the entry whose `url` equals the target
//! 2. the round winner for the target
//!
//! Both share one loading flag and one error slot. Every read carries a
//! `Ticket` (sequence number plus target URL); a response whose ticket is no
//! longer current is dropped, so a slow reply for a previous match can never
//! overwrite the one on screen.

use crate::api::{ApiError, MatchSource};
use crate::betting::{PollKind, Polls};
use crate::matches::{video_id, Match, MatchError, ValidMatch};
use futures::future::LocalBoxFuture;
use futures::stream::FuturesUnordered;
use futures::FutureExt;
use tracing::{debug, info, warn};

/// Reads issued per navigation.
const READS_PER_TARGET: u8 = 2;

/// Identifies the navigation a read was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    pub url: String,
}

/// Completed read, ready to be applied to `DetailState`.
#[derive(Debug)]
pub enum DetailUpdate {
    Matches(Ticket, Result<Vec<Match>, ApiError>),
    RoundWinner(Ticket, Result<Option<String>, ApiError>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MatchSlot {
    /// Nothing fetched yet, or no target.
    #[default]
    Empty,
    Loaded(ValidMatch),
    NotFound,
    Malformed(MatchError),
}

#[derive(Debug, Clone, Default)]
pub struct DetailState {
    target: Option<String>,
    seq: u64,
    pending: u8,
    error: Option<String>,
    slot: MatchSlot,
    round_winner: Option<String>,
    polls: Polls,
}

impl DetailState {
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn slot(&self) -> &MatchSlot {
        &self.slot
    }

    pub fn current_match(&self) -> Option<&ValidMatch> {
        match &self.slot {
            MatchSlot::Loaded(m) => Some(m),
            _ => None,
        }
    }

    pub fn round_winner(&self) -> Option<&str> {
        self.round_winner.as_deref()
    }

    pub fn polls(&self) -> &Polls {
        &self.polls
    }

    /// Point the view at `url`. Returns a ticket when new reads should be
    /// issued; `None` when the target is unchanged or absent.
    pub fn navigate(&mut self, url: Option<String>) -> Option<Ticket> {
        let url = url.filter(|u| !u.is_empty());
        if url == self.target {
            return None;
        }

        self.seq += 1;
        self.target = url.clone();
        self.error = None;
        self.slot = MatchSlot::Empty;
        self.round_winner = None;
        self.polls = Polls::default();

        match url {
            Some(url) => {
                info!(url = %url, seq = self.seq, "loading match detail");
                self.pending = READS_PER_TARGET;
                Some(Ticket { seq: self.seq, url })
            }
            None => {
                self.pending = 0;
                None
            }
        }
    }

    fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.seq == self.seq && self.target.as_deref() == Some(ticket.url.as_str())
    }

    /// Apply a completed read. Returns false if it was stale and dropped.
    pub fn apply(&mut self, update: DetailUpdate) -> bool {
        match update {
            DetailUpdate::Matches(ticket, result) => self.commit_matches(&ticket, result),
            DetailUpdate::RoundWinner(ticket, result) => self.commit_round_winner(&ticket, result),
        }
    }

    fn commit_matches(&mut self, ticket: &Ticket, result: Result<Vec<Match>, ApiError>) -> bool {
        if !self.is_current(ticket) {
            debug!(url = %ticket.url, "dropping stale match response");
            return false;
        }
        match result {
            Ok(matches) => {
                self.slot = match matches.iter().find(|m| m.url == ticket.url) {
                    None => {
                        warn!(url = %ticket.url, "match not found");
                        MatchSlot::NotFound
                    }
                    Some(m) => match ValidMatch::try_from(m) {
                        Ok(valid) => MatchSlot::Loaded(valid),
                        Err(e) => {
                            warn!(error = %e, "malformed match");
                            MatchSlot::Malformed(e)
                        }
                    },
                };
            }
            Err(e) => self.fail(e),
        }
        self.settle();
        true
    }

    fn commit_round_winner(
        &mut self,
        ticket: &Ticket,
        result: Result<Option<String>, ApiError>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(url = %ticket.url, "dropping stale round winner response");
            return false;
        }
        match result {
            Ok(winner) => self.round_winner = winner.filter(|w| !w.is_empty()),
            Err(e) => self.fail(e),
        }
        self.settle();
        true
    }

    fn fail(&mut self, e: ApiError) {
        warn!(error = %e, "match detail read failed");
        self.error = Some(e.to_string());
    }

    fn settle(&mut self) {
        self.pending = self.pending.saturating_sub(1);
    }

    /// Pick a team in one poll. Ignored until a valid match is loaded.
    pub fn select(&mut self, kind: PollKind, team: &str) -> bool {
        match &self.slot {
            MatchSlot::Loaded(m) => self.polls.select(kind, m, team),
            _ => false,
        }
    }

    /// "A vs B" once loaded, else "Match <route id>".
    pub fn title(&self, route_id: &str) -> String {
        match &self.slot {
            MatchSlot::Loaded(m) => m.title(),
            _ => format!("Match {route_id}"),
        }
    }

    /// Video to embed, from the target's `v` parameter.
    pub fn video_id(&self, fallback: &str) -> String {
        self.target
            .as_deref()
            .and_then(video_id)
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Issue both reads for `ticket`. Updates are yielded in completion order.
pub fn detail_reads<'a>(
    source: &'a dyn MatchSource,
    ticket: &Ticket,
) -> FuturesUnordered<LocalBoxFuture<'a, DetailUpdate>> {
    let reads = FuturesUnordered::new();

    let matches_ticket = ticket.clone();
    reads.push(
        async move {
            let result = source.fetch_matches().await;
            DetailUpdate::Matches(matches_ticket, result)
        }
        .boxed_local(),
    );

    let winner_ticket = ticket.clone();
    reads.push(
        async move {
            let result = source.fetch_round_winner(&winner_ticket.url).await;
            DetailUpdate::RoundWinner(winner_ticket, result)
        }
        .boxed_local(),
    );

    reads
}

/// `url` parameter from a raw query string, percent-decoded.
pub fn target_from_query(query: &str) -> Option<String> {
    let mut base = reqwest::Url::parse("http://localhost/").ok()?;
    base.set_query(Some(query.trim_start_matches('?')));
    base.query_pairs()
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
