//! Match data backend client.
//!
//! Two read-only endpoints:
//!   GET /api/matches                 → { matches: Match[] }
//!   GET /api/round-winner?url=<url>  → { winner: string }
//!
//! Views depend on the `MatchSource` trait, not on the HTTP client, so the
//! data source is injected and can be faked in tests.

use crate::matches::{Match, MatchesResponse, RoundWinnerResponse};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, warn};

const MATCHES_PATH: &str = "/api/matches";
const ROUND_WINNER_PATH: &str = "/api/round-winner";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("failed to fetch {endpoint}: HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
    #[error("failed to decode {endpoint}: {reason}")]
    Decode {
        endpoint: &'static str,
        reason: String,
    },
}

/// Read access to match data. Futures are not `Send`: the browser runs
/// everything on one thread.
pub trait MatchSource {
    fn fetch_matches(&self) -> LocalBoxFuture<'_, Result<Vec<Match>, ApiError>>;

    fn fetch_round_winner<'a>(
        &'a self,
        url: &'a str,
    ) -> LocalBoxFuture<'a, Result<Option<String>, ApiError>>;
}

/// Shared handle passed into views as a prop.
#[derive(Clone)]
pub struct SourceHandle(pub Rc<dyn MatchSource>);

impl SourceHandle {
    pub fn new(source: impl MatchSource + 'static) -> Self {
        Self(Rc::new(source))
    }
}

impl PartialEq for SourceHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::ops::Deref for SourceHandle {
    type Target = dyn MatchSource;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// HTTP client for the match backend.
pub struct MatchApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl MatchApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let resp = self.client.get(&url).query(query).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            warn!(endpoint, status, "backend returned error status");
            return Err(ApiError::Status {
                endpoint,
                status,
                body,
            });
        }

        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode {
            endpoint,
            reason: e.to_string(),
        })
    }

    pub async fn matches(&self) -> Result<Vec<Match>, ApiError> {
        let body: MatchesResponse = self.get_json(MATCHES_PATH, &[]).await?;
        debug!(matches = body.matches.len(), "fetched matches");
        Ok(body.matches)
    }

    pub async fn round_winner(&self, url: &str) -> Result<Option<String>, ApiError> {
        let body: RoundWinnerResponse = self.get_json(ROUND_WINNER_PATH, &[("url", url)]).await?;
        debug!(url, winner = ?body.winner, "fetched round winner");
        Ok(body.winner)
    }
}

impl MatchSource for MatchApiClient {
    fn fetch_matches(&self) -> LocalBoxFuture<'_, Result<Vec<Match>, ApiError>> {
        self.matches().boxed_local()
    }

    fn fetch_round_winner<'a>(
        &'a self,
        url: &'a str,
    ) -> LocalBoxFuture<'a, Result<Option<String>, ApiError>> {
        self.round_winner(url).boxed_local()
    }
}
