//! Valorant esports mini app.
//!
//! Headless view state (`listing`, `detail`, `betting`) is kept separate from
//! the Dioxus components in `ui` so it can be driven from tests with fake
//! match sources and wallets.

pub mod api;
pub mod betting;
pub mod config;
pub mod detail;
pub mod host;
pub mod listing;
pub mod matches;
pub mod notify;
pub mod ui;
pub mod wallet;
