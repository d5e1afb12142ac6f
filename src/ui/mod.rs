//! Dioxus front end.
//!
//! Routes:
//!   /                          → match list
//!   /matches/:id?url=<url>     → match detail (`id` is display only)
//!   /actions                   → host actions and notifications
//!   /wallet                    → wallet actions
//!   /context                   → host context
//!
//! The route components are thin: they pull the capabilities out of
//! `AppDeps` once and hand them to the views as explicit props.

mod actions;
mod components;
mod context;
mod detail;
mod list;
mod wallet;

use crate::api::{MatchApiClient, SourceHandle};
use crate::betting::PlaceholderBet;
use crate::config::{self, Config};
use crate::detail::target_from_query;
use crate::host::{BrowserHost, HostContext, HostHandle};
use crate::listing::encode_target_query;
use crate::notify::{HttpNotifier, NotifierHandle};
use crate::wallet::{BrowserWallet, WalletHandle};
use components::Header;
use dioxus::prelude::*;
use dioxus::router::prelude::FromQuery;
use tracing::error;

pub use actions::ActionsView;
pub use context::ContextView;
pub use detail::MatchDetailView;
pub use list::MatchListView;
pub use wallet::WalletView;

/// Capabilities and settings shared by every route.
#[derive(Clone, PartialEq)]
pub struct AppDeps {
    pub config: Config,
    pub source: SourceHandle,
    pub wallet: WalletHandle,
    pub host: HostHandle,
    pub notifier: NotifierHandle,
    pub context: HostContext,
    /// `None` when the configured amount cannot be expressed in wei.
    pub bet: Option<PlaceholderBet>,
}

impl AppDeps {
    /// Browser-backed capabilities for a standalone tab.
    pub fn browser(config: &Config) -> Self {
        let bet = match PlaceholderBet::from_config(&config.bet) {
            Ok(bet) => Some(bet),
            Err(e) => {
                error!(error = %e, "betting disabled: invalid bet config");
                None
            }
        };
        Self {
            config: config.clone(),
            source: SourceHandle::new(MatchApiClient::new(config.api.base_url.clone())),
            wallet: WalletHandle::new(BrowserWallet::new()),
            host: HostHandle::new(BrowserHost),
            notifier: NotifierHandle::new(HttpNotifier::new(config.app.url.clone())),
            context: HostContext::standalone(),
            bet,
        }
    }
}

/// Query string of the detail route.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailQuery {
    pub url: Option<String>,
}

impl FromQuery for DetailQuery {
    fn from_query(query: &str) -> Self {
        Self {
            url: target_from_query(query),
        }
    }
}

impl std::fmt::Display for DetailQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.url {
            Some(url) => write!(f, "{}", encode_target_query(url)),
            None => Ok(()),
        }
    }
}

#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Shell)]
        #[route("/")]
        Home {},
        #[route("/matches/:id?:..query")]
        MatchDetail { id: String, query: DetailQuery },
        #[route("/actions")]
        ActionsTab {},
        #[route("/wallet")]
        WalletTab {},
        #[route("/context")]
        ContextTab {},
    #[end_layout]
    #[route("/:..segments")]
    PageNotFound { segments: Vec<String> },
}

#[component]
pub fn App() -> Element {
    use_context_provider(|| AppDeps::browser(config::current()));
    rsx! {
        Router::<Route> {}
    }
}

#[component]
fn Shell() -> Element {
    let deps = use_context::<AppDeps>();
    let padding = deps.context.safe_area.padding_style();
    rsx! {
        div { class: "min-h-screen", style: "{padding}",
            div { class: "mx-auto py-4 px-4 pb-20 max-w-md",
                Header { app_name: deps.config.app.name.clone(), context: deps.context.clone() }
                Outlet::<Route> {}
                nav { class: "fixed bottom-0 inset-x-0 flex justify-around border-t py-3 bg-card",
                    Link { to: Route::Home {}, "Matches" }
                    Link { to: Route::ActionsTab {}, "Actions" }
                    Link { to: Route::WalletTab {}, "Wallet" }
                    Link { to: Route::ContextTab {}, "Context" }
                }
            }
        }
    }
}

#[component]
fn Home() -> Element {
    let deps = use_context::<AppDeps>();
    rsx! {
        MatchListView { source: deps.source }
    }
}

#[component]
fn MatchDetail(id: String, query: DetailQuery) -> Element {
    let deps = use_context::<AppDeps>();
    rsx! {
        MatchDetailView {
            id,
            target: query.url,
            source: deps.source,
            wallet: deps.wallet,
            host: deps.host,
            bet: deps.bet,
            fallback_video: deps.config.app.fallback_video_id,
        }
    }
}

#[component]
fn WalletTab() -> Element {
    let deps = use_context::<AppDeps>();
    rsx! {
        WalletView { wallet: deps.wallet, app_name: deps.config.app.name }
    }
}

#[component]
fn ActionsTab() -> Element {
    let deps = use_context::<AppDeps>();
    rsx! {
        ActionsView {
            context: deps.context,
            host: deps.host,
            notifier: deps.notifier,
            app_url: deps.config.app.url,
        }
    }
}

#[component]
fn ContextTab() -> Element {
    let deps = use_context::<AppDeps>();
    rsx! {
        ContextView { context: deps.context }
    }
}

#[component]
fn PageNotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        div { class: "text-center py-16",
            h1 { class: "text-xl font-semibold", "Page not found" }
            p { class: "text-muted-foreground", "/{path}" }
            Link { to: Route::Home {}, "Back to Matches" }
        }
    }
}
