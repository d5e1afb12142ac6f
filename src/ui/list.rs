use super::components::{ErrorBanner, Spinner};
use crate::api::SourceHandle;
use crate::listing::{MatchCard, MatchListState};
use crate::matches::Team;
use dioxus::prelude::*;

#[component]
pub fn MatchListView(source: SourceHandle) -> Element {
    let mut state = use_signal(MatchListState::loading);

    let on_mount = source.clone();
    use_future(move || {
        let source = on_mount.clone();
        async move {
            let result = source.fetch_matches().await;
            state.write().finish_load(result);
        }
    });

    let mut reload = move |source: SourceHandle| {
        state.write().begin_load();
        spawn(async move {
            let result = source.fetch_matches().await;
            state.write().finish_load(result);
        });
    };

    let view = state.read().clone();
    let summary = view.summary();
    let cards = view.cards();

    rsx! {
        div { class: "px-4 py-6",
            div { class: "text-center mb-8",
                span { class: "text-red-500 font-medium text-sm", "LIVE MATCHES" }
                h2 { class: "text-4xl font-bold mb-2", "Valorant Esports" }
                p { class: "text-muted-foreground text-lg", "Follow your favorite teams and matches" }
            }

            div { class: "grid grid-cols-3 gap-3 mb-8",
                Stat { value: summary.matches, label: "Live Matches" }
                Stat { value: summary.teams, label: "Active Teams" }
                Stat { value: summary.tournaments, label: "Tournaments" }
            }

            if view.is_loading() {
                Spinner { label: "Loading matches..." }
            }
            if let Some(message) = view.error() {
                ErrorBanner { message: message.to_string() }
            }

            if view.is_empty() {
                div { class: "flex flex-col items-center py-16 text-center",
                    h3 { class: "text-xl font-semibold mb-2", "No matches available" }
                    p { class: "text-muted-foreground",
                        "Check back later for upcoming Valorant matches and tournaments"
                    }
                    button {
                        class: "mt-6 px-6 py-3 rounded-xl bg-red-500 text-white",
                        onclick: move |_| reload(source.clone()),
                        "Refresh Matches"
                    }
                }
            } else {
                div { class: "space-y-4",
                    for card in cards {
                        MatchCardView { key: "{card.id}-{card.url}", card: card.clone() }
                    }
                }
            }
        }
    }
}

#[component]
fn Stat(value: usize, label: &'static str) -> Element {
    rsx! {
        div { class: "border rounded-2xl p-4 text-center",
            div { class: "text-2xl font-bold", "{value}" }
            div { class: "text-xs", "{label}" }
        }
    }
}

#[component]
fn MatchCardView(card: MatchCard) -> Element {
    // Plain anchor: the detail page is entered with a full page load and
    // re-fetches by URL.
    let href = card.detail_href();
    rsx! {
        div { class: "relative border-2 rounded-3xl p-6",
            div { class: "flex items-center justify-between mb-4",
                span { class: "text-green-500 font-medium text-sm uppercase", "{card.event}" }
                span { class: "text-xs text-muted-foreground px-3 py-1 rounded-full", "{card.round}" }
            }
            div { class: "flex items-center justify-between mb-6",
                TeamBadge { team: card.home.clone(), tag: "Team Alpha" }
                div { class: "mx-6 w-12 h-12 rounded-full flex items-center justify-center font-bold", "VS" }
                TeamBadge { team: card.away.clone(), tag: "Team Beta" }
            }
            a {
                class: "block w-full text-center bg-red-500 text-white font-bold py-4 px-6 rounded-2xl",
                href: "{href}",
                "Watch Match"
            }
        }
    }
}

#[component]
fn TeamBadge(team: Team, tag: &'static str) -> Element {
    let initial = team.initial();
    rsx! {
        div { class: "flex items-center gap-4 flex-1",
            div { class: "relative w-16 h-16 rounded-2xl flex items-center justify-center",
                span { class: "text-white font-bold text-lg", "{initial}" }
                span { class: "absolute -top-1 -right-1 text-xs font-bold", "{team.score}" }
            }
            div {
                h3 { class: "font-bold text-lg", "{team.name}" }
                p { class: "text-muted-foreground text-sm", "{tag}" }
            }
        }
    }
}
