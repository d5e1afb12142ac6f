use super::components::{Button, ErrorBanner, Spinner};
use crate::api::SourceHandle;
use crate::betting::{bet_enabled, place_bet, BetPhase, PlaceholderBet, PollChoice, PollKind};
use crate::detail::{detail_reads, DetailState, MatchSlot};
use crate::host::HostHandle;
use crate::wallet::{truncate_address, WalletHandle};
use dioxus::prelude::*;
use futures::StreamExt;
use tracing::warn;

#[component]
pub fn MatchDetailView(
    id: String,
    target: Option<String>,
    source: SourceHandle,
    wallet: WalletHandle,
    host: HostHandle,
    bet: Option<PlaceholderBet>,
    fallback_video: String,
) -> Element {
    let mut state = use_signal(DetailState::default);
    let mut connected = use_signal(|| false);

    // Re-read whenever the `url` query value changes.
    use_effect(use_reactive((&target,), move |(target,)| {
        let Some(ticket) = state.write().navigate(target) else {
            return;
        };
        let source = source.clone();
        spawn(async move {
            let mut reads = detail_reads(&*source, &ticket);
            while let Some(update) = reads.next().await {
                state.write().apply(update);
            }
        });
    }));

    let status_wallet = wallet.clone();
    use_future(move || {
        let wallet = status_wallet.clone();
        async move {
            match wallet.status().await {
                Ok(status) => connected.set(status.connected),
                Err(e) => warn!(error = %e, "could not read wallet status"),
            }
        }
    });

    let view = state.read().clone();
    let title = view.title(&id);
    let video = view.video_id(&fallback_video);
    let source_url = view.target().map(str::to_string);

    rsx! {
        div { class: "w-full max-w-md mx-auto",
            Link { class: "inline-flex items-center gap-2 text-sm px-4 py-3 rounded-xl border mb-6",
                to: super::Route::Home {},
                "← Back to Matches"
            }

            div { class: "border rounded-2xl p-6 mb-6 text-center space-y-3",
                div { class: "text-xs font-medium text-muted-foreground", "LIVE MATCH" }
                h1 { class: "text-2xl font-bold", "{title}" }
                if let Some(subtitle) = view.current_match().map(|m| m.subtitle()) {
                    div { class: "text-sm text-muted-foreground font-medium", "{subtitle}" }
                }
            }

            div { class: "aspect-video mb-6 rounded-2xl overflow-hidden",
                iframe {
                    class: "w-full h-full",
                    src: "https://www.youtube.com/embed/{video}",
                    allow: "accelerometer; autoplay; encrypted-media; gyroscope; picture-in-picture; fullscreen",
                }
            }
            if let Some(url) = source_url {
                Button {
                    class: "w-full mb-6",
                    label: "Open in App",
                    onclick: move |_| host.open_url(&url),
                }
            }

            if view.is_loading() {
                Spinner { label: "Loading match data..." }
            }
            if let Some(message) = view.error() {
                ErrorBanner { message: message.to_string() }
            }

            if let Some(winner) = view.round_winner() {
                div { class: "border-2 border-green-500/30 rounded-2xl p-6 mb-6 text-center",
                    div { class: "text-xs font-semibold text-green-600 uppercase mb-2", "🏆 Last Round Champion" }
                    div { class: "text-lg font-bold text-green-700", "{winner}" }
                }
            }

            match view.slot() {
                MatchSlot::Loaded(m) => rsx! {
                    div { class: "space-y-8",
                        for kind in PollKind::ALL {
                            BettingSection {
                                key: "{kind}",
                                kind,
                                choices: view.polls().get(kind).choices(kind, m.teams()),
                                on_select: move |team: String| {
                                    state.write().select(kind, &team);
                                },
                            }
                            if let Some((selection, panel_key)) = view.polls().get(kind).selection().zip(view.polls().get(kind).bet_key(kind)) {
                                match &bet {
                                    // Keyed by pick so a new selection starts from Idle.
                                    Some(bet) => rsx! {
                                        BetPanel {
                                            key: "{panel_key}",
                                            kind,
                                            selection: selection.to_string(),
                                            bet: bet.clone(),
                                            wallet: wallet.clone(),
                                            connected: connected(),
                                        }
                                    },
                                    None => rsx! {
                                        p { class: "text-center text-sm text-muted-foreground", "Betting is unavailable" }
                                    },
                                }
                            }
                        }
                    }
                },
                MatchSlot::NotFound => rsx! {
                    p { class: "text-center text-muted-foreground", "Match not found" }
                },
                MatchSlot::Malformed(e) => rsx! {
                    ErrorBanner { message: e.to_string() }
                },
                MatchSlot::Empty => rsx! {},
            }
        }
    }
}

#[component]
fn BettingSection(kind: PollKind, choices: Vec<PollChoice>, on_select: EventHandler<String>) -> Element {
    let (icon, heading, subtitle) = (kind.icon(), kind.title(), kind.subtitle());
    rsx! {
        div { class: "border rounded-2xl p-6 shadow-xl",
            div { class: "text-center mb-6",
                div { class: "text-2xl mb-3", "{icon}" }
                h2 { class: "text-lg font-bold mb-1", "{heading}" }
                p { class: "text-sm text-muted-foreground", "{subtitle}" }
            }
            div { class: "grid grid-cols-2 gap-4",
                for choice in choices {
                    button {
                        key: "{choice.name}",
                        class: if choice.selected { "relative p-6 rounded-xl border-2 border-primary bg-primary/10" } else { "relative p-6 rounded-xl border-2" },
                        onclick: {
                            let name = choice.name.clone();
                            move |_| on_select.call(name.clone())
                        },
                        if choice.selected {
                            div { class: "absolute top-2 right-2 w-6 h-6 bg-primary rounded-full", "✓" }
                        }
                        div { class: "text-center",
                            div { class: "font-bold mb-2", "{choice.name}" }
                            if let Some(score) = &choice.score {
                                div { class: "text-sm text-muted-foreground", "Score: {score}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn BetPanel(
    kind: PollKind,
    selection: String,
    bet: PlaceholderBet,
    wallet: WalletHandle,
    connected: bool,
) -> Element {
    let mut phase = use_signal(BetPhase::default);
    let current = phase.read().clone();
    let enabled = bet_enabled(connected, &current);
    let amount = bet.amount_label();

    let pick = selection.clone();
    let on_bet = move |_| {
        let wallet = wallet.clone();
        let bet = bet.clone();
        let pick = pick.clone();
        spawn(async move {
            place_bet(&*wallet, &bet, kind, &pick, connected, |p| phase.set(p)).await;
        });
    };

    let button_text = if current.is_pending() {
        "Processing...".to_string()
    } else {
        kind.bet_button_text().to_string()
    };

    rsx! {
        div { class: "border border-primary/20 rounded-2xl p-6",
            div { class: "text-center mb-4",
                div { class: "text-sm text-muted-foreground mb-1", "Your Selection" }
                div { class: "font-bold text-lg", "{selection}" }
                div { class: "text-xs text-muted-foreground mt-2", "Bet Amount: {amount}" }
            }
            Button {
                class: "w-full py-4 font-semibold rounded-xl",
                label: button_text,
                disabled: !enabled,
                loading: current.is_pending(),
                onclick: on_bet,
            }
            if !connected {
                div { class: "text-center mt-3 text-sm text-muted-foreground",
                    "Please connect your wallet to place bets"
                }
            }
            if let Some(message) = current.error_message() {
                div { class: "text-destructive text-sm font-medium mt-3", "⚠ {message}" }
            }
            if let (Some(hash), Some(status)) = (current.hash().map(|h| truncate_address(&h.0)), current.status_label()) {
                div { class: "mt-4 p-4 rounded-xl border text-xs space-y-2",
                    div { class: "flex justify-between",
                        span { class: "text-muted-foreground", "Transaction:" }
                        span { class: "font-mono", "{hash}" }
                    }
                    div { class: "flex justify-between",
                        span { class: "text-muted-foreground", "Status:" }
                        span { class: "font-medium", "{status}" }
                    }
                }
            }
        }
    }
}
