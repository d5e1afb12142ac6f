//! Prediction polls and the placeholder bet.
//!
//! Two polls sit on the detail page, one for the match winner and one for
//! the team with the most kills. Each holds at most one team name and the two
//! never constrain each other. A poll starts unselected and, once picked,
//! can only move to another team.
//!
//! Betting sends a fixed amount to a fixed address through the wallet and
//! relays the wallet-reported phases: pending, confirming, confirmed. There
//! is no ledger, odds or payout here.

use crate::config::{BetConfig, ConfigError};
use crate::matches::{Team, ValidMatch};
use crate::wallet::{parse_ether, send_and_confirm, TxPhase, TxRequest, WalletClient, WalletError};
use rust_decimal::Decimal;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollKind {
    Winner,
    MostKills,
}

impl PollKind {
    pub const ALL: [PollKind; 2] = [PollKind::Winner, PollKind::MostKills];

    pub fn title(self) -> &'static str {
        match self {
            PollKind::Winner => "Who will win the match?",
            PollKind::MostKills => "Who will get the most kills?",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            PollKind::Winner => "Place your bet on the match winner",
            PollKind::MostKills => "Bet on the team with highest eliminations",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            PollKind::Winner => "🎯",
            PollKind::MostKills => "⚔️",
        }
    }

    /// Scores only make sense for the winner question.
    pub fn show_scores(self) -> bool {
        matches!(self, PollKind::Winner)
    }

    pub fn bet_button_text(self) -> &'static str {
        match self {
            PollKind::Winner => "Place Bet on Winner",
            PollKind::MostKills => "Place Bet on Most Kills",
        }
    }
}

impl std::fmt::Display for PollKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollKind::Winner => write!(f, "winner"),
            PollKind::MostKills => write!(f, "most_kills"),
        }
    }
}

/// A poll choice in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollChoice {
    pub name: String,
    /// `None` when the poll hides scores.
    pub score: Option<String>,
    pub selected: bool,
}

/// Single-choice selection for one poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollState {
    selection: Option<String>,
}

impl PollState {
    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// Replace the current pick. There is no way back to unselected.
    pub fn select(&mut self, team: &str) {
        self.selection = Some(team.to_string());
    }

    /// The Bet affordance exists only once something is picked.
    pub fn bet_visible(&self) -> bool {
        self.selection.is_some()
    }

    /// Identity of the bet panel for the current pick. Changes whenever the
    /// pick does, so progress from an earlier pick is not carried over.
    pub fn bet_key(&self, kind: PollKind) -> Option<String> {
        self.selection.as_ref().map(|team| format!("{kind}-{team}"))
    }

    pub fn choices(&self, kind: PollKind, teams: &[Team; 2]) -> Vec<PollChoice> {
        teams
            .iter()
            .map(|team| PollChoice {
                name: team.name.clone(),
                score: kind.show_scores().then(|| team.score.clone()),
                selected: self.selection.as_deref() == Some(team.name.as_str()),
            })
            .collect()
    }
}

/// Both polls for one match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Polls {
    winner: PollState,
    kills: PollState,
}

impl Polls {
    pub fn get(&self, kind: PollKind) -> &PollState {
        match kind {
            PollKind::Winner => &self.winner,
            PollKind::MostKills => &self.kills,
        }
    }

    /// Select `team` in `kind`. Names that are not one of the match's two
    /// teams are ignored.
    pub fn select(&mut self, kind: PollKind, m: &ValidMatch, team: &str) -> bool {
        if !m.teams().iter().any(|t| t.name == team) {
            warn!(poll = %kind, team, url = %m.url, "ignoring selection of unknown team");
            return false;
        }
        let poll = match kind {
            PollKind::Winner => &mut self.winner,
            PollKind::MostKills => &mut self.kills,
        };
        poll.select(team);
        true
    }
}

/// Wallet-reported progress of one bet.
pub type BetPhase = TxPhase;

/// The Bet button is usable only with a connected wallet and no request
/// already awaiting the wallet.
pub fn bet_enabled(connected: bool, phase: &BetPhase) -> bool {
    connected && !phase.is_pending()
}

/// Fixed-value transfer standing in for a real betting contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderBet {
    pub destination: String,
    pub amount: Decimal,
    pub value_wei: u128,
}

#[derive(Debug, thiserror::Error)]
pub enum BetConfigError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Amount(#[from] WalletError),
}

impl PlaceholderBet {
    pub fn from_config(config: &BetConfig) -> Result<Self, BetConfigError> {
        let amount = config.amount()?;
        Ok(Self {
            destination: config.destination()?.to_string(),
            amount,
            value_wei: parse_ether(amount)?,
        })
    }

    /// "0.0001 ETH"
    pub fn amount_label(&self) -> String {
        format!("{} ETH", self.amount.normalize())
    }

    pub fn tx_request(&self, _selection: &str) -> TxRequest {
        // TODO: selection is not encoded in the transaction
        TxRequest {
            to: self.destination.clone(),
            value_wei: self.value_wei,
        }
    }
}

/// Send the bet and relay each wallet phase through `on_phase`. Returns the
/// final phase. Nothing is retried.
pub async fn place_bet(
    wallet: &dyn WalletClient,
    bet: &PlaceholderBet,
    kind: PollKind,
    selection: &str,
    connected: bool,
    mut on_phase: impl FnMut(BetPhase),
) -> BetPhase {
    if !connected {
        let phase = BetPhase::Failed(WalletError::NotConnected);
        on_phase(phase.clone());
        return phase;
    }

    info!(poll = %kind, selection, to = %bet.destination, "placing bet");
    let phase = send_and_confirm(wallet, bet.tx_request(selection), on_phase).await;
    if let Some(e) = phase.error_message() {
        warn!(poll = %kind, error = %e, "bet did not complete");
    }
    phase
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::Match;
    use crate::wallet::fake::FakeWallet;
    use crate::wallet::TxHash;
    use futures::executor::block_on;

    fn sample_match() -> ValidMatch {
        let m = Match {
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
        };
        ValidMatch::try_from(&m).unwrap()
    }

    fn bet() -> PlaceholderBet {
        PlaceholderBet::from_config(&BetConfig::default()).unwrap()
    }

    #[test]
    fn test_poll_choices_follow_team_order() {
        let m = sample_match();
        let polls = Polls::default();
        let winner = polls.get(PollKind::Winner).choices(PollKind::Winner, m.teams());
        assert_eq!(
            winner.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["A", "B"]
        );
        assert_eq!(winner[0].score.as_deref(), Some("5"));
        assert_eq!(winner[1].score.as_deref(), Some("3"));

        let kills = polls.get(PollKind::MostKills).choices(PollKind::MostKills, m.teams());
        assert!(kills.iter().all(|c| c.score.is_none()));
    }

    #[test]
    fn test_reselect_replaces_pick() {
        let m = sample_match();
        let mut polls = Polls::default();
        assert!(polls.select(PollKind::Winner, &m, "A"));
        assert!(polls.select(PollKind::Winner, &m, "B"));
        assert_eq!(polls.get(PollKind::Winner).selection(), Some("B"));
        let choices = polls.get(PollKind::Winner).choices(PollKind::Winner, m.teams());
        assert_eq!(choices.iter().filter(|c| c.selected).count(), 1);
    }

    #[test]
    fn test_polls_are_independent() {
        let m = sample_match();
        let mut polls = Polls::default();
        polls.select(PollKind::MostKills, &m, "A");
        polls.select(PollKind::Winner, &m, "B");
        assert_eq!(polls.get(PollKind::MostKills).selection(), Some("A"));
        assert_eq!(polls.get(PollKind::Winner).selection(), Some("B"));
    }

    #[test]
    fn test_unknown_team_is_ignored() {
        let m = sample_match();
        let mut polls = Polls::default();
        assert!(!polls.select(PollKind::Winner, &m, "Z"));
        assert_eq!(polls.get(PollKind::Winner).selection(), None);
    }

    #[test]
    fn test_bet_visibility_and_enablement() {
        let m = sample_match();
        let mut polls = Polls::default();
        assert!(!polls.get(PollKind::Winner).bet_visible());
        polls.select(PollKind::Winner, &m, "A");
        assert!(polls.get(PollKind::Winner).bet_visible());
        assert!(!polls.get(PollKind::MostKills).bet_visible());

        assert!(!bet_enabled(false, &BetPhase::Idle));
        assert!(!bet_enabled(false, &BetPhase::Confirmed(TxHash("0x1".to_string()))));
        assert!(!bet_enabled(true, &BetPhase::Pending));
        assert!(bet_enabled(true, &BetPhase::Idle));
    }

    #[test]
    fn test_placeholder_amount() {
        let bet = bet();
        assert_eq!(bet.value_wei, 100_000_000_000_000);
        assert_eq!(bet.amount_label(), "0.0001 ETH");
        let a = bet.tx_request("A");
        let b = bet.tx_request("B");
        assert_eq!(a, b);
        assert_eq!(a.to, "0x000000000000000000000000000000000000dEaD");
    }

    #[test]
    fn test_place_bet_relays_phases() {
        let wallet = FakeWallet::connected();
        let mut phases = Vec::new();
        let last = block_on(place_bet(&wallet, &bet(), PollKind::Winner, "A", true, |p| {
            phases.push(p)
        }));
        let hash = TxHash("0xfeed".to_string());
        assert_eq!(
            phases,
            vec![
                BetPhase::Pending,
                BetPhase::Confirming(hash.clone()),
                BetPhase::Confirmed(hash.clone()),
            ]
        );
        assert_eq!(last, BetPhase::Confirmed(hash));
        assert_eq!(wallet.sent.borrow().len(), 1);
        assert_eq!(last.status_label(), Some("Confirmed!"));
    }

    #[test]
    fn test_place_bet_requires_connection() {
        let wallet = FakeWallet::connected();
        let last = block_on(place_bet(&wallet, &bet(), PollKind::Winner, "A", false, |_| {}));
        assert_eq!(last, BetPhase::Failed(WalletError::NotConnected));
        assert!(wallet.sent.borrow().is_empty());
    }

    #[test]
    fn test_place_bet_user_rejection() {
        let wallet = FakeWallet {
            send_result: Err(WalletError::UserRejected),
            ..FakeWallet::connected()
        };
        let last = block_on(place_bet(&wallet, &bet(), PollKind::MostKills, "B", true, |_| {}));
        assert_eq!(last.error_message().as_deref(), Some("Transaction was rejected"));
        assert!(last.hash().is_none());
    }

    #[test]
    fn test_place_bet_receipt_failure() {
        let wallet = FakeWallet {
            receipt_result: Err(WalletError::from_rpc(-32000, "header not found")),
            ..FakeWallet::connected()
        };
        let last = block_on(place_bet(&wallet, &bet(), PollKind::Winner, "A", true, |_| {}));
        assert_eq!(last.error_message().as_deref(), Some("header not found"));
    }

    #[test]
    fn test_invalid_destination_disables_bet() {
        let config = BetConfig {
            destination: "not-an-address".to_string(),
            ..BetConfig::default()
        };
        assert!(matches!(
            PlaceholderBet::from_config(&config),
            Err(BetConfigError::Config(_))
        ));
    }

    #[test]
    fn test_bet_key_follows_selection() {
        let m = sample_match();
        let mut polls = Polls::default();
        assert_eq!(polls.get(PollKind::Winner).bet_key(PollKind::Winner), None);
        polls.select(PollKind::Winner, &m, "A");
        let first = polls.get(PollKind::Winner).bet_key(PollKind::Winner);
        polls.select(PollKind::Winner, &m, "B");
        let second = polls.get(PollKind::Winner).bet_key(PollKind::Winner);
        assert_eq!(first.as_deref(), Some("winner-A"));
        assert_eq!(second.as_deref(), Some("winner-B"));
        polls.select(PollKind::MostKills, &m, "B");
        assert_ne!(polls.get(PollKind::MostKills).bet_key(PollKind::MostKills), second);
    }
}
