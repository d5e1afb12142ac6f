//! Wallet bridge capability.
//!
//! Signing, broadcasting and receipt finality all live in the user's wallet.
//! This module only describes the calls the app makes into it:
//!
//! - `WalletClient`: the capability trait views receive as a prop
//! - `eip1193::BrowserWallet`: implementation over the injected browser provider
//! - `chains`: the chain-switch cycle offered on the wallet tab
//!
//! Errors are collapsed to two user-visible categories: the user rejected
//! the request, or anything else with the bridge's own message.

pub mod chains;
pub mod eip1193;
#[cfg(test)]
pub(crate) mod fake;

use futures::future::LocalBoxFuture;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use thiserror::Error;
use tracing::{info, warn};

pub use chains::{next_chain, Chain};
pub use eip1193::BrowserWallet;

/// EIP-1193 "User Rejected Request".
pub const USER_REJECTED_CODE: i64 = 4001;

const WEI_PER_ETHER: u64 = 1_000_000_000_000_000_000;

/// Protocol Guild donation addresses, the recipient of the 1 wei test send.
const PROTOCOL_GUILD_BASE: &str = "0x32e3C7fD24e175701A35c224f2238d18439C7dBC";
const PROTOCOL_GUILD_DEFAULT: &str = "0xB3d8d7887693a9852734b4D25e9C0Bb35Ba8a830";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("wallet is not connected")]
    NotConnected,
    #[error("no wallet provider found")]
    NoProvider,
    #[error("user rejected the request")]
    UserRejected,
    #[error("wallet error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("unexpected wallet response: {0}")]
    Decode(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

impl WalletError {
    /// Classify an error object returned by the provider.
    pub fn from_rpc(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        if code == USER_REJECTED_CODE || message.contains("User rejected") {
            WalletError::UserRejected
        } else {
            WalletError::Rpc { code, message }
        }
    }

    /// Text shown inline under the action that failed.
    pub fn display_message(&self) -> String {
        match self {
            WalletError::UserRejected => "Transaction was rejected".to_string(),
            WalletError::Rpc { message, .. } if !message.is_empty() => message.clone(),
            WalletError::Rpc { .. } => "An unexpected error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletStatus {
    pub connected: bool,
    pub address: Option<String>,
    pub chain_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRequest {
    pub to: String,
    pub value_wei: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash(pub String);

impl std::fmt::Display for TxHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub hash: TxHash,
    pub success: bool,
    pub block_number: Option<u64>,
}

/// Wallet-reported progress of one submitted transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TxPhase {
    #[default]
    Idle,
    /// Waiting for the wallet to sign and broadcast.
    Pending,
    Confirming(TxHash),
    Confirmed(TxHash),
    Failed(WalletError),
}

impl TxPhase {
    pub fn is_pending(&self) -> bool {
        matches!(self, TxPhase::Pending)
    }

    pub fn hash(&self) -> Option<&TxHash> {
        match self {
            TxPhase::Confirming(h) | TxPhase::Confirmed(h) => Some(h),
            _ => None,
        }
    }

    /// Status line shown next to the transaction hash.
    pub fn status_label(&self) -> Option<&'static str> {
        match self {
            TxPhase::Pending => Some("Pending"),
            TxPhase::Confirming(_) => Some("Confirming..."),
            TxPhase::Confirmed(_) => Some("Confirmed!"),
            TxPhase::Idle | TxPhase::Failed(_) => None,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        match self {
            TxPhase::Failed(e) => Some(e.display_message()),
            _ => None,
        }
    }
}

/// Operations the app delegates to the user's wallet.
pub trait WalletClient {
    fn status(&self) -> LocalBoxFuture<'_, Result<WalletStatus, WalletError>>;

    fn connect(&self) -> LocalBoxFuture<'_, Result<WalletStatus, WalletError>>;

    fn disconnect(&self) -> LocalBoxFuture<'_, Result<(), WalletError>>;

    fn send_transaction(&self, tx: TxRequest) -> LocalBoxFuture<'_, Result<TxHash, WalletError>>;

    /// Resolves once the transaction is mined.
    fn wait_for_receipt(&self, hash: TxHash) -> LocalBoxFuture<'_, Result<TxReceipt, WalletError>>;

    fn sign_message(&self, message: String) -> LocalBoxFuture<'_, Result<String, WalletError>>;

    fn sign_typed_data(
        &self,
        typed_data: serde_json::Value,
    ) -> LocalBoxFuture<'_, Result<String, WalletError>>;

    fn switch_chain(&self, chain_id: u64) -> LocalBoxFuture<'_, Result<(), WalletError>>;
}

/// Shared handle passed into views as a prop.
#[derive(Clone)]
pub struct WalletHandle(pub Rc<dyn WalletClient>);

impl WalletHandle {
    pub fn new(wallet: impl WalletClient + 'static) -> Self {
        Self(Rc::new(wallet))
    }
}

impl PartialEq for WalletHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::ops::Deref for WalletHandle {
    type Target = dyn WalletClient;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// Submit `tx` and relay each phase through `on_phase` until the receipt
/// arrives. Returns the final phase. Nothing is retried.
pub async fn send_and_confirm(
    wallet: &dyn WalletClient,
    tx: TxRequest,
    mut on_phase: impl FnMut(TxPhase),
) -> TxPhase {
    on_phase(TxPhase::Pending);

    let to = tx.to.clone();
    let hash = match wallet.send_transaction(tx).await {
        Ok(hash) => hash,
        Err(e) => {
            warn!(to = %to, error = %e, "transaction failed");
            let phase = TxPhase::Failed(e);
            on_phase(phase.clone());
            return phase;
        }
    };

    on_phase(TxPhase::Confirming(hash.clone()));

    let phase = match wallet.wait_for_receipt(hash.clone()).await {
        Ok(receipt) => {
            if !receipt.success {
                warn!(hash = %hash, "transaction reverted");
            }
            TxPhase::Confirmed(hash)
        }
        Err(e) => {
            warn!(hash = %hash, error = %e, "waiting for receipt failed");
            TxPhase::Failed(e)
        }
    };
    on_phase(phase.clone());
    phase
}

/// Sign `message`, asking the wallet to connect first when it is not.
/// Returns the status the signature was made under along with it.
pub async fn sign_with_connect(
    wallet: &dyn WalletClient,
    message: String,
) -> Result<(WalletStatus, String), WalletError> {
    let mut status = wallet.status().await?;
    if !status.connected {
        info!("connecting wallet before signing");
        status = wallet.connect().await?;
        if status.address.is_none() {
            return Err(WalletError::NotConnected);
        }
    }
    let signature = wallet.sign_message(message).await?;
    Ok((status, signature))
}

/// The 1 wei transfer behind "Send Transaction (eth)".
pub fn one_wei_transfer(chain_id: Option<u64>) -> TxRequest {
    let to = if chain_id == Some(chains::BASE.id) {
        PROTOCOL_GUILD_BASE
    } else {
        PROTOCOL_GUILD_DEFAULT
    };
    TxRequest {
        to: to.to_string(),
        value_wei: 1,
    }
}

/// Convert a native-unit amount to wei. Fractions of a wei are rejected.
pub fn parse_ether(amount: Decimal) -> Result<u128, WalletError> {
    let wei = amount
        .checked_mul(Decimal::from(WEI_PER_ETHER))
        .ok_or_else(|| WalletError::InvalidAmount(amount.to_string()))?;
    if wei.is_sign_negative() || wei.fract() != Decimal::ZERO {
        return Err(WalletError::InvalidAmount(amount.to_string()));
    }
    wei.to_u128()
        .ok_or_else(|| WalletError::InvalidAmount(amount.to_string()))
}

/// JSON-RPC quantity encoding.
pub fn hex_quantity(value: u128) -> String {
    format!("0x{value:x}")
}

/// `0x1234...abcd`
pub fn truncate_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }
    match (address.get(..6), address.get(address.len() - 4..)) {
        (Some(head), Some(tail)) => format!("{head}...{tail}"),
        _ => address.to_string(),
    }
}

/// EIP-712 payload for the wallet tab's "Sign Typed Data" action.
pub fn typed_greeting(app_name: &str, chain_id: u64) -> serde_json::Value {
    serde_json::json!({
        "types": {
            "EIP712Domain": [
                { "name": "name", "type": "string" },
                { "name": "version", "type": "string" },
                { "name": "chainId", "type": "uint256" }
            ],
            "Message": [
                { "name": "content", "type": "string" }
            ]
        },
        "primaryType": "Message",
        "domain": {
            "name": app_name,
            "version": "1",
            "chainId": chain_id
        },
        "message": {
            "content": format!("Hello from {app_name}!")
        }
    })
}

#[cfg(test)]
mod tests {
    use super::fake::FakeWallet;
    use super::*;
    use futures::executor::block_on;
    use std::str::FromStr;

    #[test]
    fn test_parse_ether() {
        let wei = parse_ether(Decimal::from_str("0.0001").unwrap()).unwrap();
        assert_eq!(wei, 100_000_000_000_000);
        assert_eq!(hex_quantity(wei), "0x5af3107a4000");
        assert_eq!(parse_ether(Decimal::ONE).unwrap(), 1_000_000_000_000_000_000);
    }

    #[test]
    fn test_parse_ether_rejects_negative() {
        assert!(matches!(
            parse_ether(Decimal::from_str("-0.5").unwrap()),
            Err(WalletError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_rpc_error_classification() {
        assert_eq!(WalletError::from_rpc(4001, "nope"), WalletError::UserRejected);
        assert_eq!(
            WalletError::from_rpc(-32000, "User rejected the request."),
            WalletError::UserRejected
        );
        let other = WalletError::from_rpc(-32603, "insufficient funds");
        assert_eq!(other.display_message(), "insufficient funds");
        assert_eq!(
            WalletError::UserRejected.display_message(),
            "Transaction was rejected"
        );
        assert_eq!(
            WalletError::from_rpc(-1, "").display_message(),
            "An unexpected error occurred"
        );
    }

    #[test]
    fn test_truncate_address() {
        assert_eq!(
            truncate_address("0x000000000000000000000000000000000000dEaD"),
            "0x0000...dEaD"
        );
        assert_eq!(truncate_address("0x1234"), "0x1234");
    }

    #[test]
    fn test_typed_greeting_shape() {
        let data = typed_greeting("Valorant Esports", 8453);
        assert_eq!(data["domain"]["chainId"], 8453);
        assert_eq!(data["message"]["content"], "Hello from Valorant Esports!");
        assert_eq!(data["primaryType"], "Message");
    }

    #[test]
    fn test_send_and_confirm_relays_phases() {
        let wallet = FakeWallet::connected();
        let mut phases = Vec::new();
        let last = block_on(send_and_confirm(&wallet, one_wei_transfer(Some(8453)), |p| {
            phases.push(p)
        }));
        let hash = TxHash("0xfeed".to_string());
        assert_eq!(
            phases,
            vec![
                TxPhase::Pending,
                TxPhase::Confirming(hash.clone()),
                TxPhase::Confirmed(hash.clone()),
            ]
        );
        assert_eq!(last.status_label(), Some("Confirmed!"));
        assert_eq!(last.hash(), Some(&hash));
    }

    #[test]
    fn test_one_wei_transfer_recipient_follows_chain() {
        let base = one_wei_transfer(Some(8453));
        assert_eq!(base.to, PROTOCOL_GUILD_BASE);
        assert_eq!(base.value_wei, 1);
        assert_eq!(one_wei_transfer(Some(10)).to, PROTOCOL_GUILD_DEFAULT);
        assert_eq!(one_wei_transfer(None).to, PROTOCOL_GUILD_DEFAULT);
    }

    #[test]
    fn test_sign_connects_disconnected_wallet_first() {
        let wallet = FakeWallet::disconnected();
        let (status, signature) =
            block_on(sign_with_connect(&wallet, "Hello from Valorant Esports!".to_string())).unwrap();
        assert!(status.connected);
        assert_eq!(signature, "0xsig");
        assert_eq!(wallet.connects.get(), 1);
        assert_eq!(*wallet.signed.borrow(), vec!["Hello from Valorant Esports!".to_string()]);
    }

    #[test]
    fn test_sign_skips_connect_when_connected() {
        let wallet = FakeWallet::connected();
        block_on(sign_with_connect(&wallet, "hi".to_string())).unwrap();
        assert_eq!(wallet.connects.get(), 0);
    }

    #[test]
    fn test_sign_stops_when_connect_is_rejected() {
        let wallet = FakeWallet {
            connect_result: Err(WalletError::UserRejected),
            ..FakeWallet::disconnected()
        };
        let result = block_on(sign_with_connect(&wallet, "hi".to_string()));
        assert_eq!(result, Err(WalletError::UserRejected));
        assert!(wallet.signed.borrow().is_empty());
    }
}
