//! `WalletClient` over the EIP-1193 provider the browser injects as
//! `window.ethereum`.
//!
//! Each call runs a small script through the Dioxus JS bridge. The script
//! receives `[method, params]`, forwards it to the provider and resolves to
//! either `{ "ok": result }` or `{ "error": { "code", "message" } }`.

use super::{
    hex_quantity, TxHash, TxReceipt, TxRequest, WalletClient, WalletError, WalletStatus,
};
use dioxus::prelude::eval;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

const REQUEST_SCRIPT: &str = r#"
const [method, params] = await dioxus.recv();
if (!window.ethereum) {
    return { error: { code: -1, message: "no provider" } };
}
try {
    const result = await window.ethereum.request({ method, params });
    return { ok: result ?? null };
} catch (e) {
    return { error: { code: e?.code ?? 0, message: e?.shortMessage ?? e?.message ?? String(e) } };
}
"#;

/// Polls for a receipt in the page so no timer is needed on the Rust side.
const RECEIPT_SCRIPT: &str = r#"
const [hash, intervalMs, attempts] = await dioxus.recv();
if (!window.ethereum) {
    return { error: { code: -1, message: "no provider" } };
}
for (let i = 0; i < attempts; i++) {
    try {
        const receipt = await window.ethereum.request({
            method: "eth_getTransactionReceipt",
            params: [hash],
        });
        if (receipt) {
            return { ok: receipt };
        }
    } catch (e) {
        return { error: { code: e?.code ?? 0, message: e?.message ?? String(e) } };
    }
    await new Promise((resolve) => setTimeout(resolve, intervalMs));
}
return { error: { code: -2, message: "timed out waiting for receipt" } };
"#;

const RECEIPT_POLL_MS: u64 = 1_500;
const RECEIPT_POLL_ATTEMPTS: u64 = 120;

/// Wallet injected into the page by a browser extension or the host app.
#[derive(Debug, Clone, Default)]
pub struct BrowserWallet;

impl BrowserWallet {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, script: &str, args: Value) -> Result<Value, WalletError> {
        let bridge = eval(script);
        bridge
            .send(args)
            .map_err(|e| WalletError::Decode(format!("bridge send failed: {e:?}")))?;
        let reply = bridge
            .join()
            .await
            .map_err(|e| WalletError::Decode(format!("bridge failed: {e:?}")))?;
        parse_reply(reply)
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        debug!(method, "wallet request");
        let result = self.run(REQUEST_SCRIPT, json!([method, params])).await;
        if let Err(ref e) = result {
            warn!(method, error = %e, "wallet request failed");
        }
        result
    }

    async fn read_status(&self) -> Result<WalletStatus, WalletError> {
        let accounts = self.request("eth_accounts", json!([])).await?;
        let chain = self.request("eth_chainId", json!([])).await?;
        Ok(status_from(&accounts, &chain))
    }

    async fn require_address(&self) -> Result<String, WalletError> {
        self.read_status()
            .await?
            .address
            .ok_or(WalletError::NotConnected)
    }

    async fn connect_inner(&self) -> Result<WalletStatus, WalletError> {
        let accounts = self.request("eth_requestAccounts", json!([])).await?;
        let chain = self.request("eth_chainId", json!([])).await?;
        let status = status_from(&accounts, &chain);
        info!(address = ?status.address, chain_id = ?status.chain_id, "wallet connected");
        Ok(status)
    }

    async fn disconnect_inner(&self) -> Result<(), WalletError> {
        self.request("wallet_revokePermissions", json!([{ "eth_accounts": {} }]))
            .await?;
        info!("wallet disconnected");
        Ok(())
    }

    async fn send_inner(&self, tx: TxRequest) -> Result<TxHash, WalletError> {
        let from = self.require_address().await?;
        let params = json!([{
            "from": from,
            "to": tx.to,
            "value": hex_quantity(tx.value_wei),
        }]);
        let hash = self.request("eth_sendTransaction", params).await?;
        let hash = hash
            .as_str()
            .map(|h| TxHash(h.to_string()))
            .ok_or_else(|| WalletError::Decode(format!("transaction hash: {hash}")))?;
        info!(hash = %hash, to = %tx.to, "transaction submitted");
        Ok(hash)
    }

    async fn receipt_inner(&self, hash: TxHash) -> Result<TxReceipt, WalletError> {
        let receipt = self
            .run(
                RECEIPT_SCRIPT,
                json!([hash.0, RECEIPT_POLL_MS, RECEIPT_POLL_ATTEMPTS]),
            )
            .await?;
        let receipt = receipt_from(hash, &receipt);
        info!(hash = %receipt.hash, success = receipt.success, "transaction mined");
        Ok(receipt)
    }

    async fn sign_message_inner(&self, message: String) -> Result<String, WalletError> {
        let address = self.require_address().await?;
        let encoded = format!(
            "0x{}",
            message.bytes().map(|b| format!("{b:02x}")).collect::<String>()
        );
        let signature = self.request("personal_sign", json!([encoded, address])).await?;
        signature_from(signature)
    }

    async fn sign_typed_inner(&self, typed_data: Value) -> Result<String, WalletError> {
        let address = self.require_address().await?;
        let signature = self
            .request(
                "eth_signTypedData_v4",
                json!([address, typed_data.to_string()]),
            )
            .await?;
        signature_from(signature)
    }

    async fn switch_inner(&self, chain_id: u64) -> Result<(), WalletError> {
        self.request(
            "wallet_switchEthereumChain",
            json!([{ "chainId": hex_quantity(chain_id as u128) }]),
        )
        .await?;
        info!(chain_id, "switched chain");
        Ok(())
    }
}

impl WalletClient for BrowserWallet {
    fn status(&self) -> LocalBoxFuture<'_, Result<WalletStatus, WalletError>> {
        self.read_status().boxed_local()
    }

    fn connect(&self) -> LocalBoxFuture<'_, Result<WalletStatus, WalletError>> {
        self.connect_inner().boxed_local()
    }

    fn disconnect(&self) -> LocalBoxFuture<'_, Result<(), WalletError>> {
        self.disconnect_inner().boxed_local()
    }

    fn send_transaction(&self, tx: TxRequest) -> LocalBoxFuture<'_, Result<TxHash, WalletError>> {
        self.send_inner(tx).boxed_local()
    }

    fn wait_for_receipt(&self, hash: TxHash) -> LocalBoxFuture<'_, Result<TxReceipt, WalletError>> {
        self.receipt_inner(hash).boxed_local()
    }

    fn sign_message(&self, message: String) -> LocalBoxFuture<'_, Result<String, WalletError>> {
        self.sign_message_inner(message).boxed_local()
    }

    fn sign_typed_data(&self, typed_data: Value) -> LocalBoxFuture<'_, Result<String, WalletError>> {
        self.sign_typed_inner(typed_data).boxed_local()
    }

    fn switch_chain(&self, chain_id: u64) -> LocalBoxFuture<'_, Result<(), WalletError>> {
        self.switch_inner(chain_id).boxed_local()
    }
}

/// Unwrap the `{ ok }` / `{ error }` envelope produced by the scripts.
fn parse_reply(reply: Value) -> Result<Value, WalletError> {
    if let Some(error) = reply.get("error") {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if code == -1 {
            return Err(WalletError::NoProvider);
        }
        return Err(WalletError::from_rpc(code, message));
    }
    reply
        .get("ok")
        .cloned()
        .ok_or_else(|| WalletError::Decode(reply.to_string()))
}

fn parse_hex_u64(value: &str) -> Option<u64> {
    u64::from_str_radix(value.trim_start_matches("0x"), 16).ok()
}

fn status_from(accounts: &Value, chain: &Value) -> WalletStatus {
    let address = accounts
        .as_array()
        .and_then(|a| a.first())
        .and_then(Value::as_str)
        .map(str::to_string);
    WalletStatus {
        connected: address.is_some(),
        address,
        chain_id: chain.as_str().and_then(parse_hex_u64),
    }
}

fn receipt_from(hash: TxHash, receipt: &Value) -> TxReceipt {
    TxReceipt {
        hash,
        success: receipt.get("status").and_then(Value::as_str) == Some("0x1"),
        block_number: receipt
            .get("blockNumber")
            .and_then(Value::as_str)
            .and_then(parse_hex_u64),
    }
}

fn signature_from(value: Value) -> Result<String, WalletError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| WalletError::Decode(format!("signature: {value}")))
}
