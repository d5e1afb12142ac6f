//! In-memory `WalletClient` for tests.

use super::{TxHash, TxReceipt, TxRequest, WalletClient, WalletError, WalletStatus};
use futures::future::{ready, LocalBoxFuture};
use futures::FutureExt;
use std::cell::{Cell, RefCell};

const ADDRESS: &str = "0x000000000000000000000000000000000000bEEF";

/// Records what it was asked to do and answers from canned results.
pub(crate) struct FakeWallet {
    pub status: RefCell<WalletStatus>,
    pub connect_result: Result<WalletStatus, WalletError>,
    pub send_result: Result<TxHash, WalletError>,
    pub receipt_result: Result<bool, WalletError>,
    pub sent: RefCell<Vec<TxRequest>>,
    pub signed: RefCell<Vec<String>>,
    pub connects: Cell<u32>,
}

impl FakeWallet {
    fn online() -> WalletStatus {
        WalletStatus {
            connected: true,
            address: Some(ADDRESS.to_string()),
            chain_id: Some(8453),
        }
    }

    pub fn connected() -> Self {
        Self {
            status: RefCell::new(Self::online()),
            connect_result: Ok(Self::online()),
            send_result: Ok(TxHash("0xfeed".to_string())),
            receipt_result: Ok(true),
            sent: RefCell::new(Vec::new()),
            signed: RefCell::new(Vec::new()),
            connects: Cell::new(0),
        }
    }

    pub fn disconnected() -> Self {
        Self {
            status: RefCell::new(WalletStatus::default()),
            ..Self::connected()
        }
    }
}

impl WalletClient for FakeWallet {
    fn status(&self) -> LocalBoxFuture<'_, Result<WalletStatus, WalletError>> {
        ready(Ok(self.status.borrow().clone())).boxed_local()
    }

    fn connect(&self) -> LocalBoxFuture<'_, Result<WalletStatus, WalletError>> {
        self.connects.set(self.connects.get() + 1);
        if let Ok(status) = &self.connect_result {
            *self.status.borrow_mut() = status.clone();
        }
        ready(self.connect_result.clone()).boxed_local()
    }

    fn disconnect(&self) -> LocalBoxFuture<'_, Result<(), WalletError>> {
        *self.status.borrow_mut() = WalletStatus::default();
        ready(Ok(())).boxed_local()
    }

    fn send_transaction(&self, tx: TxRequest) -> LocalBoxFuture<'_, Result<TxHash, WalletError>> {
        self.sent.borrow_mut().push(tx);
        ready(self.send_result.clone()).boxed_local()
    }

    fn wait_for_receipt(&self, hash: TxHash) -> LocalBoxFuture<'_, Result<TxReceipt, WalletError>> {
        let result = self.receipt_result.clone().map(|success| TxReceipt {
            hash,
            success,
            block_number: Some(1),
        });
        ready(result).boxed_local()
    }

    fn sign_message(&self, message: String) -> LocalBoxFuture<'_, Result<String, WalletError>> {
        if !self.status.borrow().connected {
            return ready(Err(WalletError::NotConnected)).boxed_local();
        }
        self.signed.borrow_mut().push(message);
        ready(Ok("0xsig".to_string())).boxed_local()
    }

    fn sign_typed_data(
        &self,
        _typed_data: serde_json::Value,
    ) -> LocalBoxFuture<'_, Result<String, WalletError>> {
        ready(Ok("0xsig".to_string())).boxed_local()
    }

    fn switch_chain(&self, chain_id: u64) -> LocalBoxFuture<'_, Result<(), WalletError>> {
        self.status.borrow_mut().chain_id = Some(chain_id);
        ready(Ok(())).boxed_local()
    }
}
