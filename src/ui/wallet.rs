use super::components::Button;
use crate::wallet::{
    next_chain, one_wei_transfer, send_and_confirm, sign_with_connect, truncate_address,
    typed_greeting, TxPhase, WalletError, WalletHandle, WalletStatus,
};
use dioxus::prelude::*;

/// Progress of one wallet-tab action.
#[derive(Debug, Clone, Default, PartialEq)]
enum Action {
    #[default]
    Idle,
    Pending,
    Done(String),
    Failed(WalletError),
}

impl Action {
    fn from_result(result: Result<String, WalletError>) -> Self {
        match result {
            Ok(output) => Action::Done(output),
            Err(e) => Action::Failed(e),
        }
    }

    fn is_pending(&self) -> bool {
        matches!(self, Action::Pending)
    }
}

#[component]
pub fn WalletView(wallet: WalletHandle, app_name: String) -> Element {
    let mut status = use_signal(WalletStatus::default);
    let mut connection = use_signal(Action::default);
    let mut signed = use_signal(Action::default);
    let mut signed_typed = use_signal(Action::default);
    let mut switched = use_signal(Action::default);
    let mut transfer = use_signal(TxPhase::default);

    let mount_wallet = wallet.clone();
    use_future(move || {
        let wallet = mount_wallet.clone();
        async move {
            if let Ok(current) = wallet.status().await {
                status.set(current);
            }
        }
    });

    let current = status.read().clone();
    let target_chain = next_chain(current.chain_id);

    let toggle_wallet = wallet.clone();
    let toggle = move |_| {
        let wallet = toggle_wallet.clone();
        let was_connected = status.read().connected;
        connection.set(Action::Pending);
        spawn(async move {
            let result = if was_connected {
                wallet.disconnect().await.map(|_| WalletStatus::default())
            } else {
                wallet.connect().await
            };
            match result {
                Ok(next) => {
                    status.set(next);
                    connection.set(Action::Idle);
                }
                Err(e) => connection.set(Action::Failed(e)),
            }
        });
    };

    let sign_wallet = wallet.clone();
    let greeting = format!("Hello from {app_name}!");
    let sign = move |_| {
        let wallet = sign_wallet.clone();
        let message = greeting.clone();
        signed.set(Action::Pending);
        spawn(async move {
            match sign_with_connect(&*wallet, message).await {
                Ok((next, signature)) => {
                    status.set(next);
                    signed.set(Action::Done(signature));
                }
                Err(e) => signed.set(Action::Failed(e)),
            }
        });
    };

    let send_wallet = wallet.clone();
    let send_eth = move |_| {
        let wallet = send_wallet.clone();
        let tx = one_wei_transfer(status.read().chain_id);
        spawn(async move {
            send_and_confirm(&*wallet, tx, |p| transfer.set(p)).await;
        });
    };

    let typed_wallet = wallet.clone();
    let typed_app = app_name.clone();
    let sign_typed = move |_| {
        let wallet = typed_wallet.clone();
        let chain_id = status.read().chain_id.unwrap_or_default();
        let payload = typed_greeting(&typed_app, chain_id);
        signed_typed.set(Action::Pending);
        spawn(async move {
            signed_typed.set(Action::from_result(wallet.sign_typed_data(payload).await));
        });
    };

    let switch_wallet = wallet.clone();
    let switch = move |_| {
        let wallet = switch_wallet.clone();
        switched.set(Action::Pending);
        spawn(async move {
            let result = wallet.switch_chain(target_chain.id).await;
            if result.is_ok() {
                if let Ok(next) = wallet.status().await {
                    status.set(next);
                }
            }
            switched.set(Action::from_result(result.map(|_| target_chain.name.to_string())));
        });
    };

    let connect_label = if current.connected { "Disconnect" } else { "Connect" };
    let switch_label = format!("Switch to {}", target_chain.name);
    let sent = transfer.read().clone();

    rsx! {
        div { class: "space-y-3 px-6 w-full max-w-md mx-auto",
            if let Some(address) = current.address.as_deref().map(truncate_address) {
                div { class: "text-xs w-full", "Address: ",
                    pre { class: "inline", "{address}" }
                }
            }
            if let Some(chain_id) = current.chain_id {
                div { class: "text-xs w-full", "Chain ID: ",
                    pre { class: "inline", "{chain_id}" }
                }
            }

            Button {
                class: "w-full",
                label: connect_label.to_string(),
                loading: connection.read().is_pending(),
                onclick: toggle,
            }
            ActionOutcome { action: connection.read().clone(), prefix: "" }

            Button {
                class: "w-full",
                label: "Sign Message",
                loading: signed.read().is_pending(),
                onclick: sign,
            }
            ActionOutcome { action: signed.read().clone(), prefix: "Signature: " }

            if current.connected {
                Button {
                    class: "w-full",
                    label: "Send Transaction (eth)",
                    loading: sent.is_pending(),
                    onclick: send_eth,
                }
                TransferStatus { phase: sent.clone() }

                Button {
                    class: "w-full",
                    label: "Sign Typed Data",
                    loading: signed_typed.read().is_pending(),
                    onclick: sign_typed,
                }
                ActionOutcome { action: signed_typed.read().clone(), prefix: "Signature: " }

                Button {
                    class: "w-full",
                    label: switch_label,
                    loading: switched.read().is_pending(),
                    onclick: switch,
                }
                ActionOutcome { action: switched.read().clone(), prefix: "Switched to " }
            }
        }
    }
}

#[component]
fn ActionOutcome(action: Action, prefix: &'static str) -> Element {
    match action {
        Action::Done(output) if !output.is_empty() => rsx! {
            div { class: "mt-2 text-xs break-all", "{prefix}{output}" }
        },
        Action::Failed(e) => {
            let message = match e {
                WalletError::UserRejected => "Rejected by user.".to_string(),
                other => other.display_message(),
            };
            rsx! {
                div { class: "text-red-500 text-xs mt-1", "{message}" }
            }
        }
        _ => rsx! {},
    }
}

#[component]
fn TransferStatus(phase: TxPhase) -> Element {
    if let Some(message) = phase.error_message() {
        let message = match phase {
            TxPhase::Failed(WalletError::UserRejected) => "Rejected by user.".to_string(),
            _ => message,
        };
        return rsx! {
            div { class: "text-red-500 text-xs mt-1", "{message}" }
        };
    }
    let hash = phase.hash().map(|h| truncate_address(&h.0));
    match (hash, phase.status_label()) {
        (Some(hash), Some(status)) => rsx! {
            div { class: "mt-2 text-xs",
                div { "Hash: {hash}" }
                div { "Status: {status}" }
            }
        },
        _ => rsx! {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_from_result() {
        assert_eq!(
            Action::from_result(Ok("0xsig".to_string())),
            Action::Done("0xsig".to_string())
        );
        assert_eq!(
            Action::from_result(Err(WalletError::UserRejected)),
            Action::Failed(WalletError::UserRejected)
        );
        assert!(Action::Pending.is_pending());
        assert!(!Action::Idle.is_pending());
    }
}
