//! Host runtime capability.
//!
//! When embedded as a mini app, the host supplies who the user is, the
//! safe-area insets of the webview, whether the app was added to the client,
//! where notifications go, and a few device actions. Views receive
//! a `HostContext` value and a `HostActions` handle instead of reading them
//! from globals. Running in a plain browser tab gets `HostContext::standalone`
//! and `BrowserHost`.

use dioxus::prelude::eval;
use futures::future::{ready, LocalBoxFuture};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("{0} is not available outside a mini app host")]
    Unsupported(&'static str),
    #[error("host rejected the request: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostUser {
    pub fid: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeAreaInsets {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl SafeAreaInsets {
    /// Inline style padding the page away from the host's chrome.
    pub fn padding_style(&self) -> String {
        format!(
            "padding-top: {}px; padding-bottom: {}px; padding-left: {}px; padding-right: {}px;",
            self.top, self.bottom, self.left, self.right
        )
    }
}

/// Where and how the host accepts notifications for this user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDetails {
    pub url: String,
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<HostUser>,
    #[serde(default)]
    pub safe_area: SafeAreaInsets,
    /// Whether the user has added the app to their client.
    #[serde(default)]
    pub added: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_details: Option<NotificationDetails>,
}

impl HostContext {
    /// Context for a plain browser tab with no embedding host.
    pub fn standalone() -> Self {
        Self::default()
    }

    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn fid(&self) -> Option<u64> {
        self.user.as_ref().map(|u| u.fid).filter(|fid| *fid != 0)
    }

    /// `<app url>/share/<fid>`, when there is a user to share as.
    pub fn share_url(&self, app_url: &str) -> Option<String> {
        self.fid().map(|fid| format!("{app_url}/share/{fid}"))
    }
}

/// Device-level actions the host performs on the app's behalf.
pub trait HostActions {
    fn open_url(&self, url: &str);

    fn close(&self);

    /// Prompt the user to add the app to their client.
    fn add_mini_app(&self) -> LocalBoxFuture<'_, Result<(), HostError>>;

    fn copy_text<'a>(&'a self, text: &'a str) -> LocalBoxFuture<'a, Result<(), HostError>>;
}

/// Ask the host to add the app, recording success in `context`. A context
/// that is already added is left alone.
pub async fn add_to_client(
    host: &dyn HostActions,
    context: &mut HostContext,
) -> Result<(), HostError> {
    if context.added {
        return Ok(());
    }
    host.add_mini_app().await?;
    info!("mini app added to client");
    context.added = true;
    Ok(())
}

#[derive(Clone)]
pub struct HostHandle(pub Rc<dyn HostActions>);

impl HostHandle {
    pub fn new(actions: impl HostActions + 'static) -> Self {
        Self(Rc::new(actions))
    }
}

impl PartialEq for HostHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::ops::Deref for HostHandle {
    type Target = dyn HostActions;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// Falls back to `window.open` / `window.close`.
#[derive(Debug, Clone, Default)]
pub struct BrowserHost;

impl HostActions for BrowserHost {
    fn open_url(&self, url: &str) {
        info!(url, "opening url");
        let bridge = eval(r#"const url = await dioxus.recv(); window.open(url, "_blank");"#);
        if let Err(e) = bridge.send(serde_json::Value::String(url.to_string())) {
            warn!(error = ?e, "failed to open url");
        }
    }

    fn close(&self) {
        info!("closing app");
        let _ = eval("window.close();");
    }

    fn add_mini_app(&self) -> LocalBoxFuture<'_, Result<(), HostError>> {
        warn!("add mini app requested without a host");
        ready(Err(HostError::Unsupported("adding the app"))).boxed_local()
    }

    fn copy_text<'a>(&'a self, text: &'a str) -> LocalBoxFuture<'a, Result<(), HostError>> {
        async move {
            let bridge = eval(COPY_SCRIPT);
            bridge
                .send(serde_json::Value::String(text.to_string()))
                .map_err(|e| HostError::Rejected(format!("{e:?}")))?;
            match bridge.join().await {
                Ok(serde_json::Value::Null) => Ok(()),
                Ok(other) => Err(HostError::Rejected(
                    other.as_str().map(str::to_string).unwrap_or_else(|| other.to_string()),
                )),
                Err(e) => Err(HostError::Rejected(format!("{e:?}"))),
            }
        }
        .boxed_local()
    }
}

const COPY_SCRIPT: &str = r#"
const text = await dioxus.recv();
try {
    await navigator.clipboard.writeText(text);
    return null;
} catch (e) {
    return String(e && e.message ? e.message : e);
}
"#;
