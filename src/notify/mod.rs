//! Push notifications through the app's own backend.
//!
//!   POST <app url>/api/send-notification  { fid, notificationDetails }
//!
//! 200 means sent, 429 means the host is rate limiting this user, anything
//! else carries the response body as the reason.

use crate::api::ApiError;
use crate::host::{HostContext, NotificationDetails};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use serde::Serialize;
use std::rc::Rc;
use tracing::{info, warn};

const SEND_PATH: &str = "/api/send-notification";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent,
    RateLimited,
    Rejected(String),
}

impl NotifyOutcome {
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            200 => NotifyOutcome::Sent,
            429 => NotifyOutcome::RateLimited,
            _ => NotifyOutcome::Rejected(body),
        }
    }
}

/// Result line shown under the "Send notification" button.
pub fn outcome_label(result: &Result<NotifyOutcome, ApiError>) -> String {
    match result {
        Ok(NotifyOutcome::Sent) => "Success".to_string(),
        Ok(NotifyOutcome::RateLimited) => "Rate limited".to_string(),
        Ok(NotifyOutcome::Rejected(body)) => format!("Error: {body}"),
        Err(e) => format!("Error: {e}"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub fid: u64,
    pub notification_details: NotificationDetails,
}

impl NotificationRequest {
    /// `None` unless the host gave both a user and notification details.
    pub fn for_context(context: &HostContext) -> Option<Self> {
        Some(Self {
            fid: context.fid()?,
            notification_details: context.notification_details.clone()?,
        })
    }
}

pub trait Notifier {
    fn send(&self, request: NotificationRequest)
        -> LocalBoxFuture<'_, Result<NotifyOutcome, ApiError>>;
}

#[derive(Clone)]
pub struct NotifierHandle(pub Rc<dyn Notifier>);

impl NotifierHandle {
    pub fn new(notifier: impl Notifier + 'static) -> Self {
        Self(Rc::new(notifier))
    }
}

impl PartialEq for NotifierHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::ops::Deref for NotifierHandle {
    type Target = dyn Notifier;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// Send a test notification to the current user. `None` when the context
/// cannot receive one.
pub async fn notify_user(notifier: &dyn Notifier, context: &HostContext) -> Option<String> {
    let request = NotificationRequest::for_context(context)?;
    let fid = request.fid;
    let result = notifier.send(request).await;
    match &result {
        Ok(outcome) => info!(fid, outcome = ?outcome, "notification sent"),
        Err(e) => warn!(fid, error = %e, "notification request failed"),
    }
    Some(outcome_label(&result))
}

pub struct HttpNotifier {
    client: reqwest::Client,
    app_url: String,
}

impl HttpNotifier {
    pub fn new(app_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            app_url: app_url.into(),
        }
    }

    async fn post(&self, request: NotificationRequest) -> Result<NotifyOutcome, ApiError> {
        let url = format!("{}{}", self.app_url, SEND_PATH);
        let resp = self.client.post(&url).json(&request).send().await?;
        let status = resp.status().as_u16();
        let body = if status == 200 {
            String::new()
        } else {
            resp.text().await.unwrap_or_default()
        };
        Ok(NotifyOutcome::from_status(status, body))
    }
}

impl Notifier for HttpNotifier {
    fn send(
        &self,
        request: NotificationRequest,
    ) -> LocalBoxFuture<'_, Result<NotifyOutcome, ApiError>> {
        self.post(request).boxed_local()
    }
}
