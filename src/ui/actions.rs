use super::components::Button;
use crate::host::{add_to_client, HostContext, HostHandle};
use crate::notify::{notify_user, NotificationRequest, NotifierHandle};
use dioxus::prelude::*;

const DEMO_LINK: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
const COPIED_MS: u32 = 2_000;

#[component]
pub fn ActionsView(
    context: HostContext,
    host: HostHandle,
    notifier: NotifierHandle,
    app_url: String,
) -> Element {
    let mut ctx = use_signal(|| context.clone());
    let mut add_error = use_signal(|| None::<String>);
    let mut notify_result = use_signal(String::new);
    let mut copied = use_signal(|| false);

    let current = ctx.read().clone();
    let share_url = current.share_url(&app_url);
    let can_notify = NotificationRequest::for_context(&current).is_some();

    let open_host = host.clone();
    let close_host = host.clone();

    let add_host = host.clone();
    let add = move |_| {
        let host = add_host.clone();
        spawn(async move {
            let mut next = ctx.read().clone();
            match add_to_client(&*host, &mut next).await {
                Ok(()) => {
                    add_error.set(None);
                    ctx.set(next);
                }
                Err(e) => add_error.set(Some(e.to_string())),
            }
        });
    };

    let notify = move |_| {
        let notifier = notifier.clone();
        let snapshot = ctx.read().clone();
        notify_result.set(String::new());
        spawn(async move {
            if let Some(label) = notify_user(&*notifier, &snapshot).await {
                notify_result.set(label);
            }
        });
    };

    let copy_host = host.clone();
    let copy_url = share_url.clone();
    let copy = move |_| {
        let host = copy_host.clone();
        let Some(url) = copy_url.clone() else {
            return;
        };
        spawn(async move {
            if host.copy_text(&url).await.is_ok() {
                copied.set(true);
                pause(COPIED_MS).await;
                copied.set(false);
            }
        });
    };

    let copy_label = if copied() { "Copied!" } else { "Copy share URL" };
    let notify_line = notify_result.read().clone();

    rsx! {
        div { class: "space-y-3 px-6 w-full max-w-md mx-auto",
            Button {
                class: "w-full",
                label: "Open Link",
                onclick: move |_| open_host.open_url(DEMO_LINK),
            }
            Button {
                class: "w-full",
                label: "Close Mini App",
                onclick: move |_| close_host.close(),
            }
            Button {
                class: "w-full",
                label: "Add Mini App to Client",
                disabled: current.added,
                onclick: add,
            }
            if let Some(message) = add_error() {
                div { class: "text-red-500 text-xs mt-1", "{message}" }
            }

            if !notify_line.is_empty() {
                div { class: "text-sm w-full", "Send notification result: {notify_line}" }
            }
            Button {
                class: "w-full",
                label: "Send notification",
                disabled: !can_notify,
                onclick: notify,
            }

            Button {
                class: "w-full",
                label: copy_label.to_string(),
                disabled: share_url.is_none(),
                onclick: copy,
            }
        }
    }
}

/// Resolve after `ms` milliseconds, on the browser's timer.
async fn pause(ms: u32) {
    let timer = eval(
        r#"
        const ms = await dioxus.recv();
        await new Promise((resolve) => setTimeout(resolve, ms));
        return null;
        "#,
    );
    if timer.send(ms.into()).is_ok() {
        let _ = timer.join().await;
    }
}
