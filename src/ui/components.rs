use crate::host::HostContext;
use dioxus::prelude::*;

#[component]
pub fn Button(
    #[props(into)] label: String,
    onclick: EventHandler<MouseEvent>,
    #[props(default)] disabled: bool,
    #[props(default)] loading: bool,
    #[props(default, into)] class: String,
) -> Element {
    rsx! {
        button {
            class: "inline-flex items-center justify-center bg-primary text-primary-foreground py-3 px-6 rounded-lg shadow-md disabled:opacity-50 disabled:cursor-not-allowed {class}",
            disabled: disabled || loading,
            onclick: move |evt| onclick.call(evt),
            if loading {
                div { class: "animate-spin h-5 w-5 border-2 border-primary-foreground border-t-transparent rounded-full" }
            } else {
                "{label}"
            }
        }
    }
}

#[component]
pub fn Header(app_name: String, context: HostContext) -> Element {
    let greeting = context
        .user
        .as_ref()
        .and_then(|u| u.display_name.clone().or_else(|| u.username.clone()));
    rsx! {
        header { class: "flex items-center justify-between mb-4",
            span { class: "font-bold", "{app_name}" }
            if let Some(name) = greeting {
                span { class: "text-sm text-muted-foreground", "Welcome, {name}" }
            }
        }
    }
}

#[component]
pub fn ErrorBanner(message: String) -> Element {
    rsx! {
        div { class: "bg-destructive/10 border border-destructive/20 rounded-2xl p-4 mb-6",
            p { class: "text-destructive font-medium", "Error: {message}" }
        }
    }
}

#[component]
pub fn Spinner(#[props(into)] label: String) -> Element {
    rsx! {
        div { class: "rounded-2xl p-8 mb-6 text-center",
            div { class: "w-8 h-8 border-4 border-primary/30 border-t-primary rounded-full animate-spin mx-auto mb-4" }
            p { class: "text-muted-foreground", "{label}" }
        }
    }
}
