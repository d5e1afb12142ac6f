use crate::host::HostContext;
use dioxus::prelude::*;

#[component]
pub fn ContextView(context: HostContext) -> Element {
    let dump = context.to_pretty_json();
    rsx! {
        div { class: "mx-6",
            h2 { class: "text-lg font-semibold mb-2", "Context" }
            div { class: "p-4 bg-card rounded-lg border",
                pre { class: "font-mono text-xs whitespace-pre-wrap break-words w-full", "{dump}" }
            }
        }
    }
}
