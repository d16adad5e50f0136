use dioxus::prelude::*;

#[component]
pub fn SearchBox(mut query: Signal<String>) -> Element {
    rsx! {
        div { class: "flex items-center gap-2 elevated-control rounded px-3 py-2 w-full sm:w-72",
            span { class: "text-low", "🔍" }
            input {
                class: "bg-transparent text-high w-full outline-none",
                r#type: "search",
                placeholder: "Search lotteries...",
                value: "{query}",
                oninput: move |e| query.set(e.value()),
            }
        }
    }
}
