use dioxus::prelude::*;
use lotto_api::prelude::StatusFilter;

#[component]
pub fn LotteryFilter(mut filter: Signal<StatusFilter>) -> Element {
    rsx! {
        div { class: "flex gap-2",
            for option in StatusFilter::ALL {
                button {
                    class: if filter() == option { "controls-gold" } else { "elevated-control" },
                    class: " px-3 py-1.5 rounded text-sm",
                    onclick: move |_| filter.set(option),
                    "{option.label()}"
                }
            }
        }
    }
}
