use dioxus::prelude::*;
use crate::components::{CreateLotteryModal, LotteryFilter, LotteryGrid, SearchBox};
use crate::hooks::use_lotteries;

#[component]
pub fn Home() -> Element {
    let mut lotteries = use_lotteries();
    let mut creating = use_signal(|| false);

    let empty = if lotteries.search.read().trim().is_empty() {
        "No lotteries found."
    } else {
        "No lotteries match your search."
    };

    rsx! {
        div { class: "w-full space-y-6",
            div { class: "flex flex-col sm:flex-row sm:items-center sm:justify-between gap-4",
                h1 { class: "text-3xl font-bold", "Lotteries" }
                button {
                    class: "controls-primary px-4 py-2 rounded-lg font-semibold",
                    onclick: move |_| creating.set(true),
                    "Create Lottery"
                }
            }

            div { class: "flex flex-col sm:flex-row sm:items-center sm:justify-between gap-4",
                LotteryFilter { filter: lotteries.filter }
                SearchBox { query: lotteries.query }
            }

            if lotteries.is_loading() {
                div { class: "text-center py-12",
                    div { class: "animate-spin w-8 h-8 border-2 border-gold border-t-transparent rounded-full mx-auto mb-4" }
                    p { class: "text-gray-500", "Loading lotteries..." }
                }
            } else {
                LotteryGrid {
                    lotteries: lotteries.items.cloned().unwrap_or_default(),
                    empty: empty.to_string(),
                }
            }

            if creating() {
                CreateLotteryModal {
                    on_close: move |_| creating.set(false),
                    on_created: move |_| lotteries.refresh(),
                }
            }
        }
    }
}
