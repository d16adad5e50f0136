use dioxus::prelude::*;
use crate::components::LotteryGrid;
use crate::hooks::{use_my_lotteries, LotterySlice};
use crate::route::Route;
use crate::WalletState;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Tab {
    Created,
    Participated,
}

impl Tab {
    fn label(&self) -> &'static str {
        match self {
            Tab::Created => "Created",
            Tab::Participated => "Participated",
        }
    }

    fn empty(&self) -> &'static str {
        match self {
            Tab::Created => "You haven't created any lotteries yet.",
            Tab::Participated => "You haven't participated in any lotteries yet.",
        }
    }
}

#[component]
pub fn MyLotteries() -> Element {
    let wallet = use_context::<Signal<WalletState>>();
    let (created, participated) = use_my_lotteries();
    let mut tab = use_signal(|| Tab::Created);

    if wallet.read().account().is_none() {
        return rsx! {
            div { class: "text-center py-12",
                h1 { class: "text-3xl font-bold mb-4", "My Lotteries" }
                p { class: "text-gray-500", "Connect your wallet to see your lotteries." }
            }
        };
    }

    let slice = match tab() {
        Tab::Created => created,
        Tab::Participated => participated,
    };
    let LotterySlice { loading, items } = slice.cloned();

    rsx! {
        div { class: "w-full space-y-6",
            h1 { class: "text-3xl font-bold", "My Lotteries" }

            div { class: "flex gap-2 border-b border-gray-700",
                for option in [Tab::Created, Tab::Participated] {
                    button {
                        class: if tab() == option { "border-b-2 border-gold text-gold" } else { "text-mid hover:text-gold" },
                        class: " px-4 py-2 text-sm font-medium",
                        onclick: move |_| tab.set(option),
                        "{option.label()}"
                    }
                }
            }

            if loading {
                div { class: "text-center py-12",
                    div { class: "animate-spin w-8 h-8 border-2 border-gold border-t-transparent rounded-full mx-auto mb-4" }
                    p { class: "text-gray-500", "Loading lotteries..." }
                }
            } else if items.is_empty() {
                div { class: "text-center py-12 space-y-4",
                    p { class: "text-gray-500", "{tab().empty()}" }
                    Link { to: Route::Home {}, class: "text-gold underline", "Browse lotteries" }
                }
            } else {
                LotteryGrid { lotteries: items, empty: tab().empty().to_string() }
            }
        }
    }
}
