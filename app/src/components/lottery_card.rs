use dioxus::prelude::*;
use lotto_api::prelude::{format_date, format_ether, short_address, Lottery, LotteryStatus};
use crate::route::Route;

#[component]
pub fn StatusBadge(status: LotteryStatus) -> Element {
    let class = match status {
        LotteryStatus::Active => "bg-green-500/10 text-green-400 border-green-500/30",
        LotteryStatus::EndedPendingLaunch => "bg-yellow-500/10 text-yellow-400 border-yellow-500/30",
        LotteryStatus::Finalized => "bg-gray-500/10 text-gray-400 border-gray-500/30",
    };

    rsx! {
        span { class: "px-2 py-0.5 rounded border text-xs font-medium {class}",
            "{status.label()}"
        }
    }
}

#[component]
pub fn LotteryCard(lottery: Lottery) -> Element {
    let status = lottery.status();
    let price = format_ether(lottery.ticket_price);
    let ends = format_date(&lottery.end_date);

    rsx! {
        Link {
            to: Route::LotteryPage { id: lottery.onchain_id().to_string() },
            class: "block elevated rounded-lg p-4 elevated-border border hover:border-gold transition-colors",
            div { class: "flex justify-between items-start mb-3",
                h3 { class: "text-high font-semibold line-clamp-2", "{lottery.description}" }
                StatusBadge { status }
            }
            div { class: "space-y-1 text-sm",
                div { class: "flex justify-between",
                    span { class: "text-low", "Ticket price" }
                    span { class: "text-high font-mono", "{price} ETH" }
                }
                div { class: "flex justify-between",
                    span { class: "text-low", "Ends" }
                    span { class: "text-high", "{ends}" }
                }
                if let Some(winner) = lottery.winner_address.map(|winner| winner.to_string()) {
                    div { class: "flex justify-between",
                        span { class: "text-low", "Winner" }
                        span { class: "text-gold font-mono", "{short_address(&winner)}" }
                    }
                }
            }
        }
    }
}

/// Cards in a responsive grid, or `empty` when there are none.
#[component]
pub fn LotteryGrid(lotteries: Vec<Lottery>, empty: String) -> Element {
    if lotteries.is_empty() {
        return rsx! {
            div { class: "text-center py-12",
                p { class: "text-gray-500", "{empty}" }
            }
        };
    }

    rsx! {
        div { class: "grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4",
            for lottery in lotteries {
                LotteryCard { key: "{lottery.id}", lottery }
            }
        }
    }
}
