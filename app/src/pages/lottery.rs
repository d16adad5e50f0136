use chrono::Utc;
use dioxus::prelude::*;
use lotto_api::prelude::{
    format_date_time, format_ether, short_address, Address, LotteryDetail, LotteryStatus,
};
use crate::components::{BuyTicketButton, LaunchLotteryButton, StatusBadge};
use crate::hooks::use_lottery;
use crate::route::Route;
use crate::WalletState;

#[component]
pub fn LotteryPage(id: String) -> Element {
    let wallet = use_context::<Signal<WalletState>>();
    let mut detail = use_lottery(id);

    let detail_read = detail.read();
    let LotteryDetail { lottery, total_tickets } = match &*detail_read {
        None => {
            return rsx! {
                div { class: "text-center py-12",
                    div { class: "animate-spin w-8 h-8 border-2 border-gold border-t-transparent rounded-full mx-auto mb-4" }
                    p { class: "text-gray-500", "Loading lottery..." }
                }
            };
        }
        Some(Err(e)) => {
            return rsx! {
                div { class: "text-center py-12 space-y-4",
                    p { class: "text-red-400", "Error: {e}" }
                    Link { to: Route::Home {}, class: "text-gold underline", "Back to lotteries" }
                }
            };
        }
        Some(Ok(detail)) => detail.clone(),
    };
    drop(detail_read);

    let now = Utc::now();
    let status = lottery.status_at(now);
    let account = wallet.read().account().map(str::to_string);
    let caller = account.as_deref().and_then(|a| a.parse::<Address>().ok());
    let can_launch = lottery.can_launch(total_tickets, caller.as_ref(), now);
    let can_buy = status == LotteryStatus::Active && account.is_some();

    let price = format_ether(lottery.ticket_price);
    let ends = format_date_time(&lottery.end_date);
    let owner = lottery
        .owner
        .map(|owner| short_address(&owner.to_string()))
        .unwrap_or_else(|| "-".to_string());
    let onchain_id = lottery.onchain_id().to_string();

    rsx! {
        div { class: "max-w-3xl mx-auto space-y-6",
            Link { to: Route::Home {}, class: "text-low hover:text-gold text-sm", "← Back to lotteries" }

            if let Some(winner) = lottery.winner_address {
                div { class: "p-4 bg-gold/10 border border-gold/30 rounded-lg text-center",
                    p { class: "text-low text-sm", "Winner" }
                    p { class: "text-gold font-mono text-lg break-all", "{winner}" }
                }
            }

            div { class: "elevated rounded-lg p-6 elevated-border border space-y-4",
                div { class: "flex justify-between items-start gap-4",
                    h1 { class: "text-2xl font-bold text-high", "{lottery.description}" }
                    StatusBadge { status }
                }

                div { class: "space-y-2 pt-3 border-t border-gray-700",
                    DetailRow { label: "Ticket price", value: format!("{price} ETH") }
                    DetailRow { label: "End date", value: ends }
                    DetailRow { label: "Tickets sold", value: total_tickets.to_string() }
                    DetailRow { label: "Owner", value: owner }
                    DetailRow { label: "Lottery ID", value: onchain_id.clone() }
                }

                if can_buy {
                    BuyTicketButton {
                        lottery: lottery.clone(),
                        on_purchased: move |_| detail.restart(),
                    }
                } else if status == LotteryStatus::Active {
                    p { class: "text-center text-low text-sm py-2", "Connect wallet to buy a ticket" }
                }

                if can_launch {
                    LaunchLotteryButton {
                        lottery_id: onchain_id,
                        on_launched: move |_| detail.restart(),
                    }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct DetailRowProps {
    label: &'static str,
    value: String,
}

#[component]
fn DetailRow(props: DetailRowProps) -> Element {
    rsx! {
        div { class: "flex justify-between",
            span { class: "text-low text-sm", "{props.label}" }
            span { class: "text-high font-mono", "{props.value}" }
        }
    }
}
