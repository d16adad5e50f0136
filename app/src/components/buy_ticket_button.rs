use dioxus::prelude::*;
use lotto_api::prelude::{format_ether, Lottery, NewTicket, ValidationError};
use crate::hooks::use_transaction;
use crate::{Services, ToastQueue, WalletState};

#[component]
pub fn BuyTicketButton(lottery: Lottery, on_purchased: EventHandler<()>) -> Element {
    let wallet = use_context::<Signal<WalletState>>();
    let services = use_context::<Services>();
    let mut toasts = use_context::<Signal<ToastQueue>>();
    let tx = use_transaction();

    let price = format_ether(lottery.ticket_price);
    let label = tx.label(&format!("Buy Ticket for {price} ETH"));
    let account = wallet.read().account().map(str::to_string);

    let buy = move |_| {
        let Some(buyer) = account.clone() else {
            toasts.write().error(ValidationError::WalletNotConnected.to_string());
            return;
        };
        let call = match services.contract().and_then(|contract| contract.buy_ticket(&lottery)) {
            Ok(call) => call,
            Err(e) => {
                toasts.write().error(e.user_message());
                return;
            }
        };

        let record = NewTicket { lottery_id: lottery.id.clone(), buyer: buyer.clone() };
        let api = services.api().ok().cloned();
        tx.submit(buyer, call, move |_hash| {
            toasts.write().success("You have successfully bought a ticket!");
            spawn(async move {
                // The ticket row is written only after the purchase is mined.
                if let Some(api) = api {
                    if let Err(e) = api.create_ticket(&record).await {
                        tracing::error!("Failed to record ticket: {}", e);
                        toasts.write().error("Your ticket was bought but could not be recorded.");
                    }
                }
                on_purchased.call(());
            });
        });
    };

    rsx! {
        button {
            class: "w-full controls-primary py-3 rounded-lg font-semibold transition-all hover:scale-[1.02]",
            disabled: tx.is_busy(),
            onclick: buy,
            "{label}"
        }
    }
}
