use dioxus::prelude::*;
use crate::hooks::use_transaction;
use crate::{Services, ToastQueue, WalletState};

/// Owner-only action that asks the contract to draw the winner.
#[component]
pub fn LaunchLotteryButton(lottery_id: String, on_launched: EventHandler<()>) -> Element {
    let wallet = use_context::<Signal<WalletState>>();
    let services = use_context::<Services>();
    let mut toasts = use_context::<Signal<ToastQueue>>();
    let tx = use_transaction();

    let label = tx.label("Launch Lottery!");
    let account = wallet.read().account().map(str::to_string);

    let launch = move |_| {
        let Some(owner) = account.clone() else {
            return;
        };
        match services.contract().and_then(|contract| contract.launch_lottery(&lottery_id)) {
            Ok(call) => tx.submit(owner, call, move |_hash| {
                toasts.write().success("The lottery has been launched and a winner has been selected!");
                on_launched.call(());
            }),
            Err(e) => {
                toasts.write().error(e.user_message());
            }
        }
    };

    rsx! {
        button {
            class: "w-full controls-gold py-3 rounded-lg font-semibold transition-all hover:scale-[1.02]",
            disabled: tx.is_busy(),
            onclick: launch,
            "{label}"
        }
    }
}
