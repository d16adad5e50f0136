use std::time::Duration;

use chrono::Utc;
use dioxus::prelude::*;
use lotto_api::prelude::{min_end_date, CreateLotteryForm};
use crate::hooks::{sleep, use_transaction};
use crate::{Services, ToastQueue, WalletState};

/// Delay between the success toast and the form closing itself. The parent
/// refreshes right away; the form stays locked until it closes.
const CLOSE_AFTER_SUCCESS: Duration = Duration::from_secs(3);

#[component]
pub fn CreateLotteryModal(on_close: EventHandler<()>, on_created: EventHandler<()>) -> Element {
    let wallet = use_context::<Signal<WalletState>>();
    let services = use_context::<Services>();
    let mut toasts = use_context::<Signal<ToastQueue>>();
    let mut tx = use_transaction();

    let mut description = use_signal(String::new);
    let mut ticket_price = use_signal(String::new);
    let mut end_date = use_signal(String::new);

    let mut clear = move || {
        description.set(String::new());
        ticket_price.set(String::new());
        end_date.set(String::new());
        tx.reset();
    };

    let close = move |_| {
        clear();
        on_close.call(());
    };

    let submit = move |_| {
        let form = CreateLotteryForm {
            description: description(),
            ticket_price: ticket_price(),
            end_date: end_date(),
        };
        let account = wallet.read().account().map(str::to_string);

        let lottery = match form.validate(account.is_some(), Utc::now()) {
            Ok(lottery) => lottery,
            Err(e) => {
                toasts.write().error(e.to_string());
                return;
            }
        };
        let Some(owner) = account else {
            return;
        };
        let call = services.contract().and_then(|contract| {
            contract.create_lottery(lottery.end_date, lottery.ticket_price, &lottery.description)
        });
        let call = match call {
            Ok(call) => call,
            Err(e) => {
                toasts.write().error(e.user_message());
                return;
            }
        };

        tx.submit(owner, call, move |_hash| {
            toasts.write().success("Your lottery has been created successfully!");
            on_created.call(());
            spawn(async move {
                sleep(CLOSE_AFTER_SUCCESS).await;
                clear();
                on_close.call(());
            });
        });
    };

    let busy = tx.is_busy();
    let locked = busy || tx.succeeded();
    let label = tx.label("Create Lottery");
    let min_end = min_end_date(Utc::now());

    rsx! {
        div { class: "fixed inset-0 z-50 flex items-center justify-center bg-black/60",
            div { class: "elevated rounded-lg p-6 elevated-border border w-full max-w-md",
                div { class: "flex justify-between items-center mb-4",
                    h2 { class: "text-xl font-semibold text-high", "Create New Lottery" }
                    button {
                        class: "text-low hover:text-high",
                        disabled: busy,
                        onclick: close,
                        "×"
                    }
                }

                div { class: "space-y-4",
                    div {
                        label { class: "block text-low text-sm mb-1", "Description" }
                        textarea {
                            class: "w-full elevated-control rounded px-3 py-2 text-high outline-none",
                            placeholder: "What is this lottery about?",
                            value: "{description}",
                            oninput: move |e| description.set(e.value()),
                        }
                    }
                    div {
                        label { class: "block text-low text-sm mb-1", "Ticket price (ETH)" }
                        input {
                            class: "w-full elevated-control rounded px-3 py-2 text-high font-mono outline-none",
                            r#type: "number",
                            step: "0.001",
                            min: "0",
                            placeholder: "0.01",
                            value: "{ticket_price}",
                            oninput: move |e| ticket_price.set(e.value()),
                        }
                    }
                    div {
                        label { class: "block text-low text-sm mb-1", "End date (UTC)" }
                        input {
                            class: "w-full elevated-control rounded px-3 py-2 text-high outline-none",
                            r#type: "datetime-local",
                            min: "{min_end}",
                            value: "{end_date}",
                            oninput: move |e| end_date.set(e.value()),
                        }
                    }

                    button {
                        class: "w-full controls-primary py-3 rounded-lg font-semibold transition-all hover:scale-[1.02]",
                        disabled: locked,
                        onclick: submit,
                        "{label}"
                    }
                }
            }
        }
    }
}
