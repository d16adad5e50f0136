use dioxus::prelude::*;
use lotto_api::prelude::{
    ConfirmationSource, ContractCall, ExplorerReceiptCheck, LottoError, PollAdapter, RpcReceiptCheck,
    SubscriptionHandle, TxLifecycle, TxPhase,
};

use crate::components::send_transaction;
use crate::{Services, ToastQueue};
use super::sleep;

/// Wallet write plus receipt tracking for one action button.
#[derive(Clone, Copy)]
pub struct Transaction {
    lifecycle: Signal<TxLifecycle>,
    watching: Signal<Option<SubscriptionHandle>>,
    toasts: Signal<ToastQueue>,
    services: CopyValue<Services>,
}

pub fn use_transaction() -> Transaction {
    let services = use_context::<Services>();
    let toasts = use_context::<Signal<ToastQueue>>();
    let lifecycle = use_signal(TxLifecycle::new);
    let watching = use_signal(|| None::<SubscriptionHandle>);
    let services = use_hook(move || CopyValue::new(services));

    use_drop(move || {
        if let Ok(handle) = watching.try_peek() {
            if let Some(handle) = handle.as_ref() {
                handle.unsubscribe();
            }
        }
    });

    Transaction { lifecycle, watching, toasts, services }
}

impl Transaction {
    pub fn phase(&self) -> TxPhase {
        self.lifecycle.read().phase().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.lifecycle.read().is_busy()
    }

    pub fn succeeded(&self) -> bool {
        self.lifecycle.read().succeeded()
    }

    pub fn label(&self, idle: &str) -> String {
        self.lifecycle.read().label(idle).to_string()
    }

    pub fn reset(&mut self) {
        if let Some(handle) = self.watching.write().take() {
            handle.unsubscribe();
        }
        self.lifecycle.write().reset();
    }

    /// Sends `call` from `from` and follows it to a receipt. `on_success` gets
    /// the hash of a mined, non-reverted transaction; failures become toasts.
    ///
    /// A click while the previous submission is in flight is ignored.
    pub fn submit(self, from: String, call: ContractCall, on_success: impl FnOnce(String) + 'static) {
        let Transaction { mut lifecycle, mut watching, mut toasts, services } = self;

        if let Err(e) = lifecycle.write().begin() {
            tracing::debug!("ignoring {} submission: {}", call.function, e);
            return;
        }

        let config = services.read().config.clone();
        spawn(async move {
            let hash = match send_transaction(&from, &call).await {
                Ok(hash) => hash,
                Err(e) => {
                    lifecycle.write().fail(&e);
                    toasts.write().error(e.user_message());
                    return;
                }
            };
            tracing::debug!("{} submitted as {}", call.function, hash);
            if !lifecycle.write().submitted(hash.clone()) {
                // reset while the wallet prompt was open
                return;
            }

            // The explorer is used when it has been given a key; otherwise the
            // node's JSON-RPC is asked directly.
            let subscription = if config.explorer_api_key.is_empty() {
                let check = RpcReceiptCheck::new(config.rpc_url.clone());
                PollAdapter::new(check, sleep, config.poll_interval)
                    .with_max_failures(config.max_check_failures)
                    .subscribe(&hash)
            } else {
                let check = ExplorerReceiptCheck::new(
                    config.explorer_api_url.clone(),
                    config.explorer_api_key.clone(),
                );
                PollAdapter::new(check, sleep, config.poll_interval)
                    .with_max_failures(config.max_check_failures)
                    .subscribe(&hash)
            };
            watching.set(Some(subscription.handle()));
            let outcome = subscription.await;
            watching.set(None);

            match outcome {
                Ok(outcome) => {
                    lifecycle.write().confirmed(outcome);
                }
                Err(LottoError::Unsubscribed) => {
                    tracing::debug!("stopped watching {}", hash);
                    return;
                }
                Err(e) => {
                    lifecycle.write().fail(&e);
                }
            }

            let phase = lifecycle.peek().phase().clone();
            match phase {
                TxPhase::Succeeded { hash } => on_success(hash),
                TxPhase::Failed { message } => {
                    toasts.write().error(message);
                }
                _ => {}
            }
        });
    }
}
