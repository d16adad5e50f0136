use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use lotto_api::prelude::{Liveness, Lottery, LottoError};

use crate::{Services, ToastQueue, WalletState};

/// One tab of the my-lotteries page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LotterySlice {
    pub loading: bool,
    pub items: Vec<Lottery>,
}

impl LotterySlice {
    fn loading() -> Self {
        Self { loading: true, items: Vec::new() }
    }
}

/// Shown when a tab finishes loading with nothing in it.
struct EmptyNotice {
    title: &'static str,
    description: &'static str,
}

const NO_CREATED: EmptyNotice = EmptyNotice {
    title: "No Created Lotteries",
    description: "You haven't created any lotteries yet.",
};

const NO_PARTICIPATIONS: EmptyNotice = EmptyNotice {
    title: "No Participations",
    description: "You haven't participated in any lotteries yet.",
};

/// Created and participated lotteries of the connected account, loaded
/// concurrently. Each request writes only its own slice.
pub fn use_my_lotteries() -> (Signal<LotterySlice>, Signal<LotterySlice>) {
    let services = use_context::<Services>();
    let wallet = use_context::<Signal<WalletState>>();
    let toasts = use_context::<Signal<ToastQueue>>();
    let created = use_signal(LotterySlice::default);
    let participated = use_signal(LotterySlice::default);
    let current = use_hook(|| Rc::new(RefCell::new(Liveness::new())));

    let account = use_memo(move || wallet.read().account().map(str::to_string));

    {
        let current = current.clone();
        use_effect(move || {
            let account = account();

            // Whatever the previous address asked for is now stale.
            let live = Liveness::new();
            current.replace(live.clone()).kill();

            let Some(address) = account else {
                reset(created);
                reset(participated);
                return;
            };

            let api = match services.api() {
                Ok(api) => api.clone(),
                Err(e) => {
                    tracing::error!("Cannot load lotteries: {}", e);
                    reset(created);
                    reset(participated);
                    return;
                }
            };

            load(created, live.clone(), toasts, NO_CREATED, {
                let api = api.clone();
                let address = address.clone();
                async move { api.owner_lotteries(&address).await }
            });
            load(participated, live, toasts, NO_PARTICIPATIONS, async move {
                api.user_lotteries(&address).await
            });
        });
    }

    use_drop(move || current.borrow().kill());

    (created, participated)
}

fn reset(mut slice: Signal<LotterySlice>) {
    slice.set(LotterySlice::default());
}

fn load(
    mut slice: Signal<LotterySlice>,
    live: Liveness,
    mut toasts: Signal<ToastQueue>,
    empty: EmptyNotice,
    request: impl std::future::Future<Output = Result<Vec<Lottery>, LottoError>> + 'static,
) {
    slice.set(LotterySlice::loading());
    spawn(async move {
        let items = request.await.unwrap_or_else(|e| {
            tracing::error!("Failed to fetch lotteries: {}", e);
            Vec::new()
        });
        live.apply(items, |items| {
            if items.is_empty() {
                toasts.write().info(empty.title, empty.description);
            }
            slice.set(LotterySlice { loading: false, items });
        });
    });
}
