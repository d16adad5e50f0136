use dioxus::prelude::*;
use futures::StreamExt;
use lotto_api::prelude::{debounce, Lottery, StatusFilter};

use crate::{Services, ToastQueue};
use super::sleep;

/// Listing state for the home page.
#[derive(Clone, Copy)]
pub struct Lotteries {
    pub filter: Signal<StatusFilter>,
    /// Raw search box contents.
    pub query: Signal<String>,
    /// Query after the input went quiet.
    pub search: Signal<String>,
    pub items: Resource<Vec<Lottery>>,
}

impl Lotteries {
    pub fn refresh(&mut self) {
        self.items.restart();
    }

    pub fn is_loading(&self) -> bool {
        self.items.read().is_none()
    }
}

pub fn use_lotteries() -> Lotteries {
    let services = use_context::<Services>();
    let mut toasts = use_context::<Signal<ToastQueue>>();

    let filter = use_signal(StatusFilter::default);
    let query = use_signal(String::new);
    let mut search = use_signal(String::new);

    // One debounce timer for the lifetime of the page; unmount drops it.
    let window = services.config.search_debounce;
    let typing = use_coroutine(move |rx: UnboundedReceiver<String>| async move {
        let mut settled = Box::pin(debounce(rx, window, sleep));
        while let Some(value) = settled.next().await {
            if *search.peek() != value {
                search.set(value);
            }
        }
    });

    use_effect(move || typing.send(query()));

    let items = use_resource(move || {
        let services = services.clone();
        let filter = filter();
        let search = search();
        async move {
            let result = match services.api() {
                Ok(api) => api.list(filter, &search).await.map_err(|e| e.user_message()),
                Err(e) => Err(e),
            };
            result.unwrap_or_else(|e| {
                toasts.write().error(e);
                Vec::new()
            })
        }
    });

    Lotteries { filter, query, search, items }
}
