#![allow(non_snake_case)]

mod components;
mod hooks;
mod pages;
mod route;

use dioxus::prelude::*;
use gloo_storage::{LocalStorage, Storage};
use lotto_api::prelude::{Config, LotteryApi, LotteryContract, LottoError};
use serde::{Deserialize, Serialize};
use route::Route;

/// LocalStorage key of the last connected account.
pub const WALLET_STORAGE_KEY: &str = "cryptolotto.wallet";

/// How long a toast stays on screen.
pub const TOAST_TIMEOUT_MS: u32 = 5_000;

fn main() {
    #[cfg(feature = "web")]
    {
        tracing_wasm::set_as_global_default();
        dioxus::launch(App);
    }

    #[cfg(feature = "desktop")]
    {
        dioxus::launch(App);
    }
}

#[component]
fn App() -> Element {
    // Global state providers
    use_context_provider(|| Services::new(Config::from_build_env()));
    use_context_provider(|| Signal::new(WalletState::restore()));
    use_context_provider(|| Signal::new(ToastQueue::default()));

    rsx! {
        Router::<Route> {}
    }
}

/// Backend handles shared by every page.
#[derive(Clone)]
pub struct Services {
    pub config: Config,
    api: Result<LotteryApi, String>,
}

impl Services {
    pub fn new(config: Config) -> Self {
        let api = LotteryApi::new(&config.api_base_url).map_err(|e| {
            tracing::error!("Invalid backend configuration: {}", e);
            e.user_message()
        });
        Self { config, api }
    }

    /// A misconfigured base URL surfaces as a fetch error on every page.
    pub fn api(&self) -> Result<&LotteryApi, String> {
        self.api.as_ref().map_err(Clone::clone)
    }

    pub fn contract(&self) -> Result<LotteryContract, LottoError> {
        LotteryContract::from_config(&self.config)
    }
}

// Global state types
#[derive(Clone, Default, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalletState {
    pub connected: bool,
    pub address: Option<String>,
}

impl WalletState {
    /// Session saved by the previous visit. The account is re-checked with the
    /// provider by the wallet button before it is trusted for transactions.
    fn restore() -> Self {
        LocalStorage::get::<WalletState>(WALLET_STORAGE_KEY).unwrap_or_default()
    }

    pub fn connect(&mut self, address: String) {
        self.connected = true;
        self.address = Some(address);
        self.persist();
    }

    pub fn disconnect(&mut self) {
        self.connected = false;
        self.address = None;
        LocalStorage::delete(WALLET_STORAGE_KEY);
    }

    /// Connected account, if any.
    pub fn account(&self) -> Option<&str> {
        self.address.as_deref().filter(|_| self.connected)
    }

    fn persist(&self) {
        if let Err(e) = LocalStorage::set(WALLET_STORAGE_KEY, self) {
            tracing::warn!("Could not save wallet session: {}", e);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub kind: ToastKind,
}

#[derive(Clone, Default, Debug)]
pub struct ToastQueue {
    next_id: u64,
    pub toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn success(&mut self, description: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, "Success", description)
    }

    pub fn info(&mut self, title: impl Into<String>, description: impl Into<String>) -> u64 {
        self.push(ToastKind::Info, title, description)
    }

    pub fn error(&mut self, description: impl Into<String>) -> u64 {
        let description = description.into();
        tracing::error!("{}", description);
        self.push(ToastKind::Error, "Error", description)
    }

    pub fn push(&mut self, kind: ToastKind, title: impl Into<String>, description: impl Into<String>) -> u64 {
        self.next_id += 1;
        self.toasts.push(Toast {
            id: self.next_id,
            title: title.into(),
            description: description.into(),
            kind,
        });
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|toast| toast.id != id);
    }
}
