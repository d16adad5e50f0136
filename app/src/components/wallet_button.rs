use dioxus::prelude::*;
use futures::StreamExt;
use lotto_api::prelude::{short_address, ContractCall, LottoError};
use crate::WalletState;

#[derive(Clone)]
enum WalletAction {
    Connect,
    Verify,
}

#[component]
pub fn WalletButton() -> Element {
    let mut wallet = use_context::<Signal<WalletState>>();

    // Use coroutine for lifecycle-safe async operations
    let wallet_coro = use_coroutine(move |mut rx: UnboundedReceiver<WalletAction>| {
        async move {
            while let Some(action) = rx.next().await {
                match action {
                    WalletAction::Connect => match connect_wallet().await {
                        Ok(address) => wallet.write().connect(address),
                        Err(e) => tracing::error!("Wallet connection failed: {}", e),
                    },
                    WalletAction::Verify => {
                        let Some(saved) = wallet.peek().address.clone() else {
                            continue;
                        };
                        // Drop a restored session the provider no longer authorises.
                        match authorized_accounts().await {
                            Ok(accounts) if accounts.iter().any(|a| a.eq_ignore_ascii_case(&saved)) => {}
                            Ok(_) => wallet.write().disconnect(),
                            Err(e) => {
                                tracing::warn!("Could not restore wallet session: {}", e);
                                wallet.write().disconnect();
                            }
                        }
                    }
                }
            }
        }
    });

    use_hook(move || wallet_coro.send(WalletAction::Verify));

    let connect = move |_| {
        wallet_coro.send(WalletAction::Connect);
    };

    let disconnect = move |_| {
        wallet.write().disconnect();
    };

    let wallet_read = wallet.read();

    if let Some(address) = wallet_read.account() {
        let short = short_address(address);

        rsx! {
            div { class: "flex items-center space-x-2",
                span { class: "text-sm text-gray-400 font-mono", "{short}" }
                button {
                    class: "btn btn-secondary text-sm",
                    onclick: disconnect,
                    "Disconnect"
                }
            }
        }
    } else {
        rsx! {
            button {
                class: "btn btn-primary",
                onclick: connect,
                "Connect Wallet"
            }
        }
    }
}

#[cfg(feature = "web")]
mod provider {
    use js_sys::{Array, Object, Promise, Reflect};
    use lotto_api::prelude::{ContractCall, LottoError};
    use wasm_bindgen::prelude::*;

    fn wallet_error(message: &str) -> LottoError {
        LottoError::Wallet { code: 0, message: message.to_string() }
    }

    /// EIP-1193 errors carry a numeric `code` and a `message`.
    fn provider_error(value: JsValue) -> LottoError {
        let code = Reflect::get(&value, &JsValue::from_str("code"))
            .ok()
            .and_then(|code| code.as_f64())
            .map(|code| code as i64)
            .unwrap_or_default();
        let message = Reflect::get(&value, &JsValue::from_str("message"))
            .ok()
            .and_then(|message| message.as_string())
            .unwrap_or_else(|| format!("{:?}", value));
        LottoError::from_wallet(code, message)
    }

    fn ethereum() -> Result<JsValue, LottoError> {
        let window = web_sys::window().ok_or_else(|| wallet_error("No window"))?;

        let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum"))
            .map_err(|_| wallet_error("No wallet found"))?;

        if ethereum.is_undefined() {
            return Err(wallet_error("No Ethereum wallet found. Please install one and refresh."));
        }
        Ok(ethereum)
    }

    /// `ethereum.request({ method, params })`.
    pub async fn request(method: &str, params: Array) -> Result<JsValue, LottoError> {
        let ethereum = ethereum()?;

        let args = Object::new();
        Reflect::set(&args, &JsValue::from_str("method"), &JsValue::from_str(method))
            .map_err(|_| wallet_error("Failed to set method"))?;
        Reflect::set(&args, &JsValue::from_str("params"), &params.into())
            .map_err(|_| wallet_error("Failed to set params"))?;

        let request_fn = Reflect::get(&ethereum, &JsValue::from_str("request"))
            .map_err(|_| wallet_error("No request method"))?;

        let request_fn: js_sys::Function = request_fn.dyn_into()
            .map_err(|_| wallet_error("request is not a function"))?;

        let promise = request_fn.call1(&ethereum, &args.into())
            .map_err(provider_error)?;

        let promise: Promise = promise.dyn_into()
            .map_err(|_| wallet_error("Not a promise"))?;

        tracing::debug!("wallet request {}", method);
        wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(provider_error)
    }

    pub fn accounts(value: JsValue) -> Result<Vec<String>, LottoError> {
        let accounts: Array = value.dyn_into()
            .map_err(|_| wallet_error("Unexpected accounts response"))?;
        Ok(accounts.iter().filter_map(|account| account.as_string()).collect())
    }

    pub fn transaction(from: &str, call: &ContractCall) -> Result<Object, LottoError> {
        let tx = Object::new();
        for (key, value) in [
            ("from", from.to_string()),
            ("to", call.to.to_string()),
            ("data", call.data_hex()),
            ("value", call.value_hex()),
        ] {
            Reflect::set(&tx, &JsValue::from_str(key), &JsValue::from_str(&value))
                .map_err(|_| wallet_error("Failed to build transaction"))?;
        }
        Ok(tx)
    }

    pub fn hash(value: JsValue) -> Result<String, LottoError> {
        value.as_string().ok_or_else(|| wallet_error("Transaction hash not a string"))
    }
}

/// Ask the injected provider for an account (`eth_requestAccounts`).
#[cfg(feature = "web")]
pub async fn connect_wallet() -> Result<String, LottoError> {
    let response = provider::request("eth_requestAccounts", js_sys::Array::new()).await?;
    provider::accounts(response)?
        .into_iter()
        .next()
        .ok_or_else(|| LottoError::Wallet { code: 0, message: "No account authorised".to_string() })
}

/// Accounts already authorised for this site, without prompting (`eth_accounts`).
#[cfg(feature = "web")]
async fn authorized_accounts() -> Result<Vec<String>, LottoError> {
    let response = provider::request("eth_accounts", js_sys::Array::new()).await?;
    provider::accounts(response)
}

/// Send a contract call through the wallet (`eth_sendTransaction`). Resolves
/// to the transaction hash once the user approves.
#[cfg(feature = "web")]
pub async fn send_transaction(from: &str, call: &ContractCall) -> Result<String, LottoError> {
    let tx = provider::transaction(from, call)?;
    let response = provider::request("eth_sendTransaction", js_sys::Array::of1(&tx.into())).await?;
    provider::hash(response)
}

#[cfg(not(feature = "web"))]
pub async fn connect_wallet() -> Result<String, LottoError> {
    Err(LottoError::Wallet { code: 0, message: "Wallet only available in web mode".to_string() })
}

#[cfg(not(feature = "web"))]
async fn authorized_accounts() -> Result<Vec<String>, LottoError> {
    Ok(Vec::new())
}

#[cfg(not(feature = "web"))]
pub async fn send_transaction(_from: &str, _call: &ContractCall) -> Result<String, LottoError> {
    Err(LottoError::Wallet { code: 0, message: "Transaction signing only available in web mode".to_string() })
}
