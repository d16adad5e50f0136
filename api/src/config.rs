use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_RPC_URL: &str = "https://data-seed-prebsc-1-s1.bnbchain.org:8545";
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x0000000000000000000000000000000000000000";
pub const DEFAULT_EXPLORER_URL: &str = "https://api-testnet.bscscan.com/api";

/// Receipt poll interval.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Consecutive failed receipt checks before confirmation tracking gives up.
pub const MAX_CHECK_FAILURES: u32 = 5;

/// Quiet period before a search query is sent.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Environment variable names, shared by the runtime and build-time loaders.
pub const ENV_API_URL: &str = "LOTTO_API_URL";
pub const ENV_RPC_URL: &str = "LOTTO_RPC_URL";
pub const ENV_CONTRACT_ADDRESS: &str = "LOTTO_CONTRACT_ADDRESS";
pub const ENV_CONTRACT_ABI: &str = "LOTTO_CONTRACT_ABI";
pub const ENV_EXPLORER_URL: &str = "LOTTO_EXPLORER_URL";
pub const ENV_EXPLORER_API_KEY: &str = "LOTTO_EXPLORER_API_KEY";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// REST backend base URL, without a trailing slash.
    pub api_base_url: String,

    /// JSON-RPC endpoint used to read transaction receipts.
    pub rpc_url: String,

    /// Address of the deployed lottery contract.
    pub contract_address: String,

    /// Optional JSON ABI overriding the built-in function signatures.
    pub contract_abi: Option<String>,

    /// Block explorer API endpoint.
    pub explorer_api_url: String,

    /// Block explorer API key.
    pub explorer_api_key: String,

    pub poll_interval: Duration,
    pub max_check_failures: u32,
    pub search_debounce: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            contract_abi: None,
            explorer_api_url: DEFAULT_EXPLORER_URL.to_string(),
            explorer_api_key: String::new(),
            poll_interval: POLL_INTERVAL,
            max_check_failures: MAX_CHECK_FAILURES,
            search_debounce: SEARCH_DEBOUNCE,
        }
    }
}

impl Config {
    /// Reads configuration from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration captured at compile time. Used by the wasm build, which
    /// has no process environment.
    pub fn from_build_env() -> Self {
        Self::from_lookup(|key| {
            let value = match key {
                ENV_API_URL => option_env!("LOTTO_API_URL"),
                ENV_RPC_URL => option_env!("LOTTO_RPC_URL"),
                ENV_CONTRACT_ADDRESS => option_env!("LOTTO_CONTRACT_ADDRESS"),
                ENV_CONTRACT_ABI => option_env!("LOTTO_CONTRACT_ABI"),
                ENV_EXPLORER_URL => option_env!("LOTTO_EXPLORER_URL"),
                ENV_EXPLORER_API_KEY => option_env!("LOTTO_EXPLORER_API_KEY"),
                _ => None,
            };
            value.map(str::to_string)
        })
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            api_base_url: get(ENV_API_URL)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            rpc_url: get(ENV_RPC_URL).unwrap_or(defaults.rpc_url),
            contract_address: get(ENV_CONTRACT_ADDRESS).unwrap_or(defaults.contract_address),
            contract_abi: get(ENV_CONTRACT_ABI),
            explorer_api_url: get(ENV_EXPLORER_URL).unwrap_or(defaults.explorer_api_url),
            explorer_api_key: get(ENV_EXPLORER_API_KEY).unwrap_or(defaults.explorer_api_key),
            ..defaults
        }
    }
}
