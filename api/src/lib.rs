pub mod abi;
pub mod client;
pub mod config;
pub mod confirm;
pub mod contract;
pub mod debounce;
pub mod error;
pub mod form;
pub mod liveness;
pub mod rpc;
pub mod state;
pub mod tx;
pub mod units;

pub mod prelude {
    pub use alloy_primitives::{Address, U256};

    pub use crate::abi::ContractAbi;
    pub use crate::client::*;
    pub use crate::config::*;
    pub use crate::confirm::*;
    pub use crate::contract::*;
    pub use crate::debounce::*;
    pub use crate::error::*;
    pub use crate::form::*;
    pub use crate::liveness::*;
    pub use crate::rpc::*;
    pub use crate::state::*;
    pub use crate::tx::*;
    pub use crate::units::*;
}
