use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{hex, Address, Bytes, U256};
use alloy_sol_types::SolCall;
use chrono::{DateTime, Utc};

use crate::abi::{buyTicketCall, createLotteryCall, encode_declared, launchLotteryCall, ContractAbi};
use crate::config::Config;
use crate::error::{LottoError, Result};
use crate::state::Lottery;

pub const CREATE_LOTTERY: &str = "createLottery";
pub const BUY_TICKET: &str = "buyTicket";
pub const LAUNCH_LOTTERY: &str = "launchLottery";

/// A write call ready to hand to the wallet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractCall {
    pub to: Address,
    pub function: String,
    pub data: Bytes,
    /// Native value attached to the call, in wei.
    pub value: U256,
}

impl ContractCall {
    pub fn data_hex(&self) -> String {
        hex::encode_prefixed(&self.data)
    }

    /// JSON-RPC quantity: no leading zeros, `0x0` for zero.
    pub fn value_hex(&self) -> String {
        format!("{:#x}", self.value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LotteryContract {
    address: Address,
    abi: ContractAbi,
}

impl LotteryContract {
    pub fn new(address: Address, abi: ContractAbi) -> Self {
        Self { address, abi }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let address = config.contract_address.trim().parse::<Address>().map_err(|e| {
            LottoError::Config(format!(
                "invalid contract address {:?}: {e}",
                config.contract_address
            ))
        })?;
        let abi = match &config.contract_abi {
            Some(json) => ContractAbi::from_json(json)?,
            None => ContractAbi::default(),
        };
        Ok(Self::new(address, abi))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn create_lottery(
        &self,
        end_date: DateTime<Utc>,
        ticket_price: U256,
        description: &str,
    ) -> Result<ContractCall> {
        let end_date = U256::from(end_date.timestamp().max(0) as u64);
        self.call(
            CREATE_LOTTERY,
            vec![
                DynSolValue::Uint(end_date, 256),
                DynSolValue::Uint(ticket_price, 256),
                DynSolValue::String(description.to_string()),
            ],
            || {
                Ok(createLotteryCall {
                    endDate: end_date,
                    ticketPrice: ticket_price,
                    description: description.to_string(),
                })
            },
            U256::ZERO,
        )
    }

    /// Payable: the ticket price travels as the call value.
    pub fn buy_ticket(&self, lottery: &Lottery) -> Result<ContractCall> {
        let id = lottery.onchain_id();
        self.call(
            BUY_TICKET,
            vec![DynSolValue::String(id.to_string())],
            || Ok(buyTicketCall { lotteryId: uint_id(id)? }),
            lottery.ticket_price,
        )
    }

    pub fn launch_lottery(&self, lottery_id: &str) -> Result<ContractCall> {
        self.call(
            LAUNCH_LOTTERY,
            vec![DynSolValue::String(lottery_id.to_string())],
            || Ok(launchLotteryCall { lotteryId: uint_id(lottery_id)? }),
            U256::ZERO,
        )
    }

    /// Encodes against the configured declaration of `name` when there is one,
    /// otherwise against the built-in `C`.
    fn call<C: SolCall>(
        &self,
        name: &str,
        args: Vec<DynSolValue>,
        built_in: impl FnOnce() -> Result<C>,
        value: U256,
    ) -> Result<ContractCall> {
        let (function, data) = match self.abi.function(name) {
            Some(declared) => (declared.signature(), encode_declared(declared, &args)?),
            None => (C::SIGNATURE.to_string(), built_in()?.abi_encode()),
        };
        tracing::debug!("encoded {} for {}", function, self.address);
        Ok(ContractCall {
            to: self.address,
            function,
            data: data.into(),
            value,
        })
    }
}

fn uint_id(id: &str) -> Result<U256> {
    id.trim()
        .parse::<U256>()
        .map_err(|_| LottoError::Abi(format!("{id:?} is not a uint256")))
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    mod string_ids {
        alloy_sol_types::sol! {
            function buyTicket(string lotteryId) external payable;
        }
    }

    fn contract() -> LotteryContract {
        LotteryContract::new(
            address!("00000000000000000000000000000000000000aa"),
            ContractAbi::default(),
        )
    }

    fn lottery() -> Lottery {
        serde_json::from_value(json!({
            "id": "65f1",
            "blockchainId": "12",
            "description": "Weekly",
            "ticketPrice": "1000000000000000000",
            "endDate": "2030-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn create_lottery_uses_unix_seconds() {
        let end = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let call = contract().create_lottery(end, U256::from(5), "Weekly").unwrap();

        assert_eq!(call.function, "createLottery(uint256,uint256,string)");
        let decoded = createLotteryCall::abi_decode(&call.data, true).unwrap();
        assert_eq!(decoded.endDate, U256::from(end.timestamp()));
        assert_eq!(decoded.ticketPrice, U256::from(5));
        assert_eq!(decoded.description, "Weekly");
        assert_eq!(call.value, U256::ZERO);
        assert_eq!(call.value_hex(), "0x0");
    }

    #[test]
    fn buy_ticket_attaches_price_and_onchain_id() {
        let call = contract().buy_ticket(&lottery()).unwrap();
        assert_eq!(call.function, "buyTicket(uint256)");
        assert_eq!(call.value, U256::from(1_000_000_000_000_000_000u64));
        assert_eq!(call.value_hex(), "0xde0b6b3a7640000");
        assert_eq!(buyTicketCall::abi_decode(&call.data, true).unwrap().lotteryId, U256::from(12));
        assert!(call.data_hex().starts_with("0x"));
        assert_eq!(call.data_hex().len(), 2 + 2 * (4 + 32));
    }

    #[test]
    fn launch_rejects_non_numeric_ids_for_uint_abi() {
        assert!(contract().launch_lottery("65f1").is_err());
        assert!(contract().launch_lottery("3").is_ok());
    }

    #[test]
    fn configured_abi_overrides_defaults() {
        let config = Config {
            contract_address: "0x00000000000000000000000000000000000000aA".to_string(),
            contract_abi: Some(
                r#"[{"type":"function","name":"buyTicket","stateMutability":"payable",
                    "inputs":[{"name":"lotteryId","type":"string"}],"outputs":[]}]"#
                    .to_string(),
            ),
            ..Config::default()
        };
        let contract = LotteryContract::from_config(&config).unwrap();
        let call = contract.buy_ticket(&lottery()).unwrap();
        assert_eq!(call.function, "buyTicket(string)");
        let decoded = string_ids::buyTicketCall::abi_decode(&call.data, true).unwrap();
        assert_eq!(decoded.lotteryId, "12");
        // the other functions keep their built-in signatures
        assert!(contract.launch_lottery("3").is_ok());
        assert!(contract.launch_lottery("65f1").is_err());
    }

    #[test]
    fn rejects_unparseable_contract_address() {
        let config = Config { contract_address: "0x1234".to_string(), ..Config::default() };
        assert!(matches!(
            LotteryContract::from_config(&config),
            Err(LottoError::Config(_))
        ));
    }
}
