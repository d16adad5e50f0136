//! Contract ABI for the three lottery calls.
//!
//! The built-in signatures are declared with `sol!`. A JSON ABI from the
//! configuration may redeclare any of them; arguments are then converted to
//! whatever parameter types it declares.

use alloy_dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier};
use alloy_json_abi::{Function, JsonAbi};
use alloy_sol_types::sol;

use crate::error::{LottoError, Result};

sol! {
    function createLottery(uint256 endDate, uint256 ticketPrice, string description) external;
    function buyTicket(uint256 lotteryId) external payable;
    function launchLottery(uint256 lotteryId) external;
}

/// Declarations read from a configured JSON ABI.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContractAbi {
    declared: JsonAbi,
}

impl ContractAbi {
    pub fn from_json(json: &str) -> Result<Self> {
        let declared: JsonAbi = serde_json::from_str(json)?;
        Ok(Self { declared })
    }

    /// The configured declaration of `name`. The first overload wins.
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.declared.function(name).and_then(|overloads| overloads.first())
    }
}

/// Selector followed by `args`, each converted to the declared parameter type.
pub fn encode_declared(function: &Function, args: &[DynSolValue]) -> Result<Vec<u8>> {
    if args.len() != function.inputs.len() {
        return Err(LottoError::Abi(format!(
            "{} expects {} arguments, got {}",
            function.name,
            function.inputs.len(),
            args.len()
        )));
    }
    let values = function
        .inputs
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            let ty = param.resolve().map_err(|e| LottoError::Abi(e.to_string()))?;
            coerce(arg, &ty)
        })
        .collect::<Result<Vec<_>>>()?;
    function
        .abi_encode_input(&values)
        .map_err(|e| LottoError::Abi(e.to_string()))
}

fn coerce(value: &DynSolValue, ty: &DynSolType) -> Result<DynSolValue> {
    if value.matches(ty) {
        return Ok(value.clone());
    }
    let text = match value {
        DynSolValue::Uint(n, _) => n.to_string(),
        DynSolValue::String(s) => s.trim().to_string(),
        other => return Err(LottoError::Abi(format!("cannot pass {other:?} as {ty}"))),
    };
    ty.coerce_str(&text)
        .map_err(|_| LottoError::Abi(format!("{text:?} is not a {ty}")))
}
