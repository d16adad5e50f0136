use futures::future::{FutureExt, LocalBoxFuture};
use serde::{Deserialize, Serialize};

use crate::confirm::ReceiptCheck;
use crate::error::{LottoError, Result};
use crate::tx::TxOutcome;

#[derive(Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    pub params: Vec<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcError>,
}

#[derive(Deserialize, Debug)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    pub transaction_hash: Option<String>,
    pub block_number: Option<String>,
    /// `0x1` on success, `0x0` on revert. Absent before Byzantium.
    pub status: Option<String>,
}

impl RpcReceipt {
    pub fn outcome(&self) -> TxOutcome {
        match self.status.as_deref() {
            Some("0x0") => TxOutcome::Reverted,
            _ => TxOutcome::Success,
        }
    }
}

/// Reads receipts with `eth_getTransactionReceipt`.
#[derive(Clone, Debug)]
pub struct RpcReceiptCheck {
    client: reqwest::Client,
    rpc_url: String,
}

impl RpcReceiptCheck {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), rpc_url: rpc_url.into() }
    }

    pub async fn fetch_receipt(&self, hash: &str) -> Result<Option<RpcReceipt>> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "eth_getTransactionReceipt",
            params: vec![serde_json::json!(hash)],
        };

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await?;

        let rpc_response: RpcResponse<RpcReceipt> = response.json().await?;
        if let Some(error) = rpc_response.error {
            return Err(LottoError::Wallet { code: error.code, message: error.message });
        }
        Ok(rpc_response.result)
    }
}

impl ReceiptCheck for RpcReceiptCheck {
    fn check(&self, hash: &str) -> LocalBoxFuture<'static, Result<Option<TxOutcome>>> {
        let this = self.clone();
        let hash = hash.to_string();
        async move {
            let receipt = this.fetch_receipt(&hash).await?;
            Ok(receipt.map(|r| r.outcome()))
        }
        .boxed_local()
    }
}

/// Response of a BscScan-style `gettxreceiptstatus` call.
#[derive(Deserialize, Debug)]
pub struct ExplorerResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    /// An object on success, an error string otherwise.
    #[serde(default)]
    pub result: serde_json::Value,
}

impl ExplorerResponse {
    /// `None` while the explorer has not indexed the receipt yet.
    pub fn outcome(&self) -> Option<TxOutcome> {
        if self.status != "1" {
            return None;
        }
        match self.result.get("status").and_then(|s| s.as_str()) {
            Some("1") => Some(TxOutcome::Success),
            Some("0") => Some(TxOutcome::Reverted),
            _ => None,
        }
    }
}

/// Reads receipt status from a block explorer API.
#[derive(Clone, Debug)]
pub struct ExplorerReceiptCheck {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl ExplorerReceiptCheck {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }

    pub async fn fetch_status(&self, hash: &str) -> Result<ExplorerResponse> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("module", "transaction"),
                ("action", "gettxreceiptstatus"),
                ("txhash", hash),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;
        Ok(response.json().await?)
    }
}

impl ReceiptCheck for ExplorerReceiptCheck {
    fn check(&self, hash: &str) -> LocalBoxFuture<'static, Result<Option<TxOutcome>>> {
        let this = self.clone();
        let hash = hash.to_string();
        async move {
            let response = this.fetch_status(&hash).await?;
            tracing::debug!("explorer status for {}: {:?}", hash, response);
            Ok(response.outcome())
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_rpc_receipts() {
        let pending: RpcResponse<RpcReceipt> =
            serde_json::from_value(json!({ "jsonrpc": "2.0", "id": 1, "result": null })).unwrap();
        assert!(pending.result.is_none());

        let mined: RpcResponse<RpcReceipt> = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": { "transactionHash": "0xabc", "blockNumber": "0x10", "status": "0x1" }
        }))
        .unwrap();
        assert_eq!(mined.result.unwrap().outcome(), TxOutcome::Success);

        let reverted: RpcReceipt = serde_json::from_value(json!({ "status": "0x0" })).unwrap();
        assert_eq!(reverted.outcome(), TxOutcome::Reverted);
    }

    #[test]
    fn decodes_rpc_errors() {
        let response: RpcResponse<RpcReceipt> = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32602, "message": "invalid argument" }
        }))
        .unwrap();
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[test]
    fn decodes_explorer_status() {
        let ok: ExplorerResponse = serde_json::from_value(json!({
            "status": "1", "message": "OK", "result": { "status": "1" }
        }))
        .unwrap();
        assert_eq!(ok.outcome(), Some(TxOutcome::Success));

        let failed: ExplorerResponse = serde_json::from_value(json!({
            "status": "1", "message": "OK", "result": { "status": "0" }
        }))
        .unwrap();
        assert_eq!(failed.outcome(), Some(TxOutcome::Reverted));

        let pending: ExplorerResponse = serde_json::from_value(json!({
            "status": "1", "message": "OK", "result": { "status": "" }
        }))
        .unwrap();
        assert_eq!(pending.outcome(), None);

        let not_ok: ExplorerResponse = serde_json::from_value(json!({
            "status": "0", "message": "NOTOK", "result": "Invalid API Key"
        }))
        .unwrap();
        assert_eq!(not_ok.outcome(), None);
    }
}
