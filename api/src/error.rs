use thiserror::Error;

/// Local form checks that run before anything reaches the wallet or the backend.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please connect your wallet first")]
    WalletNotConnected,

    #[error("Please fill description and end date")]
    MissingDescription,

    #[error("Please fill description and end date")]
    MissingEndDate,

    #[error("End date is not a valid date: {0}")]
    InvalidEndDate(String),

    #[error("End date must be in the future")]
    EndDateNotInFuture,

    #[error("Invalid ticket price: {0}")]
    InvalidPrice(String),
}

#[derive(Debug, Error)]
pub enum LottoError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid lottery record: {0}")]
    InvalidRecord(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("wallet error {code}: {message}")]
    Wallet { code: i64, message: String },

    #[error("Transaction cancelled by user")]
    UserRejected,

    #[error("Transaction failed on the blockchain ({hash})")]
    Reverted { hash: String },

    #[error("a transaction is already in progress")]
    Busy,

    #[error("abi error: {0}")]
    Abi(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("confirmation subscription was cancelled")]
    Unsubscribed,

    #[error("Error while checking transaction status of {hash}: {reason}")]
    ReceiptUnavailable { hash: String, reason: String },
}

impl LottoError {
    /// Builds a wallet error from an EIP-1193 provider error, folding user
    /// rejections (code 4001 or the wallet's rejection message) into `UserRejected`.
    pub fn from_wallet(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        if code == 4001 || message.contains("User rejected the request") {
            return LottoError::UserRejected;
        }
        LottoError::Wallet { code, message }
    }

    /// Text shown to the user in a toast or an inline alert.
    pub fn user_message(&self) -> String {
        match self {
            LottoError::Http(_) | LottoError::Status { .. } | LottoError::Decode(_) => {
                "Failed to reach the lottery service. Please try again.".to_string()
            }
            LottoError::Wallet { message, .. } => message.clone(),
            LottoError::ReceiptUnavailable { .. } => {
                "Error while checking transaction status".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T, E = LottoError> = std::result::Result<T, E>;
