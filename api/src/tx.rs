use crate::error::{LottoError, Result};

/// Terminal state of a mined transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TxOutcome {
    Success,
    Reverted,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TxPhase {
    #[default]
    Idle,
    /// Waiting for the user to approve the request in the wallet.
    AwaitingApproval,
    /// Submitted; waiting for the receipt.
    AwaitingConfirmation { hash: String },
    Succeeded { hash: String },
    Failed { message: String },
}

impl TxPhase {
    /// True while a submission is in flight. The action button stays locked.
    pub fn is_busy(&self) -> bool {
        matches!(self, TxPhase::AwaitingApproval | TxPhase::AwaitingConfirmation { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TxPhase::Succeeded { .. } | TxPhase::Failed { .. })
    }

    pub fn hash(&self) -> Option<&str> {
        match self {
            TxPhase::AwaitingConfirmation { hash } | TxPhase::Succeeded { hash } => Some(hash),
            _ => None,
        }
    }
}

/// Purchase, creation and launch all walk the same path:
/// `Idle -> AwaitingApproval -> AwaitingConfirmation -> Succeeded | Failed`.
///
/// Terminal states unlock the action; `begin` from any of them starts over.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxLifecycle {
    phase: TxPhase,
}

impl TxLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &TxPhase {
        &self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    /// The last submission was mined and not reverted. Stays true until the
    /// next `begin` or `reset`.
    pub fn succeeded(&self) -> bool {
        matches!(self.phase, TxPhase::Succeeded { .. })
    }

    /// User clicked. Refused while a transaction is in flight.
    pub fn begin(&mut self) -> Result<()> {
        if self.phase.is_busy() {
            return Err(LottoError::Busy);
        }
        self.set(TxPhase::AwaitingApproval);
        Ok(())
    }

    /// The wallet accepted the request and returned a hash.
    pub fn submitted(&mut self, hash: impl Into<String>) -> bool {
        if self.phase != TxPhase::AwaitingApproval {
            tracing::debug!("ignoring submission in phase {:?}", self.phase);
            return false;
        }
        self.set(TxPhase::AwaitingConfirmation { hash: hash.into() });
        true
    }

    /// A receipt was observed for the submitted hash.
    pub fn confirmed(&mut self, outcome: TxOutcome) -> bool {
        let TxPhase::AwaitingConfirmation { hash } = &self.phase else {
            tracing::debug!("ignoring receipt in phase {:?}", self.phase);
            return false;
        };
        let next = match outcome {
            TxOutcome::Success => TxPhase::Succeeded { hash: hash.clone() },
            TxOutcome::Reverted => TxPhase::Failed {
                message: LottoError::Reverted { hash: hash.clone() }.user_message(),
            },
        };
        self.set(next);
        true
    }

    /// The wallet refused or confirmation tracking failed.
    pub fn fail(&mut self, error: &LottoError) -> bool {
        if !self.phase.is_busy() {
            return false;
        }
        tracing::error!("transaction failed: {}", error);
        self.set(TxPhase::Failed { message: error.user_message() });
        true
    }

    pub fn reset(&mut self) {
        self.set(TxPhase::Idle);
    }

    /// Button text for the current phase.
    pub fn label<'a>(&self, idle: &'a str) -> &'a str {
        match self.phase {
            TxPhase::AwaitingApproval => "Confirm in Wallet...",
            TxPhase::AwaitingConfirmation { .. } => "Processing...",
            _ => idle,
        }
    }

    fn set(&mut self, phase: TxPhase) {
        tracing::debug!("tx phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path() {
        let mut tx = TxLifecycle::new();
        assert_eq!(tx.label("Buy"), "Buy");

        tx.begin().unwrap();
        assert_eq!(tx.phase(), &TxPhase::AwaitingApproval);
        assert_eq!(tx.label("Buy"), "Confirm in Wallet...");

        assert!(tx.submitted("0xabc"));
        assert_eq!(tx.phase().hash(), Some("0xabc"));
        assert_eq!(tx.label("Buy"), "Processing...");

        assert!(tx.confirmed(TxOutcome::Success));
        assert_eq!(tx.phase(), &TxPhase::Succeeded { hash: "0xabc".into() });
        assert!(!tx.is_busy());
    }

    #[test]
    fn second_submission_is_refused_while_busy() {
        let mut tx = TxLifecycle::new();
        tx.begin().unwrap();
        assert!(matches!(tx.begin(), Err(LottoError::Busy)));

        tx.submitted("0xabc");
        assert!(matches!(tx.begin(), Err(LottoError::Busy)));
        assert_eq!(tx.phase().hash(), Some("0xabc"));
    }

    #[test]
    fn failure_unlocks_and_allows_retry() {
        let mut tx = TxLifecycle::new();
        tx.begin().unwrap();
        assert!(tx.fail(&LottoError::UserRejected));
        assert_eq!(
            tx.phase(),
            &TxPhase::Failed { message: "Transaction cancelled by user".into() }
        );

        tx.begin().unwrap();
        assert_eq!(tx.phase(), &TxPhase::AwaitingApproval);
    }

    #[test]
    fn reverted_receipt_fails() {
        let mut tx = TxLifecycle::new();
        tx.begin().unwrap();
        tx.submitted("0xdead");
        tx.confirmed(TxOutcome::Reverted);
        match tx.phase() {
            TxPhase::Failed { message } => assert!(message.contains("0xdead")),
            other => panic!("unexpected phase {other:?}"),
        }
    }

    #[test]
    fn success_is_kept_until_reset() {
        let mut tx = TxLifecycle::new();
        tx.begin().unwrap();
        assert!(!tx.succeeded());
        tx.submitted("0x1");
        tx.confirmed(TxOutcome::Success);
        assert!(tx.succeeded());
        assert!(!tx.is_busy());

        tx.reset();
        assert!(!tx.succeeded());

        tx.begin().unwrap();
        tx.fail(&LottoError::UserRejected);
        assert!(!tx.succeeded());
    }

    #[test]
    fn unreadable_receipt_unlocks_the_action() {
        let mut tx = TxLifecycle::new();
        tx.begin().unwrap();
        tx.submitted("0xbeef");
        assert!(tx.is_busy());

        let lost = LottoError::ReceiptUnavailable { hash: "0xbeef".into(), reason: "503".into() };
        assert!(tx.fail(&lost));
        assert!(!tx.is_busy());
        assert_eq!(tx.label("Buy"), "Buy");
        assert_eq!(
            tx.phase(),
            &TxPhase::Failed { message: "Error while checking transaction status".into() }
        );
    }

    #[test]
    fn out_of_order_events_are_ignored() {
        let mut tx = TxLifecycle::new();
        assert!(!tx.submitted("0x1"));
        assert!(!tx.confirmed(TxOutcome::Success));
        assert!(!tx.fail(&LottoError::Busy));
        assert_eq!(tx.phase(), &TxPhase::Idle);

        tx.begin().unwrap();
        assert!(!tx.confirmed(TxOutcome::Success));
        assert_eq!(tx.phase(), &TxPhase::AwaitingApproval);
    }
}
