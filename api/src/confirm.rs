//! Transaction confirmation behind one subscription interface.
//!
//! A [`ConfirmationSource`] hands out a [`Subscription`] per transaction hash.
//! The subscription resolves to the terminal [`TxOutcome`] and can be cancelled
//! with [`Subscription::unsubscribe`] or by dropping it. Two adapters exist:
//! [`PollAdapter`] asks a [`ReceiptCheck`] on a fixed interval, and
//! [`PushAdapter`] waits for someone to [`publish`](PushAdapter::publish) the
//! outcome.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::channel::oneshot;
use futures::future::{self, AbortHandle, Abortable, FutureExt, LocalBoxFuture};

use crate::config::MAX_CHECK_FAILURES;
use crate::error::{LottoError, Result};
use crate::tx::TxOutcome;

/// One receipt lookup. `Ok(None)` means the transaction is still pending.
pub trait ReceiptCheck: Clone + 'static {
    fn check(&self, hash: &str) -> LocalBoxFuture<'static, Result<Option<TxOutcome>>>;
}

/// Timer used between polls, so the same code runs on tokio and in the browser.
pub trait Sleep: Clone + 'static {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

impl<F, Fut> Sleep for F
where
    F: Fn(Duration) -> Fut + Clone + 'static,
    Fut: Future<Output = ()> + 'static,
{
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        (self)(duration).boxed_local()
    }
}

pub trait ConfirmationSource {
    fn subscribe(&self, hash: &str) -> Subscription;
}

/// Cancels a subscription from elsewhere, e.g. a component's drop hook.
#[derive(Clone, Debug)]
pub struct SubscriptionHandle(AbortHandle);

impl SubscriptionHandle {
    pub fn unsubscribe(&self) {
        self.0.abort();
    }

    pub fn is_unsubscribed(&self) -> bool {
        self.0.is_aborted()
    }
}

/// Pending confirmation of one transaction.
///
/// Resolves to `Err(LottoError::Unsubscribed)` once cancelled.
pub struct Subscription {
    inner: Abortable<LocalBoxFuture<'static, Result<TxOutcome>>>,
    handle: AbortHandle,
}

impl Subscription {
    pub fn new(outcome: impl Future<Output = Result<TxOutcome>> + 'static) -> Self {
        let (inner, handle) = future::abortable(outcome.boxed_local());
        Self { inner, handle }
    }

    pub fn handle(&self) -> SubscriptionHandle {
        SubscriptionHandle(self.handle.clone())
    }

    pub fn unsubscribe(&self) {
        self.handle.abort();
    }
}

impl Future for Subscription {
    type Output = Result<TxOutcome>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.get_mut().inner).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_aborted)) => Poll::Ready(Err(LottoError::Unsubscribed)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Polls a receipt check until the transaction is mined.
///
/// A failed lookup is retried on the next tick. After `max_failures` failures
/// in a row the subscription resolves to `LottoError::ReceiptUnavailable`.
#[derive(Clone, Debug)]
pub struct PollAdapter<C, S> {
    check: C,
    sleep: S,
    interval: Duration,
    max_failures: u32,
}

impl<C: ReceiptCheck, S: Sleep> PollAdapter<C, S> {
    pub fn new(check: C, sleep: S, interval: Duration) -> Self {
        Self { check, sleep, interval, max_failures: MAX_CHECK_FAILURES }
    }

    pub fn with_max_failures(mut self, max_failures: u32) -> Self {
        self.max_failures = max_failures.max(1);
        self
    }

    /// Polls every hash in `pending` on one timer and publishes outcomes into
    /// `feed` until each is settled or abandoned.
    pub async fn relay(&self, feed: &PushAdapter, mut pending: Vec<String>) {
        let mut failures: HashMap<String, u32> = HashMap::new();
        while !pending.is_empty() {
            let mut done = Vec::new();
            for hash in &pending {
                match self.check.check(hash).await {
                    Ok(Some(outcome)) => {
                        feed.publish(hash, outcome);
                        done.push(hash.clone());
                    }
                    Ok(None) => {
                        failures.remove(hash);
                    }
                    Err(e) => {
                        let count = failures.entry(hash.clone()).or_default();
                        *count += 1;
                        tracing::warn!(
                            "receipt check {}/{} for {} failed: {}",
                            count,
                            self.max_failures,
                            hash,
                            e
                        );
                        if *count >= self.max_failures {
                            feed.abandon(hash, &e.to_string());
                            done.push(hash.clone());
                        }
                    }
                }
            }
            pending.retain(|hash| !done.contains(hash));
            if !pending.is_empty() {
                self.sleep.sleep(self.interval).await;
            }
        }
    }
}

impl<C: ReceiptCheck, S: Sleep> ConfirmationSource for PollAdapter<C, S> {
    fn subscribe(&self, hash: &str) -> Subscription {
        let check = self.check.clone();
        let sleep = self.sleep.clone();
        let interval = self.interval;
        let max_failures = self.max_failures;
        let hash = hash.to_string();

        Subscription::new(async move {
            let mut failures = 0;
            loop {
                match check.check(&hash).await {
                    Ok(Some(outcome)) => {
                        tracing::debug!("receipt for {}: {:?}", hash, outcome);
                        return Ok(outcome);
                    }
                    Ok(None) => failures = 0,
                    Err(e) => {
                        failures += 1;
                        tracing::warn!(
                            "receipt check {}/{} for {} failed: {}",
                            failures,
                            max_failures,
                            hash,
                            e
                        );
                        if failures >= max_failures {
                            let reason = e.to_string();
                            return Err(LottoError::ReceiptUnavailable { hash, reason });
                        }
                    }
                }
                sleep.sleep(interval).await;
            }
        })
    }
}

/// Settled outcomes a [`PushAdapter`] remembers for late subscribers.
pub const SETTLED_CAPACITY: usize = 256;

/// What a push subscriber receives: the outcome, or why tracking stopped.
type Delivery = std::result::Result<TxOutcome, String>;

struct PushState {
    waiters: HashMap<String, Vec<oneshot::Sender<Delivery>>>,
    settled: HashMap<String, TxOutcome>,
    /// Settled hashes, oldest first.
    order: VecDeque<String>,
    capacity: usize,
}

impl PushState {
    fn remember(&mut self, key: String, outcome: TxOutcome) {
        if self.settled.insert(key.clone(), outcome).is_none() {
            self.order.push_back(key);
        }
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.settled.remove(&oldest);
            }
        }
    }

    /// Drops senders whose subscription went away, and hashes left with none.
    fn prune(&mut self) {
        self.waiters.retain(|_, senders| {
            senders.retain(|sender| !sender.is_canceled());
            !senders.is_empty()
        });
    }

    fn deliver(&mut self, key: &str, delivery: Delivery) -> usize {
        self.waiters
            .remove(key)
            .unwrap_or_default()
            .into_iter()
            .filter(|waiter| !waiter.is_canceled())
            .map(|waiter| waiter.send(delivery.clone()))
            .filter(|sent| sent.is_ok())
            .count()
    }
}

/// Confirmation hub fed by an external event source.
///
/// The last [`SETTLED_CAPACITY`] outcomes are remembered, so subscribing
/// shortly after `publish` resolves at once.
#[derive(Clone)]
pub struct PushAdapter {
    state: Rc<RefCell<PushState>>,
}

impl Default for PushAdapter {
    fn default() -> Self {
        Self::with_capacity(SETTLED_CAPACITY)
    }
}

impl PushAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let state = PushState {
            waiters: HashMap::new(),
            settled: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        };
        Self { state: Rc::new(RefCell::new(state)) }
    }

    /// Records the outcome and wakes every subscriber of `hash`. Returns how
    /// many live subscribers were notified.
    pub fn publish(&self, hash: &str, outcome: TxOutcome) -> usize {
        let key = normalize(hash);
        let mut state = self.state.borrow_mut();
        state.remember(key.clone(), outcome);
        state.deliver(&key, Ok(outcome))
    }

    /// Ends every subscription of `hash` with `LottoError::ReceiptUnavailable`.
    /// Nothing is remembered, so a later subscription waits for a new publish.
    pub fn abandon(&self, hash: &str, reason: &str) -> usize {
        let key = normalize(hash);
        self.state.borrow_mut().deliver(&key, Err(reason.to_string()))
    }

    pub fn is_settled(&self, hash: &str) -> bool {
        self.state.borrow().settled.contains_key(&normalize(hash))
    }

    /// Hashes that still have a live subscriber.
    pub fn pending(&self) -> usize {
        let mut state = self.state.borrow_mut();
        state.prune();
        state.waiters.len()
    }
}

impl ConfirmationSource for PushAdapter {
    fn subscribe(&self, hash: &str) -> Subscription {
        let key = normalize(hash);
        let mut state = self.state.borrow_mut();
        state.prune();
        if let Some(outcome) = state.settled.get(&key).copied() {
            return Subscription::new(future::ready(Ok(outcome)));
        }

        let (tx, rx) = oneshot::channel();
        state.waiters.entry(key).or_default().push(tx);
        let hash = hash.trim().to_string();
        Subscription::new(async move {
            match rx.await {
                Ok(Ok(outcome)) => Ok(outcome),
                Ok(Err(reason)) => Err(LottoError::ReceiptUnavailable { hash, reason }),
                Err(_canceled) => Err(LottoError::Unsubscribed),
            }
        })
    }
}

fn normalize(hash: &str) -> String {
    hash.trim().to_ascii_lowercase()
}
