mod use_lotteries;
mod use_lottery;
mod use_my_lotteries;
mod use_transaction;

pub use use_lotteries::{use_lotteries, Lotteries};
pub use use_lottery::use_lottery;
pub use use_my_lotteries::{use_my_lotteries, LotterySlice};
pub use use_transaction::{use_transaction, Transaction};

use std::time::Duration;

/// Browser timer used wherever the core asks for a `Sleep`.
pub fn sleep(duration: Duration) -> gloo_timers::future::TimeoutFuture {
    gloo_timers::future::TimeoutFuture::new(duration.as_millis().min(u32::MAX as u128) as u32)
}
