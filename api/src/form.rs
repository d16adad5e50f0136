use alloy_primitives::U256;
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::ValidationError;
use crate::units::parse_ether;

/// Format of an HTML `datetime-local` input.
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Raw values of the create-lottery form, as typed by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateLotteryForm {
    pub description: String,
    /// Ticket price in ETH. Empty means a free lottery.
    pub ticket_price: String,
    /// `datetime-local` value, read as UTC.
    pub end_date: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewLottery {
    pub description: String,
    /// Ticket price in wei.
    pub ticket_price: U256,
    pub end_date: DateTime<Utc>,
}

impl CreateLotteryForm {
    pub fn validate(
        &self,
        wallet_connected: bool,
        now: DateTime<Utc>,
    ) -> Result<NewLottery, ValidationError> {
        if !wallet_connected {
            return Err(ValidationError::WalletNotConnected);
        }

        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::MissingDescription);
        }
        if self.end_date.trim().is_empty() {
            return Err(ValidationError::MissingEndDate);
        }

        let end_date = parse_end_date(&self.end_date)?;
        if end_date <= now {
            return Err(ValidationError::EndDateNotInFuture);
        }

        let ticket_price = match self.ticket_price.trim() {
            "" => U256::ZERO,
            price => parse_ether(price)?,
        };

        Ok(NewLottery {
            description: description.to_string(),
            ticket_price,
            end_date,
        })
    }
}

pub fn parse_end_date(input: &str) -> Result<DateTime<Utc>, ValidationError> {
    let input = input.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(input) {
        return Ok(date.with_timezone(&Utc));
    }
    [DATETIME_LOCAL_FORMAT, "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ValidationError::InvalidEndDate(input.to_string()))
}

/// Value for the input's `min` attribute.
pub fn min_end_date(now: DateTime<Utc>) -> String {
    now.format(DATETIME_LOCAL_FORMAT).to_string()
}
