use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::Lottery;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// The backend identifier.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// The lottery this ticket belongs to, when the backend embeds it.
    #[serde(default)]
    pub lottery: Option<Lottery>,

    /// The lottery reference, when the backend does not embed the record.
    #[serde(default)]
    pub lottery_id: Option<String>,

    /// Address that paid for the ticket.
    pub buyer: String,

    #[serde(default)]
    pub purchase_date: Option<DateTime<Utc>>,
}

impl Ticket {
    pub fn lottery_ref(&self) -> Option<&str> {
        self.lottery
            .as_ref()
            .map(|lottery| lottery.id.as_str())
            .or(self.lottery_id.as_deref())
    }
}

/// Body of `POST /tickets`, sent once a purchase is confirmed on chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    pub lottery_id: String,
    pub buyer: String,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("unexpected id {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_ticket_with_embedded_lottery() {
        let ticket: Ticket = serde_json::from_value(json!({
            "id": 3,
            "lottery": {
                "id": "abc",
                "description": "Weekly",
                "ticketPrice": "100",
                "endDate": "2030-01-01T00:00:00Z"
            },
            "buyer": "0x01",
            "purchaseDate": "2029-12-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(ticket.id, "3");
        assert_eq!(ticket.lottery_ref(), Some("abc"));
        assert!(ticket.purchase_date.is_some());
    }

    #[test]
    fn decodes_ticket_with_reference_only() {
        let ticket: Ticket = serde_json::from_value(json!({
            "id": "t1",
            "lotteryId": "abc",
            "buyer": "0x01"
        }))
        .unwrap();
        assert_eq!(ticket.lottery_ref(), Some("abc"));
        assert_eq!(ticket.purchase_date, None);
    }

    #[test]
    fn new_ticket_body_is_camel_case() {
        let body = NewTicket { lottery_id: "abc".into(), buyer: "0x01".into() };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({ "lotteryId": "abc", "buyer": "0x01" })
        );
    }
}
