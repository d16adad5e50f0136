use alloy_primitives::{Address, U256};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::LottoError;

/// Lifecycle of a lottery as seen by the front-end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LotteryStatus {
    /// No winner yet and the end date has not passed. Tickets can be bought.
    #[default]
    Active,
    /// End date passed but the owner has not launched the draw yet.
    EndedPendingLaunch,
    /// The contract selected a winner.
    Finalized,
}

impl LotteryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LotteryStatus::Active => "Active",
            LotteryStatus::EndedPendingLaunch => "Ended",
            LotteryStatus::Finalized => "Winner Selected",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawLottery")]
pub struct Lottery {
    /// The backend identifier.
    pub id: String,

    /// The identifier used by the lottery contract, when the backend reports one.
    pub blockchain_id: Option<String>,

    /// Free-form description entered by the owner.
    pub description: String,

    /// Ticket price in wei.
    #[serde(serialize_with = "price_as_string")]
    pub ticket_price: U256,

    /// Address that created the lottery.
    pub owner: Option<Address>,

    /// Address of the winner, set once the draw has been launched.
    pub winner_address: Option<Address>,

    /// Earliest moment the lottery can be launched.
    pub end_date: DateTime<Utc>,
}

impl Lottery {
    pub fn status_at(&self, now: DateTime<Utc>) -> LotteryStatus {
        if self.winner_address.is_some() {
            LotteryStatus::Finalized
        } else if now < self.end_date {
            LotteryStatus::Active
        } else {
            LotteryStatus::EndedPendingLaunch
        }
    }

    pub fn status(&self) -> LotteryStatus {
        self.status_at(Utc::now())
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status_at(now) == LotteryStatus::Active
    }

    /// Identifier to pass to the contract. Falls back to the backend id for
    /// records that predate `blockchainId`.
    pub fn onchain_id(&self) -> &str {
        self.blockchain_id.as_deref().unwrap_or(&self.id)
    }

    pub fn is_owned_by(&self, address: &Address) -> bool {
        self.owner.as_ref() == Some(address)
    }

    /// Only the owner may launch, once the end date has passed, and only if
    /// somebody bought a ticket.
    pub fn can_launch(
        &self,
        total_tickets: u64,
        caller: Option<&Address>,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(caller) = caller else {
            return false;
        };
        self.winner_address.is_none()
            && self.is_owned_by(caller)
            && self.end_date <= now
            && total_tickets > 0
    }

    pub fn matches_description(&self, query: &str) -> bool {
        let query = query.trim();
        query.is_empty()
            || self
                .description
                .to_lowercase()
                .contains(&query.to_lowercase())
    }
}

/// Status buttons on the listing page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Ended,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [StatusFilter::All, StatusFilter::Active, StatusFilter::Ended];

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Active => "Active",
            StatusFilter::Ended => "Ended",
        }
    }

    /// Value of the backend's `active` query parameter.
    pub fn active_param(&self) -> Option<bool> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Active => Some(true),
            StatusFilter::Ended => Some(false),
        }
    }

    pub fn matches(&self, status: LotteryStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status == LotteryStatus::Active,
            StatusFilter::Ended => status != LotteryStatus::Active,
        }
    }
}

/// Applies the status filter and the description search locally.
pub fn filter_lotteries(
    lotteries: &[Lottery],
    filter: StatusFilter,
    query: &str,
    now: DateTime<Utc>,
) -> Vec<Lottery> {
    lotteries
        .iter()
        .filter(|lottery| filter.matches(lottery.status_at(now)))
        .filter(|lottery| lottery.matches_description(query))
        .cloned()
        .collect()
}

/// Response of `GET /lotteries/{id}`: either `{ lottery, totalTickets }` or
/// the bare record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LotteryDetail {
    pub lottery: Lottery,
    pub total_tickets: u64,
}

// Read through `Value` rather than an untagged enum: serde's buffering of
// untagged content does not understand arbitrary-precision numbers.
impl<'de> Deserialize<'de> for LotteryDetail {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut value = Value::deserialize(deserializer)?;
        if !value.get("lottery").is_some_and(Value::is_object) {
            let lottery = Lottery::deserialize(value).map_err(de::Error::custom)?;
            return Ok(Self { lottery, total_tickets: 0 });
        }

        let total_tickets = match value.get("totalTickets") {
            None | Some(Value::Null) => 0,
            Some(count) => count
                .as_u64()
                .or_else(|| count.as_str().and_then(|s| s.trim().parse().ok()))
                .ok_or_else(|| de::Error::custom(format!("invalid totalTickets {count}")))?,
        };
        let record = value.get_mut("lottery").map(Value::take).unwrap_or_default();
        let lottery = Lottery::deserialize(record).map_err(de::Error::custom)?;
        Ok(Self { lottery, total_tickets })
    }
}

// Wire shape. Backend revisions disagree on which fields exist and how numbers
// are encoded, so everything loose is read as a `Value` and checked here.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLottery {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    blockchain_id: Value,
    #[serde(default)]
    description: String,
    #[serde(default)]
    ticket_price: Value,
    #[serde(default)]
    owner: Option<String>,
    #[serde(default)]
    winner_address: Option<String>,
    #[serde(default)]
    end_date: Value,
}

impl TryFrom<RawLottery> for Lottery {
    type Error = LottoError;

    fn try_from(raw: RawLottery) -> Result<Self, Self::Error> {
        let blockchain_id = id_string(&raw.blockchain_id);
        let id = id_string(&raw.id)
            .or_else(|| blockchain_id.clone())
            .ok_or_else(|| LottoError::InvalidRecord("missing id".to_string()))?;
        Ok(Self {
            ticket_price: parse_price(&raw.ticket_price)?,
            end_date: parse_date(&raw.end_date)?,
            owner: parse_address("owner", raw.owner)?,
            winner_address: parse_address("winner", raw.winner_address)?,
            description: raw.description,
            blockchain_id,
            id,
        })
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Wei amounts arrive as decimal strings or as JSON numbers of any size.
fn parse_price(value: &Value) -> Result<U256, LottoError> {
    let digits = match value {
        Value::Null => return Ok(U256::ZERO),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => return Err(LottoError::InvalidRecord(format!("unexpected ticket price {other}"))),
    };
    U256::from_str_radix(&digits, 10).map_err(|_| {
        LottoError::InvalidRecord(format!("ticket price {digits:?} is not a whole number"))
    })
}

fn parse_date(value: &Value) -> Result<DateTime<Utc>, LottoError> {
    match value {
        Value::String(s) => {
            if let Ok(date) = DateTime::parse_from_rfc3339(s) {
                return Ok(date.with_timezone(&Utc));
            }
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| naive.and_utc())
                .map_err(|_| LottoError::InvalidRecord(format!("end date {s:?} is not a date")))
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
            .ok_or_else(|| LottoError::InvalidRecord(format!("end date {n} is out of range"))),
        Value::Null => Err(LottoError::InvalidRecord("missing end date".to_string())),
        other => Err(LottoError::InvalidRecord(format!("unexpected end date {other}"))),
    }
}

/// Empty strings and the zero address mean "unset".
fn parse_address(field: &str, value: Option<String>) -> Result<Option<Address>, LottoError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let address = value
        .parse::<Address>()
        .map_err(|_| LottoError::InvalidRecord(format!("{field} {value:?} is not an address")))?;
    Ok(Some(address).filter(|address| !address.is_zero()))
}

fn price_as_string<S: Serializer>(price: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&price.to_string())
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;
    use chrono::Duration;
    use serde_json::json;

    use super::*;
    use crate::client::decode_lotteries;

    const OWNER: &str = "0xAbCd000000000000000000000000000000000001";
    const OWNER_ADDRESS: Address = address!("abcd000000000000000000000000000000000001");

    fn lottery(winner: &str, end: DateTime<Utc>) -> Lottery {
        serde_json::from_value(json!({
            "id": "65f1",
            "blockchainId": "7",
            "description": "Weekly Draw",
            "ticketPrice": "1000000000000000000",
            "owner": OWNER,
            "winnerAddress": winner,
            "endDate": end.to_rfc3339(),
        }))
        .unwrap()
    }

    #[test]
    fn decodes_backend_record() {
        let now = Utc::now();
        let lottery = lottery("", now);
        assert_eq!(lottery.id, "65f1");
        assert_eq!(lottery.onchain_id(), "7");
        assert_eq!(lottery.ticket_price, U256::from(1_000_000_000_000_000_000u64));
        assert_eq!(lottery.winner_address, None);
        assert_eq!(lottery.owner, Some(OWNER_ADDRESS));
    }

    #[test]
    fn decodes_older_record_shapes() {
        let lottery: Lottery = serde_json::from_value(json!({
            "id": 12,
            "description": "No owner field",
            "ticketPrice": 5000,
            "winnerAddress": null,
            "endDate": 1_700_000_000_000i64,
        }))
        .unwrap();
        assert_eq!(lottery.id, "12");
        assert_eq!(lottery.onchain_id(), "12");
        assert_eq!(lottery.ticket_price, U256::from(5000));
        assert_eq!(lottery.owner, None);
        assert_eq!(lottery.end_date.timestamp(), 1_700_000_000);
    }

    #[test]
    fn rejects_malformed_records() {
        let missing_date = json!({ "id": "1", "description": "x", "ticketPrice": "1" });
        assert!(serde_json::from_value::<Lottery>(missing_date).is_err());

        let bad_price = json!({
            "id": "1", "description": "x", "ticketPrice": "1.5", "endDate": "2030-01-01T00:00:00Z"
        });
        assert!(serde_json::from_value::<Lottery>(bad_price).is_err());

        let no_id = json!({ "description": "x", "ticketPrice": "1", "endDate": "2030-01-01T00:00:00Z" });
        assert!(serde_json::from_value::<Lottery>(no_id).is_err());

        let bad_owner = json!({
            "id": "1", "description": "x", "ticketPrice": "1", "owner": "alice",
            "endDate": "2030-01-01T00:00:00Z"
        });
        assert!(serde_json::from_value::<Lottery>(bad_owner).is_err());
    }

    #[test]
    fn numeric_prices_beyond_u64_survive_decoding() {
        let body = r#"[{
            "id": "big",
            "description": "High roller",
            "ticketPrice": 20000000000000000000,
            "endDate": "2030-01-01T00:00:00Z"
        }]"#;
        let records: Vec<Value> = serde_json::from_str(body).unwrap();
        let listed = decode_lotteries(records);

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].ticket_price, U256::from(20_000_000_000_000_000_000u128));

        let detail: LotteryDetail = serde_json::from_str(
            r#"{"lottery": {"id": "big", "description": "x", "ticketPrice": 20000000000000000000,
                "endDate": "2030-01-01T00:00:00Z"}, "totalTickets": 2}"#,
        )
        .unwrap();
        assert_eq!(detail.lottery.ticket_price, U256::from(20_000_000_000_000_000_000u128));
        assert_eq!(detail.total_tickets, 2);
    }

    #[test]
    fn fractional_numeric_prices_are_rejected() {
        let record: Value = serde_json::from_str(
            r#"{"id": "1", "description": "x", "ticketPrice": 1.5, "endDate": "2030-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(serde_json::from_value::<Lottery>(record).is_err());
    }

    #[test]
    fn zero_address_winner_is_unset() {
        let lottery = lottery("0x0000000000000000000000000000000000000000", Utc::now());
        assert_eq!(lottery.winner_address, None);
    }

    #[test]
    fn three_state_status() {
        let now = Utc::now();
        let tomorrow = now + Duration::days(1);
        let yesterday = now - Duration::days(1);

        assert_eq!(lottery("", tomorrow).status_at(now), LotteryStatus::Active);
        assert_eq!(
            lottery("", yesterday).status_at(now),
            LotteryStatus::EndedPendingLaunch
        );
        assert_eq!(lottery(OWNER, yesterday).status_at(now), LotteryStatus::Finalized);
        assert_eq!(lottery(OWNER, tomorrow).status_at(now), LotteryStatus::Finalized);
    }

    #[test]
    fn active_iff_no_winner_and_not_ended() {
        let now = Utc::now();
        for winner in ["", OWNER] {
            for offset in [-3600, -1, 0, 1, 3600] {
                let end = now + Duration::seconds(offset);
                let lottery = lottery(winner, end);
                assert_eq!(
                    lottery.is_active_at(now),
                    lottery.winner_address.is_none() && now < lottery.end_date,
                );
            }
        }
    }

    #[test]
    fn launch_requires_owner_end_and_tickets() {
        let now = Utc::now();
        let ended = lottery("", now - Duration::hours(1));
        let caller: Address = "0xabcd000000000000000000000000000000000001".parse().unwrap();
        let caller = Some(&caller);

        assert!(ended.can_launch(3, caller, now));
        assert!(!ended.can_launch(0, caller, now));
        assert!(!ended.can_launch(3, None, now));
        assert!(!ended.can_launch(3, Some(&Address::repeat_byte(0x12)), now));
        assert!(!lottery("", now + Duration::hours(1)).can_launch(3, caller, now));
        assert!(!lottery(OWNER, now - Duration::hours(1)).can_launch(3, caller, now));
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let now = Utc::now();
        let mut lotteries = Vec::new();
        for description in ["Weekly Draw", "weekend special", "Monthly jackpot", "DRAWING board"] {
            let mut l = lottery("", now + Duration::days(1));
            l.description = description.to_string();
            lotteries.push(l);
        }

        let found = filter_lotteries(&lotteries, StatusFilter::All, "draw", now);
        let names: Vec<_> = found.iter().map(|l| l.description.as_str()).collect();
        assert_eq!(names, ["Weekly Draw", "DRAWING board"]);

        assert_eq!(filter_lotteries(&lotteries, StatusFilter::All, "", now).len(), 4);
        assert!(filter_lotteries(&lotteries, StatusFilter::All, "raffle", now).is_empty());
    }

    #[test]
    fn status_filter_partitions_lotteries() {
        let now = Utc::now();
        let lotteries = vec![
            lottery("", now + Duration::days(1)),
            lottery("", now - Duration::days(1)),
            lottery(OWNER, now - Duration::days(1)),
        ];
        assert_eq!(filter_lotteries(&lotteries, StatusFilter::Active, "", now).len(), 1);
        assert_eq!(filter_lotteries(&lotteries, StatusFilter::Ended, "", now).len(), 2);
        assert_eq!(filter_lotteries(&lotteries, StatusFilter::All, "", now).len(), 3);
        assert_eq!(StatusFilter::Ended.active_param(), Some(false));
        assert_eq!(StatusFilter::All.active_param(), None);
    }

    #[test]
    fn detail_accepts_wrapped_and_bare_shapes() {
        let record = json!({
            "id": "1", "description": "x", "ticketPrice": "10", "endDate": "2030-01-01T00:00:00Z"
        });
        let wrapped: LotteryDetail =
            serde_json::from_value(json!({ "lottery": record.clone(), "totalTickets": 4 })).unwrap();
        assert_eq!(wrapped.total_tickets, 4);

        let counted_as_text: LotteryDetail =
            serde_json::from_value(json!({ "lottery": record.clone(), "totalTickets": "4" })).unwrap();
        assert_eq!(counted_as_text, wrapped);

        let bare: LotteryDetail = serde_json::from_value(record).unwrap();
        assert_eq!(bare.total_tickets, 0);
        assert_eq!(bare.lottery, wrapped.lottery);
    }

    #[test]
    fn serializes_price_as_string() {
        let lottery = lottery("", Utc::now());
        let value = serde_json::to_value(&lottery).unwrap();
        assert_eq!(value["ticketPrice"], json!("1000000000000000000"));
        assert_eq!(value["blockchainId"], json!("7"));
    }
}
