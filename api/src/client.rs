use chrono::Utc;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{LottoError, Result};
use crate::state::{filter_lotteries, Lottery, LotteryDetail, NewTicket, StatusFilter, Ticket};

/// Backend routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint<'a> {
    All,
    ByStatus { active: bool },
    Search { description: &'a str },
    ById(&'a str),
    ByUser(&'a str),
    ByOwner(&'a str),
    Tickets,
}

impl Endpoint<'_> {
    pub fn url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        {
            let segments: Vec<&str> = match *self {
                Endpoint::All => vec!["lotteries"],
                Endpoint::ByStatus { .. } => vec!["lotteries", "active"],
                Endpoint::Search { .. } => vec!["lotteries", "description"],
                Endpoint::ById(id) => vec!["lotteries", id],
                Endpoint::ByUser(address) => vec!["lotteries", "user", address],
                Endpoint::ByOwner(address) => vec!["lotteries", "owner", address],
                Endpoint::Tickets => vec!["tickets"],
            };
            if let Ok(mut path) = url.path_segments_mut() {
                path.pop_if_empty().extend(segments);
            }
        }
        match *self {
            Endpoint::ByStatus { active } => {
                url.query_pairs_mut().append_pair("active", &active.to_string());
            }
            Endpoint::Search { description } => {
                url.query_pairs_mut().append_pair("description", description);
            }
            _ => {}
        }
        url
    }
}

/// Client for the lottery REST backend.
#[derive(Clone, Debug)]
pub struct LotteryApi {
    base_url: Url,
    client: reqwest::Client,
}

impl LotteryApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| LottoError::Config(format!("invalid api url {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(LottoError::Config(format!("{base_url} cannot be a base url")));
        }
        Ok(Self { base_url, client: reqwest::Client::new() })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /lotteries` or `GET /lotteries/active?active=...`.
    pub async fn lotteries(&self, filter: StatusFilter) -> Result<Vec<Lottery>> {
        let endpoint = match filter.active_param() {
            Some(active) => Endpoint::ByStatus { active },
            None => Endpoint::All,
        };
        self.get_lotteries(endpoint).await
    }

    /// `GET /lotteries/description?description=...`.
    pub async fn search(&self, description: &str) -> Result<Vec<Lottery>> {
        self.get_lotteries(Endpoint::Search { description }).await
    }

    /// Listing used by the home page: server-side search when there is a
    /// query, then the status filter and substring match applied locally.
    pub async fn list(&self, filter: StatusFilter, query: &str) -> Result<Vec<Lottery>> {
        let query = query.trim();
        let lotteries = if query.is_empty() {
            self.lotteries(filter).await?
        } else {
            self.search(query).await?
        };
        Ok(filter_lotteries(&lotteries, filter, query, Utc::now()))
    }

    pub async fn lottery(&self, id: &str) -> Result<LotteryDetail> {
        self.get(Endpoint::ById(id)).await
    }

    /// Lotteries the address bought tickets for.
    pub async fn user_lotteries(&self, address: &str) -> Result<Vec<Lottery>> {
        self.get_lotteries(Endpoint::ByUser(address)).await
    }

    /// Lotteries the address created.
    pub async fn owner_lotteries(&self, address: &str) -> Result<Vec<Lottery>> {
        self.get_lotteries(Endpoint::ByOwner(address)).await
    }

    pub async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket> {
        let url = Endpoint::Tickets.url(&self.base_url);
        tracing::debug!("POST {}", url);
        let response = self.client.post(url).json(ticket).send().await?;
        read_json(response).await
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint<'_>) -> Result<T> {
        let url = endpoint.url(&self.base_url);
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        read_json(response).await
    }

    async fn get_lotteries(&self, endpoint: Endpoint<'_>) -> Result<Vec<Lottery>> {
        let records: Vec<Value> = self.get(endpoint).await?;
        Ok(decode_lotteries(records))
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(LottoError::Status { status: status.as_u16(), body });
    }
    Ok(serde_json::from_str(&body)?)
}

/// Keeps every record that passes validation; one bad row does not hide the
/// rest of the list.
pub fn decode_lotteries(records: Vec<Value>) -> Vec<Lottery> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Lottery>(record) {
            Ok(lottery) => Some(lottery),
            Err(e) => {
                tracing::warn!("skipping lottery record: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn record(id: &str, description: &str, end: &str, winner: &str) -> Value {
        json!({
            "id": id,
            "description": description,
            "ticketPrice": "1000",
            "winnerAddress": winner,
            "endDate": end,
        })
    }

    fn base(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn builds_routes() {
        let root = base("http://localhost:3000");
        assert_eq!(Endpoint::All.url(&root).as_str(), "http://localhost:3000/lotteries");
        assert_eq!(
            Endpoint::ByStatus { active: false }.url(&root).as_str(),
            "http://localhost:3000/lotteries/active?active=false"
        );
        assert_eq!(
            Endpoint::ById("65f1").url(&root).as_str(),
            "http://localhost:3000/lotteries/65f1"
        );
        assert_eq!(
            Endpoint::ByUser("0xAb").url(&root).as_str(),
            "http://localhost:3000/lotteries/user/0xAb"
        );
        assert_eq!(
            Endpoint::ByOwner("0xAb").url(&root).as_str(),
            "http://localhost:3000/lotteries/owner/0xAb"
        );
        assert_eq!(Endpoint::Tickets.url(&root).as_str(), "http://localhost:3000/tickets");
    }

    #[test]
    fn keeps_base_path_and_encodes_input() {
        let prefixed = base("https://lotto.example/api/");
        assert_eq!(
            Endpoint::Search { description: "big draw&more" }.url(&prefixed).as_str(),
            "https://lotto.example/api/lotteries/description?description=big+draw%26more"
        );
        assert_eq!(
            Endpoint::ById("a/b").url(&prefixed).as_str(),
            "https://lotto.example/api/lotteries/a%2Fb"
        );
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(LotteryApi::new("not a url").is_err());
        assert!(LotteryApi::new("mailto:someone@example.com").is_err());
        assert!(LotteryApi::new("http://localhost:3000").is_ok());
    }

    #[test]
    fn skips_invalid_records() {
        let lotteries = decode_lotteries(vec![
            json!({ "id": "1", "description": "ok", "ticketPrice": "1", "endDate": "2030-01-01T00:00:00Z" }),
            json!({ "id": "2", "description": "no date", "ticketPrice": "1" }),
            json!("garbage"),
        ]);
        assert_eq!(lotteries.len(), 1);
        assert_eq!(lotteries[0].id, "1");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let response = http::Response::builder().status(500).body("boom").unwrap();
        let result = read_json::<Value>(reqwest::Response::from(response)).await;
        match result {
            Err(LottoError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected a status error, got {other:?}"),
        }

        let response = http::Response::builder().status(200).body("[1, 2]").unwrap();
        let values: Vec<u8> = read_json(reqwest::Response::from(response)).await.unwrap();
        assert_eq!(values, [1, 2]);
    }

    #[tokio::test]
    async fn missing_lottery_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lotteries/404"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let api = LotteryApi::new(&server.uri()).unwrap();
        assert!(matches!(
            api.lottery("404").await,
            Err(LottoError::Status { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn list_searches_server_side_then_filters_locally() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lotteries/description"))
            .and(query_param("description", "draw"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                record("1", "Weekly Draw", "2099-01-01T00:00:00Z", ""),
                record("2", "Old draw", "2020-01-01T00:00:00Z", ""),
                record("3", "Monthly jackpot", "2099-01-01T00:00:00Z", ""),
                record("4", "Drawn already", "2020-01-01T00:00:00Z", "0x00000000000000000000000000000000000000aa"),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let api = LotteryApi::new(&server.uri()).unwrap();

        let active = api.list(StatusFilter::Active, "  draw ").await.unwrap();
        let ids: Vec<_> = active.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["1"]);
    }

    #[tokio::test]
    async fn list_without_query_asks_for_the_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lotteries/active"))
            .and(query_param("active", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                record("2", "Old draw", "2020-01-01T00:00:00Z", ""),
                record("4", "Drawn already", "2020-01-01T00:00:00Z", "0x00000000000000000000000000000000000000aa"),
                record("5", "Mislabelled", "2099-01-01T00:00:00Z", ""),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let api = LotteryApi::new(&server.uri()).unwrap();
        let ended = api.list(StatusFilter::Ended, "").await.unwrap();
        let ids: Vec<_> = ended.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["2", "4"]);
    }
}
