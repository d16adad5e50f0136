use std::time::Duration;

use anyhow::{anyhow, Context};
use chrono::Utc;
use futures::future::join_all;
use lotto_api::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();
    let api = LotteryApi::new(&config.api_base_url)?;

    match std::env::var("COMMAND")
        .context("Missing COMMAND env var")?
        .as_str()
    {
        "config" => {
            log_config(&config);
        }
        "lotteries" => {
            log_lotteries(&api).await?;
        }
        "lottery" => {
            log_lottery(&api).await?;
        }
        "mine" => {
            log_mine(&api).await?;
        }
        "create" => {
            create(&config).await?;
        }
        "buy" => {
            buy(&api, &config).await?;
        }
        "launch" => {
            launch(&config).await?;
        }
        "ticket" => {
            ticket(&api).await?;
        }
        "watch" => {
            watch(&config).await?;
        }
        other => return Err(anyhow!("Invalid command {other:?}")),
    };

    Ok(())
}

fn env(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("Missing {name} env var"))
}

fn log_config(config: &Config) {
    println!("Config");
    println!("  api:              {}", config.api_base_url);
    println!("  rpc:              {}", config.rpc_url);
    println!("  contract:         {}", config.contract_address);
    println!(
        "  abi override:     {}",
        if config.contract_abi.is_some() { "yes" } else { "no" }
    );
    println!("  explorer:         {}", config.explorer_api_url);
    println!("  poll interval:    {:?}", config.poll_interval);
    println!("  check failures:   {}", config.max_check_failures);
}

async fn log_lotteries(api: &LotteryApi) -> anyhow::Result<()> {
    let filter = match std::env::var("FILTER").unwrap_or_default().as_str() {
        "" | "all" => StatusFilter::All,
        "active" => StatusFilter::Active,
        "ended" => StatusFilter::Ended,
        other => return Err(anyhow!("Invalid FILTER {other:?}, expected all|active|ended")),
    };
    let query = std::env::var("QUERY").unwrap_or_default();

    let lotteries = api.list(filter, &query).await?;
    if lotteries.is_empty() {
        println!("No lotteries found.");
        return Ok(());
    }
    print_lotteries(&lotteries);
    Ok(())
}

fn print_lotteries(lotteries: &[Lottery]) {
    let now = Utc::now();
    for lottery in lotteries {
        println!(
            "{:<12} {:<16} {:>12} ETH  ends {}  {}",
            lottery.onchain_id(),
            lottery.status_at(now).label(),
            format_ether(lottery.ticket_price),
            format_date(&lottery.end_date),
            lottery.description,
        );
    }
}

async fn log_lottery(api: &LotteryApi) -> anyhow::Result<()> {
    let id = env("ID")?;
    let caller = match std::env::var("ADDRESS") {
        Ok(address) => Some(
            address
                .parse::<Address>()
                .with_context(|| format!("Invalid ADDRESS {address:?}"))?,
        ),
        Err(_) => None,
    };
    let LotteryDetail { lottery, total_tickets } = api.lottery(&id).await?;
    let now = Utc::now();

    println!("Lottery");
    println!("  id:               {}", lottery.id);
    println!("  on-chain id:      {}", lottery.onchain_id());
    println!("  description:      {}", lottery.description);
    println!("  price:            {} ETH", format_ether(lottery.ticket_price));
    println!("  ends:             {}", format_date_time(&lottery.end_date));
    println!("  status:           {}", lottery.status_at(now).label());
    println!("  tickets:          {}", total_tickets);
    println!("  owner:            {}", address_or_dash(lottery.owner));
    println!("  winner:           {}", address_or_dash(lottery.winner_address));
    if let Some(caller) = caller.as_ref() {
        println!(
            "  can launch:       {}",
            lottery.can_launch(total_tickets, Some(caller), now)
        );
    }
    Ok(())
}

fn address_or_dash(address: Option<Address>) -> String {
    address.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string())
}

async fn log_mine(api: &LotteryApi) -> anyhow::Result<()> {
    let address = env("ADDRESS")?;

    // Both lists load independently; one failing does not hide the other.
    let (created, participated) = tokio::join!(
        api.owner_lotteries(&address),
        api.user_lotteries(&address)
    );

    for (title, result, empty) in [
        ("Created", created, "You haven't created any lotteries yet."),
        ("Participated", participated, "You haven't participated in any lotteries yet."),
    ] {
        println!("{title}");
        match result {
            Ok(lotteries) if lotteries.is_empty() => println!("  {empty}"),
            Ok(lotteries) => print_lotteries(&lotteries),
            Err(e) => println!("  failed to load: {e}"),
        }
        println!();
    }
    Ok(())
}

fn print_call(call: &ContractCall) {
    println!("Contract call");
    println!("  to:               {}", call.to);
    println!("  function:         {}", call.function);
    println!("  value:            {} ({} ETH)", call.value_hex(), format_ether(call.value));
    println!("  data:             {}", call.data_hex());
}

async fn create(config: &Config) -> anyhow::Result<()> {
    let form = CreateLotteryForm {
        description: env("DESCRIPTION")?,
        ticket_price: std::env::var("PRICE").unwrap_or_default(),
        end_date: env("END_DATE")?,
    };
    let lottery = form.validate(true, Utc::now())?;
    let contract = LotteryContract::from_config(config)?;
    let call = contract.create_lottery(lottery.end_date, lottery.ticket_price, &lottery.description)?;
    print_call(&call);
    Ok(())
}

async fn buy(api: &LotteryApi, config: &Config) -> anyhow::Result<()> {
    let id = env("ID")?;
    let LotteryDetail { lottery, .. } = api.lottery(&id).await?;
    if !lottery.is_active_at(Utc::now()) {
        return Err(anyhow!("Lottery {} is {}", id, lottery.status().label()));
    }
    let contract = LotteryContract::from_config(config)?;
    print_call(&contract.buy_ticket(&lottery)?);
    Ok(())
}

async fn launch(config: &Config) -> anyhow::Result<()> {
    let id = env("ID")?;
    let contract = LotteryContract::from_config(config)?;
    print_call(&contract.launch_lottery(&id)?);
    Ok(())
}

async fn ticket(api: &LotteryApi) -> anyhow::Result<()> {
    let ticket = NewTicket { lottery_id: env("ID")?, buyer: env("BUYER")? };
    let created = api.create_ticket(&ticket).await?;
    println!("Ticket {} recorded for {}", created.id, created.buyer);
    Ok(())
}

async fn watch(config: &Config) -> anyhow::Result<()> {
    let hashes: Vec<String> = env("TX_HASH")?
        .split(',')
        .map(|hash| hash.trim().to_string())
        .filter(|hash| !hash.is_empty())
        .collect();
    if hashes.is_empty() {
        return Err(anyhow!("TX_HASH is empty"));
    }

    match std::env::var("RECEIPT_SOURCE").unwrap_or_default().as_str() {
        "" | "rpc" => watch_with(RpcReceiptCheck::new(&config.rpc_url), config, hashes).await,
        "explorer" => {
            let check = ExplorerReceiptCheck::new(&config.explorer_api_url, &config.explorer_api_key);
            watch_with(check, config, hashes).await
        }
        other => Err(anyhow!("Invalid RECEIPT_SOURCE {other:?}, expected rpc|explorer")),
    }
}

/// One poll loop feeds every watched hash through the push hub.
async fn watch_with<C: ReceiptCheck>(
    check: C,
    config: &Config,
    hashes: Vec<String>,
) -> anyhow::Result<()> {
    let feed = PushAdapter::new();
    let subscriptions = hashes
        .iter()
        .map(|hash| {
            let subscription = feed.subscribe(hash);
            let hash = hash.clone();
            async move { (hash, subscription.await) }
        })
        .collect::<Vec<_>>();

    let sleep = |duration: Duration| tokio::time::sleep(duration);
    let poller = PollAdapter::new(check, sleep, config.poll_interval)
        .with_max_failures(config.max_check_failures);
    tracing::debug!("polling every {:?}", config.poll_interval);
    println!("Waiting for {} transaction(s)...", hashes.len());
    let ((), outcomes) = tokio::join!(poller.relay(&feed, hashes), join_all(subscriptions));

    let mut failed = 0;
    for (hash, outcome) in outcomes {
        match outcome {
            Ok(TxOutcome::Success) => println!("  {hash}: confirmed"),
            Ok(TxOutcome::Reverted) => {
                failed += 1;
                println!("  {hash}: reverted");
            }
            Err(e) => {
                failed += 1;
                println!("  {hash}: {e}");
            }
        }
    }
    if failed > 0 {
        return Err(anyhow!("{failed} transaction(s) failed"));
    }
    Ok(())
}
