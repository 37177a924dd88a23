//! Fetch recent orders
//!
//! Reads `WB_*` settings (and `.env`), then lists yesterday's orders from the
//! statistics API, the new fulfilment orders from the marketplace API and
//! the FBS orders of the last week.
//! Ctrl-C abandons any call that is waiting on the rate limiter or a retry.
//!
//! ```sh
//! WB_API_TOKEN=... cargo run --example fetch_orders
//! ```

use chrono::{Duration as ChronoDuration, Utc};
use serde_json::{json, Value};

use seller_sdk::services::{OrderStatus, OrdersQuery};
use seller_sdk::{init_logging, shutdown_channel, SellerApi, SellerApiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = SellerApiConfig::from_env()?;
    init_logging(&config.logging_config())?;

    let (trigger, shutdown) = shutdown_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.trigger();
        }
    });

    let api = SellerApi::with_shutdown(&config, shutdown)?;

    let date_from = (Utc::now() - ChronoDuration::days(1)).format("%Y-%m-%d").to_string();
    let orders: Vec<Value> = api
        .statistics()
        .get("/api/v1/supplier/orders", &json!({ "dateFrom": date_from }))
        .await?;
    println!("Orders since {}: {}", date_from, orders.len());

    match api.marketplace().get::<Value, _>("/api/v3/orders/new", &()).await {
        Ok(body) => {
            let count = body["orders"].as_array().map_or(0, Vec::len);
            println!("New fulfilment orders: {}", count);
        }
        Err(err) => match err.as_api_error() {
            Some(api_error) => println!("Marketplace call failed: {}", api_error.report()),
            None => return Err(err.into()),
        },
    }

    let fbs = api
        .orders()
        .list(&OrdersQuery {
            date_from: (Utc::now() - ChronoDuration::days(7)).format("%Y-%m-%d").to_string(),
            date_to: Utc::now().format("%Y-%m-%d").to_string(),
            status: Some(OrderStatus::Confirm),
            take: Some(100),
            skip: None,
        })
        .await?;
    println!("Confirmed FBS orders this week: {}", fbs.len());

    let status = api.rate_limiter().status();
    println!(
        "Rate limit: {}/{} requests in the current window",
        status.current_count, status.max_requests
    );

    Ok(())
}
