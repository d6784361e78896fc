use std::sync::Arc;

use fxavg::{FxAvg, ProviderConfig, ProviderStyle, Transport};
use fxavg_mock::{MockBehavior, MockTransport, fixtures};
use tracing_subscriber::EnvFilter;

const FRANKFURTER: &str = "https://api.frankfurter.app";
const CURRENCY_API: &str = "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1";
const CURRENCY_API_FALLBACK: &str = "https://latest.currency-api.pages.dev/v1";

async fn get_transport() -> Option<Arc<dyn Transport>> {
    if std::env::var("FXAVG_EXAMPLES_USE_MOCK").is_err() {
        return None;
    }
    println!("--- (Using Mock Transport for CI) ---");
    let (transport, ctl) = MockTransport::new_with_controller();
    ctl.set_behavior(
        FRANKFURTER,
        MockBehavior::Return(fixtures::latest_query("nzd", &[("usd", 0.5912), ("eur", 0.5407)])),
    )
    .await;
    ctl.set_behavior(
        CURRENCY_API,
        MockBehavior::Return(fixtures::currency_file(
            "nzd",
            &[("usd", 0.59134), ("eur", 0.54081)],
        )),
    )
    .await;
    Some(transport)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=fxavg=debug shows fallback and cache decisions when built with `--features tracing`.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 1. Describe the providers.
    let mut builder = FxAvg::builder()
        .with_provider(ProviderConfig::new(
            "frankfurter",
            FRANKFURTER,
            ProviderStyle::LatestQuery,
        ))
        .with_provider(
            ProviderConfig::new("currency-api", CURRENCY_API, ProviderStyle::CurrencyFile)
                .with_fallback(CURRENCY_API_FALLBACK),
        );

    // 2. Swap in the mock transport in CI, otherwise use real HTTP.
    if let Some(transport) = get_transport().await {
        builder = builder.with_transport(transport);
    }
    let fx = builder.build()?;

    // 3. Resolve twice; the second call is served from the cache.
    let rates = fx.resolve("NZD", &["USD", "EUR"]).await?;
    println!("{}", serde_json::to_string_pretty(&rates)?);
    let again = fx.resolve("nzd", &["eur", "usd"]).await?;
    assert_eq!(rates, again);

    // 4. Inspect call counters.
    println!("{}", serde_json::to_string_pretty(&fx.metrics())?);

    Ok(())
}
