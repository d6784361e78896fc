use std::str::FromStr;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use fxavg::{Decimal, FxAvg, FxError, MeanStrategy};
use fxavg_mock::fixtures;

use crate::helpers::{P1, P2, counting, ok, p1, p2, script_nzd, two_providers};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[tokio::test]
async fn averages_both_payload_shapes() {
    let (builder, ctl) = two_providers();
    script_nzd(&ctl).await;
    let fx = builder.build().unwrap();

    let out = fx.resolve("NZD", &["USD", "EUR"]).await.unwrap();
    assert_eq!(out.base, "nzd");
    assert_eq!(out.rates.len(), 2);
    assert_eq!(out.rates["usd"].to_string(), "1.300000");
    assert_eq!(out.rates["eur"].to_string(), "1.000000");
    assert!(!out.rates.contains_key("jpy"));

    let requests = ctl.requests().await;
    assert_eq!(requests.len(), 2);
    assert!(
        requests
            .iter()
            .any(|u| u.starts_with("http://p1.test/latest?base=NZD&symbols=EUR%2CUSD"))
    );
    assert!(requests.contains(&"http://p2.test/currencies/nzd.json".to_string()));
}

#[tokio::test]
async fn currency_reported_by_one_provider_is_still_present() {
    let (builder, ctl) = two_providers();
    ctl.set_behavior(P1, ok(fixtures::latest_query("usd", &[("eur", 0.9)])))
        .await;
    ctl.set_behavior(P2, ok(fixtures::currency_file("usd", &[("gbp", 0.8)])))
        .await;
    let fx = builder.build().unwrap();

    let out = fx.resolve("usd", &["eur", "gbp", "chf"]).await.unwrap();
    assert_eq!(out.rates.len(), 2);
    assert!(out.rate("chf").is_none());
    // Two contributing providers, each currency reported once.
    assert_eq!(out.rate("eur"), Some(dec("0.450000")));
    assert_eq!(out.rate("gbp"), Some(dec("0.400000")));
}

#[tokio::test]
async fn per_currency_mean_divides_by_reporters() {
    let (builder, ctl) = two_providers();
    ctl.set_behavior(P1, ok(fixtures::latest_query("usd", &[("eur", 0.9)])))
        .await;
    ctl.set_behavior(P2, ok(fixtures::currency_file("usd", &[("gbp", 0.8)])))
        .await;
    let fx = builder
        .mean_strategy(MeanStrategy::PerCurrency)
        .build()
        .unwrap();

    let out = fx.resolve("usd", &["eur", "gbp"]).await.unwrap();
    assert_eq!(out.rate("eur"), Some(dec("0.900000")));
    assert_eq!(out.rate("gbp"), Some(dec("0.800000")));
}

#[tokio::test]
async fn payloads_without_requested_symbols_give_empty_rates() {
    let (builder, ctl) = two_providers();
    ctl.set_behavior(P1, ok(fixtures::latest_query("usd", &[("gbp", 0.75)])))
        .await;
    ctl.set_behavior(P2, ok(serde_json::json!({ "unexpected": true })))
        .await;
    let fx = builder.build().unwrap();

    let out = fx.resolve("usd", &["usd"]).await.unwrap();
    assert_eq!(out.base, "usd");
    assert!(out.rates.is_empty());
}

#[tokio::test]
async fn invalid_queries_never_reach_providers() {
    let count = Arc::new(AtomicUsize::new(0));
    let transport = counting(count.clone(), |_| Ok(serde_json::json!({})));
    let fx = FxAvg::builder()
        .with_provider(p1())
        .with_provider(p2())
        .with_transport(transport)
        .build()
        .unwrap();

    assert!(matches!(
        fx.resolve("", &["eur"]).await,
        Err(FxError::InvalidArg(_))
    ));
    assert!(matches!(
        fx.resolve("usd", &[] as &[&str]).await,
        Err(FxError::InvalidArg(_))
    ));
    assert!(matches!(
        fx.resolve("usd", &[" "]).await,
        Err(FxError::InvalidArg(_))
    ));
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn overflowing_provider_values_do_not_break_resolve() {
    let (builder, ctl) = two_providers();
    ctl.set_behavior(
        P1,
        ok(serde_json::json!({ "rates": { "EUR": 5e28, "USD": 1e300, "GBP": 0.8 } })),
    )
    .await;
    ctl.set_behavior(P2, ok(serde_json::json!({ "nzd": { "eur": 5e28, "gbp": 0.6 } })))
        .await;
    let fx = builder.build().unwrap();

    let out = fx.resolve("nzd", &["eur", "usd", "gbp"]).await.unwrap();
    assert_eq!(out.rates.len(), 1);
    assert_eq!(out.rate("gbp"), Some(dec("0.700000")));
}
