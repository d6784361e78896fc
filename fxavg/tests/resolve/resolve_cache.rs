use std::time::Duration;

use fxavg_mock::fixtures;

use crate::helpers::{P1, ok, script_nzd, two_providers};

#[tokio::test]
async fn cache_hit_makes_no_calls() {
    let (builder, ctl) = two_providers();
    script_nzd(&ctl).await;
    let fx = builder.build().unwrap();

    let first = fx.resolve("nzd", &["usd", "eur"]).await.unwrap();
    assert_eq!(ctl.request_count().await, 2);

    // Upstream changes are invisible while the entry is fresh.
    ctl.set_behavior(P1, ok(fixtures::latest_query("nzd", &[("usd", 9.9)])))
        .await;
    let second = fx.resolve("nzd", &["usd", "eur"]).await.unwrap();
    assert_eq!(ctl.request_count().await, 2);
    assert_eq!(first, second);
}

#[tokio::test]
async fn case_and_order_share_an_entry() {
    let (builder, ctl) = two_providers();
    script_nzd(&ctl).await;
    let fx = builder.build().unwrap();

    let a = fx.resolve("NZD", &["USD", "eur"]).await.unwrap();
    let b = fx.resolve("nzd", &["EUR", "usd", "Usd"]).await.unwrap();
    assert_eq!(a, b);
    assert_eq!(ctl.request_count().await, 2);

    let _ = fx.resolve("nzd", &["usd"]).await.unwrap();
    assert_eq!(ctl.request_count().await, 4);
}

#[tokio::test]
async fn ttl_expiration_causes_refetch() {
    let (builder, ctl) = two_providers();
    script_nzd(&ctl).await;
    let fx = builder
        .cache_ttl(Duration::from_millis(50))
        .build()
        .unwrap();

    let _ = fx.resolve("nzd", &["usd"]).await.unwrap(); // miss -> fetch
    assert_eq!(ctl.request_count().await, 2);
    let _ = fx.resolve("nzd", &["usd"]).await.unwrap(); // hit
    assert_eq!(ctl.request_count().await, 2);
    tokio::time::sleep(Duration::from_millis(60)).await;
    let _ = fx.resolve("nzd", &["usd"]).await.unwrap(); // expired -> refetch
    assert_eq!(ctl.request_count().await, 4);
}

#[tokio::test]
async fn ttl_zero_disables_caching() {
    let (builder, ctl) = two_providers();
    script_nzd(&ctl).await;
    let fx = builder.cache_ttl(Duration::ZERO).build().unwrap();

    let _ = fx.resolve("nzd", &["usd"]).await.unwrap();
    let _ = fx.resolve("nzd", &["usd"]).await.unwrap();
    assert_eq!(ctl.request_count().await, 4);
}
