use std::time::Duration;

use fxavg::FxError;
use fxavg_mock::{MockBehavior, fixtures};

use crate::helpers::{P1, P2, P2_BACKUP, down, ok, script_nzd, two_providers};

#[tokio::test]
async fn partial_failure_degrades_to_remaining_provider() {
    let (builder, ctl) = two_providers();
    ctl.set_behavior(P1, ok(fixtures::latest_query("nzd", &[("usd", 1.2)])))
        .await;
    ctl.set_behavior(P2, down(P2)).await;
    ctl.set_behavior(P2_BACKUP, down(P2_BACKUP)).await;
    let fx = builder.build().unwrap();

    let out = fx.resolve("nzd", &["usd"]).await.unwrap();
    assert_eq!(out.rates["usd"].to_string(), "1.200000");
    assert_eq!(ctl.request_count().await, 3);
}

#[tokio::test]
async fn total_failure_is_an_error_and_not_cached() {
    let (builder, ctl) = two_providers();
    ctl.set_behavior(P1, down(P1)).await;
    ctl.set_behavior(P2, down(P2)).await;
    ctl.set_behavior(P2_BACKUP, down(P2_BACKUP)).await;
    let fx = builder.build().unwrap();

    let err = fx.resolve("NZD", &["usd"]).await.unwrap_err();
    assert_eq!(err, FxError::no_data("nzd"));
    assert_eq!(ctl.request_count().await, 3);

    // Recovery is picked up on the very next call.
    script_nzd(&ctl).await;
    let out = fx.resolve("nzd", &["usd"]).await.unwrap();
    assert_eq!(out.rates["usd"].to_string(), "1.300000");
    assert_eq!(ctl.request_count().await, 5);
}

#[tokio::test]
async fn fallback_payload_is_used_when_primary_fails() {
    let (builder, ctl) = two_providers();
    ctl.set_behavior(P1, ok(fixtures::latest_query("nzd", &[("usd", 1.2)])))
        .await;
    ctl.set_behavior(
        P2,
        MockBehavior::Fail(FxError::Status {
            url: P2.into(),
            status: 503,
        }),
    )
    .await;
    ctl.set_behavior(
        P2_BACKUP,
        ok(fixtures::currency_file("nzd", &[("usd", 1.4)])),
    )
    .await;
    let fx = builder.build().unwrap();

    let out = fx.resolve("nzd", &["usd"]).await.unwrap();
    assert_eq!(out.rates["usd"].to_string(), "1.300000");
    assert_eq!(ctl.requests_to(P2_BACKUP).await, 1);
}

#[tokio::test(start_paused = true)]
async fn hanging_provider_times_out_without_blocking_others() {
    let (builder, ctl) = two_providers();
    ctl.set_behavior(P1, ok(fixtures::latest_query("nzd", &[("usd", 1.2)])))
        .await;
    ctl.set_behavior(P2, MockBehavior::Hang).await;
    ctl.set_behavior(P2_BACKUP, MockBehavior::Hang).await;
    let fx = builder
        .provider_timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let out = fx.resolve("nzd", &["usd"]).await.unwrap();
    assert_eq!(out.rates["usd"].to_string(), "1.200000");
    assert_eq!(ctl.requests_to(P2).await, 1);
    assert_eq!(ctl.requests_to(P2_BACKUP).await, 1);
}
