#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use fxavg::{FxAvg, FxAvgBuilder, FxError, ProviderConfig, ProviderStyle, Transport};
use fxavg_mock::{MockBehavior, MockTransport, MockTransportController, fixtures};
use serde_json::Value;

pub const P1: &str = "http://p1.test";
pub const P2: &str = "http://p2.test";
pub const P2_BACKUP: &str = "http://p2-backup.test";
pub const P3: &str = "http://p3.test";

/// `latest`-style provider named `p1`.
pub fn p1() -> ProviderConfig {
    ProviderConfig::new("p1", P1, ProviderStyle::LatestQuery)
}

/// Currency-file provider named `p2` with a fallback host.
pub fn p2() -> ProviderConfig {
    ProviderConfig::new("p2", P2, ProviderStyle::CurrencyFile).with_fallback(P2_BACKUP)
}

/// Currency-file provider named `p3` without a fallback.
pub fn p3() -> ProviderConfig {
    ProviderConfig::new("p3", P3, ProviderStyle::CurrencyFile)
}

pub fn ok(payload: Value) -> MockBehavior {
    MockBehavior::Return(payload)
}

pub fn down(url: &str) -> MockBehavior {
    MockBehavior::Fail(FxError::transport(url, "connection refused"))
}

/// Builder wired to a fresh mock transport with providers `p1` and `p2`.
pub fn two_providers() -> (FxAvgBuilder, MockTransportController) {
    let (transport, ctl) = MockTransport::new_with_controller();
    let builder = FxAvg::builder()
        .with_provider(p1())
        .with_provider(p2())
        .with_transport(transport);
    (builder, ctl)
}

/// Script `p1` and `p2` with the NZD -> {usd, eur} example payloads.
pub async fn script_nzd(ctl: &MockTransportController) {
    ctl.set_behavior(
        P1,
        ok(fixtures::latest_query("nzd", &[("usd", 1.2), ("eur", 0.9), ("jpy", 90.0)])),
    )
    .await;
    ctl.set_behavior(
        P2,
        ok(fixtures::currency_file("nzd", &[("usd", 1.4), ("eur", 1.1)])),
    )
    .await;
}

/// Transport that counts calls and delegates to a closure.
pub fn counting<F>(count: Arc<AtomicUsize>, f: F) -> Arc<dyn Transport>
where
    F: Fn(&str) -> Result<Value, FxError> + Send + Sync + 'static,
{
    <dyn Transport>::from_fn(move |url| {
        count.fetch_add(1, Ordering::SeqCst);
        f(url)
    })
}
