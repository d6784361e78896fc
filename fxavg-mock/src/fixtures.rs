//! Payloads shaped like the two supported provider styles.

use serde_json::{Map, Value, json};

/// Date stamped on fixture payloads.
pub const FIXTURE_DATE: &str = "2025-06-04";

fn rate_object(pairs: &[(&str, f64)], upper: bool) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(code, rate)| {
            let code = if upper {
                code.to_uppercase()
            } else {
                code.to_lowercase()
            };
            (code, json!(rate))
        })
        .collect()
}

/// A `latest`-style payload: `{"amount": 1.0, "base": "USD", "date": .., "rates": {"EUR": ..}}`.
#[must_use]
pub fn latest_query(base: &str, pairs: &[(&str, f64)]) -> Value {
    json!({
        "amount": 1.0,
        "base": base.to_uppercase(),
        "date": FIXTURE_DATE,
        "rates": rate_object(pairs, true),
    })
}

/// A per-currency file payload: `{"date": .., "usd": {"eur": ..}}`.
#[must_use]
pub fn currency_file(base: &str, pairs: &[(&str, f64)]) -> Value {
    let mut out = Map::new();
    out.insert("date".into(), json!(FIXTURE_DATE));
    out.insert(base.to_lowercase(), Value::Object(rate_object(pairs, false)));
    Value::Object(out)
}
