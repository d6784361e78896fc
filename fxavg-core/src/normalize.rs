use std::collections::BTreeSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};

use crate::types::{ProviderResult, RateMap};

/// Map a raw provider payload onto the requested symbols.
///
/// Two payload shapes are recognized, in order:
/// 1. a top-level `rates` object;
/// 2. an object stored under the lowercased base currency.
///
/// Anything else yields an empty result. Only entries whose lowercased code is
/// in `symbols` and whose value is a JSON number are kept. `symbols` is
/// expected to be lowercase already, as produced by [`crate::RateQuery`].
#[must_use]
pub fn normalize(base: &str, symbols: &BTreeSet<String>, payload: &Value) -> ProviderResult {
    let base = base.to_lowercase();
    let rates = select_rates(&base, payload)
        .map(|obj| filter_rates(symbols, obj))
        .unwrap_or_default();
    ProviderResult { base, rates }
}

fn select_rates<'a>(base: &str, payload: &'a Value) -> Option<&'a Map<String, Value>> {
    payload
        .get("rates")
        .and_then(Value::as_object)
        .or_else(|| payload.get(base).and_then(Value::as_object))
}

fn filter_rates(symbols: &BTreeSet<String>, obj: &Map<String, Value>) -> RateMap {
    obj.iter()
        .filter_map(|(code, value)| {
            let code = code.to_lowercase();
            if !symbols.contains(&code) {
                return None;
            }
            let rate = value.as_number().and_then(to_decimal)?;
            Some((code, rate))
        })
        .collect()
}

// serde_json prints floats in their shortest round-trip form, so `1.2` stays
// `1.2` rather than the binary expansion of the f64.
fn to_decimal(n: &Number) -> Option<Decimal> {
    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
