use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::{Decimal, RoundingStrategy};

use crate::MeanStrategy;
use crate::types::{AggregatedRates, ProviderResult};

/// Decimal places kept in averaged rates.
pub const RATE_SCALE: u32 = 6;

/// Average per-provider rates using [`MeanStrategy::ReportingProviders`].
///
/// Results with empty `rates` do not count as contributors. If none of the
/// results contributed anything, the aggregate is empty.
#[must_use]
pub fn aggregate(base: &str, symbols: &BTreeSet<String>, results: &[ProviderResult]) -> AggregatedRates {
    aggregate_with(base, symbols, results, MeanStrategy::ReportingProviders)
}

/// Average per-provider rates with an explicit divisor policy.
///
/// Every mean is rounded half-up to [`RATE_SCALE`] places and carries exactly
/// that scale, so `1.3` is reported as `1.300000`. Summation is exact, so the
/// order of `results` does not affect the output. A currency whose sum does
/// not fit in a `Decimal` is left out of the result.
#[must_use]
pub fn aggregate_with(
    base: &str,
    symbols: &BTreeSet<String>,
    results: &[ProviderResult],
    strategy: MeanStrategy,
) -> AggregatedRates {
    let provider_count = results.iter().filter(|r| !r.is_empty()).count();
    if provider_count == 0 {
        return AggregatedRates::empty(base);
    }

    // `None` marks a currency whose sum overflowed `Decimal`.
    let mut sums: BTreeMap<String, (Option<Decimal>, usize)> = BTreeMap::new();
    for result in results {
        for (code, rate) in &result.rates {
            if !symbols.contains(code) {
                continue;
            }
            let slot = sums.entry(code.clone()).or_insert((Some(Decimal::ZERO), 0));
            slot.0 = slot.0.and_then(|sum| sum.checked_add(*rate));
            slot.1 += 1;
        }
    }

    let rates = sums
        .into_iter()
        .filter_map(|(code, (sum, reporters))| {
            let Some(sum) = sum else {
                #[cfg(feature = "tracing")]
                tracing::warn!(currency = %code, "rate sum overflowed; currency dropped");
                return None;
            };
            let divisor = match strategy {
                MeanStrategy::ReportingProviders => provider_count,
                MeanStrategy::PerCurrency => reporters,
            };
            Some((code, mean(sum, divisor)))
        })
        .collect();

    AggregatedRates {
        base: base.to_string(),
        rates,
    }
}

fn mean(sum: Decimal, count: usize) -> Decimal {
    let mut avg = (sum / Decimal::from(count))
        .round_dp_with_strategy(RATE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    avg.rescale(RATE_SCALE);
    avg
}
