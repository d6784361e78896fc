//! Domain types flowing through the resolution pipeline.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::FxError;

/// Lowercased currency code to rate.
pub type RateMap = BTreeMap<String, Decimal>;

/// A validated request for the rates from `base` to each of `symbols`.
///
/// Codes are trimmed and lowercased on construction; duplicate symbols
/// collapse. The symbol set is kept sorted, which makes the cache key
/// independent of the caller's ordering and casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateQuery {
    base: String,
    symbols: BTreeSet<String>,
}

impl RateQuery {
    /// Build a query from raw caller input.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `base` is blank or no non-blank symbol is given.
    pub fn new<S: AsRef<str>>(base: &str, symbols: &[S]) -> Result<Self, FxError> {
        let base = base.trim().to_lowercase();
        if base.is_empty() {
            return Err(FxError::invalid_arg("base currency must not be empty"));
        }
        let symbols: BTreeSet<String> = symbols
            .iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if symbols.is_empty() {
            return Err(FxError::invalid_arg("at least one symbol is required"));
        }
        Ok(Self { base, symbols })
    }

    /// Lowercased base currency.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Lowercased, sorted target currencies.
    #[must_use]
    pub const fn symbols(&self) -> &BTreeSet<String> {
        &self.symbols
    }

    /// Canonical cache key: `base:sym1,sym2,...`.
    #[must_use]
    pub fn cache_key(&self) -> CacheKey {
        let joined = self
            .symbols
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");
        CacheKey(format!("{}:{joined}", self.base))
    }
}

/// Canonical string identity of a [`RateQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Borrow the canonical form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&RateQuery> for CacheKey {
    fn from(q: &RateQuery) -> Self {
        q.cache_key()
    }
}

/// Rates reported by a single provider, restricted to the requested symbols.
///
/// An empty `rates` map means the provider answered but had nothing usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderResult {
    /// Lowercased base currency.
    pub base: String,
    /// Requested currency code to rate.
    pub rates: RateMap,
}

impl ProviderResult {
    /// Result with no usable rates.
    pub fn empty(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            rates: RateMap::new(),
        }
    }

    /// True when the provider contributed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Cross-provider mean rates, each rounded to six decimal places.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedRates {
    /// Base currency the rates are expressed against.
    pub base: String,
    /// Target currency code to averaged rate.
    pub rates: RateMap,
}

impl AggregatedRates {
    /// Aggregate with no rates.
    pub fn empty(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            rates: RateMap::new(),
        }
    }

    /// Rate for a currency code, if any provider reported it.
    #[must_use]
    pub fn rate(&self, code: &str) -> Option<Decimal> {
        self.rates.get(code).copied()
    }
}
