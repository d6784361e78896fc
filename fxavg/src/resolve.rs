use fxavg_core::endpoint::request_url;
use fxavg_core::{
    AggregatedRates, FxError, ProviderResult, RateQuery, aggregate_with, normalize,
};
use futures::future::join_all;
use serde_json::Value;

use crate::core::{FxAvg, ProviderRoute};

impl FxAvg {
    /// Average rates from `base` to each of `symbols` across all providers.
    ///
    /// Codes are case-folded and symbol order is irrelevant. A fresh cached
    /// result is returned without touching the network; otherwise every
    /// provider is queried concurrently and the averaged result is cached.
    ///
    /// A currency appears in the result only if at least one provider reported
    /// it, so the result can be empty when providers answered but knew none of
    /// the requested symbols.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a blank base or an empty symbol list, and
    /// `NoDataAvailable` when no provider returned any payload at all.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "fxavg::resolve",
            skip(self, symbols),
            fields(base = base, symbols = symbols.len()),
        )
    )]
    pub async fn resolve<S: AsRef<str>>(
        &self,
        base: &str,
        symbols: &[S],
    ) -> Result<AggregatedRates, FxError> {
        let query = RateQuery::new(base, symbols)?;
        let rates = self
            .cache
            .get_or_try_insert_with(query.cache_key(), self.fan_out(&query))
            .await?;
        Ok(AggregatedRates::clone(&rates))
    }

    async fn fan_out(&self, query: &RateQuery) -> Result<AggregatedRates, FxError> {
        let tasks = self.routes.iter().map(|route| self.fetch_route(route, query));
        let payloads: Vec<Option<Value>> = join_all(tasks).await;

        if payloads.iter().all(Option::is_none) {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                key = %query.cache_key(),
                providers = self.routes.len(),
                "no provider returned a payload"
            );
            return Err(FxError::no_data(query.base()));
        }

        let results: Vec<ProviderResult> = payloads
            .iter()
            .map(|payload| match payload {
                Some(v) => normalize(query.base(), query.symbols(), v),
                None => ProviderResult::empty(query.base()),
            })
            .collect();

        Ok(aggregate_with(
            query.base(),
            query.symbols(),
            &results,
            self.cfg.mean_strategy,
        ))
    }

    async fn fetch_route(&self, route: &ProviderRoute, query: &RateQuery) -> Option<Value> {
        let primary = match request_url(route.cfg.style, &route.primary, query) {
            Ok(u) => u,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(provider = %route.cfg.name, error = %_e, "cannot build request url");
                return None;
            }
        };
        let fallback = route
            .fallback
            .as_ref()
            .and_then(|base| request_url(route.cfg.style, base, query).ok());
        self.fetcher
            .fetch(primary.as_str(), fallback.as_ref().map(url::Url::as_str))
            .await
    }
}
