use url::Url;

use crate::types::RateQuery;
use crate::{FxError, ProviderStyle};

/// Parse and validate a configured provider base URL.
///
/// # Errors
/// Returns `InvalidArg` for unparsable URLs, non-HTTP(S) schemes, and URLs
/// that cannot carry a path.
pub fn parse_base_url(raw: &str) -> Result<Url, FxError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| FxError::invalid_arg(format!("invalid provider url {raw:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(FxError::invalid_arg(format!(
            "provider url must be an http(s) base url: {raw:?}"
        )));
    }
    Ok(url)
}

/// Canonical prefix of a base URL, without a trailing slash.
///
/// Every request URL built by [`request_url`] from `base` starts with this
/// prefix.
#[must_use]
pub fn url_prefix(base: &Url) -> &str {
    base.as_str().trim_end_matches('/')
}

/// Build the request URL for `query` against one provider base URL.
///
/// # Errors
/// Returns `InvalidArg` if `base` cannot carry a path.
pub fn request_url(style: ProviderStyle, base: &Url, query: &RateQuery) -> Result<Url, FxError> {
    let mut url = base.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| FxError::invalid_arg(format!("provider url cannot be a base: {base}")))?;
        segments.pop_if_empty();
        match style {
            ProviderStyle::LatestQuery => {
                segments.push("latest");
            }
            ProviderStyle::CurrencyFile => {
                segments
                    .push("currencies")
                    .push(&format!("{}.json", query.base()));
            }
        }
    }
    if style == ProviderStyle::LatestQuery {
        let symbols = query
            .symbols()
            .iter()
            .map(|s| s.to_uppercase())
            .collect::<Vec<_>>()
            .join(",");
        url.query_pairs_mut()
            .append_pair("base", &query.base().to_uppercase())
            .append_pair("symbols", &symbols);
    }
    Ok(url)
}
