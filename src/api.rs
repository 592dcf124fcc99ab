//! Synchronous client for the **chain stats** endpoint.
//!
//! One request returns every metric for a chain:
//! `GET {base}/api/chain-stats/{chainId}?timeRange=all`. The response is an object keyed
//! by metric (`{ "txCount": { "data": [{date, value}] }, ... }`); `activeAddresses` is
//! pre-aggregated by the source into `daily`/`weekly`/`monthly` series.
//!
//! ### Notes
//! - Chain ids are percent-encoded into the path.
//! - There is deliberately no retry: a failed fetch surfaces as a per-metric
//!   `"Failed to load"` and is re-run by the user.
//! - Network timeouts use a sane default (30s).
//!
//! Typical usage:
//! ```no_run
//! # use chart_studio::{Client, MetricsSource};
//! let client = Client::default();
//! let stats = client.fetch_chain_stats("43114")?;
//! let tx = stats.metric("txCount");
//! # Ok::<(), anyhow::Error>(())
//! ```
use anyhow::{Context, Result, bail};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::time::Duration;

/// Default public deployment serving `/api/chain-stats`.
pub const DEFAULT_BASE_URL: &str = "https://build.avax.network";

/// Raw chain-stats payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainStatsResponse(pub Value);

impl ChainStatsResponse {
    /// Parse a response body.
    pub fn from_json(body: &str) -> Result<Self> {
        let v: Value = serde_json::from_str(body).context("decode chain stats json")?;
        if !v.is_object() {
            bail!("unexpected response shape: not a top-level object");
        }
        Ok(Self(v))
    }

    /// Sub-document for `key`, if present.
    pub fn metric(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Metric keys present in the payload.
    pub fn keys(&self) -> Vec<&str> {
        self.0
            .as_object()
            .map(|o| o.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Anything that can produce chain stats. The HTTP [`Client`] in production, canned
/// payloads in tests.
pub trait MetricsSource: Send + Sync {
    fn fetch_chain_stats(&self, chain_id: &str) -> Result<ChainStatsResponse>;
}

/// Blocking HTTP client for the chain stats endpoint.
#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

// Allow -, _, . unescaped in chain ids
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

impl Client {
    pub fn new(base_url: &str) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("chart-studio/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("falling back to default http client: {e}");
                HttpClient::new()
            });
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// URL for one chain's stats.
    pub fn chain_stats_url(&self, chain_id: &str) -> String {
        let id = percent_encoding::utf8_percent_encode(chain_id.trim(), SAFE);
        format!("{}/api/chain-stats/{}?timeRange=all", self.base_url, id)
    }
}

impl MetricsSource for Client {
    fn fetch_chain_stats(&self, chain_id: &str) -> Result<ChainStatsResponse> {
        if chain_id.trim().is_empty() {
            bail!("chain id required");
        }
        let url = self.chain_stats_url(chain_id);
        log::debug!("GET {url}");
        let resp = self
            .http
            .get(&url)
            .send()
            .with_context(|| format!("GET {url}"))?;
        if !resp.status().is_success() {
            bail!("request failed with HTTP {}", resp.status());
        }
        let v: Value = resp.json().context("decode json")?;
        if !v.is_object() {
            bail!("unexpected response shape: not a top-level object");
        }
        Ok(ChainStatsResponse(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_encodes_chain_id() {
        let c = Client::new("https://example.org/");
        assert_eq!(
            c.chain_stats_url("43114"),
            "https://example.org/api/chain-stats/43114?timeRange=all"
        );
        assert_eq!(
            c.chain_stats_url("a b"),
            "https://example.org/api/chain-stats/a%20b?timeRange=all"
        );
    }

    #[test]
    fn rejects_non_object_payload() {
        assert!(ChainStatsResponse::from_json("[1,2]").is_err());
        let ok = ChainStatsResponse::from_json(r#"{"txCount":{"data":[]}}"#).unwrap();
        assert_eq!(ok.keys(), vec!["txCount"]);
    }
}
