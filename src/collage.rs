//! Collage metrics: fetch every selected metric of a chain in one request and
//! normalize each into a chronological `{date, value}` series.
//!
//! Requests are superseded, not raced: each [`CollageSession::begin`] bumps a
//! generation counter and cancels the previous request's token, and
//! [`CollageSession::commit`] drops results carrying an old generation.

use crate::aggregate::{
    AggregationRule, aggregate_with_rules, detect_granularity, parse_period_date, period_key,
};
use crate::aggregate::AggregationRule::{Max, Mean, Sum};
use crate::api::{ChainStatsResponse, MetricsSource};
use crate::models::{ChartDataPoint, Period};
use crate::settings::ChartType;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;

/// Metric arriving pre-aggregated per granularity; never summed client-side
/// because the same address is active on many days.
pub const ACTIVE_ADDRESSES: &str = "activeAddresses";

/// Error shown on each metric when the fetch fails.
pub const LOAD_ERROR: &str = "Failed to load";

#[derive(Debug, Clone, PartialEq)]
pub struct CollageMetricConfig {
    pub key: &'static str,
    pub label: &'static str,
    pub color: &'static str,
    pub unit: &'static str,
    pub chart_type: ChartType,
    pub aggregation: AggregationRule,
}

const fn metric(
    key: &'static str,
    label: &'static str,
    color: &'static str,
    unit: &'static str,
    chart_type: ChartType,
    aggregation: AggregationRule,
) -> CollageMetricConfig {
    CollageMetricConfig {
        key,
        label,
        color,
        unit,
        chart_type,
        aggregation,
    }
}

/// Every metric the collage can show, in menu order.
///
/// Per-second averages (`avgTps`, `avgGps`, `avgGasPrice`) are coarsened with the
/// bucket mean; counters are summed and the rest keep the bucket max.
#[rustfmt::skip]
pub const COLLAGE_METRICS: &[CollageMetricConfig] = &[
    metric(ACTIVE_ADDRESSES, "Active Addresses", "#e84142", "addresses", ChartType::Bar, Max),
    metric("activeSenders", "Active Senders", "#f97316", "senders", ChartType::Bar, Sum),
    metric("txCount", "Transactions", "#3b82f6", "txs", ChartType::Bar, Sum),
    metric("cumulativeTxCount", "Cumulative Transactions", "#6366f1", "txs", ChartType::Area, Max),
    metric("cumulativeAddresses", "Cumulative Addresses", "#8b5cf6", "addresses", ChartType::Area, Max),
    metric("cumulativeContracts", "Cumulative Contracts", "#a855f7", "contracts", ChartType::Area, Max),
    metric("contracts", "Contracts Deployed", "#14b8a6", "contracts", ChartType::Bar, Sum),
    metric("gasUsed", "Gas Used", "#10b981", "gas", ChartType::Area, Sum),
    metric("feesPaid", "Fees Paid", "#f59e0b", "AVAX", ChartType::Bar, Sum),
    metric("avgTps", "Average TPS", "#06b6d4", "tps", ChartType::Line, Mean),
    metric("maxTps", "Max TPS", "#0ea5e9", "tps", ChartType::Line, Max),
    metric("avgGps", "Average GPS", "#22c55e", "gas/s", ChartType::Line, Mean),
    metric("maxGps", "Max GPS", "#84cc16", "gas/s", ChartType::Line, Max),
    metric("avgGasPrice", "Average Gas Price", "#eab308", "nAVAX", ChartType::Line, Mean),
    metric("icmMessages", "ICM Messages", "#ec4899", "messages", ChartType::Bar, Sum),
];

/// Look up a metric definition by key.
pub fn metric_config(key: &str) -> Option<&'static CollageMetricConfig> {
    COLLAGE_METRICS.iter().find(|m| m.key == key)
}

/// One metric's state in the collage.
#[derive(Debug, Clone, PartialEq)]
pub struct CollageMetricData {
    pub config: CollageMetricConfig,
    pub data: Vec<ChartDataPoint>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl CollageMetricData {
    fn loading(config: &CollageMetricConfig) -> Self {
        Self {
            config: config.clone(),
            data: Vec::new(),
            is_loading: true,
            error: None,
        }
    }

    fn failed(config: &CollageMetricConfig) -> Self {
        Self {
            config: config.clone(),
            data: Vec::new(),
            is_loading: false,
            error: Some(LOAD_ERROR.to_string()),
        }
    }
}

fn parse_value(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Turn `{data: [...]}` or a bare array of `{date, value}` into chronological points.
///
/// Values may be numbers or numeric strings; non-finite results are dropped. The
/// source lists newest first, so descending input is reversed.
pub fn normalize_series(v: &Value) -> Vec<ChartDataPoint> {
    let rows = v
        .get("data")
        .and_then(Value::as_array)
        .or_else(|| v.as_array());
    let Some(rows) = rows else {
        return Vec::new();
    };
    let mut out: Vec<ChartDataPoint> = rows
        .iter()
        .filter_map(|row| {
            let date = row
                .get("date")
                .or_else(|| row.get("day"))
                .and_then(Value::as_str)?;
            let value = parse_value(row.get("value")?)?;
            Some(ChartDataPoint::new(date, value))
        })
        .collect();
    let descending = match (out.first(), out.last()) {
        (Some(a), Some(b)) => a.date_str() > b.date_str(),
        _ => false,
    };
    if descending {
        out.reverse();
    }
    out
}

/// Rewrite dates into the key format client-side aggregation produces for `period`.
fn renormalize_dates(points: Vec<ChartDataPoint>, period: Period) -> Vec<ChartDataPoint> {
    points
        .into_iter()
        .filter_map(|mut p| {
            let d = p.date_str().and_then(parse_period_date)?;
            p.date = Some(period_key(d, period));
            p.day = None;
            Some(p)
        })
        .collect()
}

/// Select the pre-aggregated active-address series that matches `period`.
pub fn active_addresses_series(v: &Value, period: Period) -> Vec<ChartDataPoint> {
    let pick = |name: &str| v.get(name).map(normalize_series);
    let max_rule = |_: &str| AggregationRule::Max;
    match period {
        Period::Daily => pick("daily").unwrap_or_else(|| normalize_series(v)),
        Period::Weekly => match pick("weekly") {
            Some(weekly) => renormalize_dates(weekly, Period::Weekly),
            None => aggregate_with_rules(&normalize_series(v), Period::Daily, period, max_rule),
        },
        Period::Monthly | Period::Quarterly | Period::Yearly => {
            let monthly = match pick("monthly") {
                Some(m) => renormalize_dates(m, Period::Monthly),
                None => {
                    let raw = normalize_series(v);
                    let current = detect_granularity(&raw);
                    aggregate_with_rules(&raw, current, Period::Monthly, max_rule)
                }
            };
            aggregate_with_rules(&monthly, Period::Monthly, period, max_rule)
        }
    }
}

/// Build one metric's series from a chain-stats payload.
pub fn extract_metric(
    stats: &ChainStatsResponse,
    config: &CollageMetricConfig,
    period: Period,
) -> Vec<ChartDataPoint> {
    let Some(raw) = stats.metric(config.key) else {
        log::debug!("metric {} missing from response", config.key);
        return Vec::new();
    };
    if config.key == ACTIVE_ADDRESSES {
        return active_addresses_series(raw, period);
    }
    let series = normalize_series(raw);
    let current = detect_granularity(&series);
    aggregate_with_rules(&series, current, period, |_| config.aggregation)
}

/// Cooperative cancellation flag shared with a worker.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Identifies one collage request.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    pub generation: u64,
    pub token: CancelToken,
    pub chain_id: String,
    pub keys: Vec<String>,
    pub period: Period,
}

/// Fetch and normalize every metric in `ticket`. `None` when cancelled.
pub fn fetch_collage(
    source: &dyn MetricsSource,
    ticket: &RequestTicket,
) -> Option<BTreeMap<String, CollageMetricData>> {
    if ticket.token.is_cancelled() {
        return None;
    }
    let configs: Vec<&CollageMetricConfig> =
        ticket.keys.iter().filter_map(|k| metric_config(k)).collect();
    let fetched = source.fetch_chain_stats(&ticket.chain_id);
    if ticket.token.is_cancelled() {
        log::debug!("collage request {} superseded", ticket.generation);
        return None;
    }
    let out = match fetched {
        Ok(stats) => configs
            .into_iter()
            .map(|c| {
                let data = extract_metric(&stats, c, ticket.period);
                let entry = CollageMetricData {
                    config: c.clone(),
                    data,
                    is_loading: false,
                    error: None,
                };
                (c.key.to_string(), entry)
            })
            .collect(),
        Err(e) => {
            log::warn!("collage fetch for chain {} failed: {e:#}", ticket.chain_id);
            configs
                .into_iter()
                .map(|c| (c.key.to_string(), CollageMetricData::failed(c)))
                .collect()
        }
    };
    Some(out)
}

/// Run [`fetch_collage`] on a worker thread; the result arrives with its ticket.
pub fn spawn_fetch(
    source: Arc<dyn MetricsSource>,
    ticket: RequestTicket,
) -> mpsc::Receiver<(RequestTicket, Option<BTreeMap<String, CollageMetricData>>)> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = fetch_collage(source.as_ref(), &ticket);
        let _ = tx.send((ticket, result));
    });
    rx
}

/// Latest-wins state of the collage.
#[derive(Debug, Default)]
pub struct CollageSession {
    generation: u64,
    token: Option<CancelToken>,
    order: Vec<String>,
    metrics: BTreeMap<String, CollageMetricData>,
}

impl CollageSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new request, superseding any in flight. Unknown keys are skipped.
    pub fn begin(&mut self, chain_id: &str, keys: &[String], period: Period) -> RequestTicket {
        if let Some(prev) = self.token.take() {
            prev.cancel();
        }
        self.generation += 1;
        let token = CancelToken::default();
        self.token = Some(token.clone());

        self.order.clear();
        self.metrics.clear();
        for key in keys {
            match metric_config(key) {
                Some(c) if !self.metrics.contains_key(c.key) => {
                    self.order.push(c.key.to_string());
                    self.metrics
                        .insert(c.key.to_string(), CollageMetricData::loading(c));
                }
                Some(_) => {}
                None => log::warn!("unknown collage metric '{key}' ignored"),
            }
        }
        RequestTicket {
            generation: self.generation,
            token,
            chain_id: chain_id.to_string(),
            keys: self.order.clone(),
            period,
        }
    }

    /// Store a result. Returns false (and changes nothing) for a superseded ticket.
    pub fn commit(
        &mut self,
        ticket: &RequestTicket,
        result: Option<BTreeMap<String, CollageMetricData>>,
    ) -> bool {
        if ticket.generation != self.generation {
            log::debug!(
                "discarding stale collage result {} (current {})",
                ticket.generation,
                self.generation
            );
            return false;
        }
        let Some(result) = result else {
            return false;
        };
        self.metrics = result;
        self.token = None;
        true
    }

    /// Blocking convenience: begin, fetch and commit in one go.
    pub fn load(
        &mut self,
        source: &dyn MetricsSource,
        chain_id: &str,
        keys: &[String],
        period: Period,
    ) -> bool {
        let ticket = self.begin(chain_id, keys, period);
        let result = fetch_collage(source, &ticket);
        self.commit(&ticket, result)
    }

    pub fn is_loading(&self) -> bool {
        self.metrics.values().any(|m| m.is_loading)
    }

    pub fn get(&self, key: &str) -> Option<&CollageMetricData> {
        self.metrics.get(key)
    }

    /// Metrics in selection order.
    pub fn ordered(&self) -> Vec<&CollageMetricData> {
        self.order
            .iter()
            .filter_map(|k| self.metrics.get(k))
            .collect()
    }

    /// Longest loaded series; drives the brush in collage mode.
    pub fn reference_series(&self) -> &[ChartDataPoint] {
        self.ordered()
            .into_iter()
            .map(|m| m.data.as_slice())
            .max_by_key(|d| d.len())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_parse_from_strings_and_numbers() {
        let v = json!({"data": [
            {"date": "2024-01-03", "value": "7"},
            {"date": "2024-01-02", "value": 5},
            {"date": "2024-01-01", "value": "NaN"},
        ]});
        let s = normalize_series(&v);
        assert_eq!(
            s,
            vec![
                ChartDataPoint::new("2024-01-02", 5.0),
                ChartDataPoint::new("2024-01-03", 7.0),
            ]
        );
    }

    #[test]
    fn registry_has_unique_keys() {
        for (i, a) in COLLAGE_METRICS.iter().enumerate() {
            assert!(COLLAGE_METRICS[i + 1..].iter().all(|b| b.key != a.key));
        }
    }
}
