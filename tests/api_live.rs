//! Live API tests. Run with: `cargo test --features online -- --nocapture`
#![cfg(feature = "online")]

use chart_studio::collage::{CollageSession, extract_metric, metric_config};
use chart_studio::{Client, MetricsSource, Period};

#[test]
fn fetch_c_chain_stats() {
    let cli = Client::default();
    let stats = cli.fetch_chain_stats("43114").unwrap();
    assert!(!stats.keys().is_empty());
    let tx = extract_metric(&stats, metric_config("txCount").unwrap(), Period::Monthly);
    assert!(!tx.is_empty());
    assert!(tx.windows(2).all(|w| w[0].date < w[1].date));
}

#[test]
fn collage_session_loads_live_metrics() {
    let cli = Client::default();
    let mut session = CollageSession::new();
    let keys = vec!["activeAddresses".to_string(), "gasUsed".to_string()];
    assert!(session.load(&cli, "43114", &keys, Period::Weekly));
    assert!(session.ordered().iter().all(|m| m.error.is_none()));
}
