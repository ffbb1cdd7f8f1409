// src/metrics.rs
// Prometheus-compatible counters stored in KV and exported at /metrics.
// Increments buffer in memory and flush on thresholds so a page view does
// not cost a KV write.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::store::KeyValueStore;

const METRICS_PREFIX: &str = "metrics:";

#[derive(Debug, Clone, Copy)]
pub enum MetricName {
    RequestsTotal,
    GateAllowedTotal,
    GateDeniedTotal,
    SignupsTotal,
    AccessRequestsTotal,
    NotFoundTotal,
}

impl MetricName {
    fn as_str(&self) -> &'static str {
        match self {
            MetricName::RequestsTotal => "requests_total",
            MetricName::GateAllowedTotal => "gate_allowed_total",
            MetricName::GateDeniedTotal => "gate_denied_total",
            MetricName::SignupsTotal => "signups_total",
            MetricName::AccessRequestsTotal => "access_requests_total",
            MetricName::NotFoundTotal => "not_found_total",
        }
    }

    fn all() -> &'static [MetricName] {
        &[
            MetricName::RequestsTotal,
            MetricName::GateAllowedTotal,
            MetricName::GateDeniedTotal,
            MetricName::SignupsTotal,
            MetricName::AccessRequestsTotal,
            MetricName::NotFoundTotal,
        ]
    }
}

static METRICS_BUFFER: Lazy<Mutex<HashMap<String, u64>>> = Lazy::new(|| Mutex::new(HashMap::new()));
const FLUSH_KEY_COUNT: usize = 50;
const FLUSH_VALUE_THRESHOLD: u64 = 10;

fn read_counter(store: &impl KeyValueStore, key: &str) -> u64 {
    store
        .get(key)
        .ok()
        .flatten()
        .and_then(|val| String::from_utf8(val).ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

/// Increment a counter, optionally labelled (e.g. the denial strategy).
pub fn increment(store: &impl KeyValueStore, metric: MetricName, label: Option<&str>) {
    let key = match label {
        Some(l) => format!("{}{}:{}", METRICS_PREFIX, metric.as_str(), l),
        None => format!("{}{}", METRICS_PREFIX, metric.as_str()),
    };

    {
        let mut buf = METRICS_BUFFER
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let v = buf.entry(key).or_insert(0);
        *v = v.saturating_add(1);
        if *v < FLUSH_VALUE_THRESHOLD && buf.len() < FLUSH_KEY_COUNT {
            return;
        }
    }

    flush(store);
}

/// Apply every buffered increment to KV. Failed writes go back into the
/// buffer for the next attempt.
pub fn flush(store: &impl KeyValueStore) {
    let mut to_flush = HashMap::new();
    {
        let mut buf = METRICS_BUFFER
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::swap(&mut to_flush, &mut *buf);
    }

    for (key, delta) in to_flush {
        let next = read_counter(store, &key).saturating_add(delta);
        if let Err(err) = store.set(&key, next.to_string().as_bytes()) {
            eprintln!("[metrics] failed to write {} -> {}: {:?}", key, next, err);
            let mut buf = METRICS_BUFFER
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let entry = buf.entry(key).or_insert(0);
            *entry = entry.saturating_add(delta);
        }
    }
}

/// Render all counters in Prometheus text exposition format.
pub fn render(store: &impl KeyValueStore) -> String {
    flush(store);

    let keys = store.get_keys().unwrap_or_default();
    let mut out = String::new();
    for metric in MetricName::all() {
        let base = format!("{}{}", METRICS_PREFIX, metric.as_str());
        out.push_str(&format!("# TYPE edgefolio_{} counter\n", metric.as_str()));

        let plain = read_counter(store, &base);
        out.push_str(&format!("edgefolio_{} {}\n", metric.as_str(), plain));

        let label_prefix = format!("{}:", base);
        let mut labelled: Vec<&String> =
            keys.iter().filter(|k| k.starts_with(&label_prefix)).collect();
        labelled.sort();
        for key in labelled {
            let label = &key[label_prefix.len()..];
            let value = read_counter(store, key);
            out.push_str(&format!(
                "edgefolio_{}{{kind=\"{}\"}} {}\n",
                metric.as_str(),
                label,
                value
            ));
        }
    }
    out
}

pub fn handle_metrics(store: &impl KeyValueStore) -> spin_sdk::http::Response {
    spin_sdk::http::Response::builder()
        .status(200)
        .header("Content-Type", "text/plain; version=0.0.4; charset=utf-8")
        .body(render(store))
        .build()
}
