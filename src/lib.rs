// src/lib.rs
// Entry point for the edge-hosted personal site. Every inbound request is
// evaluated by the country gate first; allowed requests are routed to page
// renderers, well-known files, and the lead-capture API.

use spin_sdk::http::{Method, Request, Response};
use spin_sdk::http_component;
use spin_sdk::key_value::Store;
use std::time::{SystemTime, UNIX_EPOCH};

use percent_encoding::percent_decode_str;

mod captcha;          // Turnstile verification client
mod config;           // Site config loading and defaults
mod dates;            // Epoch/ISO date handling
mod gate;             // Country allow-list gate
mod input_validation; // Payload limits and field sanitization
mod leads;            // Newsletter signup + access request endpoints
mod metrics;          // Prometheus counters
mod pages;            // Server-rendered pages
mod posts;            // Blog document reader + normalization
mod robots;           // robots.txt and sitemap.xml
mod store;            // KV store boundary trait

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod gate_tests;

pub use config::{Config, DenialStrategy};
pub use gate::{evaluate as evaluate_gate, GateConfig, GateDecision};

pub(crate) fn now_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Extract the best available client IP from the request.
pub(crate) fn extract_client_ip(req: &Request) -> String {
    // X-Forwarded-For may be a comma-separated list; the first hop wins.
    if let Some(h) = req.header("x-forwarded-for") {
        let val = h.as_str().unwrap_or("");
        if let Some(ip) = val.split(',').next() {
            let ip = ip.trim();
            if !ip.is_empty() && ip != "unknown" {
                return ip.to_string();
            }
        }
    }
    if let Some(h) = req.header("x-real-ip") {
        let val = h.as_str().unwrap_or("");
        if !val.is_empty() && val != "unknown" {
            return val.to_string();
        }
    }
    "unknown".to_string()
}

fn health_response(store: Option<&Store>) -> Response {
    if let Some(store) = store {
        let test_key = "health:test";
        let _ = Store::set(store, test_key, b"ok");
        let ok = Store::get(store, test_key).is_ok();
        let _ = Store::delete(store, test_key);
        if ok {
            return Response::builder()
                .status(200)
                .header("X-KV-Status", "available")
                .body("OK")
                .build();
        }
    }
    eprintln!("[health] key-value store unavailable");
    Response::builder()
        .status(500)
        .header("X-KV-Status", "unavailable")
        .body("Key-value store error")
        .build()
}

fn reject_response() -> Response {
    Response::builder()
        .status(403)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(gate::REJECT_BODY)
        .build()
}

fn redirect_to_blocked_response() -> Response {
    Response::builder()
        .status(302)
        .header("Location", gate::BLOCKED_PATH)
        .body("")
        .build()
}

fn decode_blog_slug(path: &str) -> Option<String> {
    let raw = path.strip_prefix("/blog/")?;
    if raw.is_empty() || raw.contains('/') {
        return None;
    }
    Some(percent_decode_str(raw).decode_utf8_lossy().to_string())
}

/// Main handler logic, testable as a plain Rust function.
pub async fn handle_site_impl(req: &Request) -> Response {
    let path = req.path();

    // The health probe answers even when the rest of the app cannot.
    let store = Store::open_default().ok();
    if path == "/health" {
        return health_response(store.as_ref());
    }

    // Pages and documents need the store; fail closed without it.
    let Some(store) = store else {
        eprintln!("[router] key-value store unavailable; refusing request for {}", path);
        return Response::new(500, "Key-value store error");
    };

    let cfg = config::Config::load(&store, "default");
    metrics::increment(&store, metrics::MetricName::RequestsTotal, None);

    match gate::evaluate(req, &GateConfig::from_config(&cfg)) {
        GateDecision::Continue => {
            metrics::increment(&store, metrics::MetricName::GateAllowedTotal, None);
        }
        GateDecision::Reject => {
            metrics::increment(&store, metrics::MetricName::GateDeniedTotal, Some("reject"));
            return reject_response();
        }
        GateDecision::RedirectToBlocked => {
            metrics::increment(&store, metrics::MetricName::GateDeniedTotal, Some("redirect"));
            return redirect_to_blocked_response();
        }
    }

    if *req.method() == Method::Post {
        return match path {
            "/api/newsletter/signup" => {
                let resp = leads::handle_newsletter_signup(&store, req, cfg.dev_mode);
                if *resp.status() == 200u16 {
                    metrics::increment(&store, metrics::MetricName::SignupsTotal, None);
                }
                resp
            }
            gate::ACCESS_REQUEST_PATH => {
                let resp = leads::handle_access_request(&store, req, cfg.dev_mode).await;
                if *resp.status() == 200u16 {
                    metrics::increment(&store, metrics::MetricName::AccessRequestsTotal, None);
                }
                resp
            }
            _ => {
                metrics::increment(&store, metrics::MetricName::NotFoundTotal, None);
                pages::not_found(&cfg)
            }
        };
    }

    match path {
        "/" => pages::home::handle(&cfg),
        "/about" => pages::about::handle(&cfg),
        "/projects" => pages::projects::handle(&cfg),
        "/blog" => pages::blog::handle_index(&store, &cfg),
        "/meetup" => pages::meetup::handle(&cfg),
        "/now" => pages::now::handle(&cfg),
        "/consulting" => pages::consulting::handle(&cfg),
        gate::BLOCKED_PATH => pages::blocked::handle(&cfg),
        "/metrics" => metrics::handle_metrics(&store),
        "/robots.txt" => robots::handle_robots_txt(&cfg),
        "/sitemap.xml" => robots::handle_sitemap_xml(&store, &cfg),
        _ => {
            if let Some(slug) = decode_blog_slug(path) {
                return pages::blog::handle_post(&store, &cfg, &slug);
            }
            metrics::increment(&store, metrics::MetricName::NotFoundTotal, None);
            pages::not_found(&cfg)
        }
    }
}

#[http_component]
pub async fn spin_entrypoint(req: Request) -> Response {
    handle_site_impl(&req).await
}
