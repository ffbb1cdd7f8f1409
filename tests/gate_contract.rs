// tests/gate_contract.rs
// Contract tests for the country gate through the public crate API.

use std::collections::HashSet;

use edgefolio::{evaluate_gate, DenialStrategy, GateConfig, GateDecision};
use spin_sdk::http::{Method, Request};

fn request(path: &str, headers: &[(&str, &str)]) -> Request {
    let mut builder = Request::builder();
    builder.method(Method::Get).uri(path);
    for (key, value) in headers {
        builder.header(*key, *value);
    }
    builder.body(Vec::new());
    builder.build()
}

fn gate(denial: DenialStrategy) -> GateConfig {
    let allowed: HashSet<String> = ["US", "CA", "GB", "IN"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    GateConfig {
        allowed_countries: allowed,
        denial,
        dev_host_bypass: true,
    }
}

#[test]
fn allowed_country_passes_through() {
    let req = request("/blog/my-post", &[("cf-ipcountry", "IN")]);
    assert_eq!(
        evaluate_gate(&req, &gate(DenialStrategy::RedirectToBlocked)),
        GateDecision::Continue
    );
}

#[test]
fn disallowed_country_is_denied_per_strategy() {
    let req = request("/projects", &[("x-vercel-ip-country", "DE")]);
    assert_eq!(
        evaluate_gate(&req, &gate(DenialStrategy::Reject)),
        GateDecision::Reject
    );
    assert_eq!(
        evaluate_gate(&req, &gate(DenialStrategy::RedirectToBlocked)),
        GateDecision::RedirectToBlocked
    );
}

#[test]
fn unknown_country_never_continues() {
    let req = request("/", &[]);
    for strategy in [DenialStrategy::Reject, DenialStrategy::RedirectToBlocked] {
        assert_ne!(evaluate_gate(&req, &gate(strategy)), GateDecision::Continue);
    }
}

#[test]
fn assets_and_well_known_files_skip_the_gate() {
    for path in ["/logo.png", "/app.css", "/robots.txt", "/sitemap.xml", "/favicon.ico"] {
        let req = request(path, &[("x-vercel-ip-country", "DE")]);
        assert_eq!(
            evaluate_gate(&req, &gate(DenialStrategy::Reject)),
            GateDecision::Continue,
            "path {path}"
        );
    }
}

#[test]
fn blocked_page_is_exempt_under_redirect_strategy() {
    let req = request("/blocked", &[("x-vercel-ip-country", "DE")]);
    assert_eq!(
        evaluate_gate(&req, &gate(DenialStrategy::RedirectToBlocked)),
        GateDecision::Continue
    );
}

#[test]
fn loopback_host_bypasses_regardless_of_country() {
    let req = request(
        "/projects",
        &[("host", "localhost:3000"), ("x-vercel-ip-country", "DE")],
    );
    assert_eq!(
        evaluate_gate(&req, &gate(DenialStrategy::Reject)),
        GateDecision::Continue
    );
}

#[test]
fn same_request_always_gets_the_same_decision() {
    let cfg = gate(DenialStrategy::Reject);
    let req = request("/about", &[("x-vercel-ip-country", "BR")]);
    let decisions: Vec<GateDecision> = (0..3).map(|_| evaluate_gate(&req, &cfg)).collect();
    assert!(decisions.iter().all(|d| *d == GateDecision::Reject));
}
