// src/gate.rs
// Country allow-list gate. Runs in front of every page route and decides,
// from edge-supplied geolocation headers alone, whether the request passes.
// The evaluation is pure: no store access, no logging, no clock.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use spin_sdk::http::Request;

use crate::config::{Config, DenialStrategy};
use crate::input_validation::normalize_country_code_iso;

pub const BLOCKED_PATH: &str = "/blocked";
pub const ACCESS_REQUEST_PATH: &str = "/api/access-request";

/// Fixed plain-text body for the hard-reject strategy.
pub const REJECT_BODY: &str = "Access denied in your region.";

/// File extensions that are always served regardless of country, so assets
/// and crawler fetches never bounce off the gate.
static EXEMPT_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["png", "jpg", "jpeg", "gif", "webp", "svg", "ico", "css", "js", "map", "txt"]
        .into_iter()
        .collect()
});

/// Loopback hosts that qualify for the local-development bypass. Matched
/// exactly against the host portion of the Host header; a prefix match would
/// let `localhost.example.com` through.
const LOOPBACK_HOSTS: &[&str] = &["localhost", "127.0.0.1", "0.0.0.0"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Pass the request through unmodified.
    Continue,
    /// 302 to the blocked page.
    RedirectToBlocked,
    /// Terminate with a fixed 403 body.
    Reject,
}

/// The slice of site configuration the gate reads. Built once per request
/// and immutable during evaluation.
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub allowed_countries: HashSet<String>,
    pub denial: DenialStrategy,
    pub dev_host_bypass: bool,
}

impl GateConfig {
    pub fn from_config(cfg: &Config) -> Self {
        GateConfig {
            allowed_countries: cfg.allowed_countries.iter().cloned().collect(),
            denial: cfg.denial_strategy,
            dev_host_bypass: cfg.dev_host_bypass,
        }
    }
}

/// Resolve the caller's country from edge headers, first non-empty wins:
/// Vercel, then Cloudflare, then the generic runtime-supplied header.
/// Returns an upper-cased code, or None when every source is absent/blank.
pub fn resolve_country(req: &Request) -> Option<String> {
    const COUNTRY_HEADERS: &[&str] = &["x-vercel-ip-country", "cf-ipcountry", "x-geo-country"];
    for name in COUNTRY_HEADERS {
        if let Some(header) = req.header(name) {
            let value = header.as_str().unwrap_or("").trim();
            if !value.is_empty() {
                return Some(value.to_ascii_uppercase());
            }
        }
    }
    None
}

fn has_exempt_extension(path: &str) -> bool {
    path.rsplit_once('.')
        .map(|(_, ext)| EXEMPT_EXTENSIONS.contains(ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Paths the gate never touches: static assets, well-known files, favicons,
/// operational endpoints, and the denial surface plus its form endpoint
/// (denying those would trap blocked visitors in a loop).
pub fn is_exempt_path(path: &str) -> bool {
    if path == "/robots.txt" || path == "/sitemap.xml" {
        return true;
    }
    if path.starts_with("/favicon") {
        return true;
    }
    if path == "/health" || path == "/metrics" {
        return true;
    }
    if path == BLOCKED_PATH || path.starts_with("/blocked/") {
        return true;
    }
    if path == ACCESS_REQUEST_PATH {
        return true;
    }
    has_exempt_extension(path)
}

/// True when the Host header names a loopback address, with an optional
/// port suffix. Exact host match only.
pub fn is_local_host(host: &str) -> bool {
    let host = host.trim();
    let bare = host.split(':').next().unwrap_or("");
    LOOPBACK_HOSTS.contains(&bare)
}

/// Evaluate the gate for one request. Unknown country is treated the same
/// as a disallowed one: the gate fails closed.
pub fn evaluate(req: &Request, cfg: &GateConfig) -> GateDecision {
    if cfg.dev_host_bypass {
        let host = req
            .header("host")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        if is_local_host(host) {
            return GateDecision::Continue;
        }
    }

    if is_exempt_path(req.path()) {
        return GateDecision::Continue;
    }

    let allowed = resolve_country(req)
        .and_then(|c| normalize_country_code_iso(&c))
        .map(|c| cfg.allowed_countries.contains(&c))
        .unwrap_or(false);

    if allowed {
        return GateDecision::Continue;
    }

    match cfg.denial {
        DenialStrategy::Reject => GateDecision::Reject,
        DenialStrategy::RedirectToBlocked => GateDecision::RedirectToBlocked,
    }
}
