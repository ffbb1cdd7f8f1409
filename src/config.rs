// src/config.rs
// Site configuration: allowed countries, denial strategy, dev switches.
// Loaded from the KV store (config:<site_id>) with env overrides, falling
// back to compiled-in defaults when the store has no document.

use std::env;

use serde::{Deserialize, Serialize};

use crate::input_validation::normalize_country_code_iso;
use crate::store::KeyValueStore;

/// What the gate does with a request from a disallowed or unknown country.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialStrategy {
    /// Hard 403 with a fixed plain-text body.
    #[serde(rename = "reject")]
    Reject,
    /// 302 to the /blocked page, which carries the access-request form.
    #[serde(rename = "redirect")]
    RedirectToBlocked,
}

fn default_allowed_countries() -> Vec<String> {
    ["US", "CA", "GB", "IN"].iter().map(|c| c.to_string()).collect()
}

fn default_denial_strategy() -> DenialStrategy {
    DenialStrategy::RedirectToBlocked
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "https://example.com".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_allowed_countries")]
    pub allowed_countries: Vec<String>,
    #[serde(default = "default_denial_strategy")]
    pub denial_strategy: DenialStrategy,
    /// Loopback Host headers skip the gate. Turn off when the app sits
    /// behind a proxy that forwards the client Host verbatim.
    #[serde(default = "default_true")]
    pub dev_host_bypass: bool,
    /// Dev mode surfaces real error messages in API envelopes.
    #[serde(default)]
    pub dev_mode: bool,
    #[serde(default = "default_true")]
    pub robots_enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Announcement banner text; empty disables the banner.
    #[serde(default)]
    pub announcement: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            allowed_countries: default_allowed_countries(),
            denial_strategy: default_denial_strategy(),
            dev_host_bypass: true,
            dev_mode: false,
            robots_enabled: true,
            base_url: default_base_url(),
            announcement: String::new(),
        }
    }
}

fn parse_bool_env(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Parse a comma-separated country list, dropping anything that is not a
/// known ISO 3166-1 alpha-2 code.
fn parse_country_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(normalize_country_code_iso)
        .collect()
}

impl Config {
    pub fn load(store: &impl KeyValueStore, site_id: &str) -> Self {
        let key = format!("config:{}", site_id);
        let mut cfg = store
            .get(&key)
            .ok()
            .flatten()
            .and_then(|val| serde_json::from_slice::<Config>(&val).ok())
            .unwrap_or_default();
        cfg.apply_env_overrides();
        cfg.normalize();
        cfg
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(raw) = env::var("SITE_ALLOWED_COUNTRIES") {
            let parsed = parse_country_list(&raw);
            if !parsed.is_empty() {
                self.allowed_countries = parsed;
            }
        }
        if let Ok(raw) = env::var("SITE_DENIAL_STRATEGY") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "reject" => self.denial_strategy = DenialStrategy::Reject,
                "redirect" => self.denial_strategy = DenialStrategy::RedirectToBlocked,
                _ => {}
            }
        }
        if let Ok(raw) = env::var("SITE_DEV_HOST_BYPASS") {
            self.dev_host_bypass = parse_bool_env(&raw);
        }
        if let Ok(raw) = env::var("SITE_DEV_MODE") {
            self.dev_mode = parse_bool_env(&raw);
        }
        if let Ok(raw) = env::var("SITE_BASE_URL") {
            let trimmed = raw.trim().trim_end_matches('/');
            if !trimmed.is_empty() {
                self.base_url = trimmed.to_string();
            }
        }
    }

    fn normalize(&mut self) {
        self.allowed_countries = self
            .allowed_countries
            .iter()
            .filter_map(|c| normalize_country_code_iso(c))
            .collect();
        while self.base_url.ends_with('/') {
            self.base_url.pop();
        }
    }
}

/// Captcha secret for the access-request endpoint. Absent means the captcha
/// is not configured and verification must fail closed.
pub fn turnstile_secret() -> Option<String> {
    env::var("TURNSTILE_SECRET_KEY").ok().filter(|s| !s.trim().is_empty())
}
