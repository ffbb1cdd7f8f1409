// src/leads.rs
// Lead capture: newsletter signups and access requests. Both validate a
// small JSON body, then append one immutable document to the store with a
// server-assigned timestamp. Access requests additionally pass Turnstile
// verification before anything is written.

use rand::random;
use serde_json::{json, Value};
use spin_sdk::http::{Request, Response};

use crate::captcha::{self, CaptchaError};
use crate::gate::resolve_country;
use crate::input_validation::{
    clamp, is_valid_email, parse_json_body, MAX_COMPANY_LEN, MAX_COUNTRY_LEN, MAX_EMAIL_LEN,
    MAX_IP_LEN, MAX_LEAD_JSON_BYTES, MAX_MESSAGE_LEN, MAX_NAME_LEN, MAX_USER_AGENT_LEN,
    MIN_MESSAGE_LEN, MIN_NAME_LEN,
};
use crate::store::KeyValueStore;

pub const NEWSLETTER_KEY_PREFIX: &str = "newsletter_signup";
pub const ACCESS_REQUEST_KEY_PREFIX: &str = "access_request";

const GENERIC_SERVER_ERROR: &str = "Server error. Please try again.";

/// Request-scoped header context stored alongside each lead document.
#[derive(Debug, Clone, Default)]
pub struct LeadMeta {
    pub ip: String,
    pub country: String,
    pub user_agent: String,
}

impl LeadMeta {
    pub fn from_request(req: &Request) -> Self {
        LeadMeta {
            ip: crate::extract_client_ip(req),
            country: resolve_country(req).unwrap_or_default(),
            user_agent: req
                .header("user-agent")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
        }
    }
}

fn json_response(status: u16, body: &Value) -> Response {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json; charset=utf-8")
        .body(body.to_string())
        .build()
}

fn ok_response(body: Value) -> Response {
    json_response(200, &body)
}

fn validation_error(message: &str) -> Response {
    json_response(400, &json!({ "ok": false, "error": message }))
}

fn server_error(detail: &str, dev_mode: bool) -> Response {
    let message = if dev_mode { detail } else { GENERIC_SERVER_ERROR };
    json_response(500, &json!({ "ok": false, "error": message }))
}

fn field_str<'a>(body: &'a Value, name: &str) -> &'a str {
    body.get(name).and_then(Value::as_str).unwrap_or("")
}

// Each lead lands on its own immutable key so concurrent submissions never
// read-modify-write a shared record.
fn lead_key(prefix: &str, ts: u64) -> String {
    format!("{}:{}-{:016x}", prefix, ts, random::<u64>())
}

fn write_lead(store: &impl KeyValueStore, prefix: &str, doc: &Value) -> Result<(), ()> {
    let ts = doc.get("createdAt").and_then(Value::as_u64).unwrap_or(0);
    let key = lead_key(prefix, ts);
    let payload = serde_json::to_vec(doc).map_err(|_| ())?;
    store.set(&key, &payload)
}

pub(crate) struct SignupFields {
    pub(crate) name: String,
    pub(crate) email: String,
}

pub(crate) fn validate_signup(body: &Value) -> Result<SignupFields, &'static str> {
    let name = field_str(body, "name").trim().to_string();
    let email = field_str(body, "email").trim().to_ascii_lowercase();

    if name.len() < MIN_NAME_LEN || name.len() > MAX_NAME_LEN {
        return Err("Invalid name.");
    }
    if !is_valid_email(&email) || email.len() > MAX_EMAIL_LEN {
        return Err("Invalid email.");
    }
    Ok(SignupFields { name, email })
}

/// POST /api/newsletter/signup
pub fn handle_newsletter_signup(
    store: &impl KeyValueStore,
    req: &Request,
    dev_mode: bool,
) -> Response {
    let body = match parse_json_body(req.body(), MAX_LEAD_JSON_BYTES) {
        Ok(v) => v,
        Err(msg) => return validation_error(msg),
    };
    let fields = match validate_signup(&body) {
        Ok(f) => f,
        Err(msg) => return validation_error(msg),
    };

    let meta = LeadMeta::from_request(req);
    let doc = json!({
        "name": clamp(&fields.name, MAX_NAME_LEN),
        "email": clamp(&fields.email, MAX_EMAIL_LEN),
        "createdAt": crate::now_ts(),
        "ip": clamp(&meta.ip, MAX_IP_LEN),
        "country": clamp(&meta.country, MAX_COUNTRY_LEN),
        "userAgent": clamp(&meta.user_agent, MAX_USER_AGENT_LEN),
        "source": "meetup_page",
    });

    if write_lead(store, NEWSLETTER_KEY_PREFIX, &doc).is_err() {
        eprintln!("[leads] newsletter signup write failed");
        return server_error("Store write failed.", dev_mode);
    }
    ok_response(json!({ "ok": true, "message": "You're signed up!" }))
}

#[derive(Debug)]
pub(crate) struct AccessRequestFields {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) company: String,
    pub(crate) message: String,
    pub(crate) captcha_token: String,
}

pub(crate) fn validate_access_request(body: &Value) -> Result<AccessRequestFields, &'static str> {
    let name = field_str(body, "name").trim().to_string();
    let email = field_str(body, "email").trim().to_string();
    let company = field_str(body, "company").trim().to_string();
    let message = field_str(body, "message").trim().to_string();
    let captcha_token = field_str(body, "captchaToken").trim().to_string();

    if name.len() < MIN_NAME_LEN || name.len() > MAX_NAME_LEN {
        return Err("Invalid name.");
    }
    if !is_valid_email(&email) || email.len() > MAX_EMAIL_LEN {
        return Err("Invalid email.");
    }
    if company.len() > MAX_COMPANY_LEN {
        return Err("Company is too long.");
    }
    if message.len() < MIN_MESSAGE_LEN || message.len() > MAX_MESSAGE_LEN {
        return Err("Message must be 10\u{2013}2000 characters.");
    }
    if captcha_token.is_empty() {
        return Err("Captcha token missing.");
    }
    Ok(AccessRequestFields {
        name,
        email,
        company,
        message,
        captcha_token,
    })
}

fn captcha_failed_response(error_codes: &[String], dev_mode: bool) -> Response {
    let mut body = json!({ "ok": false, "error": "Captcha failed. Please try again." });
    if dev_mode && !error_codes.is_empty() {
        body["details"] = json!(error_codes);
    }
    json_response(400, &body)
}

/// POST /api/access-request
pub async fn handle_access_request(
    store: &impl KeyValueStore,
    req: &Request,
    dev_mode: bool,
) -> Response {
    let body = match parse_json_body(req.body(), MAX_LEAD_JSON_BYTES) {
        Ok(v) => v,
        Err(msg) => return validation_error(msg),
    };
    let fields = match validate_access_request(&body) {
        Ok(f) => f,
        Err(msg) => return validation_error(msg),
    };

    let meta = LeadMeta::from_request(req);
    let remote_ip = if meta.ip.is_empty() || meta.ip == "unknown" {
        None
    } else {
        Some(meta.ip.as_str())
    };

    match captcha::verify_turnstile(&fields.captcha_token, remote_ip).await {
        Ok(outcome) if outcome.success => {}
        Ok(outcome) => return captcha_failed_response(&outcome.error_codes, dev_mode),
        Err(CaptchaError::NotConfigured) => {
            eprintln!("[leads] captcha verification skipped: TURNSTILE_SECRET_KEY unset");
            return validation_error("Captcha not configured.");
        }
        Err(err) => {
            eprintln!("[leads] captcha verification failed: {:?}", err);
            return server_error("Captcha verification unavailable.", dev_mode);
        }
    }

    let doc = json!({
        "name": clamp(&fields.name, MAX_NAME_LEN),
        "email": clamp(&fields.email, MAX_EMAIL_LEN),
        "company": clamp(&fields.company, MAX_COMPANY_LEN),
        "message": clamp(&fields.message, MAX_MESSAGE_LEN),
        "createdAt": crate::now_ts(),
        "ip": clamp(&meta.ip, MAX_IP_LEN),
        "country": clamp(&meta.country, MAX_COUNTRY_LEN),
        "userAgent": clamp(&meta.user_agent, MAX_USER_AGENT_LEN),
        "source": "blocked_page",
    });

    if write_lead(store, ACCESS_REQUEST_KEY_PREFIX, &doc).is_err() {
        eprintln!("[leads] access request write failed");
        return server_error("Store write failed.", dev_mode);
    }
    ok_response(json!({ "ok": true }))
}
