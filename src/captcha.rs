// src/captcha.rs
// Turnstile verification for the access-request form. One outbound POST per
// submission; the secret comes from the environment and is never stored.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use spin_sdk::http::{Method, Request, Response};

use crate::config::turnstile_secret;

const SITEVERIFY_URL: &str = "https://challenges.cloudflare.com/turnstile/v0/siteverify";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptchaOutcome {
    pub success: bool,
    pub error_codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptchaError {
    /// TURNSTILE_SECRET_KEY is unset; verification fails closed.
    NotConfigured,
    Transport(String),
    MalformedResponse,
}

#[derive(Deserialize)]
struct SiteverifyResponse {
    #[serde(default)]
    success: bool,
    #[serde(rename = "error-codes", default)]
    error_codes: Vec<String>,
}

fn form_encode(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            format!("{}={}", key, utf8_percent_encode(value, NON_ALPHANUMERIC))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Verify a client-supplied token against the siteverify endpoint.
pub async fn verify_turnstile(
    token: &str,
    remote_ip: Option<&str>,
) -> Result<CaptchaOutcome, CaptchaError> {
    let secret = turnstile_secret().ok_or(CaptchaError::NotConfigured)?;

    let mut pairs = vec![("secret", secret.as_str()), ("response", token)];
    if let Some(ip) = remote_ip {
        pairs.push(("remoteip", ip));
    }
    let body = form_encode(&pairs);

    let mut builder = Request::builder();
    builder
        .method(Method::Post)
        .uri(SITEVERIFY_URL)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(body.into_bytes());
    let request = builder.build();

    let response: Response = spin_sdk::http::send(request)
        .await
        .map_err(|err| CaptchaError::Transport(format!("{:?}", err)))?;

    let parsed: SiteverifyResponse =
        serde_json::from_slice(response.body()).map_err(|_| CaptchaError::MalformedResponse)?;

    Ok(CaptchaOutcome {
        success: parsed.success,
        error_codes: parsed.error_codes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_encoding_escapes_reserved_characters() {
        let body = form_encode(&[("secret", "s3cret+/="), ("response", "tok en")]);
        assert_eq!(body, "secret=s3cret%2B%2F%3D&response=tok%20en");
    }

    #[test]
    fn siteverify_response_tolerates_missing_fields() {
        let parsed: SiteverifyResponse = serde_json::from_str("{}").unwrap();
        assert!(!parsed.success);
        assert!(parsed.error_codes.is_empty());

        let parsed: SiteverifyResponse =
            serde_json::from_str(r#"{"success":false,"error-codes":["invalid-input-response"]}"#)
                .unwrap();
        assert_eq!(parsed.error_codes, vec!["invalid-input-response"]);
    }
}
