// src/input_validation.rs
// Request payload limits and field sanitization shared by the lead-capture
// endpoints and the config loader.

use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashSet;

pub const MAX_LEAD_JSON_BYTES: usize = 16 * 1024;

pub const MAX_NAME_LEN: usize = 80;
pub const MIN_NAME_LEN: usize = 2;
pub const MAX_EMAIL_LEN: usize = 200;
pub const MAX_COMPANY_LEN: usize = 120;
pub const MIN_MESSAGE_LEN: usize = 10;
pub const MAX_MESSAGE_LEN: usize = 2000;
pub const MAX_IP_LEN: usize = 64;
pub const MAX_COUNTRY_LEN: usize = 8;
pub const MAX_USER_AGENT_LEN: usize = 400;

static ISO_ALPHA2: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX",
        "AZ", "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ",
        "BR", "BS", "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK",
        "CL", "CM", "CN", "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM",
        "DO", "DZ", "EC", "EE", "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR",
        "GA", "GB", "GD", "GE", "GF", "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS",
        "GT", "GU", "GW", "GY", "HK", "HM", "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN",
        "IO", "IQ", "IR", "IS", "IT", "JE", "JM", "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN",
        "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC", "LI", "LK", "LR", "LS", "LT", "LU", "LV",
        "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK", "ML", "MM", "MN", "MO", "MP", "MQ",
        "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA", "NC", "NE", "NF", "NG", "NI",
        "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG", "PH", "PK", "PL", "PM",
        "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW", "SA", "SB", "SC",
        "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS", "ST", "SV",
        "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO", "TR",
        "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
        "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
    ]
    .into_iter()
    .collect()
});

pub fn enforce_body_size(body: &[u8], max_bytes: usize) -> Result<(), &'static str> {
    if body.len() > max_bytes {
        return Err("Payload too large");
    }
    Ok(())
}

pub fn parse_json_body(body: &[u8], max_bytes: usize) -> Result<Value, &'static str> {
    enforce_body_size(body, max_bytes)?;
    serde_json::from_slice::<Value>(body).map_err(|_| "Invalid JSON")
}

pub fn normalize_country_code_iso(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let upper = trimmed.to_ascii_uppercase();
    if ISO_ALPHA2.contains(upper.as_str()) {
        Some(upper)
    } else {
        None
    }
}

/// Shape check for email addresses: one `@`, no whitespace, and a dot in
/// the domain with non-empty parts around it. Length is checked separately.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() || email.chars().any(|c| c.is_whitespace()) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Truncate a string to at most `max` bytes on a char boundary.
pub fn clamp(value: &str, max: usize) -> String {
    if value.len() <= max {
        return value.to_string();
    }
    let mut end = max;
    while end > 0 && !value.is_char_boundary(end) {
        end -= 1;
    }
    value[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_iso_country_code() {
        assert_eq!(normalize_country_code_iso("us").as_deref(), Some("US"));
        assert_eq!(normalize_country_code_iso(" JP ").as_deref(), Some("JP"));
    }

    #[test]
    fn rejects_non_iso_country_code() {
        assert!(normalize_country_code_iso("ZZ").is_none());
        assert!(normalize_country_code_iso("U1").is_none());
        assert!(normalize_country_code_iso("USA").is_none());
    }

    #[test]
    fn validates_email_shape() {
        assert!(is_valid_email("someone@example.com"));
        assert!(is_valid_email("a.b+c@mail.co.uk"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@@c.com"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn clamps_on_char_boundary() {
        assert_eq!(clamp("hello", 10), "hello");
        assert_eq!(clamp("hello", 3), "hel");
        // multi-byte char straddling the cut point is dropped whole
        assert_eq!(clamp("héllo", 2), "h");
    }

    #[test]
    fn parse_json_body_enforces_size_limit() {
        let big = vec![b'a'; MAX_LEAD_JSON_BYTES + 1];
        let err = parse_json_body(&big, MAX_LEAD_JSON_BYTES).unwrap_err();
        assert_eq!(err, "Payload too large");
    }

    #[test]
    fn parse_json_body_rejects_malformed_json() {
        let err = parse_json_body(b"{not json", MAX_LEAD_JSON_BYTES).unwrap_err();
        assert_eq!(err, "Invalid JSON");
    }
}
