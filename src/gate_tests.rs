// src/gate_tests.rs
// Unit tests for the country allow-list gate.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::config::DenialStrategy;
    use crate::gate::{evaluate, is_exempt_path, is_local_host, resolve_country, GateConfig,
        GateDecision};
    use crate::test_support::request_with_headers;

    fn gate_config(denial: DenialStrategy) -> GateConfig {
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
    fn allowed_country_continues() {
        let cfg = gate_config(DenialStrategy::Reject);
        for code in ["US", "CA", "GB", "IN"] {
            let req = request_with_headers("/projects", &[("x-vercel-ip-country", code)]);
            assert_eq!(evaluate(&req, &cfg), GateDecision::Continue, "country {code}");
        }
    }

    #[test]
    fn disallowed_country_uses_configured_denial() {
        let req = request_with_headers("/projects", &[("x-vercel-ip-country", "DE")]);
        assert_eq!(
            evaluate(&req, &gate_config(DenialStrategy::Reject)),
            GateDecision::Reject
        );
        assert_eq!(
            evaluate(&req, &gate_config(DenialStrategy::RedirectToBlocked)),
            GateDecision::RedirectToBlocked
        );
    }

    #[test]
    fn missing_country_fails_closed() {
        let req = request_with_headers("/", &[]);
        assert_eq!(
            evaluate(&req, &gate_config(DenialStrategy::RedirectToBlocked)),
            GateDecision::RedirectToBlocked
        );

        let req = request_with_headers("/", &[("x-vercel-ip-country", "  ")]);
        assert_eq!(
            evaluate(&req, &gate_config(DenialStrategy::Reject)),
            GateDecision::Reject
        );
    }

    #[test]
    fn resolution_order_prefers_primary_header() {
        let req = request_with_headers(
            "/",
            &[
                ("x-vercel-ip-country", "US"),
                ("cf-ipcountry", "DE"),
                ("x-geo-country", "FR"),
            ],
        );
        assert_eq!(resolve_country(&req).as_deref(), Some("US"));
    }

    #[test]
    fn resolution_falls_through_empty_headers() {
        let req = request_with_headers(
            "/",
            &[("x-vercel-ip-country", ""), ("cf-ipcountry", "in")],
        );
        assert_eq!(resolve_country(&req).as_deref(), Some("IN"));

        let req = request_with_headers("/", &[("x-geo-country", "gb")]);
        assert_eq!(resolve_country(&req).as_deref(), Some("GB"));

        let req = request_with_headers("/", &[]);
        assert_eq!(resolve_country(&req), None);
    }

    #[test]
    fn secondary_header_alone_is_sufficient() {
        let req = request_with_headers("/blog/my-post", &[("cf-ipcountry", "IN")]);
        assert_eq!(
            evaluate(&req, &gate_config(DenialStrategy::RedirectToBlocked)),
            GateDecision::Continue
        );
    }

    #[test]
    fn static_assets_bypass_the_gate() {
        let cfg = gate_config(DenialStrategy::Reject);
        for path in ["/logo.png", "/app.css", "/bundle.js", "/app.js.map", "/notes.TXT"] {
            let req = request_with_headers(path, &[("x-vercel-ip-country", "DE")]);
            assert_eq!(evaluate(&req, &cfg), GateDecision::Continue, "path {path}");
        }
    }

    #[test]
    fn well_known_and_operational_paths_are_exempt() {
        for path in [
            "/robots.txt",
            "/sitemap.xml",
            "/favicon.ico",
            "/favicon-32x32.png",
            "/health",
            "/metrics",
        ] {
            assert!(is_exempt_path(path), "path {path}");
        }
        assert!(!is_exempt_path("/projects"));
        assert!(!is_exempt_path("/"));
    }

    #[test]
    fn blocked_page_and_its_form_endpoint_are_exempt() {
        let cfg = gate_config(DenialStrategy::RedirectToBlocked);
        let req = request_with_headers("/blocked", &[("x-vercel-ip-country", "DE")]);
        assert_eq!(evaluate(&req, &cfg), GateDecision::Continue);

        let req = request_with_headers("/api/access-request", &[]);
        assert_eq!(evaluate(&req, &cfg), GateDecision::Continue);
    }

    #[test]
    fn localhost_host_bypasses_the_gate() {
        let cfg = gate_config(DenialStrategy::Reject);
        for host in ["localhost:3000", "localhost", "127.0.0.1:8080", "0.0.0.0:3000"] {
            let req = request_with_headers("/projects", &[("host", host)]);
            assert_eq!(evaluate(&req, &cfg), GateDecision::Continue, "host {host}");
        }
    }

    #[test]
    fn lookalike_hosts_do_not_bypass() {
        assert!(!is_local_host("localhost.evil.com"));
        assert!(!is_local_host("127.0.0.1.evil.com"));
        assert!(!is_local_host("notlocalhost"));
        assert!(is_local_host("localhost:3000"));

        let cfg = gate_config(DenialStrategy::Reject);
        let req = request_with_headers("/projects", &[("host", "localhost.evil.com")]);
        assert_eq!(evaluate(&req, &cfg), GateDecision::Reject);
    }

    #[test]
    fn host_bypass_can_be_disabled() {
        let mut cfg = gate_config(DenialStrategy::Reject);
        cfg.dev_host_bypass = false;
        let req = request_with_headers("/projects", &[("host", "localhost:3000")]);
        assert_eq!(evaluate(&req, &cfg), GateDecision::Reject);
    }

    #[test]
    fn spoofable_headers_other_than_host_do_not_bypass() {
        let cfg = gate_config(DenialStrategy::Reject);
        let req = request_with_headers(
            "/projects",
            &[("x-forwarded-host", "localhost:3000"), ("referer", "http://localhost:3000/")],
        );
        assert_eq!(evaluate(&req, &cfg), GateDecision::Reject);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let cfg = gate_config(DenialStrategy::RedirectToBlocked);
        let req = request_with_headers("/projects", &[("x-vercel-ip-country", "DE")]);
        let first = evaluate(&req, &cfg);
        let second = evaluate(&req, &cfg);
        assert_eq!(first, second);
        assert_eq!(first, GateDecision::RedirectToBlocked);
    }

    #[test]
    fn unknown_code_is_not_allowed_even_if_listed() {
        // junk codes never match the ISO table, so they cannot be allowed
        let mut cfg = gate_config(DenialStrategy::Reject);
        cfg.allowed_countries.insert("ZZ".to_string());
        let req = request_with_headers("/projects", &[("x-vercel-ip-country", "ZZ")]);
        assert_eq!(evaluate(&req, &cfg), GateDecision::Reject);
    }
}
