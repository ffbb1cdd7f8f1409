// src/robots.rs
// Well-known crawler files. Both are generated per request and cached at
// the edge via Cache-Control; the sitemap pulls published slugs from the
// store so new posts appear without a deploy.

use spin_sdk::http::Response;

use crate::config::Config;
use crate::posts;
use crate::store::KeyValueStore;

/// Static page paths advertised in the sitemap, in nav order.
const SITEMAP_PAGES: &[&str] = &[
    "/",
    "/about",
    "/projects",
    "/blog",
    "/meetup",
    "/now",
    "/consulting",
];

pub fn generate_robots_txt(cfg: &Config) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /blocked\nDisallow: /api/\n\nSitemap: {}/sitemap.xml\n",
        cfg.base_url
    )
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn generate_sitemap_xml(store: &impl KeyValueStore, cfg: &Config) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
    for page in SITEMAP_PAGES {
        out.push_str(&format!(
            "  <url><loc>{}{}</loc></url>\n",
            xml_escape(&cfg.base_url),
            page
        ));
    }
    for post in posts::list_published(store) {
        let loc = format!("{}/blog/{}", cfg.base_url, post.slug);
        match post.updated_at.or(post.published_at) {
            Some(date) => out.push_str(&format!(
                "  <url><loc>{}</loc><lastmod>{}</lastmod></url>\n",
                xml_escape(&loc),
                xml_escape(&date)
            )),
            None => out.push_str(&format!("  <url><loc>{}</loc></url>\n", xml_escape(&loc))),
        }
    }
    out.push_str("</urlset>\n");
    out
}

pub fn handle_robots_txt(cfg: &Config) -> Response {
    if !cfg.robots_enabled {
        return Response::new(404, "Not Found");
    }
    Response::builder()
        .status(200)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Cache-Control", "public, max-age=3600")
        .body(generate_robots_txt(cfg))
        .build()
}

pub fn handle_sitemap_xml(store: &impl KeyValueStore, cfg: &Config) -> Response {
    if !cfg.robots_enabled {
        return Response::new(404, "Not Found");
    }
    Response::builder()
        .status(200)
        .header("Content-Type", "application/xml; charset=utf-8")
        .header("Cache-Control", "public, max-age=3600")
        .body(generate_sitemap_xml(store, cfg))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KeyValueStore;
    use crate::test_support::InMemoryStore;

    #[test]
    fn robots_txt_references_sitemap_and_shields_api() {
        let cfg = Config::default();
        let txt = generate_robots_txt(&cfg);
        assert!(txt.contains("Sitemap: https://example.com/sitemap.xml"));
        assert!(txt.contains("Disallow: /api/"));
        assert!(txt.contains("Disallow: /blocked"));
    }

    #[test]
    fn sitemap_lists_static_pages_and_published_posts() {
        let store = InMemoryStore::default();
        store
            .set(
                "post:hello",
                br#"{"slug":"hello","title":"Hello","published":true,"publishedAt":"2026-01-03"}"#,
            )
            .unwrap();
        store
            .set(
                "post:draft",
                br#"{"slug":"draft","title":"Draft","published":false}"#,
            )
            .unwrap();

        let cfg = Config::default();
        let xml = generate_sitemap_xml(&store, &cfg);
        assert!(xml.contains("<loc>https://example.com/meetup</loc>"));
        assert!(xml.contains("<loc>https://example.com/blog/hello</loc>"));
        assert!(xml.contains("<lastmod>2026-01-03</lastmod>"));
        assert!(!xml.contains("/blog/draft"));
    }
}
