// src/pages/mod.rs
// Server-rendered pages. Each page module builds an HTML body; the shared
// chrome here wraps it with the announcement banner, nav and footer.

use spin_sdk::http::Response;

use crate::config::Config;
use crate::dates;

pub mod about;
pub mod blocked;
pub mod blog;
pub mod consulting;
pub mod home;
pub mod meetup;
pub mod now;
pub mod projects;

pub const SITE_OWNER: &str = "Arjun Mehta";

const NAV_LINKS: &[(&str, &str)] = &[
    ("/", "Home"),
    ("/about", "About"),
    ("/projects", "Projects"),
    ("/blog", "Blog"),
    ("/meetup", "Meetup"),
    ("/now", "Now"),
    ("/consulting", "Consulting"),
];

const BASE_STYLES: &str = r#"
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
      background: #09090b;
      color: #fafafa;
      line-height: 1.6;
    }
    a { color: inherit; }
    main { max-width: 960px; margin: 0 auto; padding: 40px 16px; }
    .banner {
      display: flex; align-items: center; justify-content: space-between;
      gap: 12px; padding: 8px 16px;
      background: #fbbf24; color: #18181b; font-size: 0.9rem;
    }
    .banner button {
      border: 0; background: transparent; cursor: pointer;
      font-size: 1rem; padding: 2px 8px; border-radius: 8px;
    }
    nav {
      display: flex; flex-wrap: wrap; gap: 16px;
      max-width: 960px; margin: 0 auto; padding: 16px;
      border-bottom: 1px solid rgba(255,255,255,0.08);
      font-size: 0.9rem;
    }
    nav a { text-decoration: none; color: #d4d4d8; }
    nav a:hover { color: #fff; }
    .hero {
      border: 1px solid rgba(255,255,255,0.1); border-radius: 24px;
      padding: 32px; background: linear-gradient(rgba(255,255,255,0.06), transparent);
    }
    .hero h1 { font-size: 2.2rem; letter-spacing: -0.02em; }
    .hero p { color: #d4d4d8; max-width: 640px; margin-top: 12px; }
    .pill {
      display: inline-flex; align-items: center; gap: 8px;
      border: 1px solid rgba(255,255,255,0.1); background: rgba(255,255,255,0.05);
      border-radius: 999px; padding: 4px 12px; font-size: 0.75rem; color: #e4e4e7;
    }
    .grid { display: grid; gap: 16px; margin-top: 32px; }
    @media (min-width: 640px) { .grid { grid-template-columns: repeat(2, 1fr); } }
    .card {
      display: block; border: 1px solid rgba(255,255,255,0.1); border-radius: 16px;
      padding: 20px; background: rgba(255,255,255,0.03); text-decoration: none;
    }
    .card:hover { border-color: rgba(255,255,255,0.2); background: rgba(255,255,255,0.06); }
    .card h2, .card h3 { font-size: 1rem; color: #f4f4f5; }
    .card p { margin-top: 8px; font-size: 0.9rem; color: #d4d4d8; }
    article.section {
      border: 1px solid rgba(255,255,255,0.1); border-radius: 24px;
      padding: 28px; background: rgba(255,255,255,0.03); margin-top: 24px;
    }
    article.section h2 { font-size: 1.25rem; }
    article.section p, article.section li { margin-top: 12px; font-size: 0.95rem; color: #d4d4d8; }
    .tag {
      display: inline-flex; border: 1px solid rgba(255,255,255,0.1);
      background: rgba(255,255,255,0.05); border-radius: 999px;
      padding: 2px 10px; font-size: 0.75rem; font-weight: 600; color: #e4e4e7;
    }
    .meta { font-size: 0.75rem; color: #a1a1aa; font-weight: 600; }
    form.lead { display: grid; gap: 12px; margin-top: 16px; max-width: 480px; }
    form.lead label { font-size: 0.75rem; font-weight: 600; color: #d4d4d8; }
    form.lead input, form.lead textarea {
      width: 100%; border: 1px solid rgba(255,255,255,0.1); border-radius: 12px;
      background: rgba(255,255,255,0.05); color: #fafafa;
      padding: 8px 12px; font-size: 0.9rem;
    }
    form.lead button {
      border: 0; border-radius: 12px; background: #fbbf24; color: #18181b;
      font-weight: 600; padding: 10px 16px; cursor: pointer;
    }
    form.lead button:disabled { opacity: 0.6; cursor: wait; }
    .form-status { font-size: 0.85rem; min-height: 1.2em; }
    .form-status.error { color: #fca5a5; }
    .form-status.success { color: #86efac; }
    footer {
      max-width: 960px; margin: 0 auto; padding: 24px 16px;
      border-top: 1px solid rgba(255,255,255,0.05);
      font-size: 0.85rem; color: #a1a1aa;
    }
"#;

// Dismissal is client-local persisted state: read-or-default-show on load,
// write on dismiss. The server renders the banner unconditionally.
const BANNER_SCRIPT: &str = r#"
    (function () {
      var KEY = 'announcement:dismissed';
      var banner = document.getElementById('announcement');
      if (!banner) return;
      var dismissed = 'false';
      try { dismissed = window.localStorage.getItem(KEY) || 'false'; } catch (e) {}
      if (dismissed === 'true') { banner.remove(); return; }
      banner.hidden = false;
      var btn = banner.querySelector('button');
      if (btn) btn.addEventListener('click', function () {
        try { window.localStorage.setItem(KEY, 'true'); } catch (e) {}
        banner.remove();
      });
    })();
"#;

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_banner(cfg: &Config) -> String {
    if cfg.announcement.trim().is_empty() {
        return String::new();
    }
    format!(
        r#"<div class="banner" id="announcement" hidden>
  <p>&#9889; {}</p>
  <button aria-label="Dismiss announcement">&#10005;</button>
</div>
<script>{}</script>"#,
        escape_html(&cfg.announcement),
        BANNER_SCRIPT
    )
}

fn render_nav() -> String {
    let links: Vec<String> = NAV_LINKS
        .iter()
        .map(|(href, label)| format!(r#"<a href="{}">{}</a>"#, href, label))
        .collect();
    format!("<nav>{}</nav>", links.join("\n  "))
}

fn render_footer() -> String {
    let year = dates::year_of_epoch(crate::now_ts() as i64);
    format!("<footer><p>&copy; {} {}</p></footer>", year, SITE_OWNER)
}

/// Wrap a page body in the shared document chrome.
pub fn render_layout(cfg: &Config, title: &str, description: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title} &middot; {owner}</title>
  <meta name="description" content="{description}">
  <style>{styles}</style>
</head>
<body>
{banner}
{nav}
<main>
{body}
</main>
{footer}
</body>
</html>"#,
        title = escape_html(title),
        owner = SITE_OWNER,
        description = escape_html(description),
        styles = BASE_STYLES,
        banner = render_banner(cfg),
        nav = render_nav(),
        body = body,
        footer = render_footer(),
    )
}

pub fn html_response(status: u16, html: String) -> Response {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(html)
        .build()
}

pub fn page_response(cfg: &Config, title: &str, description: &str, body: &str) -> Response {
    html_response(200, render_layout(cfg, title, description, body))
}

pub fn not_found(cfg: &Config) -> Response {
    let body = r#"<section class="hero">
  <h1>Not found</h1>
  <p>That page does not exist. <a href="/">Head back home.</a></p>
</section>"#;
    html_response(404, render_layout(cfg, "Not found", "Page not found", body))
}
