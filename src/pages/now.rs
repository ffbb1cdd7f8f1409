// src/pages/now.rs

use spin_sdk::http::Response;

use crate::config::Config;

use super::page_response;

const SECTIONS: &[(&str, &[&str])] = &[
    ("Currently building", &["Dose Planner v2", "This site's edge gate"]),
    ("Languages", &["Rust", "JavaScript", "Ruby"]),
    ("Current stack", &["Spin", "Key-value storage", "Tailwind CSS"]),
    ("Learning", &["WASM components", "Typed document stores"]),
    ("Gear", &["Sony A7 III", "A well-worn mechanical keyboard"]),
];

pub fn handle(cfg: &Config) -> Response {
    let sections: String = SECTIONS
        .iter()
        .map(|(title, items)| {
            let list: String = items
                .iter()
                .map(|item| format!("    <li>{item}</li>"))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                r#"<article class="section">
  <h2>{title}</h2>
  <ul>
{list}
  </ul>
</article>"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        r#"<section class="hero">
  <p class="pill">Now</p>
  <h1>What I'm up to.</h1>
  <p>A living snapshot, updated when things change. Inspired by the
  <a href="https://nownownow.com/about">/now page movement</a>.</p>
</section>
{sections}"#
    );

    page_response(cfg, "Now", "What I'm up to right now.", &body)
}
