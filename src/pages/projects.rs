// src/pages/projects.rs

use spin_sdk::http::Response;

use crate::config::Config;

use super::page_response;

struct AppProject {
    name: &'static str,
    subtitle: &'static str,
    description: &'static str,
    highlights: &'static [&'static str],
}

const APPS: &[AppProject] = &[
    AppProject {
        name: "Dose Planner",
        subtitle: "Protocol tracker",
        description: "A companion app for managing recurring medication \
protocols. Log doses, review trends, and keep a clean dashboard of what's \
next.",
        highlights: &["Dose logs", "Custom schedules", "Trend charts"],
    },
    AppProject {
        name: "Mix Calculator",
        subtitle: "Lab math, simplified",
        description: "Small calculator for reconstitution math with shareable \
presets, built after answering the same question one too many times.",
        highlights: &["Preset library", "Unit conversion", "Offline-first"],
    },
];

const OSS: &[(&str, &str)] = &[
    (
        "edge-gate",
        "The request gate that fronts this site: country allow-list, exempt paths, and a friendly blocked page.",
    ),
    (
        "kv-posts",
        "Tiny KV-backed blog store with defensive document normalization.",
    ),
];

pub fn handle(cfg: &Config) -> Response {
    let app_cards: String = APPS
        .iter()
        .map(|app| {
            let tags: String = app
                .highlights
                .iter()
                .map(|h| format!(r#"<span class="tag">{h}</span>"#))
                .collect::<Vec<_>>()
                .join(" ");
            format!(
                r#"  <div class="card">
    <h3>{} &middot; <span class="meta">{}</span></h3>
    <p>{}</p>
    <p>{}</p>
  </div>"#,
                app.name, app.subtitle, app.description, tags
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let oss_cards: String = OSS
        .iter()
        .map(|(name, description)| {
            format!(
                r#"  <div class="card">
    <h3>{name}</h3>
    <p>{description}</p>
  </div>"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        r#"<section class="hero">
  <p class="pill">Projects</p>
  <h1>Apps and open source.</h1>
  <p>Things I've shipped and things I tinker with in public.</p>
</section>
<section class="grid">
{app_cards}
</section>
<article class="section">
  <h2>Open source</h2>
  <div class="grid">
{oss_cards}
  </div>
</article>"#
    );

    page_response(cfg, "Projects", "Apps and open-source projects.", &body)
}
