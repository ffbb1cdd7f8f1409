// src/pages/home.rs

use spin_sdk::http::Response;

use crate::config::Config;

use super::{page_response, SITE_OWNER};

const QUICK_LINKS: &[(&str, &str, &str)] = &[
    ("/about", "About me", "If you'd like to know more about me, head over to my page."),
    ("/now", "Now", "See what's currently going on with me."),
    ("/meetup", "Meetup", "Join the weekly live stream and community meetup."),
    ("/consulting", "Consulting", "I do hourly consultations in my free time. Book yours."),
    ("/blog", "Blog", "Notes on software, products, and building in public."),
    ("/projects", "Projects", "Apps and open-source work, with links to try them."),
];

pub fn handle(cfg: &Config) -> Response {
    let cards: String = QUICK_LINKS
        .iter()
        .map(|(href, title, description)| {
            format!(
                r#"  <a class="card" href="{href}">
    <h2>{title}</h2>
    <p>{description}</p>
  </a>"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        r#"<section class="hero">
  <p class="pill">Open to collaboration &amp; consulting</p>
  <h1>Hi, I'm {SITE_OWNER}.</h1>
  <p>I build products, write about engineering, and run a weekly meetup.
  Have a look around, or reach out if you'd like to work together.</p>
</section>
<section class="grid">
{cards}
</section>"#
    );

    page_response(
        cfg,
        "Home",
        "Personal site: projects, writing, meetup, and consulting.",
        &body,
    )
}
