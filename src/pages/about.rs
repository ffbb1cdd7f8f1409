// src/pages/about.rs

use spin_sdk::http::Response;

use crate::config::Config;

use super::page_response;

const BODY: &str = r#"<section class="hero">
  <p class="pill">About</p>
  <h1>A little more about me.</h1>
  <p>Background, approach, and what drives the work.</p>
</section>
<article class="section">
  <h2>Experience</h2>
  <p>Over a decade of building and shipping software across systems
  integration, product engineering, and security-minded project work. Most of
  that time was spent close to the boundary where products meet
  infrastructure: build pipelines, APIs, and the operational glue between
  them.</p>
</article>
<article class="section">
  <h2>How I work</h2>
  <p>The projects I take on are industry-agnostic; what pulls me in is
  whether an idea can be turned into something executable. I care about
  small, verifiable steps, honest error handling, and writing things down so
  the next person is not guessing.</p>
</article>
<article class="section">
  <h2>Outside of work</h2>
  <p>Weekly live streams, long walks with two very important dogs, and an
  ever-growing reading queue.</p>
</article>"#;

pub fn handle(cfg: &Config) -> Response {
    page_response(cfg, "About", "Background and approach.", BODY)
}
