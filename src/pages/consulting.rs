// src/pages/consulting.rs

use spin_sdk::http::Response;

use crate::config::Config;

use super::page_response;

const MODAL_SCRIPT: &str = r#"
    (function () {
      var modal = document.getElementById('hourly-modal');
      var open = document.getElementById('book-session');
      if (!modal || !open) return;

      function setOpen(on) {
        modal.hidden = !on;
        document.body.style.overflow = on ? 'hidden' : '';
      }

      open.addEventListener('click', function () { setOpen(true); });
      modal.addEventListener('click', function (e) {
        if (e.target === modal || e.target.dataset.close !== undefined) setOpen(false);
      });
      document.addEventListener('keydown', function (e) {
        if (e.key === 'Escape' && !modal.hidden) setOpen(false);
      });
    })();
"#;

const MODAL_STYLES: &str = r#"
    #hourly-modal {
      position: fixed; inset: 0; background: rgba(0,0,0,0.7);
      display: flex; align-items: center; justify-content: center; padding: 16px;
    }
    #hourly-modal .card { max-width: 420px; background: #18181b; }
"#;

pub fn handle(cfg: &Config) -> Response {
    let body = format!(
        r#"<style>{MODAL_STYLES}</style>
<section class="hero">
  <p class="pill">Consulting</p>
  <h1>Consulting</h1>
  <p>Take one step at a time. Hourly sessions on product engineering,
  shipping strategy, and unsticking stuck projects.</p>
  <p style="margin-top:16px">
    <button class="tag" id="book-session" type="button">Book a session</button>
    <a class="tag" href="/projects">View projects</a>
  </p>
</section>
<article class="section">
  <h2>What a session looks like</h2>
  <p>One hour, screen-share friendly, and focused on the narrowest next step
  that moves your project. You leave with written notes and a concrete plan.</p>
</article>
<div id="hourly-modal" hidden>
  <div class="card">
    <h3>Hourly session</h3>
    <p>Sessions are booked by email. Write to
    <a href="mailto:hello@example.com">hello@example.com</a> with a couple of
    times that work for you and a sentence about the problem.</p>
    <p style="margin-top:12px"><button class="tag" data-close type="button">Close</button></p>
  </div>
</div>
<script>{MODAL_SCRIPT}</script>"#
    );

    page_response(cfg, "Consulting", "Hourly consulting sessions.", &body)
}
