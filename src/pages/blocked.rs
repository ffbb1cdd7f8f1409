// src/pages/blocked.rs
// The denial surface for the redirect strategy. Carries the access-request
// form; its submit endpoint and this page are both exempt from the gate so
// blocked visitors can actually ask for access.

use std::env;

use spin_sdk::http::Response;

use crate::config::Config;

use super::{escape_html, page_response};

const FORM_SCRIPT: &str = r#"
    (function () {
      var form = document.getElementById('access-form');
      if (!form) return;
      var status = document.getElementById('access-status');
      var button = form.querySelector('button[type=submit]');
      var captchaToken = '';

      window.onTurnstileSuccess = function (token) { captchaToken = token; };
      window.onTurnstileExpired = function () { captchaToken = ''; };
      window.onTurnstileError = function () { captchaToken = ''; };

      function show(kind, message) {
        status.className = 'form-status ' + kind;
        status.textContent = message;
      }

      form.addEventListener('submit', function (e) {
        e.preventDefault();
        var values = {
          name: form.elements.name.value.trim(),
          email: form.elements.email.value.trim(),
          company: form.elements.company.value.trim(),
          message: form.elements.message.value.trim(),
          captchaToken: captchaToken
        };

        if (values.name.length < 2 || values.name.length > 80) {
          show('error', 'Please enter your name (2-80 characters).');
          return;
        }
        if (!/^[^\s@]+@[^\s@]+\.[^\s@]+$/.test(values.email) || values.email.length > 200) {
          show('error', 'Please enter a valid email address.');
          return;
        }
        if (values.company.length > 120) {
          show('error', 'Company is too long (max 120 characters).');
          return;
        }
        if (values.message.length < 10 || values.message.length > 2000) {
          show('error', 'Please enter a message (10-2000 characters).');
          return;
        }
        if (!values.captchaToken) {
          show('error', 'Please complete the captcha.');
          return;
        }

        button.disabled = true;
        show('', '');
        fetch('/api/access-request', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify(values)
        })
          .then(function (res) { return res.json(); })
          .then(function (data) {
            if (data.ok) {
              show('success', 'Request received. We will be in touch.');
              form.reset();
            } else {
              show('error', data.error || 'Something went wrong. Please try again.');
              if (window.turnstile) window.turnstile.reset();
            }
          })
          .catch(function () { show('error', 'Network error. Please try again.'); })
          .finally(function () { button.disabled = false; });
      });
    })();
"#;

fn turnstile_site_key() -> String {
    env::var("TURNSTILE_SITE_KEY").unwrap_or_default()
}

pub fn handle(cfg: &Config) -> Response {
    let site_key = turnstile_site_key();
    let captcha_widget = if site_key.is_empty() {
        r#"<p class="form-status error">Captcha is not configured; requests cannot be submitted.</p>"#
            .to_string()
    } else {
        format!(
            r#"<div class="cf-turnstile" data-sitekey="{}"
      data-callback="onTurnstileSuccess"
      data-expired-callback="onTurnstileExpired"
      data-error-callback="onTurnstileError"></div>"#,
            escape_html(&site_key)
        )
    };

    let body = format!(
        r#"<section class="hero">
  <h1>Not available in your region</h1>
  <p>This site is currently accessible only in selected countries. If you
  think you should have access, send a request below.</p>
</section>
<article class="section">
  <h2>Request access</h2>
  <form class="lead" id="access-form">
    <div>
      <label for="access-name">Name</label>
      <input id="access-name" name="name" autocomplete="name" maxlength="80">
    </div>
    <div>
      <label for="access-email">Email</label>
      <input id="access-email" name="email" type="email" autocomplete="email" maxlength="200">
    </div>
    <div>
      <label for="access-company">Company (optional)</label>
      <input id="access-company" name="company" autocomplete="organization" maxlength="120">
    </div>
    <div>
      <label for="access-message">Message</label>
      <textarea id="access-message" name="message" rows="5" maxlength="2000"
        placeholder="Where are you visiting from, and why do you need access?"></textarea>
    </div>
    {captcha_widget}
    <button type="submit">Send request</button>
    <p class="form-status" id="access-status"></p>
  </form>
</article>
<script src="https://challenges.cloudflare.com/turnstile/v0/api.js" async defer></script>
<script>{FORM_SCRIPT}</script>"#
    );

    page_response(
        cfg,
        "Not available in your region",
        "This site is accessible only in selected countries.",
        &body,
    )
}
