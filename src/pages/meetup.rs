// src/pages/meetup.rs

use spin_sdk::http::Response;

use crate::config::Config;

use super::page_response;

// Plain-JS progressive form: client-side checks mirror the server rules,
// but the server remains the authority.
const SIGNUP_SCRIPT: &str = r#"
    (function () {
      var form = document.getElementById('signup-form');
      if (!form) return;
      var status = document.getElementById('signup-status');
      var button = form.querySelector('button');

      function show(kind, message) {
        status.className = 'form-status ' + kind;
        status.textContent = message;
      }

      form.addEventListener('submit', function (e) {
        e.preventDefault();
        var name = form.elements.name.value.trim();
        var email = form.elements.email.value.trim();

        if (name.length < 2 || name.length > 80) {
          show('error', 'Please enter your name (2-80 characters).');
          return;
        }
        if (!/^[^\s@]+@[^\s@]+\.[^\s@]+$/.test(email) || email.length > 200) {
          show('error', 'Please enter a valid email address.');
          return;
        }

        button.disabled = true;
        show('', '');
        fetch('/api/newsletter/signup', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ name: name, email: email })
        })
          .then(function (res) { return res.json(); })
          .then(function (data) {
            if (data.ok) {
              show('success', data.message || "You're signed up!");
              form.reset();
            } else {
              show('error', data.error || 'Something went wrong. Please try again.');
            }
          })
          .catch(function () { show('error', 'Network error. Please try again.'); })
          .finally(function () { button.disabled = false; });
      });
    })();
"#;

pub fn handle(cfg: &Config) -> Response {
    let body = format!(
        r#"<section class="hero">
  <p class="pill">Weekly</p>
  <h1>Meet Up</h1>
  <p>Let's learn and build community online. Sundays at 1:00pm Eastern.</p>
</section>
<article class="section">
  <p>Every Sunday afternoon I run a one-hour live stream about programming.
  The sessions are informal and interactive; bring a topic if you have one.</p>
  <p>Fill out the form and you'll receive an email with a calendar link to
  join the call.</p>
  <form class="lead" id="signup-form">
    <div>
      <label for="signup-name">Name</label>
      <input id="signup-name" name="name" placeholder="Your Name" autocomplete="name" maxlength="80">
    </div>
    <div>
      <label for="signup-email">Email</label>
      <input id="signup-email" name="email" type="email" placeholder="you@example.com" autocomplete="email" maxlength="200">
    </div>
    <button type="submit">Sign up</button>
    <p class="form-status" id="signup-status"></p>
  </form>
</article>
<script>{SIGNUP_SCRIPT}</script>"#
    );

    page_response(
        cfg,
        "Weekly Meet Up",
        "Live stream meetup every Sunday at 1:00pm Eastern.",
        &body,
    )
}
