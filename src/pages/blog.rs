// src/pages/blog.rs
// Blog index and post detail, rendered from normalized store documents.

use spin_sdk::http::Response;

use crate::config::Config;
use crate::dates;
use crate::posts::{self, Post};
use crate::store::KeyValueStore;

use super::{escape_html, not_found, page_response};

fn render_tags(tags: &[String], limit: usize) -> String {
    tags.iter()
        .take(limit)
        .map(|t| format!(r#"<span class="tag">{}</span>"#, escape_html(t)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_card(post: &Post) -> String {
    let date = post
        .published_at
        .as_deref()
        .map(dates::format_date_short)
        .unwrap_or_default();
    let excerpt = if post.excerpt.is_empty() {
        "Read more\u{2026}".to_string()
    } else {
        escape_html(&post.excerpt)
    };
    format!(
        r#"  <a class="card" href="/blog/{slug}">
    <h2>{title}</h2>
    <p>{excerpt}</p>
    <p><span class="meta">{date}</span> {tags}</p>
  </a>"#,
        slug = escape_html(&post.slug),
        title = escape_html(&post.title),
        excerpt = excerpt,
        date = escape_html(&date),
        tags = render_tags(&post.tags, 3),
    )
}

pub fn handle_index(store: &impl KeyValueStore, cfg: &Config) -> Response {
    let published = posts::list_published(store);

    let listing = if published.is_empty() {
        r#"<article class="section"><p>No posts yet.</p></article>"#.to_string()
    } else {
        let cards: String = published
            .iter()
            .map(render_card)
            .collect::<Vec<_>>()
            .join("\n");
        format!("<section class=\"grid\">\n{}\n</section>", cards)
    };

    let body = format!(
        r#"<section class="hero">
  <p class="pill">Blog</p>
  <h1>Writing</h1>
  <p>Notes from building products, engineering, consulting, and whatever
  I'm currently obsessed with.</p>
</section>
<section>
  <p class="meta" style="margin-top:32px">{count} posts</p>
{listing}
</section>"#,
        count = published.len(),
        listing = listing,
    );

    page_response(
        cfg,
        "Blog",
        "Writing on software, products, and building in public.",
        &body,
    )
}

// Plain-text content: blank lines split paragraphs, everything is escaped.
fn render_content(content: &str) -> String {
    let blocks: Vec<&str> = content
        .split("\n\n")
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .collect();
    if blocks.is_empty() {
        return "<p>No content yet.</p>".to_string();
    }
    blocks
        .iter()
        .map(|b| format!("<p>{}</p>", escape_html(b)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn handle_post(store: &impl KeyValueStore, cfg: &Config, slug: &str) -> Response {
    let Some(post) = posts::find_by_slug(store, slug) else {
        return not_found(cfg);
    };
    if !post.published {
        return not_found(cfg);
    }

    let published = post
        .published_at
        .as_deref()
        .map(dates::format_date_long)
        .unwrap_or_default();
    let updated = post
        .updated_at
        .as_deref()
        .map(dates::format_date_long)
        .filter(|d| !d.is_empty())
        .map(|d| format!(r#"<span class="tag">Updated {}</span>"#, escape_html(&d)))
        .unwrap_or_default();
    let excerpt_html = if post.excerpt.is_empty() {
        String::new()
    } else {
        format!("<p>{}</p>", escape_html(&post.excerpt))
    };

    let body = format!(
        r#"<p><a class="tag" href="/blog">&larr; Back</a></p>
<section class="hero" style="margin-top:16px">
  <p><span class="meta">{published}</span> {updated}</p>
  <h1>{title}</h1>
  {excerpt}
  <p>{tags}</p>
</section>
<article class="section">
{content}
</article>"#,
        published = escape_html(&published),
        updated = updated,
        title = escape_html(&post.title),
        excerpt = excerpt_html,
        tags = render_tags(&post.tags, posts::MAX_TAGS),
        content = render_content(&post.content),
    );

    let description = if post.excerpt.is_empty() {
        "Blog post".to_string()
    } else {
        post.excerpt.clone()
    };
    page_response(cfg, &post.title, &description, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_splits_on_blank_lines_and_escapes() {
        let html = render_content("first para\n\nsecond <b>para</b>");
        assert_eq!(html, "<p>first para</p>\n<p>second &lt;b&gt;para&lt;/b&gt;</p>");
    }

    #[test]
    fn empty_content_gets_placeholder() {
        assert_eq!(render_content("  \n\n "), "<p>No content yet.</p>");
    }
}
