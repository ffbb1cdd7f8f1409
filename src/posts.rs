// src/posts.rs
// Blog documents. Raw docs live in the KV store under post:<id> keys with
// loosely-shaped JSON; everything is normalized once, here, at the read
// boundary. Nothing past this module sees unnormalized data.

use serde_json::Value;

use crate::dates;
use crate::input_validation::clamp;
use crate::store::KeyValueStore;

pub const POST_KEY_PREFIX: &str = "post:";
pub const MAX_LISTED_POSTS: usize = 50;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_EXCERPT_LEN: usize = 220;
pub const MAX_CONTENT_LEN: usize = 64 * 1024;
pub const MAX_TAGS: usize = 10;

/// A blog post after boundary normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub published: bool,
    /// ISO-8601 strings; missing or uncoercible dates stay None.
    pub published_at: Option<String>,
    pub updated_at: Option<String>,
    pub content: String,
}

fn coerce_text(value: Option<&Value>, max: usize) -> String {
    let raw = match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    clamp(raw.trim(), max)
}

/// Accepts an ISO string, epoch seconds, or a Firestore-style
/// {seconds: n} map. Anything else is treated as absent.
fn coerce_timestamp(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => n.as_i64().map(dates::epoch_to_iso),
        Value::Object(map) => map
            .get("seconds")
            .and_then(Value::as_i64)
            .map(dates::epoch_to_iso),
        _ => None,
    }
}

fn coerce_tags(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => {
                let t = s.trim();
                (!t.is_empty()).then(|| t.to_string())
            }
            _ => None,
        })
        .take(MAX_TAGS)
        .collect()
}

impl Post {
    /// Normalize one raw document. The slug falls back to the doc id; a doc
    /// that ends up with an empty slug is unusable and dropped by callers.
    pub fn from_raw(id: &str, raw: &Value) -> Post {
        let slug = {
            let s = coerce_text(raw.get("slug"), MAX_TITLE_LEN);
            if s.is_empty() {
                id.trim().to_string()
            } else {
                s
            }
        };
        let title = {
            let t = coerce_text(raw.get("title"), MAX_TITLE_LEN);
            if t.is_empty() {
                "Untitled".to_string()
            } else {
                t
            }
        };
        let excerpt = {
            let e = coerce_text(raw.get("excerpt"), MAX_EXCERPT_LEN);
            if e.is_empty() {
                coerce_text(raw.get("summary"), MAX_EXCERPT_LEN)
            } else {
                e
            }
        };

        Post {
            id: id.to_string(),
            slug,
            title,
            excerpt,
            tags: coerce_tags(raw.get("tags")),
            published: raw.get("published").and_then(Value::as_bool).unwrap_or(false),
            published_at: coerce_timestamp(raw.get("publishedAt")),
            updated_at: coerce_timestamp(raw.get("updatedAt")),
            content: coerce_text(raw.get("content"), MAX_CONTENT_LEN),
        }
    }

    fn sort_key(&self) -> i64 {
        self.published_at
            .as_deref()
            .and_then(dates::iso_to_epoch)
            .unwrap_or(i64::MIN)
    }
}

fn doc_id(key: &str) -> &str {
    key.strip_prefix(POST_KEY_PREFIX).unwrap_or(key)
}

fn load_all(store: &impl KeyValueStore) -> Vec<Post> {
    let Ok(keys) = store.get_keys() else {
        return Vec::new();
    };
    let mut posts = Vec::new();
    for key in keys {
        if !key.starts_with(POST_KEY_PREFIX) {
            continue;
        }
        let Ok(Some(bytes)) = store.get(&key) else {
            continue;
        };
        let Ok(raw) = serde_json::from_slice::<Value>(&bytes) else {
            eprintln!("[posts] skipping malformed document at {}", key);
            continue;
        };
        let post = Post::from_raw(doc_id(&key), &raw);
        if post.slug.is_empty() {
            continue;
        }
        posts.push(post);
    }
    posts
}

/// Published posts, newest publication first, capped at MAX_LISTED_POSTS.
/// Posts without a coercible publication date sort last.
pub fn list_published(store: &impl KeyValueStore) -> Vec<Post> {
    let mut posts: Vec<Post> = load_all(store).into_iter().filter(|p| p.published).collect();
    posts.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()).then_with(|| a.slug.cmp(&b.slug)));
    posts.truncate(MAX_LISTED_POSTS);
    posts
}

/// At most one post: slug-field match first, doc-id match as fallback,
/// mirroring how editors sometimes key documents by slug.
pub fn find_by_slug(store: &impl KeyValueStore, slug: &str) -> Option<Post> {
    let slug = slug.trim();
    if slug.is_empty() {
        return None;
    }
    let all = load_all(store);
    if let Some(post) = all.iter().find(|p| p.slug == slug) {
        return Some(post.clone());
    }
    all.into_iter().find(|p| p.id == slug)
}
