// src/test_support.rs

use once_cell::sync::Lazy;
use spin_sdk::http::{Method, Request, Response};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
pub(crate) struct InMemoryStore {
    map: Mutex<HashMap<String, Vec<u8>>>,
}

impl crate::store::KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ()> {
        let map = self
            .map
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), ()> {
        let mut map = self
            .map
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        map.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), ()> {
        let mut map = self
            .map
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        map.remove(key);
        Ok(())
    }

    fn get_keys(&self) -> Result<Vec<String>, ()> {
        let map = self
            .map
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(map.keys().cloned().collect())
    }
}

// Env vars are process-global; tests that touch them serialize here.
static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub(crate) fn lock_env() -> MutexGuard<'static, ()> {
    ENV_MUTEX
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) fn request_with_headers(path: &str, headers: &[(&str, &str)]) -> Request {
    request_with_method_and_headers(Method::Get, path, headers, Vec::new())
}

pub(crate) fn request_with_method_and_headers(
    method: Method,
    path: &str,
    headers: &[(&str, &str)],
    body: Vec<u8>,
) -> Request {
    let mut builder = Request::builder();
    builder.method(method).uri(path);
    for (key, value) in headers {
        builder.header(*key, *value);
    }
    builder.body(body);
    builder.build()
}

pub(crate) fn json_post(path: &str, headers: &[(&str, &str)], body: &str) -> Request {
    let mut all_headers = vec![("content-type", "application/json")];
    all_headers.extend_from_slice(headers);
    request_with_method_and_headers(Method::Post, path, &all_headers, body.as_bytes().to_vec())
}

pub(crate) fn body_string(resp: &Response) -> String {
    String::from_utf8_lossy(resp.body()).to_string()
}
