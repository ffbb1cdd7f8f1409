// src/store.rs
// Key-value store boundary. Handlers and readers are generic over this trait
// so unit tests run against an in-memory map instead of the Spin host store.

use spin_sdk::key_value::Store;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ()>;
    fn set(&self, key: &str, value: &[u8]) -> Result<(), ()>;
    fn delete(&self, key: &str) -> Result<(), ()>;
    fn get_keys(&self) -> Result<Vec<String>, ()> {
        Ok(Vec::new())
    }
}

impl KeyValueStore for Store {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ()> {
        Store::get(self, key).map_err(|_| ())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), ()> {
        Store::set(self, key, value).map_err(|_| ())
    }

    fn delete(&self, key: &str) -> Result<(), ()> {
        Store::delete(self, key).map_err(|_| ())
    }

    fn get_keys(&self) -> Result<Vec<String>, ()> {
        Store::get_keys(self).map_err(|_| ())
    }
}
