// ── Session storage contract ──
//
// Key-value storage that survives a restart of the front end. Credentials
// live under `CREDENTIALS_KEY` until logout; `REDIRECT_KEY` holds the path to
// reopen and is consumed by the first router built after it was written.

use std::cell::RefCell;
use std::collections::HashMap;

/// Persisted `lanportal_api::Credentials`, as JSON.
pub const CREDENTIALS_KEY: &str = "credentials";

/// One-shot path the next router starts on.
pub const REDIRECT_KEY: &str = "redirect";

/// String key-value storage scoped to one user session.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str);

    fn remove(&self, key: &str);

    /// Read `key` and clear it in the same step.
    fn take(&self, key: &str) -> Option<String> {
        let value = self.get(key)?;
        self.remove(key);
        Some(value)
    }
}

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.values.borrow_mut().remove(key);
    }
}
