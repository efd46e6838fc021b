// ── File-backed session store ──
//
// A flat JSON object on disk, rewritten on every mutation. Losing the file
// only logs the user out, so IO and parse failures are logged and the store
// carries on in memory.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lanportal_core::SessionStore;
use tracing::{debug, warn};

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: RefCell<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, reading whatever a previous run left there.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring unreadable session file");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read session file");
                BTreeMap::new()
            }
        };
        debug!(path = %path.display(), keys = values.len(), "session store opened");
        Self {
            path,
            values: RefCell::new(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) {
        if let Err(e) = self.write() {
            warn!(path = %self.path.display(), error = %e, "cannot write session file");
        }
    }

    fn write(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&*self.values.borrow())?;
        std::fs::write(&self.path, raw)
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        self.flush();
    }

    fn remove(&self, key: &str) {
        let removed = self.values.borrow_mut().remove(key).is_some();
        if removed {
            self.flush();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lanportal_core::{CREDENTIALS_KEY, REDIRECT_KEY};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("session.json");

        let store = FileStore::open(&path);
        store.set(CREDENTIALS_KEY, "{\"biscuit\":\"t\"}");
        store.set(REDIRECT_KEY, "/admin");

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get(CREDENTIALS_KEY).as_deref(), Some("{\"biscuit\":\"t\"}"));
        assert_eq!(reopened.take(REDIRECT_KEY).as_deref(), Some("/admin"));

        // The one-shot key is gone for the next run too.
        assert_eq!(FileStore::open(&path).get(REDIRECT_KEY), None);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get(CREDENTIALS_KEY), None);

        store.set(CREDENTIALS_KEY, "x");
        assert_eq!(FileStore::open(&path).get(CREDENTIALS_KEY).as_deref(), Some("x"));
    }

    #[test]
    fn unwritable_path_keeps_values_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes every write fail.
        let store = FileStore::open(dir.path());
        store.set(REDIRECT_KEY, "/login");
        assert_eq!(store.get(REDIRECT_KEY).as_deref(), Some("/login"));
    }
}
