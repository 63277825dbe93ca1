use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use stow_core::{Result, StowError};

thread_local! {
    static STANDARD: Defaults = Defaults::new();
}

/// Keyed key/value table shared by the app and the platform status bar.
///
/// Cloning yields another handle to the same table. The table is
/// single-threaded: all access happens on the main thread.
#[derive(Clone, Default)]
pub struct Defaults {
    inner: Rc<RefCell<Inner>>,
}

#[derive(Default)]
struct Inner {
    values: BTreeMap<String, Value>,
    /// Backing file, if the table was loaded from disk.
    path: Option<PathBuf>,
}

impl Defaults {
    /// An empty, in-memory table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide table.
    pub fn standard() -> Self {
        STANDARD.with(Defaults::clone)
    }

    /// Load a table from a JSON file. A missing file yields an empty table
    /// that will be written to `path` on [`Defaults::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let values = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            serde_json::from_str(&raw).map_err(|e| {
                StowError::Store(format!("cannot parse '{}': {e}", path.display()))
            })?
        } else {
            tracing::debug!("No defaults file at '{}'; starting empty.", path.display());
            BTreeMap::new()
        };

        Ok(Self {
            inner: Rc::new(RefCell::new(Inner {
                values,
                path: Some(path.to_path_buf()),
            })),
        })
    }

    /// Replace this table's contents with `other`'s and adopt its backing
    /// file. Every handle to this table sees the new contents.
    pub fn replace_with(&self, other: &Defaults) {
        let (values, path) = {
            let other = other.inner.borrow();
            (other.values.clone(), other.path.clone())
        };
        let mut inner = self.inner.borrow_mut();
        inner.values = values;
        inner.path = path;
    }

    /// Write the table to its backing file. No-op for in-memory tables.
    pub fn save(&self) -> Result<()> {
        let inner = self.inner.borrow();
        let Some(path) = &inner.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&inner.values)
            .map_err(|e| StowError::Store(format!("cannot encode defaults: {e}")))?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.borrow().values.contains_key(key)
    }

    /// Numeric value stored under `key`. Absent or non-numeric = `None`.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.inner.borrow().values.get(key).and_then(Value::as_f64)
    }

    /// Store `value` under `key`, or remove the entry when `value` is `None`.
    pub fn set_f64(&self, key: &str, value: Option<f64>) {
        let mut inner = self.inner.borrow_mut();
        match value {
            Some(value) => {
                inner.values.insert(key.to_string(), Value::from(value));
            }
            None => {
                inner.values.remove(key);
            }
        }
    }

    pub fn remove(&self, key: &str) {
        self.inner.borrow_mut().values.remove(key);
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().values.is_empty()
    }
}

impl std::fmt::Debug for Defaults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Defaults")
            .field("path", &inner.path)
            .field("entries", &inner.values.len())
            .finish()
    }
}

/// Accessor for the preferred position the status bar keeps for each
/// autosave name: the item's distance from the trailing screen edge.
pub struct PreferredPosition;

impl PreferredPosition {
    pub const KEY_PREFIX: &'static str = "NSStatusItem Preferred Position";

    pub fn key(autosave_name: &str) -> String {
        format!("{} {autosave_name}", Self::KEY_PREFIX)
    }

    /// Stored position, or `None` when no entry exists. A stored zero is
    /// returned as `Some(0.0)`.
    pub fn get(defaults: &Defaults, autosave_name: &str) -> Option<f64> {
        defaults.get_f64(&Self::key(autosave_name))
    }

    /// Store `position`, clearing the entry when it is `None`.
    pub fn set(defaults: &Defaults, autosave_name: &str, position: Option<f64>) {
        defaults.set_f64(&Self::key(autosave_name), position);
    }
}
