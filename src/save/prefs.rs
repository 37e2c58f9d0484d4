//! Key-value preference storage
//!
//! Small process-local key-value store backing all persisted progress.
//! Entries are strings; the progress layer serializes its records into them.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

/// Errors from the persistence backend; recoverable, never fatal to the game
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Storage backend for preference keys.
///
/// Reads come from an in-memory view; `flush` pushes the whole view to the
/// underlying medium. Callers flush after every mutation they want to survive
/// a process kill.
pub trait PrefsBackend {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: String);
    fn flush(&mut self) -> Result<(), PersistError>;
}

/// In-memory backend for tests and headless use.
///
/// Clones share the same underlying map, so a handle kept aside observes
/// every write made through the store.
#[derive(Debug, Clone, Default)]
pub struct MemoryPrefs {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefsBackend for MemoryPrefs {
    fn read(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn write(&mut self, key: &str, value: String) {
        self.values.borrow_mut().insert(key.to_string(), value);
    }

    fn flush(&mut self) -> Result<(), PersistError> {
        Ok(())
    }
}

/// File-backed backend: a single JSON map on disk
#[derive(Debug)]
pub struct FilePrefs {
    path: PathBuf,
    values: HashMap<String, String>,
}

/// Get the default prefs file path
fn prefs_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "hiddengrove", "Hiddengrove") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("prefs.json");
        path
    } else {
        PathBuf::from("./prefs.json")
    }
}

impl FilePrefs {
    /// Open the prefs file at the platform default location
    pub fn open_default() -> Self {
        Self::open(prefs_path())
    }

    /// Open a prefs file at an explicit path, reading existing values.
    ///
    /// A missing file is a fresh store; a malformed one is discarded with a
    /// warning, since losing preferences is preferable to refusing to boot.
    pub fn open(path: PathBuf) -> Self {
        let values = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(data) => match serde_json::from_str(&data) {
                    Ok(values) => values,
                    Err(e) => {
                        log::warn!("Failed to parse prefs file: {}, starting empty", e);
                        HashMap::new()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read prefs file: {}, starting empty", e);
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };
        Self { path, values }
    }
}

impl PrefsBackend for FilePrefs {
    fn read(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn flush(&mut self) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| PersistError::Io(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(&self.values)
            .map_err(|e| PersistError::Parse(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| PersistError::Io(e.to_string()))?;
        Ok(())
    }
}
