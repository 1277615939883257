//! Best-score persistence
//!
//! The simulation only sees [`ScoreStore`]. Backends keep the score as a
//! decimal string under a fixed key, the way the browser build does in
//! LocalStorage.

#[cfg(not(target_arch = "wasm32"))]
use std::collections::BTreeMap;
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

/// Key the best score is stored under
pub const BEST_SCORE_KEY: &str = "bestScore";

/// Durable best-score storage port
pub trait ScoreStore {
    /// Stored best score, `None` when absent
    fn read(&self) -> Option<u32>;
    /// Replace the stored best score
    fn write(&mut self, score: u32);
}

/// Parse a stored value; anything that is not a decimal integer reads as absent
pub fn parse_score(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<String>,
}

impl MemoryStore {
    pub fn with_best(score: u32) -> Self {
        Self {
            value: Some(score.to_string()),
        }
    }

    /// Store a raw string, as if written by something else
    pub fn with_raw(raw: &str) -> Self {
        Self {
            value: Some(raw.to_string()),
        }
    }
}

impl ScoreStore for MemoryStore {
    fn read(&self) -> Option<u32> {
        self.value.as_deref().and_then(parse_score)
    }

    fn write(&mut self, score: u32) {
        self.value = Some(score.to_string());
    }
}

/// Errors opening a file-backed store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a key-value JSON object: {source}")]
    Format {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// JSON file holding a string-to-string map (native builds)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    /// Open a store; a missing file starts empty
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let items = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).map_err(|source| StoreError::Format {
                path: path.display().to_string(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        log::info!("Opened score store at {}", path.display());
        Ok(Self { path, items })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) {
        let json = match serde_json::to_string_pretty(&self.items) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not encode score store: {e}");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, json) {
            log::warn!("Could not write {}: {e}", self.path.display());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for FileStore {
    fn read(&self) -> Option<u32> {
        self.items.get(BEST_SCORE_KEY).and_then(|raw| parse_score(raw))
    }

    fn write(&mut self, score: u32) {
        self.items.insert(BEST_SCORE_KEY.to_string(), score.to_string());
        self.flush();
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn read(&self) -> Option<u32> {
        let storage = Self::storage()?;
        match storage.get_item(BEST_SCORE_KEY) {
            Ok(Some(raw)) => parse_score(&raw),
            _ => None,
        }
    }

    fn write(&mut self, score: u32) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(BEST_SCORE_KEY, &score.to_string()).is_err() {
                log::warn!("LocalStorage rejected best score write");
            }
        } else {
            log::warn!("LocalStorage unavailable, best score not saved");
        }
    }
}
