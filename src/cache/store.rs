//! Cache store for persisting API responses to disk
//!
//! Provides a `CacheStore` that keeps every fetched resource body in a single
//! JSON document keyed by its full request URL. The whole document is read on
//! every lookup and rewritten on every save.

use directories::ProjectDirs;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Default file name for the cache document
pub const CACHE_FILE_NAME: &str = "cache.json";

/// A single cached resource body, or `None` for a fetch that failed
pub type ResourceRecord = Option<Value>;

/// The whole cache file: resource URL -> resource body
pub type CacheDocument = BTreeMap<String, ResourceRecord>;

/// Errors that can occur when reading or writing the cache file
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache file could not be opened for writing
    #[error("Cache could not be opened: {}", path.display())]
    CacheUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading or writing the cache file failed
    #[error("Cache I/O failed for {}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The cache file does not hold a JSON object
    #[error("Cache file {} is not a JSON object: {}", path.display(), source)]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads and writes the JSON cache document
///
/// Entries are merged, never replaced: once a URL holds a body, later saves
/// for the same URL keep the existing body.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Location of the cache document
    path: PathBuf,
}

impl CacheStore {
    /// Creates a CacheStore backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a CacheStore at `cache.json` in the current working directory
    ///
    /// Falls back to a relative `cache.json` if the working directory cannot be read.
    pub fn in_current_dir() -> Self {
        let dir = std::env::current_dir().unwrap_or_default();
        Self::new(dir.join(CACHE_FILE_NAME))
    }

    /// Creates a CacheStore in the XDG-compliant cache directory
    ///
    /// Uses `~/.cache/pokewrap/cache.json` on Linux, or the equivalent path on other platforms.
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn in_user_cache_dir() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "pokewrap")?;
        Some(Self::new(project_dirs.cache_dir().join(CACHE_FILE_NAME)))
    }

    /// Returns the path of the cache document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the whole cache document
    ///
    /// A missing file is an empty document. A file that is locked by another
    /// process (`WouldBlock`) is also read as empty; any other I/O failure is
    /// returned.
    pub fn load(&self) -> Result<CacheDocument, CacheError> {
        self.read_document(true)
    }

    /// Merges new entries into the cache document and rewrites the file
    ///
    /// An entry is inserted only if its record is present and its URL is not
    /// already holding a body. Absent records are never written.
    ///
    /// The file is rewritten in full, so a document that cannot be read
    /// because it is locked is not treated as empty here.
    ///
    /// # Returns
    /// * `Ok(usize)` - number of entries inserted
    /// * `Err(CacheError::CacheUnavailable)` - the file is locked or could not be opened for writing
    pub fn merge_and_save(&self, new_entries: &CacheDocument) -> Result<usize, CacheError> {
        let mut document = self.read_document(false)?;
        let inserted = merge(&mut document, new_entries);
        self.save(&document)?;

        debug!(
            path = %self.path.display(),
            inserted,
            total = document.len(),
            "cache saved"
        );
        Ok(inserted)
    }

    fn read_document(&self, degrade_on_lock: bool) -> Result<CacheDocument, CacheError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => return classify_read_error(&self.path, e, degrade_on_lock),
        };

        // A file that was created but never written
        if content.trim().is_empty() {
            return Ok(CacheDocument::new());
        }

        serde_json::from_str(&content).map_err(|source| CacheError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Writes the full document, truncating whatever the file held before
    pub fn save(&self, document: &CacheDocument) -> Result<(), CacheError> {
        self.ensure_dir()?;

        let file = File::create(&self.path).map_err(|source| CacheError::CacheUnavailable {
            path: self.path.clone(),
            source,
        })?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, document).map_err(|e| CacheError::Io {
            path: self.path.clone(),
            source: e.into(),
        })?;
        writer.flush().map_err(|source| CacheError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Ensures the directory holding the cache file exists
    fn ensure_dir(&self) -> Result<(), CacheError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                fs::create_dir_all(dir).map_err(|source| CacheError::CacheUnavailable {
                    path: self.path.clone(),
                    source,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Decides whether a failed read still yields a document
///
/// A missing file is always an empty document. A locked file is empty only
/// when `degrade_on_lock` is set, otherwise it is `CacheUnavailable`.
fn classify_read_error(
    path: &Path,
    error: io::Error,
    degrade_on_lock: bool,
) -> Result<CacheDocument, CacheError> {
    match error.kind() {
        io::ErrorKind::NotFound => Ok(CacheDocument::new()),
        io::ErrorKind::WouldBlock if degrade_on_lock => {
            debug!(path = %path.display(), "cache locked, reading as empty");
            Ok(CacheDocument::new())
        }
        io::ErrorKind::WouldBlock => Err(CacheError::CacheUnavailable {
            path: path.to_path_buf(),
            source: error,
        }),
        _ => Err(CacheError::Io {
            path: path.to_path_buf(),
            source: error,
        }),
    }
}

/// Inserts every present record whose URL has no body yet
///
/// A URL holding `null` from an earlier failed fetch may be filled in.
fn merge(document: &mut CacheDocument, new_entries: &CacheDocument) -> usize {
    let mut inserted = 0;
    for (url, record) in new_entries {
        let Some(body) = record else { continue };
        let slot = document.entry(url.clone()).or_insert(None);
        if slot.is_none() {
            *slot = Some(body.clone());
            inserted += 1;
        }
    }
    inserted
}
