//! Narrow capabilities supplied by the host application.
//!
//! Sherpa never assumes a specific widget toolkit. Everything it needs from
//! the surrounding application is expressed as one of the small traits below:
//!
//! - [`ControlResolver`] - turn a content-authored logical id into a live
//!   control's geometry and visibility
//! - [`Clipboard`] - copy step payloads for the user
//! - [`SettingsStore`] - persist the instruction panel's geometry
//!
//! [`MemorySettings`] and [`FileSettings`] are the two provided settings
//! backends; hosts with their own settings system implement the trait
//! directly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::geometry::Rect;

/// A live control in the host window, looked up by logical id.
///
/// Handles are short-lived: resolve a fresh one whenever geometry is needed,
/// since the host may have moved or hidden the control in the meantime.
pub trait ControlHandle {
    /// Current bounds in screen coordinates.
    fn screen_rect(&self) -> Rect;

    /// Whether the control is currently visible on screen.
    fn is_visible(&self) -> bool;
}

/// Resolves content-authored logical ids to live controls.
pub trait ControlResolver {
    /// Look up a control by logical id.
    ///
    /// Returns `None` when the id is unknown or the control does not
    /// currently exist; callers degrade gracefully (step shown without a
    /// highlight).
    fn resolve(&self, logical_id: &str) -> Option<Box<dyn ControlHandle + '_>>;
}

/// System clipboard access.
pub trait Clipboard {
    /// Replace the clipboard contents with the given text.
    fn set_text(&mut self, text: &str);
}

/// Key/value settings persistence.
///
/// Writes are last-writer-wins; there are no concurrent writers because all
/// Sherpa code runs on the host UI thread.
pub trait SettingsStore {
    /// Read a value, or `None` if the key has never been written.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value.
    fn set(&mut self, key: &str, value: String);
}

/// In-memory settings store.
///
/// The default backend for tests and for hosts that do not want persistence.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: HashMap<String, String>,
}

impl MemorySettings {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}

/// Errors from the file-backed settings store.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON-file-backed settings store.
///
/// The whole store is one flat JSON object on disk. Reads are served from the
/// in-memory copy loaded at open time; every write rewrites the file. Write
/// failures are logged and otherwise swallowed so a read-only config
/// directory cannot take the tutorial overlay down.
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileSettings {
    /// Open a settings file, creating an empty store if the file is missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, values })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), SettingsError> {
        let text = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
        if let Err(err) = self.flush() {
            tracing::warn!(path = %self.path.display(), %err, "failed to persist settings");
        }
    }
}
