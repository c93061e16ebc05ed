use std::path::PathBuf;

use sherpa_core::TutorialDefect;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PluginError>;

/// Why a plugin failed to load, unload, or import.
///
/// All of these are local and recoverable: the manager logs them and moves
/// on, leaving the rest of the system usable.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("no factory registered for module `{module}`")]
    NoFactory { module: String },

    #[error("{count} factories claim module `{module}`; exactly one required")]
    AmbiguousFactory { module: String, count: usize },

    #[error("plugin reported an empty plugin id (module `{module}`)")]
    EmptyPluginId { module: String },

    #[error("plugin `{plugin_id}` is already loaded")]
    AlreadyLoaded { plugin_id: String },

    #[error("plugin `{plugin_id}` refused to initialize")]
    InitializeFailed { plugin_id: String },

    #[error("plugin code panicked during `{call}` (module `{module}`)")]
    PluginPanicked { module: String, call: &'static str },

    #[error("external module path has no usable file name: {}", path.display())]
    InvalidImportPath { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a tutorial from an otherwise healthy plugin was not catalogued.
#[derive(Debug, Error)]
pub enum TutorialRejection {
    #[error("tutorial `{tutorial_id}` is malformed: {}", format_defects(defects))]
    Invalid {
        tutorial_id: String,
        defects: Vec<TutorialDefect>,
    },

    #[error("tutorial id `{id}` already registered by plugin `{existing_source}`")]
    IdCollision { id: String, existing_source: String },
}

fn format_defects(defects: &[TutorialDefect]) -> String {
    defects
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
