#![forbid(unsafe_code)]

//! Sherpa public facade crate.
//!
//! Embeds plugin-driven, step-by-step guided tutorials in a running desktop
//! application: a floating instruction panel that never covers the control
//! it is teaching, a pulsing highlight around that control, and a session
//! state machine driving both. This crate re-exports the surface hosts and
//! plugin authors need from the internal crates, plus a small prelude.

// --- Core re-exports -------------------------------------------------------

pub use sherpa_core::geometry::{Point, Rect, Size};
pub use sherpa_core::host::{
    Clipboard, ControlHandle, ControlResolver, FileSettings, MemorySettings, SettingsError,
    SettingsStore,
};
pub use sherpa_core::timer::{TimerId, TimerQueue};
pub use sherpa_core::tutorial::{
    ActionType, Difficulty, Step, StepPredicate, Tutorial, TutorialDefect,
};

// --- Plugin re-exports -----------------------------------------------------

pub use sherpa_plugin::{
    PluginError, PluginFactory, PluginManager, PluginMetadata, TutorialCatalog, TutorialPlugin,
    TutorialRejection,
};

// --- Overlay re-exports ----------------------------------------------------

pub use sherpa_overlay::{
    FloatingPanel, HighlightFrame, HighlightStyle, OverlayEvent, OverlayPresenter, PanelButton,
    PanelContent, PointerEvent, Ring,
};

// --- Runtime re-exports ----------------------------------------------------

pub use sherpa_runtime::browser;
pub use sherpa_runtime::{
    HostContext, PreShowHooks, RuntimeEvent, SessionState, StartError, TutorialRuntime,
};

/// Common imports for hosts and plugin authors.
pub mod prelude {
    pub use crate::{
        ActionType, Difficulty, HostContext, PanelButton, PluginFactory, PluginManager,
        PluginMetadata, Point, PointerEvent, Rect, RuntimeEvent, SessionState, Size, Step,
        Tutorial, TutorialPlugin, TutorialRuntime,
    };
}
