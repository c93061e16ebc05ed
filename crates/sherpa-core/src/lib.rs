#![forbid(unsafe_code)]

//! Sherpa Core
//!
//! Leaf types shared by every other Sherpa crate:
//!
//! - [`geometry`] - screen-pixel rectangles and points
//! - [`tutorial`] - the tutorial contract ([`Tutorial`], [`Step`], [`ActionType`])
//! - [`host`] - narrow capabilities the host application supplies
//! - [`timer`] - deterministic tick-driven timers
//!
//! # Role in Sherpa
//! `sherpa-core` carries no behavior of its own beyond structural validation
//! and geometry math. The plugin loader (`sherpa-plugin`), the overlay
//! (`sherpa-overlay`), and the session controller (`sherpa-runtime`) all
//! depend on these shapes; nothing here depends on them.

pub mod geometry;
pub mod host;
pub mod timer;
pub mod tutorial;

pub use geometry::{Point, Rect, Size};
pub use host::{
    Clipboard, ControlHandle, ControlResolver, FileSettings, MemorySettings, SettingsError,
    SettingsStore,
};
pub use timer::{TimerId, TimerQueue};
pub use tutorial::{ActionType, Difficulty, Step, StepPredicate, Tutorial, TutorialDefect};
