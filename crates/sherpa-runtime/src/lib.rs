#![forbid(unsafe_code)]

//! Sherpa Runtime
//!
//! The session layer tying the other Sherpa crates together:
//!
//! - [`TutorialRuntime`] - the one-session-at-a-time state machine driving
//!   the overlay through a tutorial's steps
//! - [`PreShowHooks`] - host preparation closures run before a step appears
//! - [`browser`] - read-only catalog views for a tutorial picker
//!
//! # Threading
//! Everything runs on the host UI thread. The runtime is tick-driven: the
//! host calls [`TutorialRuntime::tick`] from its event loop (or a UI timer)
//! and repaints when it returns `true`. There are no background threads and
//! no callbacks invoked from elsewhere.

pub mod browser;
pub mod hooks;
pub mod runtime;

pub use browser::{CategoryListing, TutorialDetail, TutorialRow};
pub use hooks::PreShowHooks;
pub use runtime::{HostContext, RuntimeEvent, SessionState, StartError, TutorialRuntime};
