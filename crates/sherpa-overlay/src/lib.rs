#![forbid(unsafe_code)]

//! Sherpa Overlay
//!
//! The visual half of the tutorial runtime:
//!
//! - [`planner`] - pure placement math that keeps the instruction panel off
//!   the control being taught
//! - [`highlight`] - pulse-animated glow rings around the target
//! - [`panel`] - the floating instruction panel's state, drag handling, and
//!   persisted geometry
//! - [`presenter`] - [`OverlayPresenter`], tying the three together behind
//!   the step-navigation surface the runtime drives
//!
//! # Non-blocking by construction
//! Nothing here captures global input or dims the host window. The highlight
//! is pure geometry the host paints as an input-transparent layer, and the
//! panel only consumes pointer events that land inside its own bounds. The
//! user can operate the underlying application at every moment a tutorial is
//! active.

pub mod highlight;
pub mod panel;
pub mod planner;
pub mod presenter;

pub use highlight::{HighlightFrame, HighlightStyle, Ring};
pub use panel::{FloatingPanel, PanelButton, PanelContent, PointerEvent, PANEL_GEOMETRY_KEY};
pub use planner::{DEFAULT_MARGIN, no_go_zone, plan};
pub use presenter::{OverlayEvent, OverlayPresenter};
