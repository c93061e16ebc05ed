//! The floating instruction panel.
//!
//! [`FloatingPanel`] holds the panel's content, bounds, and drag state. Drag
//! interception is scoped to the header strip only; pointer events anywhere
//! else are left for the host application, which is what keeps the tutorial
//! non-blocking. Geometry is persisted through the host's
//! [`SettingsStore`] so the panel comes back where the user left it.

use serde::{Deserialize, Serialize};

use sherpa_core::{Point, Rect, SettingsStore, Size};

/// Settings key for the persisted panel geometry record.
pub const PANEL_GEOMETRY_KEY: &str = "sherpa.panel.geometry";

/// Height of the draggable header strip.
pub const HEADER_HEIGHT: i32 = 28;

const DEFAULT_SIZE: Size = Size::new(340, 240);

/// Serialized panel geometry. One JSON record, last writer wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PanelGeometry {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

/// Panel controls the host shell can activate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelButton {
    Previous,
    Skip,
    Next,
    Copy,
    Close,
}

/// Low-level pointer input routed to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up(Point),
}

/// Everything the panel displays for one step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelContent {
    /// 1-based step number.
    pub step_number: usize,
    pub total_steps: usize,
    pub title: String,
    pub description: String,
    pub instruction: String,
    /// Structured example shown alongside the instruction, if any.
    pub sample_data: Option<serde_json::Value>,
    /// Copy-to-clipboard block payload; the block is visible iff present.
    pub copy_payload: Option<String>,
    /// Previous is disabled on the first step.
    pub prev_enabled: bool,
    /// "Next", or "Finish" on the last step.
    pub next_label: &'static str,
}

impl PanelContent {
    /// Progress indicator text.
    #[must_use]
    pub fn progress_label(&self) -> String {
        format!("Step {} of {}", self.step_number, self.total_steps)
    }

    /// Whether the copy-to-clipboard block should be shown.
    #[must_use]
    pub fn has_copy_block(&self) -> bool {
        self.copy_payload.is_some()
    }
}

/// State of the floating panel.
#[derive(Debug)]
pub struct FloatingPanel {
    bounds: Rect,
    content: PanelContent,
    /// Grab offset from the panel origin while a header drag is active.
    drag: Option<Point>,
}

impl FloatingPanel {
    /// Create a panel, restoring the last persisted geometry if present.
    #[must_use]
    pub fn restore(settings: &dyn SettingsStore) -> Self {
        let bounds = settings
            .get(PANEL_GEOMETRY_KEY)
            .and_then(|text| {
                serde_json::from_str::<PanelGeometry>(&text)
                    .map_err(|err| {
                        tracing::warn!(%err, "ignoring corrupt panel geometry record");
                    })
                    .ok()
            })
            .map(|g| Rect::new(g.x, g.y, g.width, g.height))
            // An empty size would leave the panel invisible and undraggable.
            .filter(|rect| !rect.is_empty())
            .unwrap_or(Rect::from_origin_size(Point::new(0, 0), DEFAULT_SIZE));
        Self {
            bounds,
            content: PanelContent::default(),
            drag: None,
        }
    }

    /// Persist the current geometry.
    pub fn persist(&self, settings: &mut dyn SettingsStore) {
        let geometry = PanelGeometry {
            x: self.bounds.x,
            y: self.bounds.y,
            width: self.bounds.width,
            height: self.bounds.height,
        };
        match serde_json::to_string(&geometry) {
            Ok(text) => settings.set(PANEL_GEOMETRY_KEY, text),
            Err(err) => tracing::warn!(%err, "failed to serialize panel geometry"),
        }
    }

    /// Current bounds in screen coordinates.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Move the panel, keeping its size.
    pub fn set_origin(&mut self, origin: Point) {
        self.bounds.x = origin.x;
        self.bounds.y = origin.y;
    }

    /// Replace the panel bounds (host-driven resize).
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// The draggable header strip.
    #[must_use]
    pub fn header_rect(&self) -> Rect {
        Rect::new(
            self.bounds.x,
            self.bounds.y,
            self.bounds.width,
            HEADER_HEIGHT.min(self.bounds.height),
        )
    }

    /// Displayed content.
    #[must_use]
    pub fn content(&self) -> &PanelContent {
        &self.content
    }

    /// Replace the displayed content.
    pub fn set_content(&mut self, content: PanelContent) {
        self.content = content;
    }

    /// Whether a header drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Route a pointer event to the panel.
    ///
    /// Only presses landing on the header strip start a drag; everything
    /// else is not consumed and falls through to the host application. While
    /// dragging, the panel follows the pointer but never leaves `screen`.
    ///
    /// Returns `true` if the event was consumed.
    pub fn handle_pointer(&mut self, event: PointerEvent, screen: Rect) -> bool {
        match event {
            PointerEvent::Down(p) => {
                if self.header_rect().contains(p) {
                    self.drag = Some(Point::new(p.x - self.bounds.x, p.y - self.bounds.y));
                    true
                } else {
                    false
                }
            }
            PointerEvent::Move(p) => {
                let Some(grab) = self.drag else {
                    return false;
                };
                let origin = Point::new(p.x - grab.x, p.y - grab.y);
                self.set_origin(clamp_into_screen(origin, self.bounds.size(), screen));
                true
            }
            PointerEvent::Up(_) => self.drag.take().is_some(),
        }
    }
}

/// Keep the panel origin inside the screen (pinned at the screen origin when
/// the panel is larger than the screen).
fn clamp_into_screen(origin: Point, size: Size, screen: Rect) -> Point {
    let max_x = screen.right() - size.width;
    let max_y = screen.bottom() - size.height;
    Point::new(
        if max_x < screen.x {
            screen.x
        } else {
            origin.x.max(screen.x).min(max_x)
        },
        if max_y < screen.y {
            screen.y
        } else {
            origin.y.max(screen.y).min(max_y)
        },
    )
}
