//! The overlay presenter.
//!
//! [`OverlayPresenter`] owns the two cooperating visual surfaces: the
//! input-transparent highlight layer (as pulse-animated ring geometry) and
//! the always-on-top floating instruction panel. The session controller
//! drives it step by step; user interaction comes back out as drained
//! [`OverlayEvent`]s.
//!
//! # Timers
//! Two timers exist: a repeating pulse repaint while a target is
//! highlighted, and a one-shot reverting the "Copied!" feedback label. Both
//! live in one [`TimerQueue`] and are cancelled in [`hide`], so nothing can
//! fire after teardown.
//!
//! [`hide`]: OverlayPresenter::hide

use std::time::{Duration, Instant};

use sherpa_core::{Clipboard, Point, Rect, SettingsStore, Step, TimerId, TimerQueue};

use crate::highlight::{self, HighlightFrame, HighlightStyle};
use crate::panel::{FloatingPanel, PanelButton, PanelContent, PointerEvent};
use crate::planner::{self, DEFAULT_MARGIN};

/// Repaint interval for the highlight pulse.
const PULSE_INTERVAL: Duration = Duration::from_millis(33);

/// How long the "Copied!" feedback stays up.
const COPIED_FEEDBACK: Duration = Duration::from_millis(1500);

/// Step-navigation signals raised by the panel's controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEvent {
    NextRequested,
    PreviousRequested,
    SkipRequested,
    Cancelled,
    /// The copy block was activated; the payload has been placed on the
    /// clipboard already.
    CopyRequested(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerTag {
    Pulse,
    CopiedReset,
}

/// Owns the highlight render loop and the floating panel's visual state.
#[derive(Debug)]
pub struct OverlayPresenter {
    screen: Rect,
    panel: FloatingPanel,
    target: Option<Rect>,
    style: HighlightStyle,
    pulse_epoch: Option<Instant>,
    timers: TimerQueue<TimerTag>,
    pulse_timer: Option<TimerId>,
    copied_timer: Option<TimerId>,
    visible: bool,
    copied_visible: bool,
    events: Vec<OverlayEvent>,
}

impl OverlayPresenter {
    /// Create a hidden presenter, restoring persisted panel geometry.
    #[must_use]
    pub fn new(screen: Rect, settings: &dyn SettingsStore) -> Self {
        Self {
            screen,
            panel: FloatingPanel::restore(settings),
            target: None,
            style: HighlightStyle::default(),
            pulse_epoch: None,
            timers: TimerQueue::new(),
            pulse_timer: None,
            copied_timer: None,
            visible: false,
            copied_visible: false,
            events: Vec::new(),
        }
    }

    /// Update the screen bounds used for placement and drag clamping.
    pub fn set_screen(&mut self, screen: Rect) {
        self.screen = screen;
    }

    /// Display a step.
    ///
    /// Updates all panel text, toggles the copy block, disables Previous on
    /// the first step and relabels Next on the last, repositions the panel
    /// off the target (or centers it when there is none), and starts the
    /// pulse while a target is highlighted.
    pub fn show_step(
        &mut self,
        step: &Step,
        target: Option<Rect>,
        step_number: usize,
        total_steps: usize,
        now: Instant,
    ) {
        self.panel.set_content(PanelContent {
            step_number,
            total_steps,
            title: step.title.clone(),
            description: step.description.clone(),
            instruction: step.instruction.clone(),
            sample_data: step.sample_data.clone(),
            copy_payload: step.copy_paste_data.clone(),
            prev_enabled: step_number > 1,
            next_label: if step_number == total_steps {
                "Finish"
            } else {
                "Next"
            },
        });
        self.style.color = step.effective_highlight_color().to_string();
        self.clear_copied_feedback();

        let size = self.panel.bounds().size();
        let origin = match target {
            Some(rect) => planner::plan(rect, size, self.screen, DEFAULT_MARGIN),
            None => Point::new(
                self.screen.x + (self.screen.width - size.width) / 2,
                self.screen.y + (self.screen.height - size.height) / 2,
            ),
        };
        self.panel.set_origin(origin);

        self.target = target;
        self.restart_pulse(now);
        self.visible = true;
    }

    fn restart_pulse(&mut self, now: Instant) {
        if let Some(id) = self.pulse_timer.take() {
            self.timers.cancel(id);
        }
        self.pulse_epoch = None;
        if self.target.is_some() {
            self.pulse_timer = Some(self.timers.schedule_repeating(
                now,
                PULSE_INTERVAL,
                TimerTag::Pulse,
            ));
            self.pulse_epoch = Some(now);
        }
    }

    fn clear_copied_feedback(&mut self) {
        if let Some(id) = self.copied_timer.take() {
            self.timers.cancel(id);
        }
        self.copied_visible = false;
    }

    /// Hide both surfaces and cancel every timer. Idempotent.
    pub fn hide(&mut self) {
        self.visible = false;
        self.target = None;
        self.pulse_epoch = None;
        self.pulse_timer = None;
        self.copied_timer = None;
        self.copied_visible = false;
        self.timers.clear();
    }

    /// Advance timers. Returns `true` when a repaint is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut repaint = false;
        for tag in self.timers.fire_due(now) {
            match tag {
                TimerTag::Pulse => repaint = true,
                TimerTag::CopiedReset => {
                    self.copied_visible = false;
                    self.copied_timer = None;
                    repaint = true;
                }
            }
        }
        repaint
    }

    /// Activate a panel control.
    pub fn press(&mut self, button: PanelButton, clipboard: &mut dyn Clipboard, now: Instant) {
        if !self.visible {
            return;
        }
        match button {
            PanelButton::Previous => {
                if self.panel.content().prev_enabled {
                    self.events.push(OverlayEvent::PreviousRequested);
                }
            }
            PanelButton::Skip => self.events.push(OverlayEvent::SkipRequested),
            PanelButton::Next => self.events.push(OverlayEvent::NextRequested),
            PanelButton::Close => self.events.push(OverlayEvent::Cancelled),
            PanelButton::Copy => {
                let Some(text) = self.panel.content().copy_payload.clone() else {
                    return;
                };
                clipboard.set_text(&text);
                self.clear_copied_feedback();
                self.copied_visible = true;
                self.copied_timer = Some(self.timers.schedule_once(
                    now,
                    COPIED_FEEDBACK,
                    TimerTag::CopiedReset,
                ));
                self.events.push(OverlayEvent::CopyRequested(text));
            }
        }
    }

    /// Route a pointer event to the panel (header drag only).
    ///
    /// Persists the panel geometry when a drag finishes. Returns `true` if
    /// the event was consumed.
    pub fn pointer(&mut self, event: PointerEvent, settings: &mut dyn SettingsStore) -> bool {
        if !self.visible {
            return false;
        }
        let finishing = self.panel.is_dragging() && matches!(event, PointerEvent::Up(_));
        let consumed = self.panel.handle_pointer(event, self.screen);
        if finishing && consumed {
            self.panel.persist(settings);
        }
        consumed
    }

    /// Ring geometry for the current pulse frame, if a target is highlighted.
    #[must_use]
    pub fn highlight(&self, now: Instant) -> Option<HighlightFrame> {
        if !self.visible {
            return None;
        }
        let target = self.target?;
        let elapsed = self
            .pulse_epoch
            .map_or(Duration::ZERO, |epoch| now.duration_since(epoch));
        let phase = highlight::pulse_phase(elapsed, self.style.pulse_period);
        Some(highlight::frame(target, &self.style, phase))
    }

    /// Take the events raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<OverlayEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether either surface is showing.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the "Copied!" feedback label is showing.
    #[must_use]
    pub fn copied_visible(&self) -> bool {
        self.copied_visible
    }

    /// The floating panel.
    #[must_use]
    pub fn panel(&self) -> &FloatingPanel {
        &self.panel
    }

    /// Number of pending timers; zero after [`hide`](Self::hide).
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Earliest pending deadline, for hosts that sleep between events.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }
}
