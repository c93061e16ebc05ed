//! The tutorial session controller.
//!
//! [`TutorialRuntime`] drives exactly one tutorial session at a time through
//! the state machine `Idle -> StepActive -> (Completed | Cancelled)`, owning
//! the [`OverlayPresenter`] and translating its button events into step
//! navigation.
//!
//! # Navigation semantics
//! - `next` is gated by the current step's validation predicate (if any);
//!   a panicking predicate counts as a failed check, never as a crash.
//! - `skip` always advances, bypassing validation; auto-advance timers use
//!   skip semantics.
//! - `previous` never validates and is a no-op on the first step.
//! - `cancel` is idempotent; starting a new tutorial cancels the active one.
//!
//! All host capabilities arrive per call in a [`HostContext`], so the runtime
//! holds no references into the host application between calls.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use sherpa_core::{
    Clipboard, ControlResolver, Rect, SettingsStore, Step, TimerId, TimerQueue, Tutorial,
};
use sherpa_overlay::{HighlightFrame, OverlayEvent, OverlayPresenter, PanelButton, PointerEvent};
use sherpa_plugin::TutorialCatalog;

use crate::hooks::PreShowHooks;

/// Everything the runtime needs from the host application for one call.
pub struct HostContext<'a> {
    pub resolver: &'a dyn ControlResolver,
    pub clipboard: &'a mut dyn Clipboard,
    pub settings: &'a mut dyn SettingsStore,
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No tutorial has been started (or the last session's record was
    /// dropped).
    #[default]
    Idle,
    /// A step is on screen.
    StepActive,
    /// The user walked past the last step.
    Completed,
    /// The user (or a new `start`) abandoned the session.
    Cancelled,
}

/// Observable session transitions, drained by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    Started { tutorial_id: String },
    StepShown { index: usize, has_target: bool },
    /// `next` was refused because the step's predicate did not pass.
    ValidationFailed { index: usize },
    Completed { tutorial_id: String },
    Cancelled { tutorial_id: String },
}

/// Why a tutorial could not be started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("no tutorial with id `{0}` is loaded")]
    UnknownTutorial(String),
}

#[derive(Debug)]
struct Session {
    tutorial: Arc<Tutorial>,
    step_index: usize,
    state: SessionState,
}

/// Drives one tutorial session at a time.
#[derive(Debug)]
pub struct TutorialRuntime {
    presenter: OverlayPresenter,
    session: Option<Session>,
    timers: TimerQueue<()>,
    auto_timer: Option<TimerId>,
    hooks: PreShowHooks,
    events: Vec<RuntimeEvent>,
}

impl TutorialRuntime {
    /// Create an idle runtime for the given screen.
    #[must_use]
    pub fn new(screen: Rect, settings: &dyn SettingsStore) -> Self {
        Self {
            presenter: OverlayPresenter::new(screen, settings),
            session: None,
            timers: TimerQueue::new(),
            auto_timer: None,
            hooks: PreShowHooks::new(),
            events: Vec::new(),
        }
    }

    /// Update the screen bounds used for panel placement.
    pub fn set_screen(&mut self, screen: Rect) {
        self.presenter.set_screen(screen);
    }

    /// Start a tutorial from the catalog, showing its first step.
    ///
    /// Any active session is cancelled first; an unknown id leaves the
    /// active session untouched.
    pub fn start(
        &mut self,
        catalog: &TutorialCatalog,
        id: &str,
        host: &mut HostContext<'_>,
        now: Instant,
    ) -> Result<(), StartError> {
        let tutorial = catalog
            .get(id)
            .ok_or_else(|| StartError::UnknownTutorial(id.to_string()))?;
        self.cancel();
        tracing::info!(tutorial = %id, steps = tutorial.steps.len(), "starting tutorial");
        self.session = Some(Session {
            tutorial,
            step_index: 0,
            state: SessionState::StepActive,
        });
        self.events.push(RuntimeEvent::Started {
            tutorial_id: id.to_string(),
        });
        self.show_current(host, now);
        Ok(())
    }

    /// Advance past the current step, if its validation predicate passes.
    pub fn next(&mut self, host: &mut HostContext<'_>, now: Instant) {
        let Some(session) = &self.session else {
            return;
        };
        if session.state != SessionState::StepActive {
            return;
        }
        let index = session.step_index;
        if let Some(predicate) = session.tutorial.steps[index].validate.clone() {
            let passed = catch_unwind(AssertUnwindSafe(|| predicate(host.resolver)))
                .unwrap_or_else(|_| {
                    tracing::warn!(step = index, "step predicate panicked; treating as failed");
                    false
                });
            if !passed {
                tracing::debug!(step = index, "validation failed; staying on step");
                self.events.push(RuntimeEvent::ValidationFailed { index });
                return;
            }
        }
        self.advance(host, now);
    }

    /// Go back one step. No validation; a no-op on the first step.
    pub fn previous(&mut self, host: &mut HostContext<'_>, now: Instant) {
        let Some(session) = &mut self.session else {
            return;
        };
        if session.state != SessionState::StepActive || session.step_index == 0 {
            return;
        }
        session.step_index -= 1;
        self.show_current(host, now);
    }

    /// Advance unconditionally, bypassing validation.
    pub fn skip(&mut self, host: &mut HostContext<'_>, now: Instant) {
        self.advance(host, now);
    }

    /// Abandon the active session. Idempotent.
    pub fn cancel(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };
        if session.state != SessionState::StepActive {
            return;
        }
        session.state = SessionState::Cancelled;
        let id = session.tutorial.id.clone();
        self.teardown_overlay();
        tracing::info!(tutorial = %id, "tutorial cancelled");
        self.events.push(RuntimeEvent::Cancelled { tutorial_id: id });
    }

    /// Advance timers and apply pending overlay interaction.
    ///
    /// Returns `true` when the host should repaint the overlay.
    pub fn tick(&mut self, host: &mut HostContext<'_>, now: Instant) -> bool {
        for () in self.timers.fire_due(now) {
            self.auto_timer = None;
            self.advance(host, now);
        }
        let repaint = self.presenter.tick(now);
        self.pump_overlay(host, now);
        repaint
    }

    /// Activate a panel control and apply the resulting navigation.
    pub fn press(&mut self, button: PanelButton, host: &mut HostContext<'_>, now: Instant) {
        self.presenter.press(button, host.clipboard, now);
        self.pump_overlay(host, now);
    }

    /// Route a pointer event to the panel. Returns `true` if consumed.
    pub fn pointer(&mut self, event: PointerEvent, host: &mut HostContext<'_>) -> bool {
        self.presenter.pointer(event, host.settings)
    }

    /// Ring geometry for the current pulse frame, if a target is highlighted.
    #[must_use]
    pub fn highlight(&self, now: Instant) -> Option<HighlightFrame> {
        self.presenter.highlight(now)
    }

    /// The overlay presenter (panel bounds and content, for painting).
    #[must_use]
    pub fn presenter(&self) -> &OverlayPresenter {
        &self.presenter
    }

    /// Current session state; [`SessionState::Idle`] before any start.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::Idle, |session| session.state)
    }

    /// Current step index.
    ///
    /// Equals the step count once the session completes, which is how a
    /// completed walk-through is distinguished from one abandoned mid-way.
    #[must_use]
    pub fn step_index(&self) -> Option<usize> {
        self.session.as_ref().map(|session| session.step_index)
    }

    /// The tutorial of the current (or just-ended) session.
    #[must_use]
    pub fn active_tutorial(&self) -> Option<&Arc<Tutorial>> {
        self.session.as_ref().map(|session| &session.tutorial)
    }

    /// Hooks run before a step is shown.
    pub fn hooks_mut(&mut self) -> &mut PreShowHooks {
        &mut self.hooks
    }

    /// Take the events raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<RuntimeEvent> {
        std::mem::take(&mut self.events)
    }

    /// Translate drained panel-button events into navigation.
    fn pump_overlay(&mut self, host: &mut HostContext<'_>, now: Instant) {
        for event in self.presenter.drain_events() {
            match event {
                OverlayEvent::NextRequested => self.next(host, now),
                OverlayEvent::PreviousRequested => self.previous(host, now),
                OverlayEvent::SkipRequested => self.skip(host, now),
                OverlayEvent::Cancelled => self.cancel(),
                // The presenter already placed the payload on the clipboard.
                OverlayEvent::CopyRequested(_) => {}
            }
        }
    }

    fn advance(&mut self, host: &mut HostContext<'_>, now: Instant) {
        let Some(session) = &mut self.session else {
            return;
        };
        if session.state != SessionState::StepActive {
            return;
        }
        session.step_index += 1;
        if session.step_index >= session.tutorial.steps.len() {
            self.complete();
        } else {
            self.show_current(host, now);
        }
    }

    fn complete(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };
        session.state = SessionState::Completed;
        let id = session.tutorial.id.clone();
        self.teardown_overlay();
        tracing::info!(tutorial = %id, "tutorial completed");
        self.events.push(RuntimeEvent::Completed { tutorial_id: id });
    }

    fn show_current(&mut self, host: &mut HostContext<'_>, now: Instant) {
        self.clear_auto_advance();
        let Some(session) = &self.session else {
            return;
        };
        let tutorial = Arc::clone(&session.tutorial);
        let index = session.step_index;
        let step = &tutorial.steps[index];

        self.hooks.run(&tutorial.id, index, host.resolver);

        let target = resolve_target(step, host.resolver);
        self.presenter
            .show_step(step, target, index + 1, tutorial.steps.len(), now);

        if step.auto_advance && step.delay_ms >= 0 {
            let delay = Duration::from_millis(u64::try_from(step.delay_ms).unwrap_or_default());
            self.auto_timer = Some(self.timers.schedule_once(now, delay, ()));
        }
        self.events.push(RuntimeEvent::StepShown {
            index,
            has_target: target.is_some(),
        });
    }

    fn teardown_overlay(&mut self) {
        self.clear_auto_advance();
        self.presenter.hide();
    }

    fn clear_auto_advance(&mut self) {
        if let Some(id) = self.auto_timer.take() {
            self.timers.cancel(id);
        }
    }
}

/// A step's target rectangle, or `None` when the control is missing or
/// hidden (the step is then shown without a highlight).
fn resolve_target(step: &Step, resolver: &dyn ControlResolver) -> Option<Rect> {
    let logical_id = step.target_element.as_deref()?;
    match resolver.resolve(logical_id) {
        Some(handle) if handle.is_visible() => Some(handle.screen_rect()),
        Some(_) => {
            tracing::debug!(%logical_id, "target control is hidden; step shown without highlight");
            None
        }
        None => {
            tracing::debug!(%logical_id, "target control not found; step shown without highlight");
            None
        }
    }
}
