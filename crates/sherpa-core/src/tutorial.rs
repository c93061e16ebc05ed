//! The tutorial contract.
//!
//! [`Tutorial`] is an ordered, named sequence of [`Step`]s plus learning
//! metadata. Tutorials are produced by plugins, validated and cached by the
//! plugin manager, and read-only to every other consumer for the rest of the
//! session.
//!
//! # Invariants
//!
//! 1. `steps` is non-empty.
//! 2. A [`ActionType::CopyPaste`] step carries a non-empty payload.
//! 3. An auto-advancing step has a non-negative delay.
//! 4. `plugin_source` is stamped by the loader, never by content.
//!
//! [`Tutorial::validate`] reports every violated invariant at once so a
//! plugin author sees the full defect list in one load attempt.

use std::sync::Arc;

use thiserror::Error;

use crate::host::ControlResolver;

/// Default highlight border color for steps that do not override it.
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#ffd54f";

/// What the user is expected to do on a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionType {
    /// Read-only explanation, no interaction expected.
    #[default]
    Info,
    /// Click the highlighted control.
    Click,
    /// Type into the highlighted control.
    Type,
    /// Copy the supplied payload into the highlighted control.
    CopyPaste,
    /// Look at the highlighted control.
    Highlight,
    /// Wait for the application to do something.
    Wait,
    /// Perform an action that the step's predicate will check.
    Validate,
}

/// Content-supplied predicate gating forward navigation.
///
/// Runs against the host's control-lookup capability only; predicates must
/// not mutate host state.
pub type StepPredicate = Arc<dyn Fn(&dyn ControlResolver) -> bool>;

/// One instructional beat of a tutorial.
#[derive(Clone, Default)]
pub struct Step {
    /// Short heading shown in the panel.
    pub title: String,
    /// One-paragraph summary.
    pub description: String,
    /// Detailed instruction text (may contain simple markup).
    pub instruction: String,
    /// Logical id of the control this step teaches, if any.
    pub target_element: Option<String>,
    /// Expected user action.
    pub action: ActionType,
    /// Payload for the copy-to-clipboard block.
    pub copy_paste_data: Option<String>,
    /// Structured example data shown alongside the instruction.
    pub sample_data: Option<serde_json::Value>,
    /// Advance automatically after `delay_ms`.
    pub auto_advance: bool,
    /// Auto-advance delay in milliseconds.
    pub delay_ms: i64,
    /// Highlight border color override (CSS hex string).
    pub highlight_color: Option<String>,
    /// Predicate that must pass before `next()` advances past this step.
    pub validate: Option<StepPredicate>,
}

impl Step {
    /// Create a step with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the summary text.
    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    /// Set the instruction text.
    #[must_use]
    pub fn instruction(mut self, text: impl Into<String>) -> Self {
        self.instruction = text.into();
        self
    }

    /// Set the target control's logical id.
    #[must_use]
    pub fn target(mut self, logical_id: impl Into<String>) -> Self {
        self.target_element = Some(logical_id.into());
        self
    }

    /// Set the expected action.
    #[must_use]
    pub fn action(mut self, action: ActionType) -> Self {
        self.action = action;
        self
    }

    /// Set the copy-to-clipboard payload and mark the step as copy/paste.
    #[must_use]
    pub fn copy_paste(mut self, payload: impl Into<String>) -> Self {
        self.copy_paste_data = Some(payload.into());
        self.action = ActionType::CopyPaste;
        self
    }

    /// Attach structured example data.
    #[must_use]
    pub fn sample_data(mut self, data: serde_json::Value) -> Self {
        self.sample_data = Some(data);
        self
    }

    /// Advance automatically after the given delay.
    #[must_use]
    pub fn auto_advance(mut self, delay_ms: i64) -> Self {
        self.auto_advance = true;
        self.delay_ms = delay_ms;
        self
    }

    /// Override the highlight border color.
    #[must_use]
    pub fn highlight_color(mut self, color: impl Into<String>) -> Self {
        self.highlight_color = Some(color.into());
        self
    }

    /// Attach a validation predicate.
    #[must_use]
    pub fn validate_with(mut self, predicate: impl Fn(&dyn ControlResolver) -> bool + 'static) -> Self {
        self.validate = Some(Arc::new(predicate));
        self
    }

    /// Effective highlight color for this step.
    #[must_use]
    pub fn effective_highlight_color(&self) -> &str {
        self.highlight_color.as_deref().unwrap_or(DEFAULT_HIGHLIGHT_COLOR)
    }
}

impl core::fmt::Debug for Step {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Step")
            .field("title", &self.title)
            .field("target_element", &self.target_element)
            .field("action", &self.action)
            .field("copy_paste_data", &self.copy_paste_data)
            .field("auto_advance", &self.auto_advance)
            .field("delay_ms", &self.delay_ms)
            .field("validate", &self.validate.as_ref().map(|_| "<predicate>"))
            .finish_non_exhaustive()
    }
}

/// Advertised difficulty of a tutorial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl core::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        };
        f.write_str(label)
    }
}

/// A structural defect found by [`Tutorial::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TutorialDefect {
    #[error("tutorial id is empty")]
    EmptyId,

    #[error("tutorial title is empty")]
    EmptyTitle,

    #[error("tutorial has no steps")]
    NoSteps,

    #[error("step {step} is copy/paste but carries no payload")]
    CopyPasteWithoutPayload { step: usize },

    #[error("step {step} auto-advances with a negative delay ({delay_ms}ms)")]
    NegativeAutoAdvanceDelay { step: usize, delay_ms: i64 },
}

/// An ordered, named sequence of steps with learning metadata.
#[derive(Debug, Clone, Default)]
pub struct Tutorial {
    /// Globally unique id across all loaded plugins.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Browse category.
    pub category: String,
    /// Advertised difficulty.
    pub difficulty: Difficulty,
    /// Rough completion time in minutes.
    pub estimated_minutes: u32,
    /// Ids of tutorials expected completed first. Advisory only; the runtime
    /// does not enforce them.
    pub prerequisites: Vec<String>,
    /// What the user should be able to do afterwards.
    pub learning_objectives: Vec<String>,
    /// Ordered instructional steps.
    pub steps: Vec<Step>,
    /// Id of the plugin that supplied this tutorial. Stamped by the loader.
    pub plugin_source: Option<String>,
}

impl Tutorial {
    /// Create a tutorial with the given id and title.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the browse category.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the difficulty.
    #[must_use]
    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set the estimated completion time in minutes.
    #[must_use]
    pub fn estimated_minutes(mut self, minutes: u32) -> Self {
        self.estimated_minutes = minutes;
        self
    }

    /// Add a prerequisite tutorial id.
    #[must_use]
    pub fn prerequisite(mut self, id: impl Into<String>) -> Self {
        self.prerequisites.push(id.into());
        self
    }

    /// Add a learning objective.
    #[must_use]
    pub fn objective(mut self, text: impl Into<String>) -> Self {
        self.learning_objectives.push(text.into());
        self
    }

    /// Append a step.
    #[must_use]
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Check every structural invariant, returning all violations.
    ///
    /// An empty result means the tutorial is acceptable for the catalog.
    #[must_use]
    pub fn validate(&self) -> Vec<TutorialDefect> {
        let mut defects = Vec::new();
        if self.id.trim().is_empty() {
            defects.push(TutorialDefect::EmptyId);
        }
        if self.title.trim().is_empty() {
            defects.push(TutorialDefect::EmptyTitle);
        }
        if self.steps.is_empty() {
            defects.push(TutorialDefect::NoSteps);
        }
        for (index, step) in self.steps.iter().enumerate() {
            if step.action == ActionType::CopyPaste
                && step.copy_paste_data.as_deref().is_none_or(str::is_empty)
            {
                defects.push(TutorialDefect::CopyPasteWithoutPayload { step: index });
            }
            if step.auto_advance && step.delay_ms < 0 {
                defects.push(TutorialDefect::NegativeAutoAdvanceDelay {
                    step: index,
                    delay_ms: step.delay_ms,
                });
            }
        }
        defects
    }
}
