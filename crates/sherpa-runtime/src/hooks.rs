//! Pre-show hooks.
//!
//! Hosts sometimes need to prepare the application before a step appears:
//! switch to the right tab, expand a collapsed section, scroll a row into
//! view. [`PreShowHooks`] holds those preparation closures keyed by tutorial
//! id and step index; the runtime runs the matching hook just before
//! resolving the step's target, so the hook can make the target resolvable.
//!
//! Hooks are host code but still run behind a panic boundary: a crashing
//! hook is logged and the step is shown anyway.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};

use sherpa_core::ControlResolver;

type Hook = Box<dyn FnMut(&dyn ControlResolver)>;

/// Preparation closures run before a step is shown.
#[derive(Default)]
pub struct PreShowHooks {
    hooks: HashMap<(String, usize), Hook>,
}

impl PreShowHooks {
    /// Create an empty hook table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook for one step of one tutorial, replacing any previous
    /// hook for that step.
    pub fn register(
        &mut self,
        tutorial_id: impl Into<String>,
        step_index: usize,
        hook: impl FnMut(&dyn ControlResolver) + 'static,
    ) {
        self.hooks
            .insert((tutorial_id.into(), step_index), Box::new(hook));
    }

    /// Remove a hook. Returns `true` if one was registered.
    pub fn remove(&mut self, tutorial_id: &str, step_index: usize) -> bool {
        self.hooks
            .remove(&(tutorial_id.to_string(), step_index))
            .is_some()
    }

    /// Run the hook for the given step, if any.
    pub fn run(&mut self, tutorial_id: &str, step_index: usize, resolver: &dyn ControlResolver) {
        let key = (tutorial_id.to_string(), step_index);
        if let Some(hook) = self.hooks.get_mut(&key) {
            if catch_unwind(AssertUnwindSafe(|| hook(resolver))).is_err() {
                tracing::warn!(
                    tutorial = %tutorial_id,
                    step = step_index,
                    "pre-show hook panicked; showing step anyway"
                );
            }
        }
    }

    /// Number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Whether no hooks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl core::fmt::Debug for PreShowHooks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PreShowHooks")
            .field("len", &self.hooks.len())
            .finish()
    }
}
