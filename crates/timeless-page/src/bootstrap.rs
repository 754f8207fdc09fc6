//! One-time page initialization.
//!
//! `InitState` is the single flag guarding initialization: both lifecycle
//! signals may ask for it, only the first gets through. Each initializer
//! runs isolated; its outcome is logged and recorded in an `InitReport`
//! without stopping the ones after it.

use tracing::{debug, error, info, warn};

use crate::error::PageError;

#[derive(Debug, Default)]
pub struct InitState {
    initialized: bool,
}

impl InitState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Claim initialization. True exactly once; the flag never reverts.
    pub fn begin(&mut self) -> bool {
        if self.initialized {
            return false;
        }
        self.initialized = true;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    /// Something the feature needs is not on the page.
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Default, Clone)]
pub struct InitReport {
    steps: Vec<(&'static str, StepOutcome)>,
}

impl InitReport {
    /// Log and record the result of one initializer.
    pub fn record(&mut self, step: &'static str, result: Result<(), PageError>) {
        let outcome = match result {
            Ok(()) => {
                debug!(step, "initializer done");
                StepOutcome::Done
            }
            Err(err) if err.is_missing_element() => {
                warn!(step, error = %err, "feature skipped");
                StepOutcome::Skipped(err.to_string())
            }
            Err(err) => {
                error!(step, error = %err, "initializer failed");
                StepOutcome::Failed(err.to_string())
            }
        };
        self.steps.push((step, outcome));
    }

    pub fn outcome(&self, step: &str) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|(name, _)| *name == step)
            .map(|(_, outcome)| outcome)
    }

    pub fn steps(&self) -> impl Iterator<Item = &(&'static str, StepOutcome)> {
        self.steps.iter()
    }

    pub fn count(&self, wanted: fn(&StepOutcome) -> bool) -> usize {
        self.steps.iter().filter(|(_, o)| wanted(o)).count()
    }

    pub fn log_summary(&self) {
        info!(
            done = self.count(|o| matches!(o, StepOutcome::Done)),
            skipped = self.count(|o| matches!(o, StepOutcome::Skipped(_))),
            failed = self.count(|o| matches!(o, StepOutcome::Failed(_))),
            "initAll completed"
        );
    }
}
