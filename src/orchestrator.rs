//! Sequential orchestration of the four assessment steps.
//!
//! The orchestrator owns the run state exclusively. A run is started with
//! `submit`, driven one step at a time with `advance`, and halts at the first
//! failing step. `run_assessment` wires both together and reports every state
//! transition to an observer.
use crate::assessment::{AssessmentError, StepOutcome};
use crate::client::AssessmentClient;
use crate::step::{AssessmentStep, STEP_COUNT};
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};

/// Observable state of the current (or last) run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrchestrationState {
    pub brand_name: String,
    /// One slot per step, indexed by `AssessmentStep::index`.
    pub results: [StepOutcome; STEP_COUNT],
    pub current_step: AssessmentStep,
    pub running: bool,
    pub last_error: Option<AssessmentError>,
}

impl OrchestrationState {
    pub fn outcome(&self, step: AssessmentStep) -> &StepOutcome {
        &self.results[step.index()]
    }

    /// True once every step produced a fragment.
    pub fn is_complete(&self) -> bool {
        self.results
            .iter()
            .all(|outcome| outcome.fragment().is_some())
    }
}

/// Drives assessment runs against an `AssessmentClient`.
pub struct Orchestrator<C> {
    client: C,
    state: OrchestrationState,
}

impl<C: AssessmentClient> Orchestrator<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            state: OrchestrationState::default(),
        }
    }

    pub fn state(&self) -> &OrchestrationState {
        &self.state
    }

    /// Start a new run for `brand_name`.
    ///
    /// Returns false, leaving the state untouched, when the brand name is
    /// empty or a run is already active.
    pub fn submit(&mut self, brand_name: &str) -> bool {
        if brand_name.is_empty() {
            tracing::debug!("ignoring submission with empty brand name");
            return false;
        }
        if self.state.running {
            tracing::debug!(brand = brand_name, "ignoring submission while a run is active");
            return false;
        }
        self.state = OrchestrationState {
            brand_name: brand_name.to_string(),
            results: Default::default(),
            current_step: AssessmentStep::Initial,
            running: true,
            last_error: None,
        };
        tracing::info!(brand = brand_name, "assessment started");
        true
    }

    /// Run the current step to completion and record its outcome.
    ///
    /// Returns whether the run is still active afterwards. A no-op when no
    /// run is active.
    pub fn advance(&mut self) -> bool {
        if !self.state.running {
            return false;
        }
        let step = self.state.current_step;
        let client = &self.client;
        let brand_name = self.state.brand_name.as_str();
        let attempt =
            panic::catch_unwind(AssertUnwindSafe(|| client.fetch_step(brand_name, step)));

        let (outcome, run_error) = match attempt {
            Ok(Ok(fragment)) => (StepOutcome::Complete { fragment }, None),
            Ok(Err(error)) => {
                tracing::warn!(%step, message = %error.message, "assessment halted");
                (
                    StepOutcome::Failed { error },
                    Some(AssessmentError::step_failed(step)),
                )
            }
            Err(_) => {
                tracing::error!(%step, "assessment client panicked");
                let error = AssessmentError::assessment_failed();
                (
                    StepOutcome::Failed {
                        error: error.clone(),
                    },
                    Some(error),
                )
            }
        };
        self.state.results[step.index()] = outcome;

        match (run_error, step.next()) {
            (Some(error), _) => self.halt(error),
            (None, Some(next)) => self.state.current_step = next,
            (None, None) => {
                self.state.running = false;
                tracing::info!(brand = %self.state.brand_name, "assessment complete");
            }
        }
        self.state.running
    }

    fn halt(&mut self, error: AssessmentError) {
        self.state.last_error = Some(error);
        self.state.running = false;
    }

    /// Submit and drive a full run, reporting each transition to `observe`.
    ///
    /// The observer sees the state after submission and after every step.
    /// Returns false if the submission was rejected.
    pub fn run_assessment<F>(&mut self, brand_name: &str, mut observe: F) -> bool
    where
        F: FnMut(&OrchestrationState),
    {
        if !self.submit(brand_name) {
            return false;
        }
        observe(&self.state);
        while self.state.running {
            self.advance();
            observe(&self.state);
        }
        true
    }
}
