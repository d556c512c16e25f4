//! Outcome types shared by the client, the orchestrator and the renderers.
use crate::report::StepReport;
use crate::step::AssessmentStep;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Kind tag carried by every reported error.
pub const ERROR_KIND: &str = "AssessmentError";

pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse API response. Please try again.";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";
pub const ASSESSMENT_FAILED_MESSAGE: &str = "Failed to complete the assessment. Please try again.";

/// The single error shape surfaced to callers of the client and orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentError {
    pub error: String,
    pub message: String,
}

impl AssessmentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ERROR_KIND.to_string(),
            message: message.into(),
        }
    }

    /// Model output could not be parsed as JSON.
    pub fn parse_failure() -> Self {
        Self::new(PARSE_FAILURE_MESSAGE)
    }

    /// Describe a lower-level failure, including its context chain.
    pub fn from_cause(cause: &anyhow::Error) -> Self {
        let description = format!("{cause:#}");
        if description.trim().is_empty() {
            return Self::new(UNKNOWN_ERROR_MESSAGE);
        }
        Self::new(description)
    }

    /// Run-level error naming the failed step (1-indexed).
    pub fn step_failed(step: AssessmentStep) -> Self {
        Self::new(format!(
            "Failed to complete step {}. Please try again.",
            step.number()
        ))
    }

    /// Run-level error for faults outside the client's own handling.
    pub fn assessment_failed() -> Self {
        Self::new(ASSESSMENT_FAILED_MESSAGE)
    }
}

impl fmt::Display for AssessmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for AssessmentError {}

/// Parsed model output for one step.
///
/// The payload is kept as raw JSON: any syntactically valid value is accepted,
/// and typed views are derived on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultFragment {
    pub step: AssessmentStep,
    pub payload: Value,
}

impl ResultFragment {
    pub fn new(step: AssessmentStep, payload: Value) -> Self {
        Self { step, payload }
    }

    /// Interpret the payload with the partial shape of its step.
    pub fn report(&self) -> serde_json::Result<StepReport> {
        StepReport::from_payload(self.step, &self.payload)
    }
}

/// What a single call to the client produced.
pub type StepResult = Result<ResultFragment, AssessmentError>;

/// Per-step slot in the orchestration state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    /// Not attempted in the current run.
    #[default]
    Pending,
    Complete { fragment: ResultFragment },
    Failed { error: AssessmentError },
}

impl StepOutcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn fragment(&self) -> Option<&ResultFragment> {
        match self {
            Self::Complete { fragment } => Some(fragment),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AssessmentError> {
        match self {
            Self::Failed { error } => Some(error),
            _ => None,
        }
    }
}
