//! Assessment steps and their prompt templates.
//!
//! A run always walks the steps in declaration order. Each step owns one
//! template that asks the model for a JSON object with a fixed field schema;
//! the only substitution is the brand name.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

// Prompt templates loaded at compile time
const INITIAL_ASSESSMENT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/initial_assessment.md"
));
const DETAILED_ANALYSIS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/detailed_analysis.md"
));
const SCORING: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/scoring.md"));
const FACT_CHECK: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/fact_check.md"
));

/// Number of steps in a full assessment run.
pub const STEP_COUNT: usize = 4;

/// One stage of the four-step assessment sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStep {
    /// Mission statement plus materials and production.
    #[default]
    Initial,
    /// Packaging, supply chain, labor and environmental practices.
    Detailed,
    /// Numeric score and category, circularity, engagement, innovation.
    Scoring,
    /// Controversies, compliance and reporting.
    FactCheck,
}

impl AssessmentStep {
    /// All steps in execution order.
    pub const ALL: [AssessmentStep; STEP_COUNT] = [
        AssessmentStep::Initial,
        AssessmentStep::Detailed,
        AssessmentStep::Scoring,
        AssessmentStep::FactCheck,
    ];

    /// Zero-based position in the run.
    pub fn index(self) -> usize {
        match self {
            Self::Initial => 0,
            Self::Detailed => 1,
            Self::Scoring => 2,
            Self::FactCheck => 3,
        }
    }

    /// One-based position, used in user-facing messages.
    pub fn number(self) -> usize {
        self.index() + 1
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The step that follows this one, if any.
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Initial => "Initial Assessment",
            Self::Detailed => "Detailed Analysis",
            Self::Scoring => "Scoring",
            Self::FactCheck => "Fact Checking",
        }
    }

    fn template(self) -> &'static str {
        match self {
            Self::Initial => INITIAL_ASSESSMENT,
            Self::Detailed => DETAILED_ANALYSIS,
            Self::Scoring => SCORING,
            Self::FactCheck => FACT_CHECK,
        }
    }

    /// Build the prompt sent to the model for `brand_name`.
    pub fn prompt(self, brand_name: &str) -> String {
        self.template()
            .trim_end()
            .replace("{brand_name}", brand_name)
    }
}

impl fmt::Display for AssessmentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initial => write!(f, "initial"),
            Self::Detailed => write!(f, "detailed"),
            Self::Scoring => write!(f, "scoring"),
            Self::FactCheck => write!(f, "fact_check"),
        }
    }
}
