//! CLI argument parsing for brand assessments.
//!
//! The CLI stays thin: it resolves configuration, hands the brand name to the
//! orchestrator or client, and chooses an output format.
use crate::step::AssessmentStep;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "ecoassess",
    version,
    about = "LM-driven sustainability assessment for brands",
    after_help = "Environment:\n  PERPLEXITY_API_KEY   Bearer credential for the provider\n  ECOASSESS_ENDPOINT   Chat completions URL override\n  ECOASSESS_MODEL      Model identifier override\n\nExamples:\n  ecoassess assess Patagonia\n  ecoassess assess \"Acme Apparel\" --output json\n  ecoassess step Patagonia --step scoring\n  ecoassess prompt Patagonia --step fact-check",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Assess(AssessArgs),
    Step(StepArgs),
    Prompt(PromptArgs),
}

/// Output format for a full assessment.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// Full run state as JSON
    Json,
}

/// Provider settings shared by commands that reach the network.
#[derive(Args, Debug, Clone, Default)]
pub struct ProviderArgs {
    /// Chat completions endpoint URL
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Model identifier sent with each request
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Token limit for each completion
    #[arg(long, value_name = "N")]
    pub max_tokens: Option<u32>,

    /// Emit info-level logs to stderr
    #[arg(long)]
    pub verbose: bool,
}

/// Assess command inputs for a full four-step run.
#[derive(Parser, Debug)]
#[command(about = "Run the four-step sustainability assessment for a brand")]
pub struct AssessArgs {
    /// Brand to assess
    #[arg(value_name = "BRAND")]
    pub brand_name: String,

    /// Output format for the report
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

/// Step command inputs for running one step in isolation.
#[derive(Parser, Debug)]
#[command(about = "Run a single assessment step and print its JSON fragment")]
pub struct StepArgs {
    /// Brand to assess
    #[arg(value_name = "BRAND")]
    pub brand_name: String,

    /// Step to run
    #[arg(long, value_enum)]
    pub step: AssessmentStep,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

/// Prompt command inputs; no network access.
#[derive(Parser, Debug)]
#[command(about = "Print the prompt a step would send")]
pub struct PromptArgs {
    /// Brand to assess
    #[arg(value_name = "BRAND")]
    pub brand_name: String,

    /// Step whose prompt to print
    #[arg(long, value_enum)]
    pub step: AssessmentStep,
}
