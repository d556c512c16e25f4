use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod assessment;
mod cli;
mod client;
mod completion;
mod config;
mod orchestrator;
mod render;
mod report;
mod step;
mod util;

use crate::cli::{AssessArgs, Command, OutputFormat, PromptArgs, RootArgs, StepArgs};
use crate::client::{AssessmentClient, HttpAssessmentClient};
use crate::config::ProviderConfig;
use crate::orchestrator::Orchestrator;
use crate::render::{render_json, render_progress, render_text};

fn main() -> Result<()> {
    let root = RootArgs::parse();

    match root.command {
        Command::Assess(args) => {
            init_tracing(args.provider.verbose);
            cmd_assess(&args)
        }
        Command::Step(args) => {
            init_tracing(args.provider.verbose);
            cmd_step(&args)
        }
        Command::Prompt(args) => {
            init_tracing(false);
            cmd_prompt(&args)
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence over `verbose`.
fn init_tracing(verbose: bool) {
    let fallback_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn cmd_assess(args: &AssessArgs) -> Result<()> {
    let brand_name = brand_name(&args.brand_name)?;
    let config = ProviderConfig::resolve(&args.provider)?;
    tracing::debug!(?config, "resolved provider config");

    let mut orchestrator = Orchestrator::new(HttpAssessmentClient::new(config));
    orchestrator.run_assessment(brand_name, |state| {
        if state.running {
            eprintln!("{}", render_progress(state.current_step));
        }
    });

    let state = orchestrator.state();
    tracing::info!(
        brand = brand_name,
        completed = state
            .results
            .iter()
            .filter(|outcome| outcome.fragment().is_some())
            .count(),
        complete = state.is_complete(),
        "assessment finished"
    );
    match args.output {
        OutputFormat::Text => print!("{}", render_text(state)),
        OutputFormat::Json => println!("{}", render_json(state)?),
    }

    if let Some(error) = &state.last_error {
        return Err(anyhow!("{}", error.message));
    }
    Ok(())
}

fn cmd_step(args: &StepArgs) -> Result<()> {
    let brand_name = brand_name(&args.brand_name)?;
    let config = ProviderConfig::resolve(&args.provider)?;
    let client = HttpAssessmentClient::new(config);

    eprintln!("{}", render_progress(args.step));
    match client.fetch_step(brand_name, args.step) {
        Ok(fragment) => {
            let text = serde_json::to_string_pretty(&fragment.payload)
                .context("serialize step fragment")?;
            println!("{text}");
            Ok(())
        }
        Err(error) => {
            let text = serde_json::to_string_pretty(&error).context("serialize step error")?;
            println!("{text}");
            Err(error.into())
        }
    }
}

fn cmd_prompt(args: &PromptArgs) -> Result<()> {
    let brand_name = brand_name(&args.brand_name)?;
    println!("{}", args.step.prompt(brand_name));
    Ok(())
}

/// Submission guard: a blank brand name never reaches the orchestrator.
fn brand_name(raw: &str) -> Result<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("brand name must be non-empty"));
    }
    Ok(trimmed)
}
