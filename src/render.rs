//! Terminal rendering of assessment runs.
//!
//! Text output mirrors the report panels: one block per attempted step,
//! titled sections of data points, the score, and sources. Pending steps are
//! omitted; failed steps show their cause, and a halted run ends with the
//! run-level error.
use crate::assessment::ResultFragment;
use crate::orchestrator::OrchestrationState;
use crate::report::{
    DetailedAnalysis, FactCheckReport, InitialAssessment, ScoringReport, StepReport,
};
use crate::step::{AssessmentStep, STEP_COUNT};
use anyhow::{Context, Result};

/// Phrases the model uses when it found nothing to report.
const NO_DATA_MARKERS: [&str; 2] = ["No data found", "Not publicly disclosed"];

/// One-line progress indicator for the step about to run.
pub fn render_progress(step: AssessmentStep) -> String {
    format!("[{}/{}] {}...", step.number(), STEP_COUNT, step.title())
}

/// Machine-readable dump of the whole run state.
pub fn render_json(state: &OrchestrationState) -> Result<String> {
    serde_json::to_string_pretty(state).context("serialize assessment state")
}

/// Human-readable report for every attempted step.
pub fn render_text(state: &OrchestrationState) -> String {
    let mut out = format!("Sustainability Assessment Report: {}\n", state.brand_name);
    for step in AssessmentStep::ALL {
        let outcome = state.outcome(step);
        if outcome.is_pending() {
            continue;
        }
        out.push_str(&format!("\n== {} ==\n", step.title()));
        if let Some(fragment) = outcome.fragment() {
            render_fragment(&mut out, fragment);
        } else if let Some(error) = outcome.error() {
            out.push_str(&format!("  failed: {}\n", error.message));
        }
    }
    if let Some(error) = &state.last_error {
        out.push_str(&format!("\n{}\n  {}\n", error.error, error.message));
    }
    out
}

/// Render a single fragment, falling back to raw JSON when it does not fit
/// the step's shape.
fn render_fragment(out: &mut String, fragment: &ResultFragment) {
    let report = match fragment.report() {
        Ok(report) => report,
        Err(err) => {
            tracing::debug!(step = %fragment.step, error = %err, "rendering raw payload");
            render_raw(out, fragment);
            return;
        }
    };
    match &report {
        StepReport::Initial(report) => render_initial(out, report),
        StepReport::Detailed(report) => render_detailed(out, report),
        StepReport::Scoring(report) => render_scoring(out, report),
        StepReport::FactCheck(report) => render_fact_check(out, report),
    }
    render_sources(out, report.sources());
}

fn render_raw(out: &mut String, fragment: &ResultFragment) {
    out.push_str("  (unrecognized response shape; raw payload follows)\n");
    let pretty = serde_json::to_string_pretty(&fragment.payload)
        .unwrap_or_else(|_| fragment.payload.to_string());
    for line in pretty.lines() {
        out.push_str(&format!("  {line}\n"));
    }
}

fn render_initial(out: &mut String, report: &InitialAssessment) {
    if let Some(mission) = &report.mission_statement {
        section(out, "Mission Statement & Core Values");
        text_point(out, "Sustainability Integration", &mission.sustainability_integration);
        text_point(out, "Long-term Goals", &mission.long_term_goals);
    }
    if let Some(materials) = &report.materials_and_production {
        section(out, "Materials & Production");
        list_point(out, "Material Choices", &materials.material_choices);
        list_point(out, "Animal-Based Materials", &materials.animal_based_materials);
        list_point(out, "Production Practices", &materials.production_practices);
        list_point(out, "Chemical Management", &materials.chemical_management);
    }
}

fn render_detailed(out: &mut String, report: &DetailedAnalysis) {
    if let Some(packaging) = &report.packaging {
        section(out, "Packaging & Certifications");
        list_point(out, "Materials", &packaging.materials);
        list_point(out, "Certifications", &packaging.certifications);
    }
    if let Some(supply_chain) = &report.supply_chain {
        section(out, "Supply Chain");
        text_point(out, "Transparency", &supply_chain.transparency);
        text_point(out, "Depth of Disclosure", &supply_chain.depth_of_disclosure);
        text_point(out, "Traceability", &supply_chain.traceability);
    }
    if let Some(labor) = &report.labor_practices {
        section(out, "Labor Practices");
        list_point(out, "Standards", &labor.standards);
        list_point(out, "Certifications", &labor.certifications);
        list_point(out, "DEI Initiatives", &labor.dei_initiatives);
    }
    if let Some(environment) = &report.environmental_practices {
        section(out, "Environmental Practices");
        text_point(out, "Carbon Footprint", &environment.carbon_footprint);
        list_point(out, "Water Management", &environment.water_management);
        text_point(out, "Renewable Energy", &environment.renewable_energy);
        list_point(out, "Certifications", &environment.certifications);
    }
}

fn render_scoring(out: &mut String, report: &ScoringReport) {
    if let Some(score) = report.score {
        section(out, "Sustainability Score");
        match &report.category {
            Some(category) => out.push_str(&format!("  {score}/100  Category: {category}\n")),
            None => out.push_str(&format!("  {score}/100\n")),
        }
    }
    if let Some(circular) = &report.circular_economy {
        section(out, "Circular Economy");
        list_point(out, "Programs", &circular.programs);
        list_point(out, "Initiatives", &circular.initiatives);
    }
    if let Some(engagement) = &report.customer_engagement {
        section(out, "Customer Engagement");
        text_point(out, "Sustainability Claims", &engagement.sustainability_claims);
        text_point(out, "Educational Resources", &engagement.educational_resources);
    }
    if let Some(innovation) = &report.innovation {
        section(out, "Innovation");
        list_point(out, "Investments", &innovation.investments);
        list_point(out, "Partnerships", &innovation.partnerships);
        text_point(out, "Lifecycle Assessments", &innovation.lifecycle_assessments);
    }
}

fn render_fact_check(out: &mut String, report: &FactCheckReport) {
    if let Some(controversies) = &report.controversies {
        section(out, "Controversies & Compliance");
        list_point(out, "Greenwashing", &controversies.greenwashing);
        list_point(out, "Labor Issues", &controversies.labor);
        list_point(out, "Environmental Issues", &controversies.environmental);
        list_point(out, "Animal Welfare", &controversies.animal_welfare);
        list_point(out, "Other Issues", &controversies.other);
    }
    if let Some(compliance) = &report.compliance {
        section(out, "Compliance");
        list_point(out, "Regulations", &compliance.regulations);
        text_point(out, "Progress", &compliance.progress);
    }
    if let Some(reporting) = &report.reporting {
        section(out, "Reporting");
        list_point(out, "Publications", &reporting.publications);
        list_point(out, "Frameworks", &reporting.frameworks);
        text_point(out, "Governance", &reporting.governance);
    }
}

fn render_sources(out: &mut String, sources: &[String]) {
    if sources.is_empty() {
        return;
    }
    section(out, "Sources");
    for source in sources {
        out.push_str(&format!("  - {source}\n"));
    }
}

fn section(out: &mut String, title: &str) {
    out.push_str(&format!("\n{title}\n"));
}

fn text_point(out: &mut String, label: &str, value: &Option<String>) {
    if let Some(value) = value.as_deref().filter(|value| !value.is_empty()) {
        data_point(out, label, &[value]);
    }
}

fn list_point(out: &mut String, label: &str, values: &Option<Vec<String>>) {
    if let Some(values) = values {
        let values: Vec<&str> = values.iter().map(String::as_str).collect();
        data_point(out, label, &values);
    }
}

fn data_point(out: &mut String, label: &str, values: &[&str]) {
    let marker = if has_data(values) { "✓" } else { "!" };
    out.push_str(&format!("  {marker} {label}:\n"));
    for value in values {
        out.push_str(&format!("      • {value}\n"));
    }
}

/// True when at least one value carries real content.
fn has_data(values: &[&str]) -> bool {
    values.iter().any(|value| {
        !value.is_empty() && !NO_DATA_MARKERS.iter().any(|marker| value.contains(marker))
    })
}
