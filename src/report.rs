//! Typed partial shapes for each step's model output.
//!
//! Every step fills a different slice of the sustainability report, so each
//! has its own struct with all fields optional. Nothing here rejects a
//! fragment; a payload that does not fit is rendered raw instead.
use crate::step::AssessmentStep;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionStatement {
    pub sustainability_integration: Option<String>,
    pub long_term_goals: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialsAndProduction {
    pub material_choices: Option<Vec<String>>,
    pub animal_based_materials: Option<Vec<String>>,
    pub production_practices: Option<Vec<String>>,
    pub chemical_management: Option<Vec<String>>,
}

/// Step 1: mission and materials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialAssessment {
    pub mission_statement: Option<MissionStatement>,
    pub materials_and_production: Option<MaterialsAndProduction>,
    #[serde(default)]
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Packaging {
    pub materials: Option<Vec<String>>,
    pub certifications: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyChain {
    pub transparency: Option<String>,
    pub depth_of_disclosure: Option<String>,
    pub traceability: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborPractices {
    pub standards: Option<Vec<String>>,
    pub certifications: Option<Vec<String>>,
    pub dei_initiatives: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalPractices {
    pub carbon_footprint: Option<String>,
    pub water_management: Option<Vec<String>>,
    pub renewable_energy: Option<String>,
    pub certifications: Option<Vec<String>>,
}

/// Step 2: packaging, supply chain, labor, environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAnalysis {
    pub packaging: Option<Packaging>,
    pub supply_chain: Option<SupplyChain>,
    pub labor_practices: Option<LaborPractices>,
    pub environmental_practices: Option<EnvironmentalPractices>,
    #[serde(default)]
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircularEconomy {
    pub programs: Option<Vec<String>>,
    pub initiatives: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerEngagement {
    pub sustainability_claims: Option<String>,
    pub educational_resources: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Innovation {
    pub investments: Option<Vec<String>>,
    pub partnerships: Option<Vec<String>>,
    pub lifecycle_assessments: Option<String>,
}

/// Step 3: score and forward-looking practices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringReport {
    pub score: Option<f64>,
    pub category: Option<String>,
    pub circular_economy: Option<CircularEconomy>,
    pub customer_engagement: Option<CustomerEngagement>,
    pub innovation: Option<Innovation>,
    #[serde(default)]
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Controversies {
    pub greenwashing: Option<Vec<String>>,
    pub labor: Option<Vec<String>>,
    pub environmental: Option<Vec<String>>,
    pub animal_welfare: Option<Vec<String>>,
    pub other: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compliance {
    pub regulations: Option<Vec<String>>,
    pub progress: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reporting {
    pub publications: Option<Vec<String>>,
    pub frameworks: Option<Vec<String>>,
    pub governance: Option<String>,
}

/// Step 4: controversies, compliance and disclosure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCheckReport {
    pub controversies: Option<Controversies>,
    pub compliance: Option<Compliance>,
    pub reporting: Option<Reporting>,
    #[serde(default)]
    pub sources: Vec<String>,
}

/// Typed view of one fragment, keyed by the step that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum StepReport {
    Initial(InitialAssessment),
    Detailed(DetailedAnalysis),
    Scoring(ScoringReport),
    FactCheck(FactCheckReport),
}

impl StepReport {
    pub fn from_payload(step: AssessmentStep, payload: &Value) -> serde_json::Result<Self> {
        let payload = payload.clone();
        Ok(match step {
            AssessmentStep::Initial => Self::Initial(serde_json::from_value(payload)?),
            AssessmentStep::Detailed => Self::Detailed(serde_json::from_value(payload)?),
            AssessmentStep::Scoring => Self::Scoring(serde_json::from_value(payload)?),
            AssessmentStep::FactCheck => Self::FactCheck(serde_json::from_value(payload)?),
        })
    }

    pub fn sources(&self) -> &[String] {
        match self {
            Self::Initial(report) => &report.sources,
            Self::Detailed(report) => &report.sources,
            Self::Scoring(report) => &report.sources,
            Self::FactCheck(report) => &report.sources,
        }
    }
}
