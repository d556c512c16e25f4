//! Shared test infrastructure for integration tests.
//!
//! Runs the built `ecoassess` binary against an httpmock provider so the
//! full CLI path (config resolution, client, orchestrator, rendering) is
//! exercised without network access.

use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::{json, Value};
use std::process::{Command, Output};

pub const BRAND: &str = "Acme";

/// Opening sentence of each step's prompt for `BRAND`, in run order.
pub const STEP_OPENINGS: [&str; 4] = [
    "For Acme, extract basic sustainability information",
    "Conduct a detailed sustainability analysis for Acme.",
    "Calculate a sustainability score for Acme.",
    "Investigate sustainability claims for Acme.",
];

/// Chat completion envelope whose message content is `payload` inside a
/// json fence.
pub fn fenced_completion(payload: &Value) -> Value {
    json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": format!("Here is the data:\n```json\n{payload}\n```\n")
            }
        }]
    })
}

/// Canned payloads for each step.
pub fn step_payloads() -> [Value; 4] {
    [
        json!({
            "missionStatement": {
                "sustainabilityIntegration": "Embedded in product strategy",
                "longTermGoals": "Net zero by 2040"
            },
            "sources": ["https://acme.example/impact"]
        }),
        json!({
            "supplyChain": {"transparency": "Tier 1 suppliers published"},
            "sources": []
        }),
        json!({"score": 72, "category": "Leader", "sources": []}),
        json!({
            "controversies": {"greenwashing": ["No data found"]},
            "sources": ["https://news.example/acme"]
        }),
    ]
}

/// Register a successful reply for the step whose prompt starts with
/// `opening`.
pub fn mock_step<'a>(server: &'a MockServer, opening: &str, payload: &Value) -> Mock<'a> {
    let body = fenced_completion(payload);
    server.mock(|when, then| {
        when.method(POST)
            .path("/chat/completions")
            .body_contains(opening);
        then.status(200).json_body(body);
    })
}

/// Binary invocation with provider settings pointing at `server`.
pub fn ecoassess_command(server: &MockServer) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_ecoassess"));
    command
        .env("ECOASSESS_ENDPOINT", server.url("/chat/completions"))
        .env("PERPLEXITY_API_KEY", "test-key")
        .env_remove("ECOASSESS_MODEL")
        .env_remove("RUST_LOG");
    command
}

pub fn run_ecoassess(server: &MockServer, args: &[&str]) -> Output {
    ecoassess_command(server)
        .args(args)
        .output()
        .expect("run ecoassess binary")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
