//! Flow orchestration and reporting
//!
//! Runs the API flow and the form scenarios, each in isolation,
//! collects per-flow results, and optionally writes the suite to a JSON
//! report. A failing flow never affects its siblings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};

use flowcheck_common::steps::{PageDriver, StepResult};
use flowcheck_common::Result;

use crate::api::BookingClient;
use crate::flows::api::ApiFlow;
use crate::flows::form::FormFlow;

/// Result of running a single flow or scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
}

impl FlowResult {
    fn from_steps(name: &str, steps: Vec<StepResult>, started: Instant) -> Self {
        let failed = steps.iter().find(|s| !s.success);
        Self {
            name: name.to_string(),
            success: failed.is_none(),
            error: failed.map(|s| {
                format!(
                    "{}: {}",
                    s.step_name,
                    s.error.as_deref().unwrap_or("failed")
                )
            }),
            duration_ms: started.elapsed().as_millis() as u64,
            steps,
        }
    }

    fn from_error(name: &str, error: impl std::fmt::Display, started: Instant) -> Self {
        Self {
            name: name.to_string(),
            success: false,
            duration_ms: started.elapsed().as_millis() as u64,
            steps: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Result of running the whole suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<FlowResult>,
}

/// Orchestrates flows and reports their results
#[derive(Debug, Default)]
pub struct FlowRunner {
    output_dir: Option<PathBuf>,
}

impl FlowRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also write the suite result JSON under `dir`.
    pub fn with_output_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: Some(dir.into()),
        }
    }

    /// Run the API flow against a booking service.
    pub async fn run_api(&self, client: &BookingClient, flow: &ApiFlow) -> FlowResult {
        let started = Instant::now();
        let result = match flow.run(client).await {
            Ok(steps) => FlowResult::from_steps("api-flow", steps, started),
            Err(e) => FlowResult::from_error("api-flow", e, started),
        };
        log_result(&result);
        result
    }

    /// Run the three form scenarios, each against a freshly loaded page.
    pub async fn run_form(&self, driver: &dyn PageDriver, flow: &FormFlow) -> Vec<FlowResult> {
        let mut results = Vec::new();
        for (name, steps) in flow.scenarios() {
            let started = Instant::now();
            let result = match driver.run(&steps).await {
                Ok(step_results) => FlowResult::from_steps(name, step_results, started),
                Err(e) => FlowResult::from_error(name, e, started),
            };
            log_result(&result);
            results.push(result);
        }
        results
    }

    /// Fold flow results into a suite summary.
    pub fn summarize(&self, results: Vec<FlowResult>, started: Instant) -> SuiteResult {
        let passed = results.iter().filter(|r| r.success).count();
        let failed = results.len() - passed;
        let duration_ms = started.elapsed().as_millis() as u64;

        info!(
            "Flow results: {} passed, {} failed ({} ms)",
            passed, failed, duration_ms
        );

        SuiteResult {
            total: results.len(),
            passed,
            failed,
            duration_ms,
            results,
        }
    }

    /// Write the suite result to `<output_dir>/flow-results.json`.
    pub fn write_results(&self, suite: &SuiteResult) -> Result<Option<PathBuf>> {
        let Some(dir) = &self.output_dir else {
            return Ok(None);
        };
        let path = write_results_to(suite, dir)?;
        info!("Results written to: {}", path.display());
        Ok(Some(path))
    }
}

fn write_results_to(suite: &SuiteResult, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join("flow-results.json");
    let json = serde_json::to_string_pretty(suite)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

fn log_result(result: &FlowResult) {
    if result.success {
        info!("✓ {} ({} ms)", result.name, result.duration_ms);
    } else {
        error!(
            "✗ {} - {}",
            result.name,
            result.error.as_deref().unwrap_or("unknown error")
        );
    }
}
