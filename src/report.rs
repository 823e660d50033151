//! Result reporting
//!
//! Turns per-case measurements into throughput and allocation figures and
//! renders them as a Go-benchmark-like table or, with `serde_support`, as JSON.

use crate::alloc::AllocStats;
use crate::config::ReportFormat;
use crate::error::{CaseError, Result};
use crate::utils::format_rate;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::time::Duration;

/// Measurements of a completed case
#[derive(Debug, Clone, PartialEq)]
pub struct VariantResult {
    /// Group the case belongs to, e.g. `Sign2`
    pub group: String,
    /// Case name, usually the variant name
    pub case: String,
    /// Timed iterations, always positive
    pub iterations: u64,
    /// Wall-clock time spent in the timed loop
    pub elapsed: Duration,
    /// Allocations made by the timed loop, when tracked
    pub allocations: Option<AllocStats>,
}

impl VariantResult {
    /// Full `Group/Case` name
    pub fn name(&self) -> String {
        format!("{}/{}", self.group, self.case)
    }

    /// Operations per second, infinite when the elapsed time rounds to zero
    pub fn ops_per_sec(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds == 0.0 {
            f64::INFINITY
        } else {
            self.iterations as f64 / seconds
        }
    }

    /// Mean nanoseconds per operation
    pub fn ns_per_op(&self) -> f64 {
        self.elapsed.as_nanos() as f64 / self.iterations.max(1) as f64
    }

    /// Mean allocations per operation
    pub fn allocs_per_op(&self) -> Option<f64> {
        self.allocations
            .map(|stats| stats.allocations as f64 / self.iterations.max(1) as f64)
    }

    /// Mean bytes allocated per operation
    pub fn bytes_per_op(&self) -> Option<f64> {
        self.allocations
            .map(|stats| stats.bytes as f64 / self.iterations.max(1) as f64)
    }
}

/// A case that did not complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedCase {
    /// Group the case belongs to
    pub group: String,
    /// Case name
    pub case: String,
    /// Why the case stopped
    pub error: CaseError,
}

impl FailedCase {
    /// Full `Group/Case` name
    pub fn name(&self) -> String {
        format!("{}/{}", self.group, self.case)
    }
}

/// Outcome of running one case
#[derive(Debug, Clone, PartialEq)]
pub enum CaseOutcome {
    /// The case ran every iteration
    Completed(VariantResult),
    /// Setup or an iteration failed
    Failed(FailedCase),
}

impl CaseOutcome {
    /// Full `Group/Case` name
    pub fn name(&self) -> String {
        match self {
            Self::Completed(result) => result.name(),
            Self::Failed(failure) => failure.name(),
        }
    }

    /// Whether the case failed
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Measurements of a completed case
    pub fn result(&self) -> Option<&VariantResult> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Failed(_) => None,
        }
    }

    /// Failure of a case that did not complete
    pub fn failure(&self) -> Option<&FailedCase> {
        match self {
            Self::Completed(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }
}

/// Outcomes of one harness run, in run order
#[derive(Debug, Clone)]
pub struct Report {
    started_at: DateTime<Utc>,
    iterations: u64,
    outcomes: Vec<CaseOutcome>,
}

impl Report {
    /// Create an empty report for a run of `iterations` per case
    pub fn new(iterations: u64) -> Self {
        Self {
            started_at: Utc::now(),
            iterations,
            outcomes: Vec::new(),
        }
    }

    /// When the run started
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Configured iterations per case
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Append an outcome
    pub fn push(&mut self, outcome: CaseOutcome) {
        self.outcomes.push(outcome);
    }

    /// All outcomes in run order
    pub fn outcomes(&self) -> &[CaseOutcome] {
        &self.outcomes
    }

    /// Completed cases
    pub fn results(&self) -> impl Iterator<Item = &VariantResult> {
        self.outcomes.iter().filter_map(CaseOutcome::result)
    }

    /// Failed cases
    pub fn failures(&self) -> impl Iterator<Item = &FailedCase> {
        self.outcomes.iter().filter_map(CaseOutcome::failure)
    }

    /// Whether any case failed
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(CaseOutcome::is_failure)
    }

    /// Look up an outcome by its `Group/Case` name
    pub fn get(&self, name: &str) -> Option<&CaseOutcome> {
        self.outcomes.iter().find(|outcome| outcome.name() == name)
    }

    /// Render in the requested format
    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Table => Ok(self.to_table()),
            ReportFormat::Json => self.json(),
        }
    }

    /// Render and write to `writer`
    pub fn write_to<W: std::io::Write>(&self, mut writer: W, format: ReportFormat) -> Result<()> {
        let rendered = self.render(format)?;
        writer.write_all(rendered.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Go-benchmark-like table followed by the failed cases
    pub fn to_table(&self) -> String {
        let width = self
            .outcomes
            .iter()
            .map(|outcome| outcome.name().len())
            .max()
            .unwrap_or(0)
            + "Benchmark".len();

        let mut out = String::new();
        for result in self.results() {
            let name = format!("Benchmark{}", result.name());
            let _ = write!(
                out,
                "{:<width$} {:>10} {:>14.0} ns/op {:>14} ops/s",
                name,
                result.iterations,
                result.ns_per_op(),
                format_rate(result.ops_per_sec()),
                width = width,
            );
            if let (Some(bytes), Some(allocs)) = (result.bytes_per_op(), result.allocs_per_op()) {
                let _ = write!(out, " {:>10.0} B/op {:>8.0} allocs/op", bytes, allocs);
            }
            out.push('\n');
        }

        for failure in self.failures() {
            let _ = writeln!(out, "--- FAIL: Benchmark{}", failure.name());
            let _ = writeln!(out, "    {}", failure.error);
        }

        let total = self.outcomes.len();
        let failed = self.failures().count();
        if failed == 0 {
            let _ = writeln!(out, "PASS ({} cases)", total);
        } else {
            let _ = writeln!(out, "FAIL ({} of {} cases failed)", failed, total);
        }
        out
    }

    #[cfg(feature = "serde_support")]
    fn json(&self) -> Result<String> {
        self.to_json()
    }

    #[cfg(not(feature = "serde_support"))]
    fn json(&self) -> Result<String> {
        Err(crate::error::Error::Configuration {
            message: "JSON reports require the serde_support feature".to_string(),
        })
    }

    /// JSON document with every outcome
    #[cfg(feature = "serde_support")]
    pub fn to_json(&self) -> Result<String> {
        let document = json::JsonReport::from(self);
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_table())
    }
}

#[cfg(feature = "serde_support")]
mod json {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    pub(super) struct JsonReport {
        crate_name: &'static str,
        version: &'static str,
        started_at: DateTime<Utc>,
        iterations: u64,
        results: Vec<JsonResult>,
        failures: Vec<JsonFailure>,
    }

    #[derive(Serialize)]
    struct JsonResult {
        name: String,
        iterations: u64,
        elapsed_ns: u128,
        ns_per_op: f64,
        // JSON has no infinity
        ops_per_sec: Option<f64>,
        allocs_per_op: Option<f64>,
        bytes_per_op: Option<f64>,
    }

    #[derive(Serialize)]
    struct JsonFailure {
        name: String,
        error: String,
    }

    impl From<&Report> for JsonReport {
        fn from(report: &Report) -> Self {
            Self {
                crate_name: crate::CRATE_NAME,
                version: crate::VERSION,
                started_at: report.started_at,
                iterations: report.iterations,
                results: report
                    .results()
                    .map(|result| JsonResult {
                        name: result.name(),
                        iterations: result.iterations,
                        elapsed_ns: result.elapsed.as_nanos(),
                        ns_per_op: result.ns_per_op(),
                        ops_per_sec: Some(result.ops_per_sec()).filter(|rate| rate.is_finite()),
                        allocs_per_op: result.allocs_per_op(),
                        bytes_per_op: result.bytes_per_op(),
                    })
                    .collect(),
                failures: report
                    .failures()
                    .map(|failure| JsonFailure {
                        name: failure.name(),
                        error: failure.error.to_string(),
                    })
                    .collect(),
            }
        }
    }
}
