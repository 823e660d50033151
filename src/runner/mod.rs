//! Benchmark runner
//!
//! Repeats a prepared [`TimedOp`] a configured number of times, measuring the
//! wall-clock time and the allocations of the loop. Cases are grouped into
//! comparable sets; a failing case never stops the rest of its group.

pub mod suite;

pub use crate::report::{CaseOutcome, FailedCase, VariantResult};
pub use suite::SecurityTier;

use crate::alloc;
use crate::config::BenchConfig;
use crate::error::{AdapterResult, CaseError};
use crate::report::Report;
use crate::workload::{KemOp, KemWorkload, Message, SignatureOp, SignatureWorkload, TimedOp};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

type Prepare = Box<dyn Fn() -> AdapterResult<TimedOp> + Send + Sync>;

/// A named benchmark case
///
/// Holds the setup closure that produces the timed body; the closure runs
/// once per case run, outside the timed region.
pub struct BenchCase {
    name: String,
    prepare: Prepare,
}

impl BenchCase {
    /// Create a case from an arbitrary setup closure
    pub fn new<F>(name: impl Into<String>, prepare: F) -> Self
    where
        F: Fn() -> AdapterResult<TimedOp> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            prepare: Box::new(prepare),
        }
    }

    /// Case running `op` of a signature variant over `message`
    pub fn signature(workload: Arc<dyn SignatureWorkload>, op: SignatureOp, message: Message) -> Self {
        let name = workload.variant().name;
        Self::new(name, move || workload.prepare(op, &message))
    }

    /// Case running `op` of a KEM variant
    pub fn kem(workload: Arc<dyn KemWorkload>, op: KemOp) -> Self {
        let name = workload.variant().name;
        Self::new(name, move || workload.prepare(op))
    }

    /// Case name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the setup and return the timed body
    pub fn prepare(&self) -> AdapterResult<TimedOp> {
        (self.prepare)()
    }
}

impl std::fmt::Debug for BenchCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchCase").field("name", &self.name).finish()
    }
}

/// A set of comparable cases, e.g. `Sign2`
#[derive(Debug)]
pub struct BenchGroup {
    name: String,
    cases: Vec<BenchCase>,
}

impl BenchGroup {
    /// Create an empty group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    /// Add a case, builder style
    pub fn with_case(mut self, case: BenchCase) -> Self {
        self.cases.push(case);
        self
    }

    /// Add a case
    pub fn push(&mut self, case: BenchCase) {
        self.cases.push(case);
    }

    /// Group name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cases in run order
    pub fn cases(&self) -> &[BenchCase] {
        &self.cases
    }

    /// Number of cases
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Whether the group has no cases
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

/// Runs cases and groups under a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: BenchConfig,
}

impl Runner {
    /// Create a runner
    pub fn new(config: BenchConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Run one case: setup, then the timed loop
    ///
    /// The first failing iteration aborts the case.
    pub fn run_case(&self, group: &str, case: &BenchCase) -> CaseOutcome {
        let full_name = format!("{}/{}", group, case.name());
        let iterations = self.config.iterations.get();
        debug!(case = %full_name, iterations, "Running case");

        let failed = |error: CaseError| {
            warn!("{}", error);
            CaseOutcome::Failed(FailedCase {
                group: group.to_string(),
                case: case.name().to_string(),
                error,
            })
        };

        let mut timed = match case.prepare() {
            Ok(timed) => timed,
            Err(source) => {
                return failed(CaseError::Setup {
                    case: full_name,
                    source,
                })
            }
        };

        let track_allocations = self.config.track_allocations && alloc::is_active();
        let before = alloc::snapshot();
        let start = Instant::now();
        for iteration in 0..iterations {
            if let Err(source) = timed() {
                return failed(CaseError::Iteration {
                    case: full_name,
                    iteration,
                    source,
                });
            }
        }
        let elapsed = start.elapsed();
        let after = alloc::snapshot();

        debug!(case = %full_name, elapsed_ns = elapsed.as_nanos() as u64, "Case completed");
        CaseOutcome::Completed(VariantResult {
            group: group.to_string(),
            case: case.name().to_string(),
            iterations,
            elapsed,
            allocations: track_allocations.then(|| after.since(&before)),
        })
    }

    /// Run every case of a group that passes the filter
    pub fn run_group(&self, group: &BenchGroup) -> Vec<CaseOutcome> {
        let selected: Vec<&BenchCase> = group
            .cases()
            .iter()
            .filter(|case| self.config.matches(&format!("{}/{}", group.name(), case.name())))
            .collect();

        if selected.is_empty() {
            debug!(group = group.name(), "No cases selected");
            return Vec::new();
        }

        info!(group = group.name(), cases = selected.len(), "Running group");
        selected
            .into_iter()
            .map(|case| self.run_case(group.name(), case))
            .collect()
    }

    /// Run every group and collect the outcomes in group order
    ///
    /// With `parallel` set each group runs on its own scoped thread.
    pub fn run_all(&self, groups: &[BenchGroup]) -> Report {
        let mut report = Report::new(self.config.iterations.get());

        if self.config.parallel {
            let per_group: Vec<Vec<CaseOutcome>> = std::thread::scope(|scope| {
                let handles: Vec<_> = groups
                    .iter()
                    .map(|group| scope.spawn(move || self.run_group(group)))
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| match handle.join() {
                        Ok(outcomes) => outcomes,
                        Err(panic) => std::panic::resume_unwind(panic),
                    })
                    .collect()
            });
            per_group.into_iter().flatten().for_each(|outcome| report.push(outcome));
        } else {
            for group in groups {
                for outcome in self.run_group(group) {
                    report.push(outcome);
                }
            }
        }

        let failures = report.failures().count();
        if failures > 0 {
            warn!(failures, "Run finished with failed cases");
        } else {
            info!(cases = report.outcomes().len(), "Run finished");
        }
        report
    }
}
