//! `pq-bench` binary: runs every standard suite and prints the report
//!
//! Configuration comes from `BENCH_ITER`, `BENCH_TRACK_ALLOC`, `BENCH_PARALLEL`,
//! `BENCH_FORMAT` and `BENCH_FILTER`; logging is controlled by `RUST_LOG`.

use color_eyre::eyre::{eyre, Result};
use pq_bench::alloc::CountingAllocator;
use pq_bench::config::BenchConfig;
use pq_bench::runner::{suite, Runner};
use pq_bench::workload::Message;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[global_allocator]
static ALLOCATOR: CountingAllocator = CountingAllocator;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let config = BenchConfig::from_env();
    info!(
        version = pq_bench::VERSION,
        iterations = config.iterations.get(),
        parallel = config.parallel,
        format = %config.format,
        "Starting benchmark run"
    );

    let message = Message::standard();
    info!(digest = %message, "Signing standard message");

    let mut groups = suite::signature_suites(&message);
    groups.extend(suite::kem_suites());

    let report = Runner::new(config.clone()).run_all(&groups);
    report.write_to(std::io::stdout().lock(), config.format)?;

    if report.has_failures() {
        return Err(eyre!(
            "{} of {} benchmark cases failed",
            report.failures().count(),
            report.outcomes().len()
        ));
    }
    Ok(())
}
