//! # pq-bench
//!
//! A micro-benchmark harness comparing classical and post-quantum digital
//! signature and key-encapsulation implementations. Every primitive comes from
//! an existing library crate; this crate provides uniform adapters, workload
//! preparation, a timing loop with allocation accounting, and reporting.
//!
//! ## Modules
//!
//! - **Adapter Module**: one zero-sized adapter per algorithm variant behind the
//!   `SignatureScheme` and `KemScheme` traits
//! - **Workload Module**: the standard message digest and per-case setup
//! - **Runner Module**: timed loops, benchmark groups and the standard suites
//! - **Report Module**: ops/sec, ns/op, allocs/op and bytes/op rendering
//!
//! ## Optional Features
//!
//! - `serde_support`: JSON reports (enabled by default)
//! - `compare-pqcrypto`: PQClean ML-KEM variants alongside `fips203`
//!
//! ## Example
//!
//! ```rust
//! use pq_bench::prelude::*;
//!
//! let config = BenchConfig::default().with_iterations(3)?.with_filter("Sign1/EdDSA");
//! let report = Runner::new(config).run_all(&suite::signature_suites(&Message::standard()));
//! assert!(!report.has_failures());
//! println!("{}", report);
//! # Ok::<(), pq_bench::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![warn(clippy::all)]

// Re-export core error types
pub use error::{AdapterError, CaseError, Error, OperationError, Result};

// Core modules
pub mod adapter;
pub mod alloc;
pub mod config;
pub mod error;
pub mod report;
pub mod runner;
pub mod workload;

// Utility modules
mod utils;

// Re-export commonly used types
pub mod prelude {
    //! Common types and traits for convenient importing

    pub use crate::adapter::{KemScheme, SignatureScheme, Variant};
    pub use crate::config::{BenchConfig, ReportFormat};
    pub use crate::error::{AdapterError, CaseError, Error, OperationError, Result};
    pub use crate::report::{CaseOutcome, Report, VariantResult};
    pub use crate::runner::{suite, BenchCase, BenchGroup, Runner};
    pub use crate::workload::{KemOp, KemWorkload, Message, SignatureOp, SignatureWorkload};
}

// Version information
/// The version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
