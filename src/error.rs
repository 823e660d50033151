//! Error types for the pq-bench harness
//!
//! This module provides a unified error handling system using `thiserror` for
//! the adapters, the timed loop and the harness itself.

use thiserror::Error;

/// The main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    /// A primitive library reported an error
    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),

    /// A benchmark case failed
    #[error("Case error: {0}")]
    Case(#[from] CaseError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        /// What was wrong with the setting
        message: String,
    },

    /// Report serialization errors
    #[cfg(feature = "serde_support")]
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reported by a primitive adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// Key generation failed
    #[error("{variant}: key generation failed: {reason}")]
    KeyGeneration {
        /// Variant name
        variant: &'static str,
        /// Library error message
        reason: String,
    },

    /// Signing failed
    #[error("{variant}: signing failed: {reason}")]
    Signing {
        /// Variant name
        variant: &'static str,
        /// Library error message
        reason: String,
    },

    /// Verification input was malformed
    #[error("{variant}: malformed verification input: {reason}")]
    Verification {
        /// Variant name
        variant: &'static str,
        /// Library error message
        reason: String,
    },

    /// Encapsulation failed
    #[error("{variant}: encapsulation failed: {reason}")]
    Encapsulation {
        /// Variant name
        variant: &'static str,
        /// Library error message
        reason: String,
    },

    /// Decapsulation failed
    #[error("{variant}: decapsulation failed: {reason}")]
    Decapsulation {
        /// Variant name
        variant: &'static str,
        /// Library error message
        reason: String,
    },
}

impl AdapterError {
    /// Name of the variant whose library reported the error
    pub fn variant(&self) -> &'static str {
        match self {
            Self::KeyGeneration { variant, .. }
            | Self::Signing { variant, .. }
            | Self::Verification { variant, .. }
            | Self::Encapsulation { variant, .. }
            | Self::Decapsulation { variant, .. } => variant,
        }
    }
}

/// Outcome of a single timed operation that did not succeed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// The library call itself failed
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// A signature produced during setup did not verify
    #[error("{variant}: signature did not verify")]
    VerificationFailed {
        /// Variant name
        variant: &'static str,
    },

    /// Decapsulation recovered a different shared secret
    #[error("{variant}: decapsulated shared secret does not match")]
    SharedSecretMismatch {
        /// Variant name
        variant: &'static str,
    },
}

/// A benchmark case that could not complete
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaseError {
    /// Preparing the workload failed before any iteration ran
    #[error("{case}: setup failed: {source}")]
    Setup {
        /// Full case name
        case: String,
        /// Adapter error raised during setup
        source: AdapterError,
    },

    /// An iteration of the timed loop failed
    #[error("{case}: iteration {iteration} failed: {source}")]
    Iteration {
        /// Full case name
        case: String,
        /// Zero-based index of the failing iteration
        iteration: u64,
        /// Why the iteration failed
        source: OperationError,
    },
}

impl CaseError {
    /// Full name of the failed case
    pub fn case(&self) -> &str {
        match self {
            Self::Setup { case, .. } | Self::Iteration { case, .. } => case,
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

/// Convenience type alias for adapter Results
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

/// Convenience type alias for timed operation Results
pub type OperationResult<T> = std::result::Result<T, OperationError>;
