//! Harness configuration
//!
//! Settings are read once from the process environment by
//! [`BenchConfig::from_env`] and passed explicitly to the runner. Invalid values
//! fall back to their defaults with a warning.

use crate::error::{Error, Result};
use std::num::NonZeroU64;
use std::str::FromStr;

/// Iterations per case
pub const ITERATIONS_ENV: &str = "BENCH_ITER";

/// Enables allocation accounting
pub const TRACK_ALLOC_ENV: &str = "BENCH_TRACK_ALLOC";

/// Runs independent groups on worker threads
pub const PARALLEL_ENV: &str = "BENCH_PARALLEL";

/// Report format, `table` or `json`
pub const FORMAT_ENV: &str = "BENCH_FORMAT";

/// Case-name substring filter
pub const FILTER_ENV: &str = "BENCH_FILTER";

/// Iterations per case when none is configured
pub const DEFAULT_ITERATIONS: u64 = 100;

/// Output format of the report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Go-benchmark-like text table
    #[default]
    Table,
    /// JSON document
    Json,
}

impl FromStr for ReportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "table" | "text" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(Error::Configuration {
                message: format!("unknown report format '{}'", other),
            }),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => f.write_str("table"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Settings for a benchmark run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Timed iterations per case
    pub iterations: NonZeroU64,
    /// Report allocations per operation when the counting allocator is installed
    pub track_allocations: bool,
    /// Run groups concurrently, one worker thread per group
    pub parallel: bool,
    /// Report output format
    pub format: ReportFormat,
    /// Only run cases whose `Group/Case` name contains this substring
    pub filter: Option<String>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            track_allocations: true,
            parallel: false,
            format: ReportFormat::Table,
            filter: None,
        }
    }
}

impl BenchConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let iterations = match parse_iterations(lookup(ITERATIONS_ENV).as_deref()) {
            Ok(iterations) => iterations,
            Err(e) => {
                tracing::warn!("{}, using default ({})", e, DEFAULT_ITERATIONS);
                defaults.iterations
            }
        };

        let track_allocations =
            flag_or_default(TRACK_ALLOC_ENV, lookup(TRACK_ALLOC_ENV), defaults.track_allocations);
        let parallel = flag_or_default(PARALLEL_ENV, lookup(PARALLEL_ENV), defaults.parallel);

        let format = match lookup(FORMAT_ENV).filter(|raw| !raw.is_empty()) {
            None => defaults.format,
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("Invalid {} value: {}, using default ({})", FORMAT_ENV, e, defaults.format);
                defaults.format
            }),
        };

        let filter = lookup(FILTER_ENV).filter(|raw| !raw.is_empty());

        Self {
            iterations,
            track_allocations,
            parallel,
            format,
            filter,
        }
    }

    /// Set the iteration count, rejecting zero
    pub fn with_iterations(mut self, iterations: u64) -> Result<Self> {
        self.iterations = NonZeroU64::new(iterations).ok_or_else(|| Error::Configuration {
            message: "iteration count must be positive".to_string(),
        })?;
        Ok(self)
    }

    /// Enable or disable allocation accounting
    pub fn with_allocation_tracking(mut self, enabled: bool) -> Self {
        self.track_allocations = enabled;
        self
    }

    /// Enable or disable group-level parallelism
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Set the report format
    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    /// Restrict the run to matching case names
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        self.filter = if filter.is_empty() { None } else { Some(filter) };
        self
    }

    /// Whether a `Group/Case` name passes the filter
    pub fn matches(&self, case_name: &str) -> bool {
        self.filter
            .as_deref()
            .map_or(true, |filter| case_name.contains(filter))
    }
}

fn default_iterations() -> NonZeroU64 {
    NonZeroU64::MIN.saturating_add(DEFAULT_ITERATIONS - 1)
}

/// Parse a raw `BENCH_ITER` value
///
/// An unset or empty value yields the default. A value that is not a positive
/// integer is a configuration error.
pub fn parse_iterations(raw: Option<&str>) -> Result<NonZeroU64> {
    let raw = match raw {
        None | Some("") => return Ok(default_iterations()),
        Some(raw) => raw,
    };

    raw.parse::<i64>()
        .ok()
        .and_then(|value| u64::try_from(value).ok())
        .and_then(NonZeroU64::new)
        .ok_or_else(|| Error::Configuration {
            message: format!("Invalid {} value '{}'", ITERATIONS_ENV, raw),
        })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn flag_or_default(key: &str, raw: Option<String>, default: bool) -> bool {
    match raw.as_deref() {
        None | Some("") => default,
        Some(raw) => parse_flag(raw).unwrap_or_else(|| {
            tracing::warn!("Invalid {} value '{}', using default ({})", key, raw, default);
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn config_with(vars: &[(&str, &str)]) -> (BenchConfig, String) {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();

        let config = tracing::subscriber::with_default(subscriber, || {
            BenchConfig::from_lookup(|key| vars.get(key).cloned())
        });
        (config, logs.contents())
    }

    #[test]
    fn test_defaults() {
        let config = BenchConfig::default();
        assert_eq!(config.iterations.get(), DEFAULT_ITERATIONS);
        assert!(config.track_allocations);
        assert!(!config.parallel);
        assert_eq!(config.format, ReportFormat::Table);
        assert!(config.filter.is_none());
    }

    #[test]
    fn test_unset_and_empty_iterations_are_silent() {
        let (config, logs) = config_with(&[]);
        assert_eq!(config.iterations.get(), 100);
        assert!(logs.is_empty());

        let (config, logs) = config_with(&[(ITERATIONS_ENV, "")]);
        assert_eq!(config.iterations.get(), 100);
        assert!(logs.is_empty());
    }

    #[test]
    fn test_invalid_iterations_warn() {
        for raw in ["0", "-5", "abc", "1.5"] {
            let (config, logs) = config_with(&[(ITERATIONS_ENV, raw)]);
            assert_eq!(config.iterations.get(), 100, "value {:?}", raw);
            assert!(logs.contains("WARN"), "value {:?}", raw);
            assert!(logs.contains("using default (100)"), "value {:?}", raw);
        }
    }

    #[test]
    fn test_valid_iterations() {
        let (config, logs) = config_with(&[(ITERATIONS_ENV, "7")]);
        assert_eq!(config.iterations.get(), 7);
        assert!(logs.is_empty());
    }

    #[test]
    fn test_parse_iterations() {
        assert_eq!(parse_iterations(None).unwrap().get(), 100);
        assert_eq!(parse_iterations(Some("42")).unwrap().get(), 42);
        assert!(matches!(
            parse_iterations(Some("-1")),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_flags_and_format() {
        let (config, logs) = config_with(&[
            (TRACK_ALLOC_ENV, "off"),
            (PARALLEL_ENV, "TRUE"),
            (FORMAT_ENV, "json"),
            (FILTER_ENV, "ML-DSA"),
        ]);
        assert!(!config.track_allocations);
        assert!(config.parallel);
        assert_eq!(config.format, ReportFormat::Json);
        assert_eq!(config.filter.as_deref(), Some("ML-DSA"));
        assert!(logs.is_empty());
    }

    #[test]
    fn test_invalid_flag_and_format_fall_back() {
        let (config, logs) = config_with(&[(PARALLEL_ENV, "maybe"), (FORMAT_ENV, "xml")]);
        assert!(!config.parallel);
        assert_eq!(config.format, ReportFormat::Table);
        assert!(logs.contains(PARALLEL_ENV));
        assert!(logs.contains(FORMAT_ENV));
    }

    #[test]
    fn test_builder() {
        let config = BenchConfig::default()
            .with_iterations(5)
            .unwrap()
            .with_parallel(true)
            .with_filter("Verify2");
        assert_eq!(config.iterations.get(), 5);
        assert!(config.parallel);
        assert!(config.matches("Verify2/ML-DSA65"));
        assert!(!config.matches("Verify1/ML-DSA44"));

        assert!(BenchConfig::default().with_iterations(0).is_err());
        assert!(BenchConfig::default().with_filter("").matches("anything"));
    }
}
