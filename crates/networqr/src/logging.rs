//! Diagnostics on stderr.
//!
//! Stdout carries links, data URLs and terminal QR art, so every log line
//! goes to stderr. `-q`/`-v` pick a [`Verbosity`]; `RUST_LOG` replaces the
//! resulting filter entirely.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much the CLI reports while it works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Progress and warnings, e.g. a channel finished or the store is unavailable.
    #[default]
    Normal,
    /// Adds store paths, generations and dropped updates.
    Verbose,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// Map the `-q` flag and the `-v` count onto a verbosity. `-q` wins.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// Level applied to this crate's own events.
    #[must_use]
    pub fn level(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::ERROR,
            Self::Normal => LevelFilter::INFO,
            Self::Verbose => LevelFilter::DEBUG,
            Self::Trace => LevelFilter::TRACE,
        }
    }

    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    ///
    /// Dependencies stay at `warn` unless quiet, so only `networqr` events
    /// get louder with `-v`.
    #[must_use]
    pub fn directive(self) -> String {
        let others = if self == Self::Quiet { "error" } else { "warn" };
        let own = self.level().to_string().to_lowercase();
        format!("{others},networqr={own}")
    }

    /// Whether log lines carry timestamps and targets.
    #[must_use]
    pub fn is_detailed(self) -> bool {
        self >= Self::Verbose
    }
}

/// Install the global subscriber.
///
/// Later calls are no-ops, so tests may call it freely.
///
/// # Examples
///
/// ```no_run
/// use networqr::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::from_flags(false, 1));
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));
    let registry = tracing_subscriber::registry().with(filter);
    let layer = fmt::layer().with_writer(std::io::stderr);

    let _ = if verbosity.is_detailed() {
        registry
            .with(layer.with_target(true).with_thread_ids(true))
            .try_init()
    } else {
        registry
            .with(layer.without_time().with_target(false))
            .try_init()
    };
}

/// Route warnings from code under test into the test harness output.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("networqr=warn")
        .with_test_writer()
        .try_init();
}
