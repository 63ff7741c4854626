//! Standardized logging setup for the locator binaries.
//!
//! Start with [`TelemetryConfig::new()`], call [`TelemetryConfig::init()`] once at
//! the top of `main`, and [`TelemetryFlusher::flush_blocking()`] before exiting.
//!
//! Logs never go to stdout. `locator-cell-info serve` answers the application
//! shell on stdout, and `locator-experiment-eval` prints its report there.

use std::{
    env,
    io::{self, IsTerminal as _, Write as _},
};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter,
};

/// Set by systemd when a unit's output is connected to the journal.
const JOURNAL_STREAM: &str = "JOURNAL_STREAM";

/// The toplevel config for the locator-telemetry crate. Start here.
#[derive(Debug)]
pub struct TelemetryConfig {
    syslog_identifier: Option<String>,
    default_level: LevelFilter,
}

impl TelemetryConfig {
    /// Logs at `INFO` and above, unless overridden by `RUST_LOG`.
    #[expect(clippy::new_without_default, reason = "may add required args later")]
    #[must_use]
    pub fn new() -> Self {
        Self {
            syslog_identifier: None,
            default_level: LevelFilter::INFO,
        }
    }

    /// Logs to journald under `syslog_identifier` when running as a systemd
    /// unit. Started any other way, e.g. by the shell, logs go to stderr.
    #[must_use]
    pub fn with_journald(self, syslog_identifier: &str) -> Self {
        Self {
            syslog_identifier: Some(syslog_identifier.to_owned()),
            ..self
        }
    }

    /// Level used when `RUST_LOG` is unset.
    #[must_use]
    pub fn with_default_level(self, level: LevelFilter) -> Self {
        Self {
            default_level: level,
            ..self
        }
    }

    pub fn try_init(
        self,
    ) -> Result<TelemetryFlusher, tracing_subscriber::util::TryInitError> {
        let filter = EnvFilter::builder()
            .with_default_directive(self.default_level.into())
            .from_env_lossy();
        let sink = choose_sink(
            self.syslog_identifier.as_deref(),
            env::var_os(JOURNAL_STREAM).is_some(),
            io::stderr().is_terminal(),
        );

        let journald_layer = match &sink {
            Sink::Journald(identifier) => match tracing_journald::layer() {
                Ok(layer) => Some(layer.with_syslog_identifier(identifier.clone())),
                Err(err) => {
                    eprintln!("journald unavailable, logging to stderr: {err}");
                    None
                }
            },
            Sink::Stderr { .. } => None,
        };
        let ansi = matches!(sink, Sink::Stderr { ansi: true });
        let stderr_layer = journald_layer.is_none().then(|| {
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(ansi)
        });

        tracing_subscriber::registry()
            .with(stderr_layer)
            .with(journald_layer)
            .with(filter)
            .try_init()?;

        Ok(TelemetryFlusher { _priv: () })
    }

    /// Initializes logging. Call this only once, at the beginning of the program.
    ///
    /// Calling this more than once or when another tracing subscriber is registered
    /// will cause a panic.
    pub fn init(self) -> TelemetryFlusher {
        self.try_init()
            .expect("failed to initialize locator-telemetry")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Sink {
    Journald(String),
    /// Colors only when a human is watching.
    Stderr { ansi: bool },
}

fn choose_sink(
    syslog_identifier: Option<&str>,
    under_systemd: bool,
    stderr_is_terminal: bool,
) -> Sink {
    match syslog_identifier {
        Some(identifier) if under_systemd => Sink::Journald(identifier.to_owned()),
        _ => Sink::Stderr {
            ansi: stderr_is_terminal,
        },
    }
}

/// Allows flushing all pending log output.
#[must_use = "call .flush_blocking at the end of the program, otherwise logs may get lost"]
pub struct TelemetryFlusher {
    _priv: (),
}

impl TelemetryFlusher {
    /// Call this at the end of the program.
    pub fn flush_blocking(self) {
        io::stderr().flush().ok();
    }
}
