use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::permission::Permission;

/// Primary application configuration struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Permissions that must all be granted before the telephony host is queried
    pub required_permissions: Vec<Permission>,

    /// Where raw cell records come from
    pub source: SourceConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    /// Replay a recorded device dump
    Snapshot { path: PathBuf },

    /// Query a Quectel modem over its AT port
    Modem {
        device: PathBuf,
        command_timeout: Duration,
        retries: u32,
    },
}

impl Config {
    /// Create a new config from CLI arguments
    pub fn from_cli(cli: &Cli) -> Self {
        let source = match &cli.snapshot {
            Some(path) => SourceConfig::Snapshot { path: path.clone() },
            None => SourceConfig::Modem {
                device: cli.modem_device.clone(),
                command_timeout: Duration::from_millis(cli.modem_timeout_ms),
                retries: cli.modem_retries,
            },
        };

        Self {
            required_permissions: cli.required_permissions.clone(),
            source,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(
        long = "require-permission",
        value_enum,
        value_delimiter = ',',
        env = "CELL_INFO_REQUIRED_PERMISSIONS",
        default_value = "read-phone-state",
        help = "Permission that must be granted before querying (repeatable)"
    )]
    pub required_permissions: Vec<Permission>,

    #[arg(
        long = "snapshot",
        env = "CELL_INFO_SNAPSHOT",
        conflicts_with = "modem_device",
        help = "Replay a recorded device dump instead of querying a modem"
    )]
    pub snapshot: Option<PathBuf>,

    #[arg(
        long = "modem-device",
        default_value = "/dev/ttyUSB2",
        help = "Path to the modem's AT command port"
    )]
    pub modem_device: PathBuf,

    #[arg(
        long = "modem-timeout-ms",
        default_value = "5000",
        help = "Timeout for a single AT command in milliseconds"
    )]
    pub modem_timeout_ms: u64,

    #[arg(
        long = "modem-retries",
        default_value = "3",
        help = "Retries for a failed AT command"
    )]
    pub modem_retries: u32,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Answer line-delimited JSON method calls on stdin until EOF
    Serve,
    /// Run a single getCellInfo call and print the reply
    Query,
}
