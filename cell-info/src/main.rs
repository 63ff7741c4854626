use std::io::{self, Write as _};

use clap::Parser as _;
use color_eyre::Result;
use tracing::info;

use locator_cell_info::{
    channel::{CellInfoChannel, MethodCall, MethodHandler as _, GET_CELL_INFO},
    config::{Cli, Command, Config, SourceConfig},
    permission::{DeviceNodeAccess, PermissionGate},
    platform::{
        quectel::QuectelTelephony,
        snapshot::{Snapshot, SnapshotPlatform},
    },
    provider::CellInfoProvider,
    transport, SYSLOG_IDENTIFIER,
};
use locator_telemetry::TelemetryConfig;

fn main() -> Result<()> {
    color_eyre::install()?;
    let telemetry = TelemetryConfig::new()
        .with_journald(SYSLOG_IDENTIFIER)
        .init();

    let cli = Cli::parse();
    let result = run(&cli);

    telemetry.flush_blocking();
    result
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::from_cli(cli);
    let channel = CellInfoChannel::new(build_provider(&config)?);

    match cli.command {
        Command::Serve => {
            info!("serving cell info calls on stdin");
            transport::serve(&channel, io::stdin().lock(), io::stdout().lock())?;
        }
        Command::Query => {
            let reply = channel.handle(&MethodCall::new(GET_CELL_INFO));
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &reply)?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}

fn build_provider(config: &Config) -> Result<CellInfoProvider> {
    let gate = PermissionGate::new(config.required_permissions.iter().copied());
    let provider = match &config.source {
        SourceConfig::Snapshot { path } => {
            info!(path = %path.display(), "using snapshot platform");
            let platform = SnapshotPlatform::new(Snapshot::load(path)?);
            CellInfoProvider::new(gate, Box::new(platform.clone()), Box::new(platform))
        }
        SourceConfig::Modem {
            device,
            command_timeout,
            retries,
        } => {
            info!(device = %device.display(), "using quectel modem");
            CellInfoProvider::new(
                gate,
                Box::new(DeviceNodeAccess::new(device)),
                Box::new(QuectelTelephony::new(device, *command_timeout, *retries)),
            )
        }
    };

    Ok(provider)
}
