//! Cell info from a Quectel EC2x modem over its AT command port.

pub mod parser;

use std::{
    io::{Read, Write},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use serialport::SerialPort;
use tracing::{debug, warn};

use crate::{
    capability::PlatformLevel,
    raw::RawCellInfo,
    telephony::{TelephonyError, TelephonyService},
};

use self::parser::{parse_neighbor_cells, parse_serving_cell};

const BAUD_RATE: u32 = 115_200;
const RETRY_DELAY: Duration = Duration::from_millis(500);
const POLL_DELAY: Duration = Duration::from_millis(50);

/// An open AT command connection to the modem.
pub struct Ec25Modem {
    port: Box<dyn SerialPort>,
}

impl Ec25Modem {
    pub fn open(device: &Path) -> Result<Self, TelephonyError> {
        let port = serialport::new(device.to_string_lossy(), BAUD_RATE)
            .timeout(Duration::from_secs(2))
            .open()
            .map_err(|e| {
                TelephonyError::Modem(format!(
                    "failed to open serial port '{}': {e}",
                    device.display()
                ))
            })?;

        Ok(Self { port })
    }

    /// Sends a command, retrying on `ERROR` or timeout, and returns the raw
    /// response once it contains `OK`.
    fn send_command_with_retry(
        &mut self,
        command: &str,
        retries: u32,
        timeout: Duration,
    ) -> Result<String, TelephonyError> {
        debug!(command, "sending AT command");
        let cmd = format!("{command}\r\n");

        for attempt in 0..=retries {
            if attempt > 0 {
                debug!(command, attempt, "retrying AT command");
                std::thread::sleep(RETRY_DELAY);
            }

            self.port.flush()?;
            self.port.write_all(cmd.as_bytes())?;

            let mut response = String::new();
            let mut buf = [0u8; 1024];
            let start = Instant::now();

            while start.elapsed() < timeout {
                match self.port.read(&mut buf) {
                    Ok(n) if n > 0 => {
                        response.push_str(&String::from_utf8_lossy(&buf[..n]));
                        if response.contains("OK") {
                            debug!(command, response = %response, "AT command succeeded");
                            return Ok(response);
                        }
                        if response.contains("ERROR") {
                            warn!(command, response = %response, "AT command returned error");
                            break;
                        }
                    }
                    Ok(_) => std::thread::sleep(POLL_DELAY),
                    Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {
                        std::thread::sleep(POLL_DELAY)
                    }
                    Err(e) => {
                        warn!(command, error = %e, "error reading from modem");
                        break;
                    }
                }
            }

            warn!(command, attempt, "AT command timed out or failed");
        }

        Err(TelephonyError::Modem(format!(
            "`{command}` failed after {retries} retries"
        )))
    }
}

/// [`TelephonyService`] backed by a modem on a serial device node.
///
/// The port is opened per query, so nothing is held between queries.
#[derive(Debug, Clone)]
pub struct QuectelTelephony {
    device: PathBuf,
    command_timeout: Duration,
    retries: u32,
}

impl QuectelTelephony {
    pub fn new(device: impl Into<PathBuf>, command_timeout: Duration, retries: u32) -> Self {
        Self {
            device: device.into(),
            command_timeout,
            retries,
        }
    }
}

impl TelephonyService for QuectelTelephony {
    fn platform_level(&self) -> PlatformLevel {
        PlatformLevel::LATEST
    }

    fn all_cell_info(&self) -> Result<Option<Vec<RawCellInfo>>, TelephonyError> {
        let mut modem = Ec25Modem::open(&self.device)?;

        let serving = modem.send_command_with_retry(
            "AT+QENG=\"servingcell\"",
            self.retries,
            self.command_timeout,
        )?;
        let neighbours = modem.send_command_with_retry(
            "AT+QENG=\"neighbourcell\"",
            self.retries,
            self.command_timeout,
        )?;

        let mut cells: Vec<RawCellInfo> = parse_serving_cell(&serving).into_iter().collect();
        cells.extend(parse_neighbor_cells(&neighbours));
        debug!(count = cells.len(), device = %self.device.display(), "modem cells");

        Ok(Some(cells))
    }
}
