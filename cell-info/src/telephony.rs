use crate::{capability::PlatformLevel, raw::RawCellInfo};

#[derive(Debug, thiserror::Error)]
pub enum TelephonyError {
    #[error("telephony service refused the query: {0}")]
    Refused(String),
    #[error("modem error: {0}")]
    Modem(String),
    #[error("i/o error talking to telephony host: {0}")]
    Io(#[from] std::io::Error),
}

/// The host's telephony subsystem.
#[cfg_attr(test, mockall::automock)]
pub trait TelephonyService {
    fn platform_level(&self) -> PlatformLevel;

    /// All visible cells, as the host returns them. `Ok(None)` is the host
    /// returning nothing at all.
    fn all_cell_info(&self) -> Result<Option<Vec<RawCellInfo>>, TelephonyError>;
}
