use thiserror::Error;

use crate::{
    capability::PlatformLevel, permission::Permission, telephony::TelephonyError,
};

/// Why a cell info query produced nothing.
///
/// The shell sees all of these as the same unavailability failure.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("permission {0} is not granted")]
    PermissionDenied(Permission),

    #[error("platform level {0} cannot list cell info")]
    PlatformTooOld(PlatformLevel),

    #[error("telephony host returned no cells")]
    NoData,

    #[error("cell info query failed: {0}")]
    QueryFailed(#[from] TelephonyError),
}

pub type Result<T> = std::result::Result<T, QueryError>;
