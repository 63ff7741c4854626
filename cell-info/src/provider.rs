use tracing::{debug, info, instrument, warn};

use crate::{
    capability::{Capabilities, Capability},
    classify::classify,
    errors::{QueryError, Result},
    permission::{PermissionChecker, PermissionGate},
    record::QueryResult,
    telephony::TelephonyService,
};

/// Answers "which cells can the radio see right now".
///
/// Holds no state between queries.
pub struct CellInfoProvider {
    gate: PermissionGate,
    permissions: Box<dyn PermissionChecker>,
    telephony: Box<dyn TelephonyService>,
}

impl CellInfoProvider {
    pub fn new(
        gate: PermissionGate,
        permissions: Box<dyn PermissionChecker>,
        telephony: Box<dyn TelephonyService>,
    ) -> Self {
        Self {
            gate,
            permissions,
            telephony,
        }
    }

    #[instrument(skip_all)]
    pub fn query(&self) -> Result<QueryResult> {
        let level = self.telephony.platform_level();
        let caps = Capabilities::for_level(level);
        if !caps.supports(Capability::CellInfoQuery) {
            warn!(%level, "platform cannot list cell info");
            return Err(QueryError::PlatformTooOld(level));
        }

        self.gate
            .check(self.permissions.as_ref())
            .map_err(QueryError::PermissionDenied)?;

        let records = match self.telephony.all_cell_info() {
            Ok(Some(records)) if !records.is_empty() => records,
            Ok(_) => {
                info!("telephony host returned no cells");
                return Err(QueryError::NoData);
            }
            Err(err) => {
                warn!(%err, "cell info query failed");
                return Err(err.into());
            }
        };
        debug!(count = records.len(), %level, "got raw cell records");

        Ok(classify(&records, &caps))
    }
}
