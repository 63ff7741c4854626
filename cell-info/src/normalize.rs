//! Turns one raw platform record into a [`CellRecord`].
//!
//! Fields are extracted independently. A field that cannot be read becomes
//! `None` and never affects its siblings. Only the record as a whole can be
//! rejected, see [`Unparseable`].

use tracing::debug;

use crate::{
    capability::{Capabilities, Capability},
    raw::{read, OperatorCodes, RawCell, RawSignal, Reading, UNAVAILABLE, UNAVAILABLE_LONG},
    record::{CellRecord, NetworkType},
};

/// Why a whole record was dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Unparseable {
    #[error("unrecognized radio generation")]
    UnknownGeneration,
    #[error("{0} records are not readable on platform level {1}")]
    UnsupportedOnPlatform(NetworkType, u32),
    #[error("{0} identity could not be read: {1}")]
    IdentityFault(NetworkType, String),
}

pub fn normalize(cell: &RawCell, caps: &Capabilities) -> Result<CellRecord, Unparseable> {
    match cell {
        RawCell::Gsm { identity, signal } => {
            let id = identity_of(NetworkType::Gsm, identity)?;
            Ok(CellRecord {
                network_type: NetworkType::Gsm,
                cell_id: int_field("cid", &id.cid).map(i64::from),
                area_code: int_field("lac", &id.lac),
                mcc: mcc(caps, &id.operator),
                mnc: mnc(caps, &id.operator),
                signal_strength: dbm(signal),
                physical_id: None,
            })
        }
        RawCell::Wcdma { identity, signal } => {
            let id = identity_of(NetworkType::Wcdma, identity)?;
            Ok(CellRecord {
                network_type: NetworkType::Wcdma,
                cell_id: int_field("cid", &id.cid).map(i64::from),
                area_code: int_field("lac", &id.lac),
                mcc: mcc(caps, &id.operator),
                mnc: mnc(caps, &id.operator),
                signal_strength: dbm(signal),
                physical_id: int_field("psc", &id.psc),
            })
        }
        RawCell::Lte { identity, signal } => {
            let id = identity_of(NetworkType::Lte, identity)?;
            let gated = caps.supports(Capability::LteAreaAndPhysicalId);
            Ok(CellRecord {
                network_type: NetworkType::Lte,
                cell_id: int_field("ci", &id.ci).map(i64::from),
                area_code: gated.then(|| int_field("tac", &id.tac)).flatten(),
                mcc: mcc(caps, &id.operator),
                mnc: mnc(caps, &id.operator),
                signal_strength: dbm(signal),
                physical_id: gated.then(|| int_field("pci", &id.pci)).flatten(),
            })
        }
        RawCell::Nr { identity, signal } => {
            if !caps.supports(Capability::NrCells) {
                return Err(Unparseable::UnsupportedOnPlatform(
                    NetworkType::Nr,
                    caps.level().0,
                ));
            }
            let id = identity_of(NetworkType::Nr, identity)?;
            Ok(CellRecord {
                network_type: NetworkType::Nr,
                cell_id: long_field("nci", &id.nci),
                area_code: int_field("tac", &id.tac),
                mcc: mcc(caps, &id.operator),
                mnc: mnc(caps, &id.operator),
                signal_strength: dbm(signal),
                physical_id: int_field("pci", &id.pci),
            })
        }
        RawCell::Other => Err(Unparseable::UnknownGeneration),
    }
}

fn identity_of<T>(
    network_type: NetworkType,
    identity: &Reading<T>,
) -> Result<&T, Unparseable> {
    match identity {
        Reading::Value(id) => Ok(id),
        Reading::Fault { fault } => {
            Err(Unparseable::IdentityFault(network_type, fault.clone()))
        }
    }
}

fn int_field(name: &'static str, field: &Option<Reading<i32>>) -> Option<i32> {
    match read(field) {
        Ok(&UNAVAILABLE) => None,
        Ok(v) => Some(*v),
        Err(err) => {
            debug!(field = name, %err, "skipping field");
            None
        }
    }
}

fn long_field(name: &'static str, field: &Option<Reading<i64>>) -> Option<i64> {
    match read(field) {
        Ok(&UNAVAILABLE_LONG) => None,
        Ok(v) => Some(*v),
        Err(err) => {
            debug!(field = name, %err, "skipping field");
            None
        }
    }
}

fn dbm(signal: &RawSignal) -> Option<i32> {
    int_field("dbm", &signal.dbm)
}

fn mcc(caps: &Capabilities, codes: &OperatorCodes) -> Option<i32> {
    operator_code(caps, "mcc", &codes.mcc_string, &codes.mcc)
}

fn mnc(caps: &Capabilities, codes: &OperatorCodes) -> Option<i32> {
    operator_code(caps, "mnc", &codes.mnc_string, &codes.mnc)
}

/// String form when the platform has it and it parses, else the legacy integer.
fn operator_code(
    caps: &Capabilities,
    name: &'static str,
    string_form: &Option<Reading<String>>,
    legacy: &Option<Reading<i32>>,
) -> Option<i32> {
    caps.supports(Capability::OperatorCodeStrings)
        .then(|| string_code(name, string_form))
        .flatten()
        .or_else(|| int_field(name, legacy))
}

fn string_code(name: &'static str, field: &Option<Reading<String>>) -> Option<i32> {
    match read(field) {
        Ok(s) => s.trim().parse().ok(),
        Err(err) => {
            debug!(field = name, %err, "string form unreadable, trying legacy");
            None
        }
    }
}
