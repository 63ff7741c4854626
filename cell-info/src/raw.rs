//! Raw cell records as handed over by the telephony host.
//!
//! Every accessor is optional and may fault, mirroring platform getters that
//! return nothing or throw depending on OS version, SIM state, or hardware.
//! Snapshot files use this exact shape, e.g.:
//!
//! ```json
//! {
//!   "registered": true,
//!   "cell": {
//!     "type": "lte",
//!     "identity": { "ci": 12345, "tac": 678, "mcc": 310, "mnc": 260, "pci": 55 },
//!     "signal": { "dbm": -85 }
//!   }
//! }
//! ```

use serde::Deserialize;

/// Returned by platform getters when the value is not known.
pub const UNAVAILABLE: i32 = i32::MAX;
/// 64-bit variant of [`UNAVAILABLE`], used for NR cell identities.
pub const UNAVAILABLE_LONG: i64 = i64::MAX;

/// One platform accessor read. `None` at the use site means the accessor
/// returned nothing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Reading<T> {
    /// The accessor threw.
    Fault { fault: String },
    Value(T),
}

impl<T> From<T> for Reading<T> {
    fn from(value: T) -> Self {
        Reading::Value(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("accessor returned nothing")]
    Missing,
    #[error("accessor faulted: {0}")]
    Fault(String),
}

/// Reads an accessor, borrowing the value.
pub fn read<T>(field: &Option<Reading<T>>) -> Result<&T, FieldError> {
    match field {
        None => Err(FieldError::Missing),
        Some(Reading::Fault { fault }) => Err(FieldError::Fault(fault.clone())),
        Some(Reading::Value(v)) => Ok(v),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawCellInfo {
    /// Whether the radio is currently camped on this cell.
    #[serde(default)]
    pub registered: bool,
    pub cell: RawCell,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawCell {
    Gsm {
        identity: Reading<GsmIdentity>,
        #[serde(default)]
        signal: RawSignal,
    },
    Wcdma {
        identity: Reading<WcdmaIdentity>,
        #[serde(default)]
        signal: RawSignal,
    },
    Lte {
        identity: Reading<LteIdentity>,
        #[serde(default)]
        signal: RawSignal,
    },
    Nr {
        identity: Reading<NrIdentity>,
        #[serde(default)]
        signal: RawSignal,
    },
    /// CDMA, TD-SCDMA and anything the platform adds later.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawSignal {
    #[serde(default)]
    pub dbm: Option<Reading<i32>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OperatorCodes {
    /// Legacy numeric MCC.
    #[serde(default)]
    pub mcc: Option<Reading<i32>>,
    /// Legacy numeric MNC.
    #[serde(default)]
    pub mnc: Option<Reading<i32>>,
    #[serde(default)]
    pub mcc_string: Option<Reading<String>>,
    #[serde(default)]
    pub mnc_string: Option<Reading<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GsmIdentity {
    #[serde(default)]
    pub cid: Option<Reading<i32>>,
    #[serde(default)]
    pub lac: Option<Reading<i32>>,
    #[serde(flatten)]
    pub operator: OperatorCodes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WcdmaIdentity {
    #[serde(default)]
    pub cid: Option<Reading<i32>>,
    #[serde(default)]
    pub lac: Option<Reading<i32>>,
    #[serde(default)]
    pub psc: Option<Reading<i32>>,
    #[serde(flatten)]
    pub operator: OperatorCodes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LteIdentity {
    #[serde(default)]
    pub ci: Option<Reading<i32>>,
    #[serde(default)]
    pub tac: Option<Reading<i32>>,
    #[serde(default)]
    pub pci: Option<Reading<i32>>,
    #[serde(flatten)]
    pub operator: OperatorCodes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NrIdentity {
    #[serde(default)]
    pub nci: Option<Reading<i64>>,
    #[serde(default)]
    pub tac: Option<Reading<i32>>,
    #[serde(default)]
    pub pci: Option<Reading<i32>>,
    #[serde(flatten)]
    pub operator: OperatorCodes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_lte_record() {
        let json = r#"{
            "registered": true,
            "cell": {
                "type": "lte",
                "identity": { "ci": 12345, "tac": 678, "mcc": 310, "mnc": 260, "pci": 55 },
                "signal": { "dbm": -85 }
            }
        }"#;
        let info: RawCellInfo = serde_json::from_str(json).unwrap();
        assert!(info.registered);
        let RawCell::Lte { identity, signal } = info.cell else {
            panic!("expected lte, got {:?}", info.cell);
        };
        let Reading::Value(id) = identity else {
            panic!("identity faulted");
        };
        assert_eq!(id.ci, Some(Reading::Value(12345)));
        assert_eq!(id.operator.mcc, Some(Reading::Value(310)));
        assert_eq!(id.operator.mcc_string, None);
        assert_eq!(signal.dbm, Some(Reading::Value(-85)));
    }

    #[test]
    fn faults_and_nulls_are_distinguished() {
        let json = r#"{
            "cell": {
                "type": "gsm",
                "identity": { "cid": null, "lac": { "fault": "SecurityException" } },
                "signal": { "dbm": { "fault": "RemoteException" } }
            }
        }"#;
        let info: RawCellInfo = serde_json::from_str(json).unwrap();
        assert!(!info.registered);
        let RawCell::Gsm {
            identity: Reading::Value(id),
            signal,
        } = info.cell
        else {
            panic!("expected readable gsm identity");
        };
        assert_eq!(read(&id.cid), Err(FieldError::Missing));
        assert_eq!(
            read(&id.lac),
            Err(FieldError::Fault("SecurityException".into()))
        );
        assert!(matches!(read(&signal.dbm), Err(FieldError::Fault(_))));
    }

    #[test]
    fn identity_itself_may_fault() {
        let json = r#"{ "cell": { "type": "nr", "identity": { "fault": "boom" } } }"#;
        let info: RawCellInfo = serde_json::from_str(json).unwrap();
        assert_eq!(
            info.cell,
            RawCell::Nr {
                identity: Reading::Fault {
                    fault: "boom".into()
                },
                signal: RawSignal::default(),
            }
        );
    }

    #[test]
    fn unknown_generations_become_other() {
        let json = r#"{ "registered": true, "cell": { "type": "cdma" } }"#;
        let info: RawCellInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.cell, RawCell::Other);
    }
}
