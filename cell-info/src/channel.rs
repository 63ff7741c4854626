//! Named request/response channel between the application shell and the
//! provider.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, info_span, warn};

use crate::provider::CellInfoProvider;

pub const CHANNEL: &str = "wifi_knn_locator/cell_info";
pub const GET_CELL_INFO: &str = "getCellInfo";

pub const UNAVAILABLE: &str = "UNAVAILABLE";
pub const UNAVAILABLE_MESSAGE: &str = "Cell info not available";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Value::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Reply {
    Success(Value),
    Error {
        code: String,
        message: String,
        details: Option<Value>,
    },
    NotImplemented,
}

impl Reply {
    pub fn error(code: &str, message: &str) -> Self {
        Reply::Error {
            code: code.to_owned(),
            message: message.to_owned(),
            details: None,
        }
    }

    fn unavailable() -> Self {
        Self::error(UNAVAILABLE, UNAVAILABLE_MESSAGE)
    }
}

/// Something that answers method calls on a channel.
pub trait MethodHandler {
    fn handle(&self, call: &MethodCall) -> Reply;
}

/// Dispatches calls on [`CHANNEL`] to the cell info provider.
pub struct CellInfoChannel {
    provider: CellInfoProvider,
}

impl CellInfoChannel {
    pub fn new(provider: CellInfoProvider) -> Self {
        Self { provider }
    }

    fn get_cell_info(&self) -> Reply {
        let result = match self.provider.query() {
            Ok(result) => result,
            Err(err) => {
                info!(%err, "replying {UNAVAILABLE}");
                return Reply::unavailable();
            }
        };
        match serde_json::to_value(&result) {
            Ok(value) => Reply::Success(value),
            Err(err) => {
                error!(%err, "failed to encode cell info");
                Reply::unavailable()
            }
        }
    }
}

impl MethodHandler for CellInfoChannel {
    fn handle(&self, call: &MethodCall) -> Reply {
        let _span = info_span!("handle", channel = CHANNEL, method = %call.method)
            .entered();
        match call.method.as_str() {
            GET_CELL_INFO => self.get_cell_info(),
            _ => {
                warn!("method not implemented");
                Reply::NotImplemented
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        capability::PlatformLevel,
        permission::{MockPermissionChecker, PermissionGate},
        raw::{LteIdentity, OperatorCodes, RawCell, RawCellInfo, RawSignal, Reading},
        telephony::{MockTelephonyService, TelephonyError},
    };

    fn channel(
        granted: bool,
        cells: std::result::Result<Option<Vec<RawCellInfo>>, String>,
    ) -> CellInfoChannel {
        let mut checker = MockPermissionChecker::new();
        checker.expect_is_granted().return_const(granted);
        let mut telephony = MockTelephonyService::new();
        telephony
            .expect_platform_level()
            .return_const(PlatformLevel::LATEST);
        telephony
            .expect_all_cell_info()
            .returning(move || cells.clone().map_err(TelephonyError::Refused));
        CellInfoChannel::new(CellInfoProvider::new(
            PermissionGate::default(),
            Box::new(checker),
            Box::new(telephony),
        ))
    }

    fn serving_lte() -> RawCellInfo {
        RawCellInfo {
            registered: true,
            cell: RawCell::Lte {
                identity: Reading::Value(LteIdentity {
                    ci: Some(Reading::Value(12345)),
                    tac: Some(Reading::Value(678)),
                    pci: Some(Reading::Value(55)),
                    operator: OperatorCodes {
                        mcc: Some(Reading::Value(310)),
                        mnc: Some(Reading::Value(260)),
                        ..Default::default()
                    },
                }),
                signal: RawSignal {
                    dbm: Some(Reading::Value(-85)),
                },
            },
        }
    }

    #[test]
    fn get_cell_info_success() {
        let reply = channel(true, Ok(Some(vec![serving_lte()])))
            .handle(&MethodCall::new(GET_CELL_INFO));
        assert_eq!(
            reply,
            Reply::Success(json!({
                "serving_cell": {
                    "cellId": 12345,
                    "tac": 678,
                    "mcc": 310,
                    "mnc": 260,
                    "signalStrength": -85,
                    "networkType": "LTE",
                    "pci": 55,
                },
                "neighboring_cells": [],
            }))
        );
    }

    #[test]
    fn failures_collapse_to_unavailable() {
        let expected = Reply::Error {
            code: "UNAVAILABLE".into(),
            message: "Cell info not available".into(),
            details: None,
        };
        let call = MethodCall::new(GET_CELL_INFO);

        assert_eq!(channel(false, Ok(Some(vec![serving_lte()]))).handle(&call), expected);
        assert_eq!(channel(true, Ok(None)).handle(&call), expected);
        assert_eq!(channel(true, Ok(Some(vec![]))).handle(&call), expected);
        assert_eq!(channel(true, Err("boom".into())).handle(&call), expected);
    }

    #[test]
    fn unknown_method_is_not_implemented() {
        let reply = channel(true, Ok(Some(vec![serving_lte()])))
            .handle(&MethodCall::new("getWifiInfo"));
        assert_eq!(reply, Reply::NotImplemented);
    }

    #[test]
    fn arguments_are_ignored() {
        let call = MethodCall {
            method: GET_CELL_INFO.into(),
            arguments: json!({ "refresh": true }),
        };
        let reply = channel(true, Ok(Some(vec![serving_lte()]))).handle(&call);
        assert!(matches!(reply, Reply::Success(_)));
    }

    #[test]
    fn reply_wire_shape() {
        assert_eq!(
            serde_json::to_value(Reply::NotImplemented).unwrap(),
            json!("notImplemented")
        );
        assert_eq!(
            serde_json::to_value(Reply::unavailable()).unwrap(),
            json!({
                "error": {
                    "code": "UNAVAILABLE",
                    "message": "Cell info not available",
                    "details": null,
                }
            })
        );
    }
}
