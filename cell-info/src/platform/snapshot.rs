//! Replays a device dump as the telephony host.
//!
//! ```json
//! {
//!   "platform_level": 33,
//!   "granted_permissions": ["read-phone-state"],
//!   "cells": [ { "registered": true, "cell": { "type": "lte", ... } } ]
//! }
//! ```
//!
//! `cells` may be `null` (host returned nothing), and `query_fault` makes the
//! query itself fail.

use std::{collections::HashSet, fs, path::Path, sync::Arc};

use color_eyre::{eyre::WrapErr as _, Result};
use serde::Deserialize;

use crate::{
    capability::PlatformLevel,
    permission::{Permission, PermissionChecker},
    raw::RawCellInfo,
    telephony::{TelephonyError, TelephonyService},
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Snapshot {
    pub platform_level: PlatformLevel,
    #[serde(default)]
    pub granted_permissions: HashSet<Permission>,
    #[serde(default)]
    pub cells: Option<Vec<RawCellInfo>>,
    #[serde(default)]
    pub query_fault: Option<String>,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read snapshot {}", path.display()))?;
        let snapshot = serde_json::from_str(&data)
            .wrap_err_with(|| format!("failed to parse snapshot {}", path.display()))?;
        Ok(snapshot)
    }
}

/// Serves one [`Snapshot`] as both permission checker and telephony host.
#[derive(Debug, Clone)]
pub struct SnapshotPlatform(Arc<Snapshot>);

impl SnapshotPlatform {
    pub fn new(snapshot: Snapshot) -> Self {
        Self(Arc::new(snapshot))
    }
}

impl PermissionChecker for SnapshotPlatform {
    fn is_granted(&self, permission: Permission) -> bool {
        self.0.granted_permissions.contains(&permission)
    }
}

impl TelephonyService for SnapshotPlatform {
    fn platform_level(&self) -> PlatformLevel {
        self.0.platform_level
    }

    fn all_cell_info(&self) -> Result<Option<Vec<RawCellInfo>>, TelephonyError> {
        if let Some(fault) = &self.0.query_fault {
            return Err(TelephonyError::Refused(fault.clone()));
        }
        Ok(self.0.cells.clone())
    }
}
