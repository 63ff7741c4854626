use std::path::PathBuf;

use derive_more::Display;
use serde::Deserialize;
use tracing::warn;

/// OS level permissions that guard cell tower data.
///
/// Which of these are required differs between platform releases, so the
/// required set is configured rather than fixed.
#[derive(
    Debug,
    Display,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    #[display("android.permission.READ_PHONE_STATE")]
    ReadPhoneState,
    #[display("android.permission.ACCESS_COARSE_LOCATION")]
    AccessCoarseLocation,
    #[display("android.permission.ACCESS_FINE_LOCATION")]
    AccessFineLocation,
}

#[cfg_attr(test, mockall::automock)]
pub trait PermissionChecker {
    fn is_granted(&self, permission: Permission) -> bool;
}

/// Checks every configured permission before the telephony host is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGate {
    required: Vec<Permission>,
}

impl PermissionGate {
    pub fn new(required: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            required: required.into_iter().collect(),
        }
    }

    /// Returns the first required permission that is not granted.
    pub fn check(&self, checker: &dyn PermissionChecker) -> Result<(), Permission> {
        match self.required.iter().find(|p| !checker.is_granted(**p)) {
            Some(missing) => {
                warn!(permission = %missing, "required permission not granted");
                Err(*missing)
            }
            None => Ok(()),
        }
    }
}

impl Default for PermissionGate {
    fn default() -> Self {
        Self::new([Permission::ReadPhoneState])
    }
}

/// Permission checks for hosts where cell data comes from a device node.
///
/// Every [`Permission`] maps to read/write access on that node for the
/// current user.
#[derive(Debug, Clone)]
pub struct DeviceNodeAccess {
    path: PathBuf,
}

impl DeviceNodeAccess {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PermissionChecker for DeviceNodeAccess {
    fn is_granted(&self, _permission: Permission) -> bool {
        rustix::fs::access(
            self.path.as_path(),
            rustix::fs::Access::READ_OK | rustix::fs::Access::WRITE_OK,
        )
        .is_ok()
    }
}
