//! Which telephony accessors can be trusted on a given platform level.
//!
//! Platform levels follow the Android `SDK_INT` numbering, which is what the
//! telephony host reports. Backends that are not Android report
//! [`PlatformLevel::LATEST`].

use derive_more::Display;
use serde::Deserialize;

#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize,
)]
#[serde(transparent)]
pub struct PlatformLevel(pub u32);

impl PlatformLevel {
    pub const JELLY_BEAN_MR1: Self = Self(17);
    pub const P: Self = Self(28);
    pub const Q: Self = Self(29);
    pub const LATEST: Self = Self(35);
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The "all visible cells" query exists at all.
    CellInfoQuery,
    /// MCC/MNC are exposed as strings next to the legacy integers.
    OperatorCodeStrings,
    /// LTE tracking area code and physical cell id accessors.
    LteAreaAndPhysicalId,
    /// NR (5G) records can be read.
    NrCells,
}

/// Minimum platform level for each capability.
const CAPABILITY_TABLE: &[(Capability, PlatformLevel)] = &[
    (Capability::CellInfoQuery, PlatformLevel::JELLY_BEAN_MR1),
    (Capability::OperatorCodeStrings, PlatformLevel::P),
    (Capability::LteAreaAndPhysicalId, PlatformLevel::Q),
    (Capability::NrCells, PlatformLevel::Q),
];

/// The capabilities resolved for one platform level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    level: PlatformLevel,
}

impl Capabilities {
    pub fn for_level(level: PlatformLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> PlatformLevel {
        self.level
    }

    pub fn supports(&self, capability: Capability) -> bool {
        CAPABILITY_TABLE
            .iter()
            .find(|(cap, _)| *cap == capability)
            .is_some_and(|(_, min)| self.level >= *min)
    }
}
