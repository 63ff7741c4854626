use derive_more::Display;
use serde::{ser::SerializeMap as _, Serialize, Serializer};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NetworkType {
    #[display("GSM")]
    Gsm,
    #[display("WCDMA")]
    Wcdma,
    #[display("LTE")]
    Lte,
    #[display("NR")]
    Nr,
}

impl NetworkType {
    /// Key of the coarse area code: location area for 2G/3G, tracking area
    /// for 4G/5G.
    pub fn area_key(self) -> &'static str {
        match self {
            NetworkType::Gsm | NetworkType::Wcdma => "lac",
            NetworkType::Lte | NetworkType::Nr => "tac",
        }
    }

    /// Key of the in-area cell identifier, if the generation has one.
    pub fn physical_id_key(self) -> Option<&'static str> {
        match self {
            NetworkType::Gsm => None,
            NetworkType::Wcdma => Some("psc"),
            NetworkType::Lte | NetworkType::Nr => Some("pci"),
        }
    }
}

/// One normalized cell tower observation.
///
/// Serializes to the flat mapping the shell expects. Keys of the record's own
/// generation are always present, possibly `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRecord {
    pub network_type: NetworkType,
    pub cell_id: Option<i64>,
    /// LAC or TAC, see [`NetworkType::area_key`].
    pub area_code: Option<i32>,
    pub mcc: Option<i32>,
    pub mnc: Option<i32>,
    /// dBm
    pub signal_strength: Option<i32>,
    /// PSC or PCI, see [`NetworkType::physical_id_key`]. Always `None` for GSM.
    pub physical_id: Option<i32>,
}

impl Serialize for CellRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("cellId", &self.cell_id)?;
        map.serialize_entry(self.network_type.area_key(), &self.area_code)?;
        map.serialize_entry("mcc", &self.mcc)?;
        map.serialize_entry("mnc", &self.mnc)?;
        map.serialize_entry("signalStrength", &self.signal_strength)?;
        map.serialize_entry("networkType", &self.network_type)?;
        if let Some(key) = self.network_type.physical_id_key() {
            map.serialize_entry(key, &self.physical_id)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub serving_cell: Option<CellRecord>,
    pub neighboring_cells: Vec<CellRecord>,
}
