//! Experiment result rows and their positioning error.
//!
//! Input is a CSV with a header row:
//!
//! ```text
//! lat_true,lon_true,lat_est,lon_est,method,point_id,sample_id
//! 35.7001,51.4002,35.7003,51.4004,wifi_only,p1,1
//! ```

use std::{fs::File, io::Read, path::Path};

use color_eyre::{eyre::WrapErr as _, Result};
use geo::{HaversineDistance as _, Point};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Control group.
    WifiOnly,
    /// Wi-Fi fused with cell towers.
    Hybrid,
    Unknown,
}

impl Method {
    fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "wifi_only" => Method::WifiOnly,
            "hybrid" => Method::Hybrid,
            _ => Method::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Distance between true and estimated position, in meters.
    pub error_m: f64,
    pub method: Method,
}

#[derive(Debug, Deserialize)]
struct Row {
    lat_true: f64,
    lon_true: f64,
    lat_est: f64,
    lon_est: f64,
    #[serde(default)]
    method: String,
}

/// Great circle distance in meters.
pub fn haversine_m(lat_true: f64, lon_true: f64, lat_est: f64, lon_est: f64) -> f64 {
    Point::new(lon_true, lat_true).haversine_distance(&Point::new(lon_est, lat_est))
}

/// Reads every usable row. Rows with missing or non-numeric coordinates are
/// skipped.
pub fn read_samples(reader: impl Read) -> Result<Vec<Sample>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    reader.headers().wrap_err("failed to read csv header")?;

    let mut samples = Vec::new();
    for (index, row) in reader.deserialize::<Row>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                debug!(row = index + 1, %err, "skipping row");
                continue;
            }
        };
        samples.push(Sample {
            error_m: haversine_m(row.lat_true, row.lon_true, row.lat_est, row.lon_est),
            method: Method::parse(&row.method),
        });
    }

    Ok(samples)
}

pub fn load(path: &Path) -> Result<Vec<Sample>> {
    let file = File::open(path)
        .wrap_err_with(|| format!("failed to open {}", path.display()))?;
    let samples = read_samples(file)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    info!(count = samples.len(), path = %path.display(), "loaded samples");

    Ok(samples)
}
