//! Offline evaluation of positioning experiments.
//!
//! Each experiment row pairs a surveyed position with the position one method
//! estimated there. [`report::evaluate`] compares the Wi-Fi only method with
//! the hybrid method that also uses the cells reported by `locator-cell-info`.

pub mod report;
pub mod samples;
pub mod stats;

pub const SYSLOG_IDENTIFIER: &str = "locator-experiment-eval";
