//! Serving and neighboring cell tower info for the locator application shell.
//!
//! The shell calls `getCellInfo` on the [`channel::CHANNEL`] channel. The
//! [`provider::CellInfoProvider`] checks permissions, asks the
//! [`telephony::TelephonyService`] for every visible cell, and
//! [`classify::classify`]s the records into a [`record::QueryResult`].

pub mod capability;
pub mod channel;
pub mod classify;
pub mod config;
pub mod errors;
pub mod normalize;
pub mod permission;
pub mod platform;
pub mod provider;
pub mod raw;
pub mod record;
pub mod telephony;
pub mod transport;

pub use errors::{QueryError, Result};

pub const SYSLOG_IDENTIFIER: &str = "locator-cell-info";
