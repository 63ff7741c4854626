//! Concrete telephony hosts.

pub mod quectel;
pub mod snapshot;
