//! Vizport
//!
//! Remote control for a visualization application over its script port.
//! This package re-exports the SDK; the protocol and process layers are
//! available through [`vizport_core`].

pub use vizport_core;
pub use vizport_sdk::*;
