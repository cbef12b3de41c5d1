//! UCI (Universal Chess Interface) Protocol
//!
//! This module implements the UCI protocol for communication with chess GUIs,
//! plus the log sink the binary installs.

pub mod logger;
pub mod protocol;

pub use protocol::UCI;
