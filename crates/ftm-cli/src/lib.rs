//! FamiTracker module inspector library.
//!
//! Command implementations for the `ftm` binary. Decoding lives entirely in
//! `ftm-format`; this crate only loads files and presents the result.

pub mod commands;
