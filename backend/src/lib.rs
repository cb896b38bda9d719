//! Survey intake adapter.
//!
//! Wraps the `survey-record` validation core with the pieces a runnable
//! intake needs: the JSON error envelope, a clock-driven intake service,
//! payload decoding, and OrthoConfig-backed settings.

pub mod config;
pub mod domain;
pub mod inbound;
