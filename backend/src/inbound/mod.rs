//! Inbound adapters that translate raw bytes into domain calls and render
//! domain results back out.

pub mod json;
