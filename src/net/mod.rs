//! Networking modules for the REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` owns the shared client and its credential cell, `transport` is the
//! seam to the network (`browser` in WASM builds), `types` defines the wire
//! schema, and `upload` classifies upload failures for the upload view.

#[cfg(feature = "csr")]
pub mod browser;
pub mod http;
pub mod transport;
pub mod types;
pub mod upload;
