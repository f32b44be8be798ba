//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Routing and effect glue shared by the auth pages.

pub mod auth;
