//! Reusable view components.
//!
//! ARCHITECTURE
//! ============
//! Components read session state from context and never own it; pages and
//! the route guard compose them.

pub mod header;
pub mod loading_spinner;
pub mod protected_route;
