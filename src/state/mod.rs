//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `session` owns who is logged in, `guard` decides what a protected route
//! shows, and `redirect` remembers where a denied navigation wanted to go.
//! None of them depend on the view layer, so they test natively.

pub mod guard;
pub mod redirect;
pub mod session;
