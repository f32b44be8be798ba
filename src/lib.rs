//! # resume-client
//!
//! Leptos + WASM frontend for the resume editor and career predictor.
//!
//! This crate holds the authentication core the rest of the UI leans on: the
//! `SessionStore` that restores, establishes and clears the bearer session,
//! the route-guard decision that keeps protected pages behind it, the shared
//! HTTP client that carries the credential, and the login/signup screens.
//! Resume editing, uploads and prediction charts talk to the same API through
//! the shared client but live outside this crate.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod storage;
pub mod util;

#[cfg(test)]
mod test_helpers;

/// Browser entry point: install panic/log hooks and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn mount() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
