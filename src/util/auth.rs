//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! The login and signup pages are public-only: an authenticated visitor is
//! sent on. That one effect is also the post-login navigation, so the
//! pending redirect is consumed in exactly one place.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::redirect::{PendingRedirect, landing_path};
use crate::state::session::Session;

/// Whether a public-only page should hand off to the landing route.
#[must_use]
pub fn should_leave_auth_page(session: &Session) -> bool {
    session.is_ready() && session.is_authenticated()
}

/// Navigate away from an auth page as soon as the session is authenticated,
/// to the pending redirect if one exists, replacing the history entry.
pub fn install_authenticated_redirect<F>(
    session: RwSignal<Session>,
    pending: RwSignal<Option<PendingRedirect>>,
    default_landing: String,
    navigate: F,
) where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if session.with(should_leave_auth_page) {
            let target = landing_path(pending.try_update(Option::take).flatten(), &default_landing);
            navigate(&target, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}
