//! Route wrapper that renders its children only for an authenticated session.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each mount is one `GuardAttempt` for the current path. While the session
//! is restoring (or inside the grace window) only the placeholder renders.
//! A denial stores the path in the pending-redirect slot and replaces the
//! history entry with `/login`.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::app::SessionHandle;
use crate::components::loading_spinner::LoadingSpinner;
use crate::config::ClientConfig;
use crate::state::guard::{GuardAttempt, GuardDecision, GuardSignals, needs_grace};
use crate::state::redirect::{LOGIN_ROUTE, PendingRedirect};
use crate::state::session::{Session, SessionStore};

#[component]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let pending = expect_context::<RwSignal<Option<PendingRedirect>>>();
    let store = expect_context::<SessionHandle>();
    let config = expect_context::<ClientConfig>();
    let navigate = use_navigate();

    let requested = use_location().pathname.get_untracked();
    let attempt = StoredValue::new(GuardAttempt::new(&requested));
    let grace_elapsed = RwSignal::new(false);
    let grace_started = StoredValue::new(false);

    // Arm the grace timer the first time it applies to this attempt.
    Effect::new(move || {
        let stored = store.with_value(SessionStore::has_stored_credential);
        if !session.with(|s| needs_grace(s, stored)) || grace_started.get_value() {
            return;
        }
        grace_started.set_value(true);

        #[cfg(feature = "csr")]
        {
            let wait = std::time::Duration::from_millis(config.restore_grace_ms);
            leptos::task::spawn_local(async move {
                gloo_timers::future::sleep(wait).await;
                grace_elapsed.set(true);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = config.restore_grace_ms;
            grace_elapsed.set(true);
        }
    });

    let decision = Memo::new(move |_| {
        let snapshot = session.get();
        let signals = GuardSignals {
            credential_stored: store.with_value(SessionStore::has_stored_credential),
            grace_elapsed: grace_elapsed.get(),
        };
        attempt
            .try_update_value(|a| a.evaluate(&snapshot, signals))
            .unwrap_or(GuardDecision::Loading)
    });

    Effect::new(move || {
        if let GuardDecision::Redirect(target) = decision.get() {
            pending.set(Some(target));
            navigate(LOGIN_ROUTE, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    view! {
        <Show
            when=move || decision.get() == GuardDecision::Allow
            fallback=|| view! { <LoadingSpinner/> }
        >
            {children()}
        </Show>
    }
}
