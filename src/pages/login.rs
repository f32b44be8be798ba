//! Login page with email + password.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::app::SessionHandle;
use crate::components::loading_spinner::LoadingSpinner;
use crate::config::ClientConfig;
use crate::state::redirect::{PendingRedirect, SIGNUP_ROUTE};
use crate::state::session::Session;
#[cfg(any(test, feature = "csr"))]
use crate::state::session::AuthError;
use crate::util::auth::install_authenticated_redirect;

const MISSING_FIELDS: &str = "Please enter both email and password";

/// Trim the email and require both fields.
pub(crate) fn validate_login_input(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(MISSING_FIELDS);
    }
    Ok((email.to_owned(), password.to_owned()))
}

#[cfg(any(test, feature = "csr"))]
pub(crate) fn login_error_message(err: &AuthError) -> &'static str {
    match err {
        AuthError::InvalidCredentials => "Invalid email or password",
        _ => "Login failed. Please try again later.",
    }
}

/// Login page. Navigation after success is handled by the authenticated
/// redirect, which honors any pending redirect.
#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let pending = expect_context::<RwSignal<Option<PendingRedirect>>>();
    let store = expect_context::<SessionHandle>();
    let config = expect_context::<ClientConfig>();
    install_authenticated_redirect(session, pending, config.default_landing, use_navigate());

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let (email_value, password_value) =
            match validate_login_input(&email.get_untracked(), &password.get_untracked()) {
                Ok(values) => values,
                Err(msg) => {
                    error.set(Some(msg.to_owned()));
                    return;
                }
            };
        busy.set(true);
        error.set(None);

        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            let store = store.get_value();
            if let Err(e) = store.login(&email_value, &password_value).await {
                let _ = error.try_set(Some(login_error_message(&e).to_owned()));
            }
            let _ = busy.try_set(false);
        });

        #[cfg(not(feature = "csr"))]
        {
            let _ = (store, email_value, password_value);
            busy.set(false);
        }
    };

    view! {
        <div class="auth-container">
            <div class="auth-card">
                <div class="auth-header">
                    <h2>"Welcome Back"</h2>
                    <p>"Sign in to access your resumes and career insights"</p>
                </div>
                <Show when=move || session.with(Session::is_ready) fallback=|| view! { <LoadingSpinner/> }>
                    <Show when=move || error.with(Option::is_some)>
                        <div class="error-message">
                            <span>{move || error.get().unwrap_or_default()}</span>
                        </div>
                    </Show>
                    <form class="auth-form" on:submit=on_submit>
                        <div class="form-group">
                            <label for="email">"Email"</label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                prop:value=move || email.get()
                                on:input=move |ev| {
                                    email.set(event_target_value(&ev));
                                    error.set(None);
                                }
                            />
                        </div>
                        <div class="form-group">
                            <label for="password">"Password"</label>
                            <input
                                id="password"
                                type="password"
                                prop:value=move || password.get()
                                on:input=move |ev| {
                                    password.set(event_target_value(&ev));
                                    error.set(None);
                                }
                            />
                        </div>
                        <button class="button primary" type="submit" disabled=move || busy.get()>
                            {move || if busy.get() { "Signing in..." } else { "Sign In" }}
                        </button>
                    </form>
                    <p class="auth-footer">
                        "Don't have an account? "
                        <a href=SIGNUP_ROUTE>"Sign up"</a>
                    </p>
                </Show>
            </div>
        </div>
    }
}
