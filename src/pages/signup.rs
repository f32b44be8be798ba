//! Account registration page.

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::app::SessionHandle;
use crate::components::loading_spinner::LoadingSpinner;
use crate::config::ClientConfig;
use crate::state::redirect::{LOGIN_ROUTE, PendingRedirect};
use crate::state::session::Session;
#[cfg(any(test, feature = "csr"))]
use crate::state::session::AuthError;
use crate::util::auth::install_authenticated_redirect;

pub(crate) const MIN_PASSWORD_LEN: usize = 6;

/// Validated registration fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub(crate) fn validate_signup_input(
    name: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<SignupInput, &'static str> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() || email.is_empty() || password.is_empty() || confirm.is_empty() {
        return Err("All fields are required");
    }
    if password != confirm {
        return Err("Passwords do not match");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters long");
    }
    Ok(SignupInput { name: name.to_owned(), email: email.to_owned(), password: password.to_owned() })
}

#[cfg(any(test, feature = "csr"))]
pub(crate) fn signup_error_message(err: &AuthError) -> &'static str {
    match err {
        AuthError::IdentifierInUse => "Email already in use",
        _ => "Registration failed. Please try again later.",
    }
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let pending = expect_context::<RwSignal<Option<PendingRedirect>>>();
    let store = expect_context::<SessionHandle>();
    let config = expect_context::<ClientConfig>();
    install_authenticated_redirect(session, pending, config.default_landing, use_navigate());

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let input = match validate_signup_input(
            &name.get_untracked(),
            &email.get_untracked(),
            &password.get_untracked(),
            &confirm.get_untracked(),
        ) {
            Ok(input) => input,
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
            if let Err(e) = store.signup(&input.name, &input.email, &input.password).await {
                let _ = error.try_set(Some(signup_error_message(&e).to_owned()));
            }
            let _ = busy.try_set(false);
        });

        #[cfg(not(feature = "csr"))]
        {
            let _ = (store, input);
            busy.set(false);
        }
    };

    let field = move |id: &'static str, label: &'static str, kind: &'static str, value: RwSignal<String>| {
        view! {
            <div class="form-group">
                <label for=id>{label}</label>
                <input
                    id=id
                    type=kind
                    prop:value=move || value.get()
                    on:input=move |ev| {
                        value.set(event_target_value(&ev));
                        error.set(None);
                    }
                />
            </div>
        }
    };

    view! {
        <div class="auth-container">
            <div class="auth-card">
                <div class="auth-header">
                    <h2>"Create an Account"</h2>
                    <p>"Sign up to manage your resumes and get career insights"</p>
                </div>
                <Show when=move || session.with(Session::is_ready) fallback=|| view! { <LoadingSpinner/> }>
                    <Show when=move || error.with(Option::is_some)>
                        <div class="error-message">
                            <span>{move || error.get().unwrap_or_default()}</span>
                        </div>
                    </Show>
                    <form class="auth-form" on:submit=on_submit>
                        {field("name", "Full Name", "text", name)}
                        {field("email", "Email", "email", email)}
                        {field("password", "Password", "password", password)}
                        {field("confirm-password", "Confirm Password", "password", confirm)}
                        <button class="button primary" type="submit" disabled=move || busy.get()>
                            {move || if busy.get() { "Creating account..." } else { "Sign Up" }}
                        </button>
                    </form>
                    <p class="auth-footer">
                        "Already have an account? "
                        <a href=LOGIN_ROUTE>"Log in"</a>
                    </p>
                </Show>
            </div>
        </div>
    }
}
