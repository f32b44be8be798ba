//! App header with the signed-in user's name and a logout button.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::SessionHandle;
use crate::state::redirect::{LOGIN_ROUTE, SIGNUP_ROUTE};
use crate::state::session::{Session, SessionStore};

/// Display name for the header: the user's name, else their email, empty
/// when signed out.
fn display_name(session: &Session) -> String {
    session
        .user()
        .map(|u| if u.name.is_empty() { u.email.clone() } else { u.name.clone() })
        .unwrap_or_default()
}

#[component]
pub fn Header() -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let store = expect_context::<SessionHandle>();
    let navigate = use_navigate();

    let on_logout = move |_| {
        store.with_value(SessionStore::logout);
        navigate(LOGIN_ROUTE, NavigateOptions::default());
    };

    view! {
        <header class="app-header">
            <div class="header-container">
                <a href="/" class="logo">"ResumeAI"</a>
                <div class="header-actions">
                    <Show
                        when=move || session.with(Session::is_authenticated)
                        fallback=|| {
                            view! {
                                <div class="auth-buttons">
                                    <a href=LOGIN_ROUTE class="button secondary">"Log In"</a>
                                    <a href=SIGNUP_ROUTE class="button primary">"Sign Up"</a>
                                </div>
                            }
                        }
                    >
                        <div class="user-menu">
                            <span class="user-name">{move || session.with(display_name)}</span>
                            <button class="icon-button" aria-label="Log out" on:click=on_logout.clone()>
                                "Log out"
                            </button>
                        </div>
                    </Show>
                </div>
            </div>
        </header>
    }
}
