//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` builds the single `HttpClient` and `SessionStore` for the page,
//! mirrors session snapshots into a signal, starts the one-shot restore, and
//! provides everything to the route tree through context.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Redirect, Route, Router, Routes},
};

use crate::components::header::Header;
use crate::components::protected_route::ProtectedRoute;
use crate::config::ClientConfig;
use crate::net::http::HttpClient;
use crate::net::transport::Transport;
use crate::pages::{home::HomePage, login::LoginPage, resume::ResumePage, signup::SignupPage};
use crate::state::redirect::PendingRedirect;
use crate::state::session::{Session, SessionStore};
use crate::storage::CredentialStore;

/// Context handle to the page's `SessionStore`.
pub type SessionHandle = StoredValue<SessionStore, LocalStorage>;

#[cfg(feature = "csr")]
fn platform_transport() -> Rc<dyn Transport> {
    Rc::new(crate::net::browser::BrowserTransport)
}

#[cfg(not(feature = "csr"))]
fn platform_transport() -> Rc<dyn Transport> {
    Rc::new(crate::net::transport::OfflineTransport)
}

#[cfg(feature = "csr")]
fn platform_storage() -> Rc<dyn CredentialStore> {
    Rc::new(crate::storage::LocalCredentialStore)
}

#[cfg(not(feature = "csr"))]
fn platform_storage() -> Rc<dyn CredentialStore> {
    Rc::new(crate::storage::MemoryCredentialStore::default())
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ClientConfig::from_build_env();
    let http = HttpClient::new(&config.api_base_url, config.request_timeout_ms, platform_transport());
    let store = SessionStore::new(http, platform_storage());

    let session = RwSignal::new(store.snapshot());
    store.subscribe(move |snapshot| session.set(snapshot.clone()));
    let pending = RwSignal::new(None::<PendingRedirect>);

    #[cfg(feature = "csr")]
    {
        let boot = store.clone();
        leptos::task::spawn_local(async move { boot.bootstrap().await });
    }

    let handle: SessionHandle = StoredValue::new_local(store);
    on_cleanup(move || {
        let _ = handle.try_with_value(SessionStore::detach);
    });

    provide_context(config);
    provide_context(handle);
    provide_context(session);
    provide_context(pending);

    view! {
        <Title text="ResumeAI"/>

        <Router>
            <div class="app-container">
                <Header/>
                <main class="main-content">
                    <Routes fallback=|| view! { <p class="not-found">"404 - Page Not Found"</p> }>
                        <Route path=StaticSegment("") view=|| view! { <Redirect path="/home"/> }/>
                        <Route path=StaticSegment("login") view=LoginPage/>
                        <Route path=StaticSegment("signup") view=SignupPage/>
                        <Route
                            path=StaticSegment("home")
                            view=|| view! { <ProtectedRoute><HomePage/></ProtectedRoute> }
                        />
                        <Route
                            path=(StaticSegment("resume"), ParamSegment("id"))
                            view=|| view! { <ProtectedRoute><ResumePage/></ProtectedRoute> }
                        />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}
