//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionStore` is built once at startup and is the only writer of the
//! bearer credential: durable storage and the shared `HttpClient` header cell
//! are always changed together. Route guards and user-aware views read
//! `Session` snapshots (mirrored into a signal by the app shell) and call
//! `login`, `signup` and `logout`.
//!
//! LIFECYCLE
//! =========
//! `SessionStatus` only moves forward: `Uninitialized` → `Restoring` → `Ready`,
//! once per process. `bootstrap` performs that walk; `login`/`signup` leave
//! the session `Ready`.
//!
//! ERROR HANDLING
//! ==============
//! Network failures never escape as panics. A failed restore is logged and
//! downgrades to an anonymous `Ready` session; login/signup failures come
//! back as `AuthError` with the session untouched. Nothing retries on its own.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::net::http::HttpClient;
use crate::net::transport::{ApiResponse, TransportError};
use crate::net::types::{AuthResponse, RegisterRequest, User};
use crate::storage::CredentialStore;

pub const ME_PATH: &str = "/auth/me";
pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Uninitialized,
    Restoring,
    Ready,
}

/// Point-in-time view of the authentication state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    user: Option<User>,
    status: SessionStatus,
}

impl Session {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == SessionStatus::Ready
    }

    /// True until the startup restore has settled.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        !self.is_ready()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[cfg(test)]
impl Session {
    pub(crate) fn with_status(status: SessionStatus) -> Self {
        Self { user: None, status }
    }

    pub(crate) fn signed_in(user: User) -> Self {
        Self { user: Some(user), status: SessionStatus::Ready }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("identifier already registered")]
    IdentifierInUse,
    #[error("request failed: {0}")]
    Transient(String),
    #[error("session store detached")]
    Detached,
}

#[derive(Debug, thiserror::Error)]
enum RestoreError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("identity check rejected with status {0}")]
    Rejected(u16),
    #[error("malformed identity response: {0}")]
    Decode(String),
}

type Listener = Box<dyn Fn(&Session)>;

#[derive(Default)]
struct Inner {
    session: RefCell<Session>,
    detached: Cell<bool>,
    listeners: RefCell<Vec<Listener>>,
}

/// Shared handle to the session. Clones observe and mutate the same state.
#[derive(Clone)]
pub struct SessionStore {
    http: HttpClient,
    storage: Rc<dyn CredentialStore>,
    inner: Rc<Inner>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &*self.inner.session.borrow())
            .field("detached", &self.inner.detached.get())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(http: HttpClient, storage: Rc<dyn CredentialStore>) -> Self {
        Self { http, storage, inner: Rc::new(Inner::default()) }
    }

    /// The shared client other collaborators should issue requests through.
    #[must_use]
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.inner.session.borrow().clone()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.inner.session.borrow().user.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.session.borrow().is_authenticated()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.session.borrow().is_loading()
    }

    /// Whether durable storage currently holds a credential.
    #[must_use]
    pub fn has_stored_credential(&self) -> bool {
        self.storage.load().is_some()
    }

    /// Register a callback invoked with every new session snapshot.
    ///
    /// Listeners must not subscribe further listeners from inside the callback.
    pub fn subscribe(&self, listener: impl Fn(&Session) + 'static) {
        self.inner.listeners.borrow_mut().push(Box::new(listener));
    }

    /// Stop applying results to this store. Requests already in flight finish
    /// but their outcomes are dropped.
    pub fn detach(&self) {
        self.inner.detached.set(true);
        self.inner.listeners.borrow_mut().clear();
    }

    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.inner.detached.get()
    }

    /// Restore the session from a stored credential. Runs at most once; later
    /// calls return immediately.
    pub async fn bootstrap(&self) {
        if self.inner.session.borrow().status != SessionStatus::Uninitialized {
            return;
        }
        self.update(|s| s.status = SessionStatus::Restoring);

        let Some(token) = self.storage.load() else {
            self.update(|s| s.status = SessionStatus::Ready);
            return;
        };

        self.http.attach_credential(&token);
        let outcome = self.fetch_current_user().await;
        if self.is_detached() {
            return;
        }

        // A login or logout that landed while the check was in flight owns
        // the credential now; the restore only applies to the token it tried.
        let still_current = self.storage.load().as_deref() == Some(token.as_str());
        match outcome {
            Ok(user) if still_current => self.update(|s| {
                s.user = Some(user);
                s.status = SessionStatus::Ready;
            }),
            Ok(_) => self.update(|s| s.status = SessionStatus::Ready),
            Err(e) => {
                leptos::logging::warn!("session restore failed: {e}");
                if still_current {
                    self.storage.delete();
                    self.http.detach_credential();
                }
                self.update(|s| s.status = SessionStatus::Ready);
            }
        }
    }

    /// Log in with form-encoded `username`/`password`.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` on 401, `Detached` if the store was torn down,
    /// `Transient` for anything else. The session is unchanged on error.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<User, AuthError> {
        self.ensure_attached()?;
        let outcome = self
            .http
            .post_form(LOGIN_PATH, &[("username", identifier), ("password", secret)])
            .await;
        self.ensure_attached()?;

        let auth = read_auth_response(outcome, 401, AuthError::InvalidCredentials).inspect_err(|e| {
            leptos::logging::warn!("login failed: {e}");
        })?;
        Ok(self.establish(auth))
    }

    /// Register a new account and log it in.
    ///
    /// # Errors
    ///
    /// `IdentifierInUse` on 409, `Detached` if the store was torn down,
    /// `Transient` for anything else. The session is unchanged on error.
    pub async fn signup(&self, name: &str, identifier: &str, secret: &str) -> Result<User, AuthError> {
        self.ensure_attached()?;
        let body = RegisterRequest { name, email: identifier, password: secret };
        let outcome = self.http.post_json(REGISTER_PATH, &body).await;
        self.ensure_attached()?;

        let auth = read_auth_response(outcome, 409, AuthError::IdentifierInUse).inspect_err(|e| {
            leptos::logging::warn!("signup failed: {e}");
        })?;
        Ok(self.establish(auth))
    }

    /// Forget the credential and the user. Safe to call repeatedly.
    pub fn logout(&self) {
        self.storage.delete();
        self.http.detach_credential();
        if self.is_authenticated() {
            leptos::logging::log!("logged out");
        }
        self.update(|s| s.user = None);
    }

    async fn fetch_current_user(&self) -> Result<User, RestoreError> {
        let resp = self.http.get(ME_PATH).await?;
        if !resp.is_success() {
            return Err(RestoreError::Rejected(resp.status));
        }
        resp.json::<User>()
            .map_err(|e| RestoreError::Decode(e.to_string()))
    }

    fn establish(&self, auth: AuthResponse) -> User {
        self.storage.save(&auth.token);
        self.http.attach_credential(&auth.token);
        let user = auth.user;
        self.update(|s| {
            s.user = Some(user.clone());
            s.status = SessionStatus::Ready;
        });
        user
    }

    fn ensure_attached(&self) -> Result<(), AuthError> {
        if self.is_detached() { Err(AuthError::Detached) } else { Ok(()) }
    }

    fn update(&self, mutate: impl FnOnce(&mut Session)) {
        if self.is_detached() {
            return;
        }
        let snapshot = {
            let mut session = self.inner.session.borrow_mut();
            mutate(&mut session);
            session.clone()
        };
        for listener in self.inner.listeners.borrow().iter() {
            listener(&snapshot);
        }
    }
}

/// Map a login/register exchange onto `AuthResponse` or an `AuthError`.
/// `rejected_status` is the one status that carries a specific meaning.
fn read_auth_response(
    outcome: Result<ApiResponse, TransportError>,
    rejected_status: u16,
    rejected: AuthError,
) -> Result<AuthResponse, AuthError> {
    let resp = outcome.map_err(|e| AuthError::Transient(e.to_string()))?;
    if resp.status == rejected_status {
        return Err(rejected);
    }
    if !resp.is_success() {
        return Err(AuthError::Transient(format!("unexpected status {}", resp.status)));
    }
    let auth: AuthResponse = resp
        .json()
        .map_err(|e| AuthError::Transient(format!("malformed auth response: {e}")))?;
    if auth.token.trim().is_empty() {
        return Err(AuthError::Transient("auth response carried no token".to_owned()));
    }
    Ok(auth)
}
