//! Durable storage for the bearer credential.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser keeps the raw token in `localStorage` under `TOKEN_STORAGE_KEY`.
//! Native builds and tests use `MemoryCredentialStore`. Storage failures are
//! swallowed: a token that cannot be persisted just means the next page load
//! starts logged out.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::rc::Rc;

/// The single well-known key holding the credential.
pub const TOKEN_STORAGE_KEY: &str = "token";

pub trait CredentialStore {
    /// The stored token, if any. Blank values count as absent.
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn delete(&self);
}

/// In-process store. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        let store = Self::default();
        store.save(token);
        store
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<String> {
        non_blank(self.slot.borrow().clone())
    }

    fn save(&self, token: &str) {
        *self.slot.borrow_mut() = Some(token.to_owned());
    }

    fn delete(&self) {
        self.slot.borrow_mut().take();
    }
}

/// `window.localStorage` backed store.
#[cfg(feature = "csr")]
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalCredentialStore;

#[cfg(feature = "csr")]
impl LocalCredentialStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

#[cfg(feature = "csr")]
impl CredentialStore for LocalCredentialStore {
    fn load(&self) -> Option<String> {
        let raw = Self::storage()?.get_item(TOKEN_STORAGE_KEY).ok().flatten();
        non_blank(raw)
    }

    fn save(&self, token: &str) {
        let Some(storage) = Self::storage() else {
            leptos::logging::warn!("localStorage unavailable; credential not persisted");
            return;
        };
        if storage.set_item(TOKEN_STORAGE_KEY, token).is_err() {
            leptos::logging::warn!("localStorage write failed; credential not persisted");
        }
    }

    fn delete(&self) {
        let Some(storage) = Self::storage() else {
            leptos::logging::warn!("localStorage unavailable; credential not removed");
            return;
        };
        if storage.remove_item(TOKEN_STORAGE_KEY).is_err() {
            leptos::logging::warn!("localStorage remove failed; credential may be restored again");
        }
    }
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|token| !token.trim().is_empty())
}
