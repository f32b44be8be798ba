//! Post-authentication destination memory.
//!
//! A denied navigation leaves a `PendingRedirect` in an in-memory slot; the
//! login/signup flow takes it exactly once. Nothing here survives a reload.

#[cfg(test)]
#[path = "redirect_test.rs"]
mod redirect_test;

pub const LOGIN_ROUTE: &str = "/login";
pub const SIGNUP_ROUTE: &str = "/signup";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRedirect {
    path: String,
}

impl PendingRedirect {
    #[must_use]
    pub fn new(path: &str) -> Self {
        Self { path: path.to_owned() }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Where to send the user after a successful login or signup.
///
/// Uses the pending path when it is a local, non-auth route; otherwise
/// `default_landing`.
#[must_use]
pub fn landing_path(pending: Option<PendingRedirect>, default_landing: &str) -> String {
    pending
        .map(|p| p.path)
        .filter(|path| is_safe_destination(path))
        .unwrap_or_else(|| default_landing.to_owned())
}

fn is_safe_destination(path: &str) -> bool {
    // Protocol-relative `//host` would leave the app.
    if !path.starts_with('/') || path.starts_with("//") {
        return false;
    }
    let route = path.split(['?', '#']).next().unwrap_or(path);
    route != LOGIN_ROUTE && route != SIGNUP_ROUTE
}
