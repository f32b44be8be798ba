//! Protected-route decision logic.
//!
//! DESIGN
//! ======
//! The decision is a pure function of the session snapshot plus two facts
//! the view layer samples: whether a credential sits in storage and whether
//! the restore grace interval has elapsed. Order matters:
//!
//! 1. session not `Ready`          → placeholder, nothing else
//! 2. authenticated                → render the guarded view
//! 3. credential stored, grace open → placeholder (restore may still land)
//! 4. otherwise                    → redirect to login, remembering the path
//!
//! `GuardAttempt` wraps one navigation: the first non-loading decision is
//! final for that attempt.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use super::redirect::PendingRedirect;
use super::session::Session;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Loading,
    Allow,
    Redirect(PendingRedirect),
}

/// Facts sampled by the view layer at evaluation time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GuardSignals {
    pub credential_stored: bool,
    pub grace_elapsed: bool,
}

#[must_use]
pub fn decide(session: &Session, signals: GuardSignals, requested_path: &str) -> GuardDecision {
    if !session.is_ready() {
        return GuardDecision::Loading;
    }
    if session.is_authenticated() {
        return GuardDecision::Allow;
    }
    if needs_grace(session, signals.credential_stored) && !signals.grace_elapsed {
        return GuardDecision::Loading;
    }
    GuardDecision::Redirect(PendingRedirect::new(requested_path))
}

/// Whether the guard should hold the placeholder for the grace interval
/// before it may redirect.
#[must_use]
pub fn needs_grace(session: &Session, credential_stored: bool) -> bool {
    session.is_ready() && !session.is_authenticated() && credential_stored
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptState {
    AwaitingSession,
    Allowed,
    Denied(PendingRedirect),
}

/// One guarded navigation attempt.
#[derive(Clone, Debug)]
pub struct GuardAttempt {
    path: String,
    state: AttemptState,
}

impl GuardAttempt {
    #[must_use]
    pub fn new(requested_path: &str) -> Self {
        Self { path: requested_path.to_owned(), state: AttemptState::AwaitingSession }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn state(&self) -> &AttemptState {
        &self.state
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.state != AttemptState::AwaitingSession
    }

    /// Evaluate against fresh inputs. Once resolved, the resolution is
    /// returned unchanged regardless of input.
    pub fn evaluate(&mut self, session: &Session, signals: GuardSignals) -> GuardDecision {
        match &self.state {
            AttemptState::Allowed => return GuardDecision::Allow,
            AttemptState::Denied(target) => return GuardDecision::Redirect(target.clone()),
            AttemptState::AwaitingSession => {}
        }
        let decision = decide(session, signals, &self.path);
        match &decision {
            GuardDecision::Loading => {}
            GuardDecision::Allow => self.state = AttemptState::Allowed,
            GuardDecision::Redirect(target) => self.state = AttemptState::Denied(target.clone()),
        }
        decision
    }
}
