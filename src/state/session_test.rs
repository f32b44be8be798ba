use super::*;
use crate::net::transport::{Method, RequestBody};
use crate::storage::MemoryCredentialStore;
use crate::test_helpers::{BASE_URL, ScriptedTransport, auth_body, sample_user, user_json};
use futures::executor::block_on;

fn store_with(transport: &Rc<ScriptedTransport>, storage: &MemoryCredentialStore) -> SessionStore {
    let http = HttpClient::new(BASE_URL, 5_000, transport.clone());
    SessionStore::new(http, Rc::new(storage.clone()))
}

fn ready_store(transport: &Rc<ScriptedTransport>, storage: &MemoryCredentialStore) -> SessionStore {
    let store = store_with(transport, storage);
    block_on(store.bootstrap());
    store
}

// =============================================================
// Session
// =============================================================

#[test]
fn session_default_is_uninitialized_and_anonymous() {
    let session = Session::default();
    assert_eq!(session.status(), SessionStatus::Uninitialized);
    assert!(session.is_loading());
    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
}

// =============================================================
// bootstrap
// =============================================================

#[test]
fn bootstrap_without_credential_skips_network() {
    let transport = ScriptedTransport::new();
    let storage = MemoryCredentialStore::default();
    let store = store_with(&transport, &storage);

    block_on(store.bootstrap());

    assert_eq!(transport.request_count(), 0);
    let session = store.snapshot();
    assert_eq!(session.status(), SessionStatus::Ready);
    assert!(!session.is_authenticated());
    assert!(!store.http().has_credential());
}

#[test]
fn bootstrap_restores_user_with_stored_credential() {
    let transport = ScriptedTransport::new();
    transport.respond(200, user_json());
    let storage = MemoryCredentialStore::with_token("tok-1");
    let store = store_with(&transport, &storage);

    block_on(store.bootstrap());

    let sent = transport.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, Method::Get);
    assert_eq!(sent[0].url, "http://api.test/auth/me");
    assert_eq!(sent[0].authorization.as_deref(), Some("Bearer tok-1"));

    assert_eq!(store.current_user(), Some(sample_user()));
    assert!(store.is_authenticated());
    assert!(!store.is_loading());
    assert_eq!(store.http().authorization_header().as_deref(), Some("Bearer tok-1"));
    assert_eq!(storage.load().as_deref(), Some("tok-1"));
}

#[test]
fn bootstrap_rejected_credential_is_cleared_and_never_resurfaces() {
    let transport = ScriptedTransport::new();
    transport.respond(401, serde_json::json!({ "detail": "expired" }));
    let storage = MemoryCredentialStore::with_token("expired");
    let store = store_with(&transport, &storage);

    block_on(store.bootstrap());

    assert_eq!(store.snapshot().status(), SessionStatus::Ready);
    assert!(!store.is_authenticated());
    assert_eq!(storage.load(), None);
    assert!(!store.http().has_credential());

    // A fresh process reading the same storage starts anonymous, offline.
    let next = store_with(&transport, &storage);
    block_on(next.bootstrap());
    assert_eq!(transport.request_count(), 1);
    assert!(!next.is_authenticated());
}

#[test]
fn bootstrap_network_failure_reaches_ready() {
    let transport = ScriptedTransport::new();
    transport.fail(TransportError::Network("connection refused".to_owned()));
    let storage = MemoryCredentialStore::with_token("tok");
    let store = store_with(&transport, &storage);

    block_on(store.bootstrap());

    assert_eq!(store.snapshot().status(), SessionStatus::Ready);
    assert_eq!(storage.load(), None);
    assert!(!store.http().has_credential());
}

#[test]
fn bootstrap_timeout_takes_failure_branch() {
    let transport = ScriptedTransport::new();
    transport.fail(TransportError::Timeout { after_ms: 5_000 });
    let storage = MemoryCredentialStore::with_token("tok");
    let store = store_with(&transport, &storage);

    block_on(store.bootstrap());

    assert!(store.snapshot().is_ready());
    assert!(!store.is_authenticated());
    assert_eq!(storage.load(), None);
}

#[test]
fn bootstrap_malformed_identity_body_takes_failure_branch() {
    let transport = ScriptedTransport::new();
    transport.respond_raw(200, "<html>not json</html>");
    let storage = MemoryCredentialStore::with_token("tok");
    let store = store_with(&transport, &storage);

    block_on(store.bootstrap());

    assert!(store.snapshot().is_ready());
    assert!(!store.is_authenticated());
    assert_eq!(storage.load(), None);
}

#[test]
fn bootstrap_runs_only_once() {
    let transport = ScriptedTransport::new();
    transport.respond(200, user_json());
    let storage = MemoryCredentialStore::with_token("tok");
    let store = store_with(&transport, &storage);

    block_on(store.bootstrap());
    store.logout();
    storage.save("tok-2");
    block_on(store.bootstrap());

    assert_eq!(transport.request_count(), 1);
    assert!(!store.is_authenticated());
}

#[test]
fn bootstrap_walks_status_forward_exactly_once() {
    let transport = ScriptedTransport::new();
    transport.respond(200, user_json());
    let storage = MemoryCredentialStore::with_token("tok");
    let store = store_with(&transport, &storage);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    store.subscribe(move |s| sink.borrow_mut().push((s.status(), s.is_authenticated())));

    block_on(store.bootstrap());

    assert_eq!(
        *seen.borrow(),
        vec![(SessionStatus::Restoring, false), (SessionStatus::Ready, true)]
    );
}

#[test]
fn status_is_restoring_while_identity_check_in_flight() {
    let transport = ScriptedTransport::new();
    transport.respond(200, user_json());
    let storage = MemoryCredentialStore::with_token("tok");
    let store = store_with(&transport, &storage);

    let probe = store.clone();
    let observed = Rc::new(RefCell::new(None));
    let slot = observed.clone();
    transport.on_send(move || *slot.borrow_mut() = Some(probe.snapshot()));

    block_on(store.bootstrap());

    let during = observed.borrow().clone().unwrap();
    assert_eq!(during.status(), SessionStatus::Restoring);
    assert!(!during.is_authenticated());
}

#[test]
fn bootstrap_failure_keeps_credential_written_by_concurrent_login() {
    let transport = ScriptedTransport::new();
    transport.respond(401, serde_json::json!({}));
    let storage = MemoryCredentialStore::with_token("stale");
    let store = store_with(&transport, &storage);

    let writer = storage.clone();
    transport.on_send(move || writer.save("fresh"));

    block_on(store.bootstrap());

    assert_eq!(storage.load().as_deref(), Some("fresh"));
}

#[test]
fn detached_store_ignores_late_restore_result() {
    let transport = ScriptedTransport::new();
    transport.respond(200, user_json());
    let storage = MemoryCredentialStore::with_token("tok");
    let store = store_with(&transport, &storage);

    let teardown = store.clone();
    transport.on_send(move || teardown.detach());

    block_on(store.bootstrap());

    assert_eq!(store.snapshot().status(), SessionStatus::Restoring);
    assert!(!store.is_authenticated());
}

#[test]
fn bootstrap_success_after_concurrent_logout_stays_anonymous() {
    let transport = ScriptedTransport::new();
    transport.respond(200, user_json());
    let storage = MemoryCredentialStore::with_token("tok");
    let store = store_with(&transport, &storage);

    let signer_out = store.clone();
    transport.on_send(move || signer_out.logout());

    block_on(store.bootstrap());

    assert!(store.snapshot().is_ready());
    assert!(!store.is_authenticated());
    assert_eq!(storage.load(), None);
    assert!(!store.http().has_credential());
}

#[test]
fn bootstrap_success_does_not_replace_user_from_concurrent_login() {
    let transport = ScriptedTransport::new();
    transport.respond(200, user_json());
    let storage = MemoryCredentialStore::with_token("stale");
    let store = store_with(&transport, &storage);

    let writer = storage.clone();
    transport.on_send(move || writer.save("fresh"));

    block_on(store.bootstrap());

    assert!(store.snapshot().is_ready());
    assert!(!store.is_authenticated());
    assert_eq!(storage.load().as_deref(), Some("fresh"));
}

#[test]
fn bootstrap_restores_user_with_null_name_and_keeps_credential() {
    let transport = ScriptedTransport::new();
    transport.respond(200, serde_json::json!({ "id": 7, "name": null }));
    let storage = MemoryCredentialStore::with_token("good");
    let store = store_with(&transport, &storage);

    block_on(store.bootstrap());

    let user = store.current_user().unwrap();
    assert_eq!(user.id.as_deref(), Some("7"));
    assert_eq!(user.name, "");
    assert!(store.is_authenticated());
    assert_eq!(storage.load().as_deref(), Some("good"));
    assert_eq!(store.http().authorization_header().as_deref(), Some("Bearer good"));
}

// =============================================================
// login
// =============================================================

#[test]
fn login_sends_form_encoded_credentials() {
    let transport = ScriptedTransport::new();
    transport.respond(200, auth_body("tok-9"));
    let storage = MemoryCredentialStore::default();
    let store = ready_store(&transport, &storage);

    block_on(store.login("a@b.com", "s3cret&more")).unwrap();

    let sent = transport.requests();
    assert_eq!(sent[0].method, Method::Post);
    assert_eq!(sent[0].url, "http://api.test/auth/login");
    assert_eq!(sent[0].authorization, None);
    assert_eq!(sent[0].body, RequestBody::Form("username=a%40b.com&password=s3cret%26more".to_owned()));
}

#[test]
fn login_success_persists_credential_and_sets_user() {
    let transport = ScriptedTransport::new();
    transport.respond(200, auth_body("tok-9"));
    let storage = MemoryCredentialStore::default();
    let store = ready_store(&transport, &storage);

    let user = block_on(store.login("a@b.com", "right")).unwrap();

    assert_eq!(user, sample_user());
    assert_eq!(store.current_user(), Some(sample_user()));
    assert!(store.is_authenticated());
    assert_eq!(storage.load().as_deref(), Some("tok-9"));
    assert_eq!(store.http().authorization_header().as_deref(), Some("Bearer tok-9"));
}

#[test]
fn repeated_logins_keep_latest_user_and_token() {
    let transport = ScriptedTransport::new();
    transport.respond(200, auth_body("tok-1"));
    let mut second = auth_body("tok-2");
    second["user"]["name"] = serde_json::json!("Grace Hopper");
    transport.respond(200, second);
    let storage = MemoryCredentialStore::default();
    let store = ready_store(&transport, &storage);

    block_on(store.login("a@b.com", "one")).unwrap();
    block_on(store.login("g@h.com", "two")).unwrap();

    assert!(store.is_authenticated());
    assert_eq!(store.current_user().unwrap().name, "Grace Hopper");
    assert_eq!(storage.load().as_deref(), Some("tok-2"));
}

#[test]
fn login_401_is_invalid_credentials_and_state_unchanged() {
    let transport = ScriptedTransport::new();
    transport.respond(401, serde_json::json!({ "detail": "Incorrect username or password" }));
    let storage = MemoryCredentialStore::default();
    let store = ready_store(&transport, &storage);
    let before = store.snapshot();

    let err = block_on(store.login("a@b.com", "wrong")).unwrap_err();

    assert_eq!(err, AuthError::InvalidCredentials);
    assert_eq!(store.snapshot(), before);
    assert_eq!(storage.load(), None);
    assert!(!store.http().has_credential());
}

#[test]
fn login_other_failures_are_transient() {
    let transport = ScriptedTransport::new();
    transport.respond(500, serde_json::json!({}));
    transport.fail(TransportError::Timeout { after_ms: 5_000 });
    transport.respond_raw(200, "{}");
    transport.respond(200, serde_json::json!({ "token": "  ", "user": user_json() }));
    let storage = MemoryCredentialStore::default();
    let store = ready_store(&transport, &storage);

    for _ in 0..4 {
        let err = block_on(store.login("a@b.com", "pw")).unwrap_err();
        assert!(matches!(err, AuthError::Transient(_)), "got {err:?}");
    }
    assert!(!store.is_authenticated());
    assert_eq!(storage.load(), None);
}

#[test]
fn login_after_detach_is_rejected_without_network() {
    let transport = ScriptedTransport::new();
    let storage = MemoryCredentialStore::default();
    let store = ready_store(&transport, &storage);

    store.detach();
    let err = block_on(store.login("a@b.com", "pw")).unwrap_err();

    assert_eq!(err, AuthError::Detached);
    assert_eq!(transport.request_count(), 0);
}

#[test]
fn login_result_arriving_after_detach_is_dropped() {
    let transport = ScriptedTransport::new();
    transport.respond(200, auth_body("tok"));
    let storage = MemoryCredentialStore::default();
    let store = ready_store(&transport, &storage);

    let teardown = store.clone();
    transport.on_send(move || teardown.detach());
    let err = block_on(store.login("a@b.com", "pw")).unwrap_err();

    assert_eq!(err, AuthError::Detached);
    assert!(!store.is_authenticated());
    assert_eq!(storage.load(), None);
}

// =============================================================
// signup
// =============================================================

#[test]
fn signup_sends_json_and_logs_in() {
    let transport = ScriptedTransport::new();
    transport.respond(201, auth_body("tok-new"));
    let storage = MemoryCredentialStore::default();
    let store = ready_store(&transport, &storage);

    let user = block_on(store.signup("Ada Lovelace", "a@b.com", "secret1")).unwrap();

    let sent = transport.requests();
    assert_eq!(sent[0].url, "http://api.test/auth/register");
    let RequestBody::Json(body) = &sent[0].body else {
        panic!("expected JSON body, got {:?}", sent[0].body);
    };
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(body).unwrap(),
        serde_json::json!({ "name": "Ada Lovelace", "email": "a@b.com", "password": "secret1" })
    );

    assert_eq!(user, sample_user());
    assert!(store.is_authenticated());
    assert_eq!(storage.load().as_deref(), Some("tok-new"));
    assert_eq!(store.http().authorization_header().as_deref(), Some("Bearer tok-new"));
}

#[test]
fn signup_409_is_identifier_in_use_and_state_unchanged() {
    let transport = ScriptedTransport::new();
    transport.respond(409, serde_json::json!({ "detail": "Email already registered" }));
    let storage = MemoryCredentialStore::default();
    let store = ready_store(&transport, &storage);
    let before = store.snapshot();

    let err = block_on(store.signup("Ada", "a@b.com", "secret1")).unwrap_err();

    assert_eq!(err, AuthError::IdentifierInUse);
    assert_eq!(store.snapshot(), before);
    assert_eq!(storage.load(), None);
}

#[test]
fn signup_401_is_not_identifier_in_use() {
    let transport = ScriptedTransport::new();
    transport.respond(401, serde_json::json!({}));
    let storage = MemoryCredentialStore::default();
    let store = ready_store(&transport, &storage);

    let err = block_on(store.signup("Ada", "a@b.com", "secret1")).unwrap_err();
    assert!(matches!(err, AuthError::Transient(_)));
}

// =============================================================
// logout
// =============================================================

#[test]
fn logout_clears_everything_and_is_idempotent() {
    let transport = ScriptedTransport::new();
    transport.respond(200, auth_body("tok"));
    let storage = MemoryCredentialStore::default();
    let store = ready_store(&transport, &storage);
    block_on(store.login("a@b.com", "pw")).unwrap();

    for _ in 0..3 {
        store.logout();
        assert!(!store.is_authenticated());
        assert!(store.current_user().is_none());
        assert!(!store.http().has_credential());
        assert_eq!(storage.load(), None);
        assert!(store.snapshot().is_ready());
    }
}

#[test]
fn logout_strips_header_from_other_collaborators() {
    let transport = ScriptedTransport::new();
    transport.respond(200, auth_body("tok"));
    transport.respond(200, serde_json::json!([]));
    let storage = MemoryCredentialStore::default();
    let store = ready_store(&transport, &storage);
    let resumes_client = store.http().clone();

    block_on(store.login("a@b.com", "pw")).unwrap();
    store.logout();
    block_on(resumes_client.get("/resumes")).unwrap();

    assert_eq!(transport.requests()[1].authorization, None);
}

// =============================================================
// listeners
// =============================================================

#[test]
fn listeners_see_login_and_logout() {
    let transport = ScriptedTransport::new();
    transport.respond(200, auth_body("tok"));
    let storage = MemoryCredentialStore::default();
    let store = ready_store(&transport, &storage);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    store.subscribe(move |s| sink.borrow_mut().push(s.is_authenticated()));

    block_on(store.login("a@b.com", "pw")).unwrap();
    store.logout();

    assert_eq!(*seen.borrow(), vec![true, false]);
}

#[test]
fn detach_drops_listeners() {
    let transport = ScriptedTransport::new();
    let storage = MemoryCredentialStore::default();
    let store = store_with(&transport, &storage);

    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    store.subscribe(move |_| counter.set(counter.get() + 1));
    store.detach();
    block_on(store.bootstrap());

    assert_eq!(calls.get(), 0);
}

#[test]
fn login_accepts_user_without_id() {
    let transport = ScriptedTransport::new();
    let storage = MemoryCredentialStore::default();
    let store = ready_store(&transport, &storage);
    transport.respond(
        200,
        serde_json::json!({
            "token": "t",
            "user": { "_id": "abc", "name": "A", "email": "a@b.com" }
        }),
    );

    let user = block_on(store.login("a@b.com", "pw")).unwrap();

    assert_eq!(user.id, None);
    assert_eq!(user.extra.get("_id"), Some(&serde_json::json!("abc")));
    assert!(store.is_authenticated());
    assert_eq!(storage.load().as_deref(), Some("t"));
}

#[test]
fn login_accepts_user_with_null_fields() {
    let transport = ScriptedTransport::new();
    let storage = MemoryCredentialStore::default();
    let store = ready_store(&transport, &storage);
    transport.respond(
        200,
        serde_json::json!({ "token": "t", "user": { "name": null, "email": null } }),
    );

    let user = block_on(store.login("a@b.com", "pw")).unwrap();

    assert!(user.name.is_empty());
    assert_eq!(store.current_user(), Some(user));
    assert_eq!(storage.load().as_deref(), Some("t"));
}
