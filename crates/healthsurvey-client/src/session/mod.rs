//! Client-side session: who is logged in and with which bearer token.
//!
//! [`SessionStore`] is the single source of truth for the authenticated
//! identity. It is shared explicitly (`Arc<SessionStore>`) with every
//! consumer: the gateway reads the token from it on each request, the route
//! guard reads role and hydration state, views subscribe to changes.
//!
//! Only [`SessionStore::login`], [`SessionStore::logout`] and the two
//! narrower mutators ([`SessionStore::update_user`] for profile refreshes,
//! [`SessionStore::expire`] for the gateway's expiry handling) change the
//! state. The user and the token are always set and cleared together.

pub mod storage;

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::error::{SessionError, StorageError};
use crate::models::{Role, User};

pub use storage::{FileStorage, MemoryStorage, RawSession, SessionStorage, TOKEN_KEY, USER_KEY};

#[derive(Clone, PartialEq)]
struct Credentials {
    user: User,
    token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user.username)
            .field("token", &"***")
            .finish()
    }
}

/// The current identity. Either anonymous, or a user together with a
/// non-empty token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    active: Option<Credentials>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    fn authenticated(user: User, token: String) -> Self {
        Self {
            active: Some(Credentials { user, token }),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.active.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.active.as_ref().map(|c| &c.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.active.as_ref().map(|c| c.token.as_str())
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|u| u.role)
    }
}

/// What subscribers observe: the session plus whether start-up hydration
/// has finished.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub session: Session,
    pub hydrated: bool,
}

pub struct SessionStore {
    state: watch::Sender<SessionSnapshot>,
    storage: Arc<dyn SessionStorage>,
    /// Serializes mutations so storage writes happen outside the channel's
    /// lock while staying in step with what gets published.
    write: Mutex<()>,
}

impl SessionStore {
    /// Creates an empty, not yet hydrated store over `storage`.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self {
            state,
            storage,
            write: Mutex::new(()),
        }
    }

    pub fn new_shared(storage: Arc<dyn SessionStorage>) -> Arc<Self> {
        Arc::new(Self::new(storage))
    }

    /// Restores the persisted session, once at start-up.
    ///
    /// Installs the session only when both the token and the user are present
    /// and well-formed; anything else leaves the store anonymous and erases the
    /// leftovers, including a storage file that cannot be decoded. Always marks
    /// the store hydrated. Returns whether a session was restored.
    pub fn hydrate(&self) -> bool {
        let _write = self.write.lock();
        let (raw, corrupt) = match self.storage.load() {
            Ok(raw) => (raw, false),
            Err(e @ StorageError::Encoding(_)) => {
                tracing::warn!(error = %e, "persisted session is corrupt; starting anonymous");
                (RawSession::default(), true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted session; starting anonymous");
                (RawSession::default(), false)
            }
        };
        let had_entries = raw.token.is_some() || raw.user.is_some();
        let restored = restore(raw);

        if restored.is_none()
            && (had_entries || corrupt)
            && let Err(e) = self.storage.clear()
        {
            tracing::warn!(error = %e, "failed to erase inconsistent persisted session");
        }

        match &restored {
            Some(c) => tracing::info!(
                user = %c.user.username,
                role = %c.user.role,
                "session restored"
            ),
            None if had_entries => tracing::warn!("discarded incomplete persisted session"),
            None => tracing::debug!("no persisted session"),
        }

        let is_restored = restored.is_some();
        self.state.send_modify(|snap| {
            snap.session = Session { active: restored };
            snap.hydrated = true;
        });
        is_restored
    }

    /// Starts a session. Persists the pair, then publishes it to subscribers.
    pub fn login(&self, user: User, token: impl Into<String>) -> Result<(), SessionError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let user_json = serde_json::to_string(&user).map_err(StorageError::from)?;

        let _write = self.write.lock();
        self.storage.save(&token, &user_json)?;
        tracing::info!(user = %user.username, role = %user.role, "session started");
        self.state.send_modify(|snap| {
            snap.session = Session::authenticated(user, token);
        });
        Ok(())
    }

    /// Ends the session and erases persisted state.
    ///
    /// Idempotent: returns `false` when nobody was logged in, and never fails.
    pub fn logout(&self) -> bool {
        let _write = self.write.lock();
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "failed to erase persisted session");
        }
        self.state.send_if_modified(|snap| match snap.session.active.take() {
            Some(c) => {
                tracing::info!(user = %c.user.username, "session ended");
                true
            }
            None => false,
        })
    }

    /// Clears the session only if it still carries `token`.
    ///
    /// Used when a request made with `token` came back 401. Concurrent
    /// failures for the same token clear the session once; the first caller
    /// gets `true`, the rest `false`.
    pub fn expire(&self, token: &str) -> bool {
        let _write = self.write.lock();
        if self.state.borrow().session.token() != Some(token) {
            return false;
        }
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "failed to erase persisted session");
        }
        self.state.send_if_modified(|snap| {
            if snap.session.token() != Some(token) {
                return false;
            }
            if let Some(c) = snap.session.active.take() {
                tracing::info!(user = %c.user.username, "session expired");
            }
            true
        })
    }

    /// Replaces the stored user after a profile update, keeping the token.
    ///
    /// No-op (returns `false`) when logged out or when `profile` belongs to a
    /// different account.
    pub fn update_user(&self, profile: User) -> Result<bool, SessionError> {
        let _write = self.write.lock();
        let Some((mut updated, token)) = self
            .state
            .borrow()
            .session
            .active
            .as_ref()
            .map(|c| (c.user.clone(), c.token.clone()))
        else {
            return Ok(false);
        };
        if updated.id != profile.id {
            tracing::warn!(
                current = updated.id,
                received = profile.id,
                "ignoring profile for a different account"
            );
            return Ok(false);
        }
        updated.apply_profile(profile);
        let user_json = serde_json::to_string(&updated).map_err(StorageError::from)?;
        self.storage.save(&token, &user_json)?;
        self.state.send_modify(|snap| {
            if let Some(active) = snap.session.active.as_mut() {
                active.user = updated;
            }
        });
        Ok(true)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn session(&self) -> Session {
        self.state.borrow().session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().session.is_authenticated()
    }

    pub fn is_hydrated(&self) -> bool {
        self.state.borrow().hydrated
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().session.user().cloned()
    }

    pub fn role(&self) -> Option<Role> {
        self.state.borrow().session.role()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().session.token().map(str::to_string)
    }

    /// Receiver that observes every change to the session.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Resolves once [`SessionStore::hydrate`] has run.
    pub async fn wait_hydrated(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|snap| snap.hydrated).await;
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snap = self.state.borrow();
        f.debug_struct("SessionStore")
            .field("authenticated", &snap.session.is_authenticated())
            .field("hydrated", &snap.hydrated)
            .finish()
    }
}

fn restore(raw: RawSession) -> Option<Credentials> {
    let token = raw.token.filter(|t| !t.trim().is_empty())?;
    let user: User = serde_json::from_str(raw.user.as_deref()?).ok()?;
    Some(Credentials { user, token })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(id: i64, role: &str) -> User {
        serde_json::from_value(json!({
            "id": id,
            "username": format!("user{id}"),
            "email": format!("user{id}@example.test"),
            "first_name": "Sam",
            "last_name": "Doe",
            "role": role
        }))
        .unwrap()
    }

    fn store() -> (Arc<MemoryStorage>, SessionStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        (storage, store)
    }

    fn assert_pair_invariant(store: &SessionStore) {
        let s = store.session();
        assert_eq!(s.token().is_some(), s.user().is_some());
        if let Some(t) = s.token() {
            assert!(!t.is_empty());
        }
    }

    #[test]
    fn starts_anonymous_and_unhydrated() {
        let (_, store) = store();
        assert!(!store.is_authenticated());
        assert!(!store.is_hydrated());
        assert_eq!(store.role(), None);
        assert_pair_invariant(&store);
    }

    #[test]
    fn login_sets_and_persists_both() {
        let (storage, store) = store();
        store.login(user(1, "admin"), "tok-1").unwrap();
        assert!(store.is_authenticated());
        assert_eq!(store.role(), Some(Role::Admin));
        assert_eq!(store.token().as_deref(), Some("tok-1"));
        let raw = storage.snapshot();
        assert_eq!(raw.token.as_deref(), Some("tok-1"));
        assert!(raw.user.unwrap().contains("\"username\":\"user1\""));
        assert_pair_invariant(&store);
    }

    #[test]
    fn login_rejects_empty_token() {
        let (storage, store) = store();
        assert!(matches!(
            store.login(user(1, "admin"), "  "),
            Err(SessionError::EmptyToken)
        ));
        assert!(!store.is_authenticated());
        assert_eq!(storage.snapshot(), RawSession::default());
    }

    #[test]
    fn logout_is_idempotent() {
        let (storage, store) = store();
        store.login(user(1, "patient"), "tok").unwrap();
        assert!(store.logout());
        let after_first = store.snapshot();
        assert!(!store.logout());
        assert_eq!(store.snapshot(), after_first);
        assert_eq!(storage.snapshot(), RawSession::default());
        assert_pair_invariant(&store);
    }

    #[test]
    fn login_then_hydrate_round_trips() {
        let storage = Arc::new(MemoryStorage::new());
        let first = SessionStore::new(storage.clone());
        let u = user(5, "researcher");
        first.login(u.clone(), "tok-5").unwrap();

        let reloaded = SessionStore::new(storage);
        assert!(reloaded.hydrate());
        assert!(reloaded.is_hydrated());
        assert_eq!(reloaded.user(), Some(u));
        assert_eq!(reloaded.token().as_deref(), Some("tok-5"));
    }

    #[test]
    fn hydrate_discards_half_sessions() {
        for (token, user_json) in [
            (Some("tok"), None),
            (None, Some(r#"{"id":1,"username":"a","role":"admin"}"#)),
            (Some("tok"), Some("not json")),
            (Some(""), Some(r#"{"id":1,"username":"a","role":"admin"}"#)),
        ] {
            let storage = Arc::new(MemoryStorage::with_entries(token, user_json));
            let store = SessionStore::new(storage.clone());
            assert!(!store.hydrate());
            assert!(store.is_hydrated());
            assert!(!store.is_authenticated());
            assert_eq!(storage.snapshot(), RawSession::default());
            assert_pair_invariant(&store);
        }
    }

    #[test]
    fn hydrate_erases_corrupt_session_file() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let storage = Arc::new(FileStorage::for_profile(Some(dir.path()), "default").unwrap());
        std::fs::write(storage.path(), "{not json").unwrap();

        let store = SessionStore::new(storage.clone());
        assert!(!store.hydrate());
        assert!(store.is_hydrated());
        assert!(!store.is_authenticated());
        assert!(!storage.path().exists());
    }

    #[test]
    fn hydrate_erases_half_session_file() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let storage = Arc::new(FileStorage::for_profile(Some(dir.path()), "default").unwrap());
        std::fs::write(storage.path(), r#"{"token": "tok"}"#).unwrap();

        let store = SessionStore::new(storage.clone());
        assert!(!store.hydrate());
        assert!(!storage.path().exists());
    }

    #[test]
    fn expire_clears_only_matching_token_once() {
        let (_, store) = store();
        store.login(user(1, "admin"), "old").unwrap();
        assert!(!store.expire("other"));
        assert!(store.is_authenticated());
        assert!(store.expire("old"));
        assert!(!store.expire("old"));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn expire_does_not_touch_a_newer_session() {
        let (_, store) = store();
        store.login(user(1, "admin"), "old").unwrap();
        store.login(user(1, "admin"), "new").unwrap();
        assert!(!store.expire("old"));
        assert_eq!(store.token().as_deref(), Some("new"));
    }

    #[test]
    fn update_user_keeps_token() {
        let (storage, store) = store();
        store.login(user(2, "healthcare_provider"), "tok-2").unwrap();
        let mut refreshed = user(2, "healthcare_provider");
        refreshed.first_name = "Alex".into();
        assert!(store.update_user(refreshed).unwrap());
        assert_eq!(store.user().unwrap().first_name, "Alex");
        assert_eq!(store.token().as_deref(), Some("tok-2"));
        assert!(storage.snapshot().user.unwrap().contains("Alex"));

        assert!(!store.update_user(user(3, "admin")).unwrap());
        assert_eq!(store.user().unwrap().id, 2);
    }

    #[test]
    fn update_user_clears_fields_the_server_nulls() {
        let (storage, store) = store();
        let mut u = user(2, "patient");
        u.phone = Some("555-0100".into());
        store.login(u, "tok-2").unwrap();

        let profile: User = serde_json::from_value(json!({
            "id": 2, "username": "user2", "role": "patient", "first_name": "Sam",
            "phone": null
        }))
        .unwrap();
        assert!(store.update_user(profile).unwrap());
        assert_eq!(store.user().unwrap().phone, None);
        assert!(!storage.snapshot().user.unwrap().contains("555-0100"));
    }

    #[test]
    fn readers_are_not_blocked_while_persisting() {
        struct SlowStorage {
            inner: MemoryStorage,
            entered: std::sync::Barrier,
        }
        impl SessionStorage for SlowStorage {
            fn load(&self) -> Result<RawSession, StorageError> {
                self.inner.load()
            }
            fn save(&self, token: &str, user_json: &str) -> Result<(), StorageError> {
                self.entered.wait();
                std::thread::sleep(std::time::Duration::from_millis(200));
                self.inner.save(token, user_json)
            }
            fn clear(&self) -> Result<(), StorageError> {
                self.inner.clear()
            }
        }

        let storage = Arc::new(SlowStorage {
            inner: MemoryStorage::new(),
            entered: std::sync::Barrier::new(2),
        });
        let store = Arc::new(SessionStore::new(storage.clone()));
        let writer = {
            let store = store.clone();
            std::thread::spawn(move || store.login(user(1, "admin"), "tok").unwrap())
        };
        storage.entered.wait();
        let started = std::time::Instant::now();
        assert!(!store.is_authenticated());
        assert!(started.elapsed() < std::time::Duration::from_millis(100));
        writer.join().unwrap();
        assert!(store.is_authenticated());
    }

    #[test]
    fn update_user_when_logged_out_is_noop() {
        let (_, store) = store();
        assert!(!store.update_user(user(1, "admin")).unwrap());
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn subscribers_see_login_immediately() {
        let (_, store) = store();
        let mut rx = store.subscribe();
        store.login(user(1, "admin"), "tok").unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().session.is_authenticated());

        store.logout();
        rx.changed().await.unwrap();
        assert!(!rx.borrow().session.is_authenticated());
    }

    #[tokio::test]
    async fn wait_hydrated_resolves_after_hydrate() {
        let (_, store) = store();
        let store = Arc::new(store);
        let waiter = {
            let store = store.clone();
            tokio::spawn(async move { store.wait_hydrated().await })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());
        store.hydrate();
        waiter.await.unwrap();
    }

    #[test]
    fn debug_output_hides_token() {
        let (_, store) = store();
        store.login(user(1, "admin"), "secret-token").unwrap();
        let rendered = format!("{:?} {:?}", store, store.session());
        assert!(!rendered.contains("secret-token"));
    }
}
