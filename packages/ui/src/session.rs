//! # Session store
//!
//! Authentication state of the client, kept as a tagged union so that
//! "signed in" and "has a user" can never disagree.
//!
//! ## States
//!
//! | State | Meaning |
//! |-------|---------|
//! | `Loading { user }` | Startup restore, or a login/register in flight. Keeps the previous user. |
//! | `Anonymous` | Nobody signed in. |
//! | `Authenticated { user }` | Signed in. |
//! | `Failed { message, user }` | Last auth call failed. Keeps the previous user, if any. |
//!
//! Every change goes through [`Session::reduce`] with one of the four
//! [`SessionAction`]s. [`SessionStore`] is the stateful side: it owns a
//! [`SessionCell`] (a `watch` channel holding the current snapshot), the
//! [`SessionVault`] the token and user snapshot are persisted in, and the
//! [`AuthApi`] collaborator.
//!
//! ## Lifecycle
//!
//! ```text
//! Loading ──restore──▶ Anonymous | Authenticated
//! Anonymous ──login──▶ Loading ──▶ Authenticated | Failed
//! Failed ──clear_error──▶ Anonymous | Authenticated
//! * ──logout / expire──▶ Anonymous
//! ```
//!
//! Concurrent logins are not serialized: whichever call resolves last decides
//! the final state.

use std::sync::Arc;

use api::models::{AuthResponse, Credentials, RegisterRequest, UserProfile};
use api::{ApiError, AuthApi, UnauthorizedHook};
use store::{KeyValueStore, SessionVault, VaultRead};
use thiserror::Error;
use tokio::sync::watch;

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const SESSION_NOT_SAVED: &str = "Could not save your session on this device";

/// Authentication state snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    Loading { user: Option<UserProfile> },
    Anonymous,
    Authenticated { user: UserProfile },
    Failed { message: String, user: Option<UserProfile> },
}

impl Default for Session {
    /// Startup state: initializing, nobody known yet.
    fn default() -> Self {
        Self::Loading { user: None }
    }
}

/// Named transitions of [`Session`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    SetLoading(bool),
    SetUser(UserProfile),
    SetError(Option<String>),
    Logout,
}

impl Session {
    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            Self::Loading { user } | Self::Failed { user, .. } => user.as_ref(),
            Self::Authenticated { user } => Some(user),
            Self::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Settled state for the given user: signed in or anonymous.
    fn settled(user: Option<UserProfile>) -> Self {
        match user {
            Some(user) => Self::Authenticated { user },
            None => Self::Anonymous,
        }
    }

    /// Apply one transition, returning the next snapshot.
    pub fn reduce(&self, action: SessionAction) -> Session {
        match action {
            SessionAction::SetLoading(true) => Self::Loading {
                user: self.user().cloned(),
            },
            SessionAction::SetLoading(false) => match self {
                Self::Loading { user } => Self::settled(user.clone()),
                other => other.clone(),
            },
            SessionAction::SetUser(user) => Self::Authenticated { user },
            SessionAction::SetError(Some(message)) => Self::Failed {
                message,
                user: self.user().cloned(),
            },
            SessionAction::SetError(None) => match self {
                Self::Failed { user, .. } => Self::settled(user.clone()),
                other => other.clone(),
            },
            SessionAction::Logout => Self::Anonymous,
        }
    }
}

/// Failure of a login or registration attempt, already worded for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthFailure {
    pub message: String,
}

/// Shared, observable holder of the current [`Session`].
///
/// Doubles as the [`UnauthorizedHook`] handed to the data source: a 401 from
/// the server logs the session out.
#[derive(Clone, Debug)]
pub struct SessionCell {
    tx: Arc<watch::Sender<Session>>,
}

impl Default for SessionCell {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionCell {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Session::default());
        Self { tx: Arc::new(tx) }
    }

    /// Reduce the current snapshot with `action` and publish the result.
    pub fn dispatch(&self, action: SessionAction) -> Session {
        tracing::debug!("Session action: {:?}", action);
        let mut next = Session::default();
        self.tx.send_modify(|session| {
            *session = session.reduce(action);
            next = session.clone();
        });
        next
    }

    pub fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }
}

impl UnauthorizedHook for SessionCell {
    fn on_unauthorized(&self) {
        tracing::warn!("Session expired, signing out");
        self.dispatch(SessionAction::Logout);
    }
}

/// Session state plus its persistence and the auth collaborator.
pub struct SessionStore<S, A> {
    cell: SessionCell,
    vault: SessionVault<S>,
    auth: Arc<A>,
}

impl<S: Clone, A> Clone for SessionStore<S, A> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            vault: self.vault.clone(),
            auth: self.auth.clone(),
        }
    }
}

impl<S: KeyValueStore, A: AuthApi> SessionStore<S, A> {
    pub fn new(vault: SessionVault<S>, auth: Arc<A>) -> Self {
        Self::with_cell(SessionCell::new(), vault, auth)
    }

    /// Build around an existing cell, typically one already installed as the
    /// data source's unauthorized hook.
    pub fn with_cell(cell: SessionCell, vault: SessionVault<S>, auth: Arc<A>) -> Self {
        Self { cell, vault, auth }
    }

    pub fn snapshot(&self) -> Session {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.cell.subscribe()
    }

    pub fn cell(&self) -> &SessionCell {
        &self.cell
    }

    pub fn auth(&self) -> &Arc<A> {
        &self.auth
    }

    /// Hook that drops this session when the server rejects the token.
    pub fn unauthorized_hook(&self) -> Arc<dyn UnauthorizedHook> {
        Arc::new(self.cell.clone())
    }

    fn dispatch(&self, action: SessionAction) -> Session {
        self.cell.dispatch(action)
    }

    /// Leave the initializing state using whatever was persisted.
    pub async fn restore(&self) -> Session {
        match self.vault.read::<UserProfile>().await {
            VaultRead::Restored { user, .. } => {
                tracing::debug!("Restored session for {}", user.email);
                self.dispatch(SessionAction::SetUser(user))
            }
            VaultRead::Corrupt(e) => {
                tracing::warn!("Discarding unreadable session snapshot: {}", e);
                self.auth.logout().await;
                self.dispatch(SessionAction::SetLoading(false))
            }
            VaultRead::Empty => self.dispatch(SessionAction::SetLoading(false)),
        }
    }

    /// Sign in. On success the caller routes by `user.role`.
    pub async fn login(&self, credentials: &Credentials) -> Result<UserProfile, AuthFailure> {
        self.begin();
        match self.auth.login(credentials).await {
            Ok(response) => self.accept(response).await,
            Err(e) => Err(self.fail(e, LOGIN_FAILED)),
        }
    }

    /// Create an account and sign in with it.
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, AuthFailure> {
        self.begin();
        match self.auth.register(request).await {
            Ok(response) => self.accept(response).await,
            Err(e) => Err(self.fail(e, REGISTRATION_FAILED)),
        }
    }

    pub async fn logout(&self) {
        self.auth.logout().await;
        self.dispatch(SessionAction::Logout);
    }

    /// Drop the session after the collaborator already cleared storage.
    pub fn expire(&self) {
        self.dispatch(SessionAction::Logout);
    }

    pub fn clear_error(&self) {
        self.dispatch(SessionAction::SetError(None));
    }

    /// Replace the signed-in user, e.g. after a profile edit.
    ///
    /// The snapshot is only persisted next to an existing token.
    pub async fn set_user(&self, user: UserProfile) {
        match self.vault.save_user(&user).await {
            Ok(true) => {}
            Ok(false) => tracing::debug!("No stored token, user snapshot kept in memory only"),
            Err(e) => tracing::warn!("Failed to persist user snapshot: {}", e),
        }
        self.dispatch(SessionAction::SetUser(user));
    }

    fn begin(&self) {
        self.dispatch(SessionAction::SetLoading(true));
        self.dispatch(SessionAction::SetError(None));
    }

    /// Persist the new session, then sign in. A session that cannot be
    /// stored is refused: requests would go out without its token.
    async fn accept(&self, response: AuthResponse) -> Result<UserProfile, AuthFailure> {
        let AuthResponse { token, user } = response;
        if let Err(e) = self.vault.save(&token, &user).await {
            tracing::warn!("Failed to persist session: {}", e);
            let message = SESSION_NOT_SAVED.to_string();
            self.dispatch(SessionAction::SetError(Some(message.clone())));
            return Err(AuthFailure { message });
        }
        self.dispatch(SessionAction::SetUser(user.clone()));
        Ok(user)
    }

    fn fail(&self, error: ApiError, fallback: &str) -> AuthFailure {
        tracing::error!("Authentication failed: {}", error);
        let message = error.server_message().unwrap_or(fallback).to_string();
        self.dispatch(SessionAction::SetError(Some(message.clone())));
        AuthFailure { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::models::{RecordId, Role};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use store::{MemoryStore, StoreError};

    fn user(id: i64, role: Role) -> UserProfile {
        UserProfile {
            id: RecordId::Number(id),
            email: format!("user{id}@company.com"),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role,
            company_id: Some(RecordId::Number(3)),
            name: None,
            position: None,
        }
    }

    /// Auth collaborator answering every call with a fixed result.
    struct FakeAuth {
        result: Result<AuthResponse, ApiError>,
        vault: SessionVault<MemoryStore>,
        logouts: AtomicUsize,
    }

    impl FakeAuth {
        fn new(result: Result<AuthResponse, ApiError>, store: &MemoryStore) -> Arc<Self> {
            Arc::new(Self {
                result,
                vault: SessionVault::new(store.clone()),
                logouts: AtomicUsize::new(0),
            })
        }
    }

    impl AuthApi for FakeAuth {
        async fn login(&self, _credentials: &Credentials) -> Result<AuthResponse, ApiError> {
            self.result.clone()
        }

        async fn register(&self, _request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
            self.result.clone()
        }

        async fn logout(&self) {
            self.logouts.fetch_add(1, Ordering::SeqCst);
            self.vault.clear().await;
        }
    }

    /// Store whose writes to one key always fail.
    #[derive(Clone)]
    struct RejectingStore {
        inner: MemoryStore,
        rejected: &'static str,
    }

    impl KeyValueStore for RejectingStore {
        async fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
            if key == self.rejected {
                return Err(StoreError::Unavailable("quota exceeded".to_string()));
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) {
            self.inner.remove(key).await
        }
    }

    fn session_store(
        store: &MemoryStore,
        result: Result<AuthResponse, ApiError>,
    ) -> (SessionStore<MemoryStore, FakeAuth>, Arc<FakeAuth>) {
        let auth = FakeAuth::new(result, store);
        (SessionStore::new(SessionVault::new(store.clone()), auth.clone()), auth)
    }

    fn ok(user: UserProfile) -> Result<AuthResponse, ApiError> {
        Ok(AuthResponse {
            token: "token-1".to_string(),
            user,
        })
    }

    #[test]
    fn test_user_iff_authenticated_in_every_reachable_state() {
        let actions = [
            SessionAction::SetLoading(true),
            SessionAction::SetLoading(false),
            SessionAction::SetUser(user(1, Role::Admin)),
            SessionAction::SetError(Some("boom".to_string())),
            SessionAction::SetError(None),
            SessionAction::Logout,
        ];

        let mut seen = vec![Session::default()];
        let mut frontier = seen.clone();
        while let Some(state) = frontier.pop() {
            assert_eq!(state.user().is_some(), state.is_authenticated());
            for action in &actions {
                let next = state.reduce(action.clone());
                if !seen.contains(&next) {
                    seen.push(next.clone());
                    frontier.push(next);
                }
            }
        }
        // Loading/Failed with and without a user, Anonymous, Authenticated.
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_reducer_transitions() {
        let start = Session::default();
        assert!(start.is_loading());
        assert!(!start.is_authenticated());
        assert_eq!(start.reduce(SessionAction::SetLoading(false)), Session::Anonymous);

        let signed_in = start.reduce(SessionAction::SetUser(user(1, Role::Employee)));
        let failed = signed_in
            .reduce(SessionAction::SetLoading(true))
            .reduce(SessionAction::SetError(Some("nope".to_string())));
        assert_eq!(failed.error(), Some("nope"));
        assert!(!failed.is_loading());
        assert!(failed.is_authenticated());

        assert_eq!(failed.reduce(SessionAction::SetError(None)), signed_in);
        assert_eq!(failed.reduce(SessionAction::Logout), Session::Anonymous);
    }

    #[tokio::test]
    async fn test_restore_without_snapshot_is_anonymous() {
        let store = MemoryStore::new();
        let (session, _) = session_store(&store, ok(user(1, Role::Admin)));

        assert!(session.snapshot().is_loading());
        assert_eq!(session.restore().await, Session::Anonymous);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_recovers_to_anonymous() {
        let store = MemoryStore::new();
        store.set("authToken", "token-1".to_string()).await.unwrap();
        store.set("user", "{not json".to_string()).await.unwrap();
        let (session, auth) = session_store(&store, ok(user(1, Role::Admin)));

        let restored = session.restore().await;
        assert_eq!(restored, Session::Anonymous);
        assert_eq!(restored.error(), None);
        assert_eq!(auth.logouts.load(Ordering::SeqCst), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_login_persists_and_authenticates() {
        let store = MemoryStore::new();
        let (session, _) = session_store(&store, ok(user(7, Role::Admin)));
        session.restore().await;

        let signed_in = session
            .login(&Credentials::new("user7@company.com", "Secret123"))
            .await
            .unwrap();
        assert_eq!(signed_in.role.home_route(), "/dashboard");
        assert_eq!(session.snapshot(), Session::Authenticated { user: signed_in });
        assert_eq!(store.get("authToken").await.as_deref(), Some("token-1"));
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_server_message() {
        let store = MemoryStore::new();
        let rejected = Err(ApiError::Status {
            status: 400,
            message: Some("Invalid credentials".to_string()),
        });
        let (session, _) = session_store(&store, rejected);
        session.restore().await;

        let err = session
            .login(&Credentials::new("x@y.z", "wrong"))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Invalid credentials");

        let state = session.snapshot();
        assert_eq!(state.error(), Some("Invalid credentials"));
        assert!(!state.is_loading());
        assert!(!state.is_authenticated());

        session.clear_error();
        assert_eq!(session.snapshot(), Session::Anonymous);
    }

    #[tokio::test]
    async fn test_failure_without_server_message_uses_fallback() {
        let store = MemoryStore::new();
        let down = Err(ApiError::Transport("connection refused".to_string()));
        let (session, _) = session_store(&store, down);

        let login = session.login(&Credentials::new("a@b.c", "pw")).await;
        assert_eq!(login.unwrap_err().message, LOGIN_FAILED);

        let request = RegisterRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "a@b.c".to_string(),
            password: "pw".to_string(),
            company_name: "Acme".to_string(),
            role: Role::Admin,
        };
        let register = session.register(&request).await;
        assert_eq!(register.unwrap_err().message, REGISTRATION_FAILED);
    }

    #[tokio::test]
    async fn test_set_user_survives_restart() {
        let store = MemoryStore::new();
        let (session, _) = session_store(&store, ok(user(1, Role::Employee)));
        session.restore().await;
        session.login(&Credentials::new("a@b.c", "pw")).await.unwrap();

        let mut edited = user(1, Role::Employee);
        edited.position = Some("Staff Engineer".to_string());
        session.set_user(edited.clone()).await;

        let (fresh, _) = session_store(&store, ok(user(99, Role::Admin)));
        assert_eq!(fresh.restore().await, Session::Authenticated { user: edited });
    }

    #[tokio::test]
    async fn test_set_user_without_token_stays_in_memory() {
        let store = MemoryStore::new();
        let (session, _) = session_store(&store, ok(user(1, Role::Employee)));

        session.set_user(user(2, Role::Employee)).await;
        assert!(session.snapshot().is_authenticated());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_storage() {
        let store = MemoryStore::new();
        let (session, auth) = session_store(&store, ok(user(1, Role::Admin)));
        session.login(&Credentials::new("a@b.c", "pw")).await.unwrap();

        session.logout().await;
        assert_eq!(session.snapshot(), Session::Anonymous);
        assert_eq!(auth.logouts.load(Ordering::SeqCst), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_hook_drops_session() {
        let store = MemoryStore::new();
        let (session, _) = session_store(&store, ok(user(1, Role::Admin)));
        session.login(&Credentials::new("a@b.c", "pw")).await.unwrap();
        let mut changes = session.subscribe();
        changes.borrow_and_update();

        session.unauthorized_hook().on_unauthorized();
        assert!(changes.has_changed().unwrap());
        assert_eq!(*changes.borrow(), Session::Anonymous);
    }

    #[tokio::test]
    async fn test_unsaved_session_is_refused() {
        let memory = MemoryStore::new();
        let store = RejectingStore {
            inner: memory.clone(),
            rejected: "authToken",
        };
        let auth = FakeAuth::new(ok(user(1, Role::Admin)), &memory);
        let session = SessionStore::new(SessionVault::new(store), auth);
        session.restore().await;

        let err = session
            .login(&Credentials::new("a@b.c", "pw"))
            .await
            .unwrap_err();
        assert_eq!(err.message, SESSION_NOT_SAVED);
        assert!(!session.snapshot().is_authenticated());
        assert!(memory.is_empty());
    }
}
