//! # Fetch primitive
//!
//! [`FetchHandle`] is the state of one call site that loads remote data:
//! a `{ data, loading, error }` triple observable through a `watch` channel.
//!
//! ## Rules
//!
//! - A new load starts with `loading = true` and the error cleared. Data from
//!   the previous load stays visible until the new result arrives.
//! - A successful payload is unwrapped from its `{ "data": ... }` envelope and
//!   decoded into `T`. A payload that does not decode counts as a failure.
//! - A failure sets `error` to the most specific message available and keeps
//!   the previous data (stale-while-error).
//! - Every [`begin`](FetchHandle::begin) issues a [`FetchTicket`]. Completing
//!   with any ticket but the latest is a no-op: superseded requests are not
//!   aborted, their results are simply dropped.
//! - [`load`](FetchHandle::load) runs only when the [`DepKey`] differs from the
//!   one the call site last loaded with; [`refetch`](FetchHandle::refetch)
//!   always runs.
//!
//! There is no retry, timeout or sharing between call sites here.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use api::models::RecordId;
use api::normalize::into_unwrapped;
use api::ApiError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;

/// Observable state of one call site.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }
}

/// One primitive component of a dependency key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DepValue {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
}

impl From<bool> for DepValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for DepValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for DepValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for DepValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&RecordId> for DepValue {
    fn from(id: &RecordId) -> Self {
        match id {
            RecordId::Number(n) => Self::Int(*n),
            RecordId::Text(s) => Self::Str(s.clone()),
        }
    }
}

impl<T: Into<DepValue>> From<Option<T>> for DepValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Ordered dependency key of a call site. Equal keys mean "already loaded".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DepKey(pub Vec<DepValue>);

impl DepKey {
    pub fn empty() -> Self {
        Self(Vec::new())
    }
}

impl FromIterator<DepValue> for DepKey {
    fn from_iter<I: IntoIterator<Item = DepValue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[DepValue; N]> for DepKey {
    fn from(values: [DepValue; N]) -> Self {
        Self(values.into())
    }
}

/// Proof of which load a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// What happened to a completed (or skipped) load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result was written to the state.
    Applied,
    /// A newer load started first; the result was dropped.
    Superseded,
    /// The dependency key had not changed; nothing ran.
    Unchanged,
}

struct Shared<T> {
    generation: AtomicU64,
    deps: Mutex<Option<DepKey>>,
    state: watch::Sender<FetchState<T>>,
}

/// State and cancellation bookkeeping of one call site.
pub struct FetchHandle<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for FetchHandle<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> Default for FetchHandle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FetchHandle<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(FetchState::default());
        Self {
            shared: Arc::new(Shared {
                generation: AtomicU64::new(0),
                deps: Mutex::new(None),
                state,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.shared.state.subscribe()
    }

    /// Start a load: invalidates every earlier ticket.
    pub fn begin(&self) -> FetchTicket {
        let mut ticket = FetchTicket { generation: 0 };
        self.shared.state.send_modify(|state| {
            ticket.generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.loading = true;
            state.error = None;
        });
        ticket
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.shared.generation.load(Ordering::SeqCst) == ticket.generation
    }
}

impl<T: Clone> FetchHandle<T> {
    pub fn state(&self) -> FetchState<T> {
        self.shared.state.borrow().clone()
    }
}

impl<T: DeserializeOwned> FetchHandle<T> {
    /// Record the result of the load `ticket` was issued for.
    pub fn complete(&self, ticket: FetchTicket, result: Result<Value, ApiError>) -> FetchOutcome {
        if !self.is_current(ticket) {
            tracing::debug!("Dropping superseded fetch result");
            return FetchOutcome::Superseded;
        }

        let decoded = result.and_then(|payload| {
            serde_json::from_value::<T>(into_unwrapped(payload)).map_err(ApiError::from)
        });

        let mut outcome = FetchOutcome::Superseded;
        self.shared.state.send_if_modified(|state| {
            // A begin() may have slipped in while decoding.
            if !self.is_current(ticket) {
                return false;
            }
            state.loading = false;
            match decoded {
                Ok(data) => {
                    state.data = Some(data);
                    state.error = None;
                }
                Err(e) => {
                    tracing::error!("Fetch failed: {}", e);
                    state.error = Some(e.user_message());
                }
            }
            outcome = FetchOutcome::Applied;
            true
        });
        outcome
    }

    /// Begin, await the producer, complete.
    pub async fn run<P, Fut>(&self, producer: P) -> FetchOutcome
    where
        P: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, ApiError>>,
    {
        let ticket = self.begin();
        let result = producer().await;
        self.complete(ticket, result)
    }

    /// Run unless this call site already loaded with an equal key.
    pub async fn load<P, Fut>(&self, deps: DepKey, producer: P) -> FetchOutcome
    where
        P: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, ApiError>>,
    {
        {
            let mut last = self
                .shared
                .deps
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if last.as_ref() == Some(&deps) {
                return FetchOutcome::Unchanged;
            }
            *last = Some(deps);
        }
        self.run(producer).await
    }

    /// Load again with the current key.
    pub async fn refetch<P, Fut>(&self, producer: P) -> FetchOutcome
    where
        P: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, ApiError>>,
    {
        self.run(producer).await
    }
}
