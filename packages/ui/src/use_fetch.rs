//! Dioxus bindings of the fetch primitive.
//!
//! [`use_fetch`] keeps one [`FetchHandle`] per component and mirrors its state
//! into a signal. The dependency closure is evaluated inside an effect, so any
//! signal it reads (typically the session's company id) re-triggers the load;
//! the handle itself skips the call when the resulting [`DepKey`] is unchanged.

use std::future::Future;

use api::models::ChartDatum;
use api::normalize::to_chart_data;
use api::ApiError;
use dioxus::prelude::*;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::fetch::{DepKey, FetchHandle, FetchState};

/// A component's fetch: observable state plus manual refetch.
pub struct UseFetch<T: 'static, P> {
    handle: FetchHandle<T>,
    state: Signal<FetchState<T>>,
    producer: P,
}

impl<T: 'static, P: Clone> Clone for UseFetch<T, P> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            state: self.state,
            producer: self.producer.clone(),
        }
    }
}

impl<T, P, Fut> UseFetch<T, P>
where
    T: DeserializeOwned + Clone + 'static,
    P: Fn() -> Fut + Clone + 'static,
    Fut: Future<Output = Result<Value, ApiError>> + 'static,
{
    pub fn state(&self) -> Signal<FetchState<T>> {
        self.state
    }

    pub fn handle(&self) -> &FetchHandle<T> {
        &self.handle
    }

    /// Load again regardless of the dependency key.
    pub fn refetch(&self) {
        let handle = self.handle.clone();
        let producer = self.producer.clone();
        spawn(async move {
            handle.refetch(producer).await;
        });
    }
}

/// Load `producer()` whenever `deps()` yields a new key.
pub fn use_fetch<T, D, P, Fut>(mut deps: D, producer: P) -> UseFetch<T, P>
where
    T: DeserializeOwned + Clone + 'static,
    D: FnMut() -> DepKey + 'static,
    P: Fn() -> Fut + Clone + 'static,
    Fut: Future<Output = Result<Value, ApiError>> + 'static,
{
    let handle = use_hook(FetchHandle::<T>::new);
    let mut state = use_signal(FetchState::<T>::default);

    let mirror = handle.clone();
    let _ = use_future(move || {
        let mut changes = mirror.subscribe();
        async move {
            while changes.changed().await.is_ok() {
                let next = changes.borrow_and_update().clone();
                state.set(next);
            }
        }
    });

    let loader = handle.clone();
    let load_with = producer.clone();
    use_effect(move || {
        let key = deps();
        let handle = loader.clone();
        let producer = load_with.clone();
        spawn(async move {
            handle.load(key, producer).await;
        });
    });

    UseFetch {
        handle,
        state,
        producer,
    }
}

/// Chart series of a raw dashboard payload, recomputed only when it changes.
pub fn use_chart_data(state: Signal<FetchState<Value>>) -> Memo<Vec<ChartDatum>> {
    use_memo(move || to_chart_data(state.read().data.as_ref()).into_data())
}

/// Derived view over fetched data, recomputed only when the data changes.
pub fn use_view<T, O>(state: Signal<FetchState<T>>, assemble: fn(&T) -> O) -> Memo<Option<O>>
where
    T: 'static,
    O: PartialEq + 'static,
{
    use_memo(move || state.read().data.as_ref().map(assemble))
}
