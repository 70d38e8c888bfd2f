//! Session context and hooks for the UI.

use api::SkillSmartConfig;
use dioxus::prelude::*;

use crate::session::Session;
use crate::storage::{AppSession, Services};

/// Get the current session.
/// Returns a signal that updates on every login, logout or expiry.
pub fn use_session() -> Signal<Session> {
    use_context::<Signal<Session>>()
}

/// The session store, for login/register/logout/set-user calls.
pub fn use_session_store() -> AppSession {
    use_context::<Services>().session
}

/// Data source and session store provided by [`SessionProvider`].
pub fn use_services() -> Services {
    use_context::<Services>()
}

/// Provider component that owns the session.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn SessionProvider(config: SkillSmartConfig, children: Element) -> Element {
    let mut session = use_signal(Session::default);
    let services = use_hook(|| Services::connect(&config).map_err(|e| e.user_message()));

    let services = match services {
        Ok(services) => services,
        Err(message) => {
            tracing::error!("Failed to set up the data source: {}", message);
            return rsx! {
                p { "{message}" }
            };
        }
    };

    use_context_provider(|| services.clone());
    use_context_provider(|| session);

    // Restore the persisted session on mount, then mirror every transition
    let _ = use_future(move || {
        let store = services.session.clone();
        async move {
            let mut changes = store.subscribe();
            store.restore().await;
            session.set(store.snapshot());
            while changes.changed().await.is_ok() {
                let next = changes.borrow_and_update().clone();
                if *session.peek() != next {
                    session.set(next);
                }
            }
        }
    });

    rsx! {
        {children}
    }
}
