//! # UI crate — client state for the SkillSmart frontends
//!
//! Holds the state that sits between the data source and the screens:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`session`] | Tagged-union session, its reducer and the persistence-aware `SessionStore` |
//! | [`fetch`] | Per-call-site loader with dependency keys and superseded-result dropping |
//! | [`memo`] | Recompute-on-change cache for derived views outside of components |
//! | [`charts`] | Memoized skill charts over a loaded catalog |
//! | [`guard`] | Signed-in check for protected pages and role landing routes |
//! | [`storage`] | Platform durable store and the wiring of data source and session |
//!
//! The Dioxus side is [`SessionProvider`] with [`use_session`], and
//! [`use_fetch`] for component-level loads.

pub mod charts;
pub mod fetch;
pub mod guard;
pub mod memo;
pub mod session;
pub mod storage;

mod auth;
pub use auth::{use_services, use_session, use_session_store, SessionProvider};

mod use_fetch;
pub use use_fetch::{use_chart_data, use_fetch, use_view, UseFetch};

pub use charts::SkillCharts;
pub use fetch::{DepKey, DepValue, FetchHandle, FetchOutcome, FetchState};
pub use guard::RouteDecision;
pub use session::{AuthFailure, Session, SessionAction, SessionStore};
pub use storage::Services;
