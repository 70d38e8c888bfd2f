//! # API crate — remote data access for the SkillSmart client
//!
//! Everything between the wire and the view model: the data-source contract,
//! its REST implementation, typed records, and the pure transformations that
//! turn heterogeneous payloads into chart series and filtered lists.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`source`] | `AuthApi`, `ResourceApi`, `DashboardApi` traits and the `UnauthorizedHook` callback |
//! | [`http`] | `HttpDataSource`: the traits over `reqwest`, bearer token from the session vault |
//! | [`models`] | `UserProfile`, `Role`, `Employee`, `Skill`, `ChartDatum` and request bodies |
//! | [`normalize`] | Envelope unwrapping and the chart-shape classifier |
//! | [`views`] | Group-and-sum / by-name chart assemblers, list filters, dashboard counts |
//! | [`error`] | `ApiError` and its user-facing message fallback |
//! | [`config`] | `skillsmart.toml` loading with `SKILLSMART_API_URL` override |
//!
//! Nothing in this crate holds UI state; the session store and the fetch
//! primitive live in the `ui` crate and drive these types.

pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod normalize;
pub mod source;
pub mod views;

pub use config::{load_config, ConfigError};
pub use error::{ApiError, GENERIC_ERROR};
pub use http::HttpDataSource;
pub use models::{ChartDatum, Credentials, RecordId, RegisterRequest, Role, UserProfile};
pub use normalize::{to_chart_data, unwrap_envelope, ChartPayload, ChartShape};
pub use source::{AuthApi, DashboardApi, ResourceApi, UnauthorizedHook};

pub use store::SkillSmartConfig;
