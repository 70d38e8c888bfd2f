//! Platform wiring: durable storage, the REST data source and the session
//! store, built once per app.
//!
//! - **Web** (WASM + `web` feature): `window.localStorage` via [`store::LocalStorageStore`]
//! - **Desktop / Mobile** (native): one file per key via [`store::FileStore`]

use std::sync::Arc;

use api::{ApiError, HttpDataSource, SkillSmartConfig};
use store::SessionVault;

use crate::session::{SessionCell, SessionStore};

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type PlatformStore = store::LocalStorageStore;
#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
pub type PlatformStore = store::FileStore;

pub type AppApi = HttpDataSource<PlatformStore>;
pub type AppSession = SessionStore<PlatformStore, AppApi>;

/// Create the platform-appropriate durable store.
///
/// Native builds keep the session under `<data_dir>/skillsmart/`.
pub fn platform_store() -> PlatformStore {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        store::LocalStorageStore::new()
    }
    #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
    {
        let base = dirs::data_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("skillsmart");
        store::FileStore::new(base)
    }
}

/// Everything a screen needs to talk to the backend.
#[derive(Clone)]
pub struct Services {
    pub api: Arc<AppApi>,
    pub session: AppSession,
}

impl Services {
    /// Wire the data source and session store over one durable store.
    ///
    /// The session cell is installed as the data source's 401 hook, so an
    /// expired token signs the user out wherever the request came from.
    pub fn connect(config: &SkillSmartConfig) -> Result<Self, ApiError> {
        let storage = platform_store();
        let cell = SessionCell::new();
        let api = Arc::new(
            HttpDataSource::new(config, storage.clone())?
                .with_unauthorized_hook(Arc::new(cell.clone())),
        );
        let vault = SessionVault::with_keys(storage, &config.storage);
        let session = SessionStore::with_cell(cell, vault, api.clone());
        Ok(Self { api, session })
    }
}
