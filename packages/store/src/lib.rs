pub mod config;
pub mod kv;
pub mod vault;

mod file_store;
mod memory;
pub use file_store::FileStore;
pub use memory::MemoryStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local::LocalStorageStore;

pub use config::{ApiConfig, SkillSmartConfig, StorageConfig};
pub use kv::{KeyValueStore, StoreError};
pub use vault::{SessionVault, VaultError, VaultRead};
