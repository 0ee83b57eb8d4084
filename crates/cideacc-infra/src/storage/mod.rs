//! Object storage adapters.

mod memory;

#[cfg(feature = "http-storage")]
mod http;

pub use memory::InMemoryAssetStore;

#[cfg(feature = "http-storage")]
pub use http::{HttpAssetStore, HttpStorageConfig};
