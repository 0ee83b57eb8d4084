//! # CIDEACC Infrastructure
//!
//! Concrete implementations of the ports defined in `cideacc-core`.
//! This crate contains the database repositories, the object storage client
//! and the authentication services.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory adapters only
//! - `postgres` - PostgreSQL repositories via SeaORM
//! - `auth` - JWT + Argon2 authentication
//! - `http-storage` - Object storage over an S3-style HTTP endpoint

pub mod database;
pub mod storage;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::memory::{
    InMemoryCategoryRepository, InMemoryPostRepository, InMemoryStudyRepository,
    InMemoryUserRepository,
};
pub use storage::InMemoryAssetStore;

#[cfg(feature = "postgres")]
pub use database::{
    PostgresCategoryRepository, PostgresPostRepository, PostgresStudyRepository,
    PostgresUserRepository,
};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "http-storage")]
pub use storage::{HttpAssetStore, HttpStorageConfig};
