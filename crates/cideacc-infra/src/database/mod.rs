//! Database adapters: PostgreSQL repositories plus an in-memory fallback.

pub mod memory;

#[cfg(feature = "postgres")]
mod connections;

#[cfg(feature = "postgres")]
pub mod entity;

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use connections::{DatabaseConfig, connect};

#[cfg(feature = "postgres")]
pub use postgres::{
    PostgresCategoryRepository, PostgresPostRepository, PostgresStudyRepository,
    PostgresUserRepository,
};

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
