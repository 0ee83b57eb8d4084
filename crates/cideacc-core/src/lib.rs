//! # CIDEACC Core
//!
//! The domain layer of the CIDEACC content backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! the post/study entities, the slug generator, the publish orchestrator, and
//! the port traits that infrastructure must implement.

pub mod domain;
pub mod error;
pub mod ports;
pub mod publish;
pub mod slug;

pub use error::PublishError;
pub use publish::Publisher;
