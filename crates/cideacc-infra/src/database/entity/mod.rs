//! SeaORM entities mirroring the persisted record layout.

pub mod category;
pub mod post;
pub mod study;
pub mod user;
