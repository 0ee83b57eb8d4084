//! # CIDEACC Shared
//!
//! Request/response types shared between the backend and any frontend that
//! compiles this crate (server or WASM).

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
