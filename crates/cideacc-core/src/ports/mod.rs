//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod repository;
mod storage;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use repository::{
    BaseRepository, CategoryRepository, PostRepository, StudyRepository, UserRepository,
};
pub use storage::{AssetStore, AssetUpload, ProgressFn, StorageError, namespaces, object_key};
