//! Domain entities - the core business objects.

mod category;
mod post;
mod study;
mod user;

pub use category::Category;
pub use post::{Post, PostStatus};
pub use study::Study;
pub use user::User;
