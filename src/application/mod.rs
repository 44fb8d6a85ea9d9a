//! Application layer: cached posts API and the views built on it.

pub mod blog;
pub mod error;
pub mod form;
pub mod list;

pub use blog::{BlogApi, QueryState, QueryStatus};
pub use form::{FormMode, PostForm};
pub use list::{EditTarget, PostListView};
