//! blogdesk query cache
//!
//! Client-side cache for posts API queries with tag-based invalidation:
//!
//! - **Keys**: every cached query is a [`QueryKey`]; every result provides a set of [`Tag`]s
//! - **Registry**: tag → queries table consulted when a mutation succeeds
//! - **Store**: latest settled result per query, single posts bounded by an LRU
//! - **Subscriptions**: queries a view is currently showing, re-run on invalidation
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! post_limit = 100
//! ```

mod keys;
mod lock;
mod registry;
mod store;
mod subscriptions;

pub use keys::{QueryKey, Tag, TagId, TagType};
pub use registry::TagRegistry;
pub use store::{QueryData, QueryEntry, QueryStore};
pub use subscriptions::{Subscription, SubscriptionTable};
