//! Cache key definitions.
//!
//! Defines `Tag` for invalidation labels and `QueryKey` for cached queries.

use std::fmt;

/// Resource family a tag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagType {
    Posts,
}

impl TagType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Posts => "Posts",
        }
    }
}

/// Which member of a family a tag names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagId {
    /// A single resource by server id.
    Id(String),
    /// Sentinel covering the collection as a whole.
    List,
}

/// Invalidation label attached to a cached result.
///
/// A query whose provided tags intersect a mutation's invalidated tags is stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    pub kind: TagType,
    pub id: TagId,
}

impl Tag {
    pub fn post(id: impl Into<String>) -> Self {
        Self {
            kind: TagType::Posts,
            id: TagId::Id(id.into()),
        }
    }

    pub fn post_list() -> Self {
        Self {
            kind: TagType::Posts,
            id: TagId::List,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            TagId::Id(id) => write!(f, "{}:{id}", self.kind.as_str()),
            TagId::List => write!(f, "{}:LIST", self.kind.as_str()),
        }
    }
}

/// Identifies one cached query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryKey {
    /// `GET /posts`
    ListPosts,
    /// `GET /posts/{id}`
    Post(String),
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListPosts => f.write_str("listPosts"),
            Self::Post(id) => write!(f, "getPost({id})"),
        }
    }
}
