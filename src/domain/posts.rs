use std::fmt;
use std::str::FromStr;

use time::{
    OffsetDateTime, PrimitiveDateTime, format_description::FormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

use super::error::DomainError;

/// What an HTML `datetime-local` input produces.
pub const LOCAL_MINUTE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
pub const LOCAL_SECOND_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Editable post fields, named as the server names them in validation payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PostField {
    Title,
    Description,
    FeaturedImage,
    PublishDate,
    Published,
}

impl PostField {
    pub const ALL: [PostField; 5] = [
        PostField::Title,
        PostField::Description,
        PostField::FeaturedImage,
        PostField::PublishDate,
        PostField::Published,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::FeaturedImage => "featuredImage",
            Self::PublishDate => "publishDate",
            Self::Published => "published",
        }
    }
}

impl fmt::Display for PostField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| DomainError::validation("field", format!("unknown post field `{s}`")))
    }
}

/// Check a publish date typed by a user and return it trimmed.
///
/// Accepts RFC 3339 and the `YYYY-MM-DDTHH:MM[:SS]` form of a datetime input.
/// An empty value passes through; the server decides whether it is required.
pub fn normalize_publish_date(input: &str) -> Result<String, DomainError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }

    let parses = OffsetDateTime::parse(trimmed, &Rfc3339).is_ok()
        || PrimitiveDateTime::parse(trimmed, LOCAL_MINUTE_FORMAT).is_ok()
        || PrimitiveDateTime::parse(trimmed, LOCAL_SECOND_FORMAT).is_ok();

    if parses {
        Ok(trimmed.to_string())
    } else {
        Err(DomainError::validation(
            PostField::PublishDate.as_str(),
            format!("`{trimmed}` is not an ISO datetime"),
        ))
    }
}
