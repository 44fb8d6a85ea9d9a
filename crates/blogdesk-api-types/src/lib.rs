//! Wire types shared by the blogdesk client and anything that speaks its posts API.
//!
//! Field names follow the server's camelCase JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A stored blog post as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub description: String,
    pub featured_image: String,
    pub publish_date: String,
    pub published: bool,
}

/// Editable content of a post. Every field is always present; a fresh draft
/// holds empty strings and `published = false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostDraft {
    pub title: String,
    pub description: String,
    pub featured_image: String,
    pub publish_date: String,
    pub published: bool,
}

impl PostDraft {
    /// Attach a server id, producing the full body expected by `PUT /posts/{id}`.
    pub fn with_id(self, id: impl Into<String>) -> Post {
        Post {
            id: id.into(),
            title: self.title,
            description: self.description,
            featured_image: self.featured_image,
            publish_date: self.publish_date,
            published: self.published,
        }
    }
}

impl From<Post> for PostDraft {
    fn from(post: Post) -> Self {
        Self {
            title: post.title,
            description: post.description,
            featured_image: post.featured_image,
            publish_date: post.publish_date,
            published: post.published,
        }
    }
}

/// Body returned by `DELETE /posts/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// Field-to-message map carried under `error` in a 422 response.
pub type FieldErrors = BTreeMap<String, FieldMessage>;

/// One entry of a validation payload: a message, a nested map, a list of
/// entries, or any other JSON value the server chose to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldMessage {
    Text(String),
    Nested(FieldErrors),
    List(Vec<FieldMessage>),
    Other(serde_json::Value),
}

impl FieldMessage {
    /// First human-readable message, descending into nested maps and lists.
    ///
    /// Numbers, booleans and nulls carry no text.
    pub fn first_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Nested(map) => map.values().find_map(Self::first_text),
            Self::List(items) => items.iter().find_map(Self::first_text),
            Self::Other(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_uses_camel_case_fields() {
        let post: Post = serde_json::from_str(
            r#"{"id":"1","title":"T","description":"D","featuredImage":"https://img/x.png","publishDate":"2024-05-01T10:00","published":true}"#,
        )
        .expect("post json");
        assert_eq!(post.featured_image, "https://img/x.png");
        assert_eq!(post.publish_date, "2024-05-01T10:00");

        let value = serde_json::to_value(PostDraft::from(post)).expect("draft json");
        assert!(value.get("featuredImage").is_some());
        assert!(value.get("id").is_none());
    }

    #[test]
    fn draft_defaults_fill_missing_fields() {
        let draft: PostDraft = serde_json::from_str(r#"{"title":"only"}"#).expect("draft json");
        assert_eq!(draft.title, "only");
        assert_eq!(draft.description, "");
        assert!(!draft.published);
    }

    #[test]
    fn with_id_keeps_content() {
        let draft = PostDraft {
            title: "T".into(),
            published: true,
            ..Default::default()
        };
        let post = draft.with_id("5");
        assert_eq!(post.id, "5");
        assert_eq!(post.title, "T");
        assert!(post.published);
    }

    #[test]
    fn field_messages_parse_mixed_shapes() {
        let errors: FieldErrors = serde_json::from_str(
            r#"{"title":"Title is required","meta":{"slug":"taken"},"links":[{"url":"bad url"}]}"#,
        )
        .expect("errors json");

        assert_eq!(errors["title"].first_text(), Some("Title is required"));
        assert_eq!(errors["meta"].first_text(), Some("taken"));
        assert_eq!(errors["links"].first_text(), Some("bad url"));
    }

    #[test]
    fn unexpected_entries_do_not_hide_other_fields() {
        let errors: FieldErrors = serde_json::from_str(
            r#"{"title":"Title is required","publishDate":["must be a date"],"code":42,"extra":null}"#,
        )
        .expect("errors json");

        assert_eq!(errors["title"].first_text(), Some("Title is required"));
        assert_eq!(errors["publishDate"].first_text(), Some("must be a date"));
        assert_eq!(errors["code"], FieldMessage::Other(serde_json::json!(42)));
        assert_eq!(errors["code"].first_text(), None);
        assert_eq!(errors["extra"].first_text(), None);
    }

    #[test]
    fn empty_list_has_no_text() {
        assert_eq!(FieldMessage::List(Vec::new()).first_text(), None);
    }
}
