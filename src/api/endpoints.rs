//! Tag rules for the posts endpoints.
//!
//! Queries declare the tags their results provide; mutations declare the tags
//! they invalidate once the server has accepted them.

use blogdesk_api_types::Post;

use crate::cache::{QueryData, QueryKey, Tag};

use super::error::ApiError;

/// `GET /posts`: one tag per post plus the `LIST` sentinel.
///
/// A failed fetch still provides `LIST`, so the next invalidation of the
/// collection retries it.
pub fn list_posts_tags(result: Result<&[Post], &ApiError>) -> Vec<Tag> {
    match result {
        Ok(posts) => posts
            .iter()
            .map(|post| Tag::post(post.id.as_str()))
            .chain(std::iter::once(Tag::post_list()))
            .collect(),
        Err(_) => vec![Tag::post_list()],
    }
}

/// `GET /posts/{id}`: the post's own tag when it loaded.
pub fn get_post_tags(id: &str, result: Result<&Post, &ApiError>) -> Vec<Tag> {
    match result {
        Ok(_) => vec![Tag::post(id)],
        Err(_) => Vec::new(),
    }
}

/// `POST /posts`: the new post only shows up through a list refetch.
pub fn add_post_invalidates() -> Vec<Tag> {
    vec![Tag::post_list()]
}

/// `PUT /posts/{id}`
pub fn update_post_invalidates(id: &str) -> Vec<Tag> {
    vec![Tag::post(id)]
}

/// `DELETE /posts/{id}`
pub fn delete_post_invalidates(id: &str) -> Vec<Tag> {
    vec![Tag::post(id)]
}

/// Tags provided by a settled query result.
pub fn provided_tags(key: &QueryKey, result: &Result<QueryData, ApiError>) -> Vec<Tag> {
    match key {
        QueryKey::ListPosts => match result {
            Ok(data) => list_posts_tags(Ok(data.as_posts().unwrap_or_default())),
            Err(err) => list_posts_tags(Err(err)),
        },
        QueryKey::Post(id) => match result {
            Ok(data) => data
                .as_post()
                .map(|post| get_post_tags(id, Ok(post)))
                .unwrap_or_default(),
            Err(err) => get_post_tags(id, Err(err)),
        },
    }
}
