//! Post list view model and the edit-target holder it writes to.

use blogdesk_api_types::Post;

use crate::api::ApiError;
use crate::cache::{QueryKey, Subscription};

use super::blog::{BlogApi, QueryState};

/// Which post, if any, the form is editing.
///
/// Owned by whoever composes the list and the form; the form receives the id
/// as a parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditTarget {
    id: Option<String>,
}

impl EditTarget {
    pub fn start_edit(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn cancel_edit(&mut self) {
        self.id = None;
    }

    pub fn current(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn get(&self) -> Option<String> {
        self.id.clone()
    }
}

/// Live view over `GET /posts`.
///
/// Holding the view keeps the list subscribed, so any mutation that touches a
/// listed post or the collection refetches it before returning.
#[derive(Debug)]
pub struct PostListView {
    api: BlogApi,
    _subscription: Subscription,
}

impl PostListView {
    pub fn new(api: &BlogApi) -> Self {
        Self {
            api: api.clone(),
            _subscription: api.subscribe(QueryKey::ListPosts),
        }
    }

    /// Read the list, hitting the network only when the cache cannot serve it.
    pub async fn load(&self) -> Result<Vec<Post>, ApiError> {
        self.api.list_posts().await
    }

    pub fn state(&self) -> QueryState {
        self.api.query_state(&QueryKey::ListPosts)
    }

    /// Posts to render; `None` while skeletons should show instead.
    pub fn posts(&self) -> Option<Vec<Post>> {
        let state = self.state();
        if state.is_fetching {
            return None;
        }
        state
            .data
            .and_then(|data| data.as_posts().map(<[Post]>::to_vec))
    }

    pub fn start_edit(&self, target: &mut EditTarget, id: &str) {
        target.start_edit(id);
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete_post(id).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_target_starts_and_cancels() {
        let mut target = EditTarget::default();
        assert_eq!(target.current(), None);

        target.start_edit("5");
        assert_eq!(target.current(), Some("5"));
        assert_eq!(target.get(), Some("5".to_string()));

        target.cancel_edit();
        assert_eq!(target.current(), None);
    }
}
