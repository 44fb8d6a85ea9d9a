//! Post form state machine.
//!
//! The form is in create mode when no edit target is supplied and in edit mode
//! otherwise. It owns the draft being typed, remembers the last error of each
//! mutation, and exposes per-field validation messages for the active mode.

use blogdesk_api_types::{FieldErrors, Post, PostDraft};
use tracing::debug;

use crate::api::ApiError;
use crate::cache::{QueryKey, Subscription};
use crate::domain::posts::PostField;

use super::blog::BlogApi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

#[derive(Debug)]
pub struct PostForm {
    draft: PostDraft,
    edit_target: Option<String>,
    loaded: bool,
    add_error: Option<ApiError>,
    update_error: Option<ApiError>,
    load_error: Option<ApiError>,
    subscription: Option<Subscription>,
}

impl PostForm {
    pub fn new(api: &BlogApi, edit_target: Option<String>) -> Self {
        let mut form = Self {
            draft: PostDraft::default(),
            edit_target: None,
            loaded: false,
            add_error: None,
            update_error: None,
            load_error: None,
            subscription: None,
        };
        form.set_edit_target(api, edit_target);
        form
    }

    pub fn mode(&self) -> FormMode {
        match &self.edit_target {
            Some(id) => FormMode::Edit { id: id.clone() },
            None => FormMode::Create,
        }
    }

    /// Follow a change of the externally held edit target.
    ///
    /// A new target needs a fresh [`load`](Self::load); clearing it returns to
    /// an empty create form.
    pub fn set_edit_target(&mut self, api: &BlogApi, target: Option<String>) {
        if self.edit_target == target {
            return;
        }
        self.subscription = target
            .as_ref()
            .map(|id| api.subscribe(QueryKey::Post(id.clone())));
        if target.is_none() {
            self.draft = PostDraft::default();
        }
        self.edit_target = target;
        self.loaded = false;
        self.load_error = None;
    }

    /// Copy the edit target into the draft. Does nothing in create mode or
    /// when the target is already loaded.
    pub async fn load(&mut self, api: &BlogApi) -> Result<(), ApiError> {
        let Some(id) = self.edit_target.clone() else {
            return Ok(());
        };
        if self.loaded {
            return Ok(());
        }

        match api.get_post(&id).await {
            Ok(post) => {
                debug!(post_id = %id, "loaded post into form");
                self.draft = post.into();
                self.loaded = true;
                self.load_error = None;
                Ok(())
            }
            Err(error) => {
                self.load_error = Some(error.clone());
                Err(error)
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.edit_target.is_none() || self.loaded
    }

    pub fn draft(&self) -> &PostDraft {
        &self.draft
    }

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.draft.title = value.into();
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.draft.description = value.into();
    }

    pub fn set_featured_image(&mut self, value: impl Into<String>) {
        self.draft.featured_image = value.into();
    }

    pub fn set_publish_date(&mut self, value: impl Into<String>) {
        self.draft.publish_date = value.into();
    }

    pub fn set_published(&mut self, value: bool) {
        self.draft.published = value;
    }

    /// Discard local edits. Edit mode reloads from the server on the next `load`.
    pub fn reset(&mut self) {
        self.draft = PostDraft::default();
        self.loaded = false;
    }

    /// Create or update depending on the mode. The draft is reset on success
    /// in both modes; a failed submit keeps it for correction.
    pub async fn submit(&mut self, api: &BlogApi) -> Result<Post, ApiError> {
        let post = match self.edit_target.clone() {
            None => {
                let result = api.add_post(&self.draft).await;
                self.add_error = result.as_ref().err().cloned();
                result?
            }
            Some(id) => {
                let body = self.draft.clone().with_id(id.as_str());
                let result = api.update_post(&id, &body).await;
                self.update_error = result.as_ref().err().cloned();
                result?
            }
        };
        self.reset();
        Ok(post)
    }

    /// Last error of the operation that matches the current mode.
    pub fn active_error(&self) -> Option<&ApiError> {
        match self.edit_target {
            Some(_) => self.update_error.as_ref(),
            None => self.add_error.as_ref(),
        }
    }

    /// Field messages when the active error is a validation error.
    pub fn errors(&self) -> Option<&FieldErrors> {
        self.active_error().and_then(ApiError::field_errors)
    }

    pub fn field_error(&self, field: PostField) -> Option<&str> {
        self.errors()?.get(field.as_str())?.first_text()
    }

    /// The active error when it is not a validation error, plus a failed load.
    pub fn submit_error(&self) -> Option<&ApiError> {
        self.active_error()
            .filter(|error| !error.is_entity_error())
            .or(self.load_error.as_ref())
    }
}
