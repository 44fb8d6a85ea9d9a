#![deny(clippy::all, clippy::pedantic)]

use blogdesk::application::error::AppError;
use blogdesk::application::{BlogApi, EditTarget, PostForm, PostListView};
use blogdesk::cache::QueryKey;
use blogdesk::config::{CreatePostArgs, EditPostArgs, PostsCmd};
use serde_json::json;
use tracing::debug;

use super::io::{publish_date, publish_date_opt};
use super::print::{print_field_errors, print_json};

pub async fn handle(api: &BlogApi, cmd: PostsCmd) -> Result<(), AppError> {
    match cmd {
        PostsCmd::List => list(api).await,
        PostsCmd::Get { id } => get(api, &id).await,
        PostsCmd::Create(args) => create(api, args).await,
        PostsCmd::Edit(args) => edit(api, args).await,
        PostsCmd::Delete { id } => delete(api, &id).await,
    }
}

async fn list(api: &BlogApi) -> Result<(), AppError> {
    let view = PostListView::new(api);
    let posts = view.load().await?;
    debug!(
        count = posts.len(),
        tags = ?api.tags_for(&QueryKey::ListPosts).iter().map(ToString::to_string).collect::<Vec<_>>(),
        "posts listed"
    );
    print_json(&posts)
}

async fn get(api: &BlogApi, id: &str) -> Result<(), AppError> {
    let post = api.get_post(id).await?;
    print_json(&post)
}

async fn create(api: &BlogApi, args: CreatePostArgs) -> Result<(), AppError> {
    let target = EditTarget::default();
    let mut form = PostForm::new(api, target.get());
    form.set_title(args.title);
    form.set_description(args.description);
    form.set_featured_image(args.featured_image);
    form.set_publish_date(publish_date(&args.publish_date)?);
    form.set_published(args.published);

    submit(api, &mut form).await
}

async fn edit(api: &BlogApi, args: EditPostArgs) -> Result<(), AppError> {
    let publish_date = publish_date_opt(args.publish_date)?;

    let mut target = EditTarget::default();
    target.start_edit(args.id);
    let mut form = PostForm::new(api, target.get());
    form.load(api).await?;

    if let Some(title) = args.title {
        form.set_title(title);
    }
    if let Some(description) = args.description {
        form.set_description(description);
    }
    if let Some(featured_image) = args.featured_image {
        form.set_featured_image(featured_image);
    }
    if let Some(publish_date) = publish_date {
        form.set_publish_date(publish_date);
    }
    if let Some(published) = args.published {
        form.set_published(published);
    }

    submit(api, &mut form).await
}

async fn submit(api: &BlogApi, form: &mut PostForm) -> Result<(), AppError> {
    match form.submit(api).await {
        Ok(post) => print_json(&post),
        Err(error) => {
            print_field_errors(form);
            Err(error.into())
        }
    }
}

async fn delete(api: &BlogApi, id: &str) -> Result<(), AppError> {
    let view = PostListView::new(api);
    view.delete(id).await?;
    print_json(&json!({ "deleted": id }))
}
