#![deny(clippy::all, clippy::pedantic)]

mod support;

use blogdesk::application::{EditTarget, FormMode, PostForm, PostListView};
use blogdesk::domain::posts::PostField;
use httpmock::MockServer;
use serde_json::json;

use support::{api, post_json};

#[tokio::test]
async fn empty_title_shows_inline_message() {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method("POST")
            .path("/posts")
            .json_body_includes(r#"{"title":""}"#);
        then.status(422)
            .json_body(json!({"error": {"title": "Title is required"}}));
    });

    let api = api(&server);
    let mut form = PostForm::new(&api, None);
    assert_eq!(form.mode(), FormMode::Create);
    form.set_description("body");

    let err = form.submit(&api).await.expect_err("rejected");

    create.assert();
    assert!(err.is_entity_error());
    assert_eq!(form.field_error(PostField::Title), Some("Title is required"));
    assert_eq!(form.field_error(PostField::Description), None);
    assert!(form.submit_error().is_none());
    assert_eq!(form.draft().description, "body");
}

#[tokio::test]
async fn edit_loads_target_and_puts_to_the_same_id() {
    let server = MockServer::start();
    let get = server.mock(|when, then| {
        when.method("GET").path("/posts/5");
        then.status(200).json_body(post_json("5", "Old"));
    });
    let put = server.mock(|when, then| {
        when.method("PUT")
            .path("/posts/5")
            .json_body_includes(r#"{"id":"5","title":"New","description":"about Old","published":true}"#);
        then.status(200).json_body(json!({
            "id": "5",
            "title": "New",
            "description": "about Old",
            "featuredImage": "https://img.example/5.png",
            "publishDate": "2024-05-01T10:00",
            "published": true
        }));
    });

    let api = api(&server);
    let mut target = EditTarget::default();
    target.start_edit("5");
    let mut form = PostForm::new(&api, target.get());
    assert_eq!(form.mode(), FormMode::Edit { id: "5".into() });
    assert!(!form.is_loaded());

    form.load(&api).await.expect("load");
    assert!(form.is_loaded());
    assert_eq!(form.draft().title, "Old");
    assert_eq!(form.draft().featured_image, "https://img.example/5.png");

    form.set_title("New");
    form.set_published(true);
    let saved = form.submit(&api).await.expect("update");

    get.assert_calls(2);
    put.assert();
    assert_eq!(saved.title, "New");
    assert_eq!(form.draft().title, "");
    assert!(!form.draft().published);
    assert_eq!(form.mode(), FormMode::Edit { id: "5".into() });
    assert!(form.active_error().is_none());
}

#[tokio::test]
async fn create_form_never_fetches_a_post() {
    let server = MockServer::start();
    let any_get = server.mock(|when, then| {
        when.method("GET");
        then.status(200).json_body(post_json("1", "A"));
    });

    let api = api(&server);
    let mut form = PostForm::new(&api, None);
    form.load(&api).await.expect("nothing to load");

    assert!(form.is_loaded());
    assert_eq!(form.draft().title, "");
    any_get.assert_calls(0);
}

#[tokio::test]
async fn reset_discards_edits_and_reloads_from_cache() {
    let server = MockServer::start();
    let get = server.mock(|when, then| {
        when.method("GET").path("/posts/5");
        then.status(200).json_body(post_json("5", "Old"));
    });

    let api = api(&server);
    let mut form = PostForm::new(&api, Some("5".to_string()));
    form.load(&api).await.expect("load");
    form.set_title("Half typed");

    form.reset();
    assert_eq!(form.draft().title, "");
    assert!(!form.is_loaded());

    form.load(&api).await.expect("reload");
    assert_eq!(form.draft().title, "Old");
    get.assert_calls(1);
}

#[tokio::test]
async fn mixed_validation_payload_keeps_inline_messages() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("POST").path("/posts");
        then.status(422).json_body(json!({
            "error": {
                "title": "Title is required",
                "publishDate": ["must be a date"],
                "code": 42
            }
        }));
    });

    let api = api(&server);
    let mut form = PostForm::new(&api, None);
    let err = form.submit(&api).await.expect_err("rejected");

    assert!(err.is_entity_error());
    assert_eq!(form.field_error(PostField::Title), Some("Title is required"));
    assert_eq!(form.field_error(PostField::PublishDate), Some("must be a date"));
    assert_eq!(form.errors().map(|errors| errors.len()), Some(3));
    assert!(form.submit_error().is_none());
}

#[tokio::test]
async fn update_refetches_the_edited_post() {
    let server = MockServer::start();
    let get = server.mock(|when, then| {
        when.method("GET").path("/posts/5");
        then.status(200).json_body(post_json("5", "Old"));
    });
    server.mock(|when, then| {
        when.method("PUT").path("/posts/5");
        then.status(200).json_body(post_json("5", "Old"));
    });

    let api = api(&server);
    let mut form = PostForm::new(&api, Some("5".to_string()));
    form.load(&api).await.expect("load");
    form.submit(&api).await.expect("update");

    get.assert_calls(2);
}

#[tokio::test]
async fn create_resets_draft_and_refreshes_list() {
    let server = MockServer::start();
    let list = server.mock(|when, then| {
        when.method("GET").path("/posts");
        then.status(200).json_body(json!([]));
    });
    server.mock(|when, then| {
        when.method("POST").path("/posts");
        then.status(201).json_body(post_json("8", "Hello"));
    });

    let api = api(&server);
    let view = PostListView::new(&api);
    view.load().await.expect("list");

    let mut form = PostForm::new(&api, None);
    form.set_title("Hello");
    form.set_featured_image("https://img.example/8.png");
    let created = form.submit(&api).await.expect("create");

    assert_eq!(created.id, "8");
    assert_eq!(form.draft().title, "");
    assert_eq!(form.draft().featured_image, "");
    list.assert_calls(2);
}

#[tokio::test]
async fn server_failure_is_a_submit_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("POST").path("/posts");
        then.status(500).body("database offline");
    });

    let api = api(&server);
    let mut form = PostForm::new(&api, None);
    form.set_title("T");
    form.submit(&api).await.expect_err("fails");

    assert!(form.errors().is_none());
    assert_eq!(form.field_error(PostField::Title), None);
    let err = form.submit_error().expect("surfaced");
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn failed_load_is_surfaced() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/posts/missing");
        then.status(404).json_body(json!({"message": "not found"}));
    });

    let api = api(&server);
    let mut form = PostForm::new(&api, Some("missing".to_string()));
    form.load(&api).await.expect_err("missing");

    assert!(!form.is_loaded());
    assert_eq!(form.submit_error().and_then(|err| err.status()), Some(404));
}

#[tokio::test]
async fn clearing_edit_target_returns_to_empty_create_form() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/posts/5");
        then.status(200).json_body(post_json("5", "Old"));
    });

    let api = api(&server);
    let mut target = EditTarget::default();
    let view = PostListView::new(&api);
    view.start_edit(&mut target, "5");

    let mut form = PostForm::new(&api, target.get());
    form.load(&api).await.expect("load");
    assert_eq!(form.draft().title, "Old");

    target.cancel_edit();
    form.set_edit_target(&api, target.get());

    assert_eq!(form.mode(), FormMode::Create);
    assert_eq!(form.draft().title, "");
    assert!(form.is_loaded());
}
