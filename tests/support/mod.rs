#![allow(dead_code)]

use blogdesk::api::PostsClient;
use blogdesk::application::BlogApi;
use blogdesk::config::CacheSettings;
use httpmock::MockServer;
use serde_json::{Value, json};
use url::Url;

pub fn api(server: &MockServer) -> BlogApi {
    api_with_cache(server, &CacheSettings::default())
}

pub fn api_with_cache(server: &MockServer, cache: &CacheSettings) -> BlogApi {
    let base = Url::parse(&server.base_url()).expect("mock server url");
    BlogApi::new(PostsClient::with_client(reqwest::Client::new(), base), cache)
}

pub fn post_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("about {title}"),
        "featuredImage": format!("https://img.example/{id}.png"),
        "publishDate": "2024-05-01T10:00",
        "published": false
    })
}
