mod harness;

use std::sync::Arc;

use harness::config::ConfigBuilder;
use harness::server::TestServer;
use popvote_storage::{MemoryStore, ObjectStore};
use serde_json::Value;

#[tokio::test]
async fn serves_vote_target_images() {
    let store = Arc::new(MemoryStore::new());
    store
        .put("votes/images/cat.png", b"cat bytes".to_vec(), "image/png")
        .await
        .unwrap();

    let server = TestServer::start_with_store(ConfigBuilder::new().build(), store)
        .await
        .unwrap();

    let resp = server
        .client()
        .get(server.url("/get_image?image_name=cat.png"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "image/png");
    assert_eq!(resp.bytes().await.unwrap().as_ref(), b"cat bytes");
}

#[tokio::test]
async fn falls_back_to_the_generic_image_store() {
    let store = Arc::new(MemoryStore::new());
    store
        .put("images/banner.jpg", b"jpeg bytes".to_vec(), "image/jpeg")
        .await
        .unwrap();

    let server = TestServer::start_with_store(ConfigBuilder::new().build(), store)
        .await
        .unwrap();

    let resp = server
        .client()
        .get(server.url("/get_image?image_name=banner.jpg"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "image/jpeg");
    assert_eq!(resp.bytes().await.unwrap().as_ref(), b"jpeg bytes");
}

#[tokio::test]
async fn missing_name_parameter_is_rejected() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let resp = server.client().get(server.url("/get_image")).send().await.unwrap();

    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "\"image_name\" is missing");
}

#[tokio::test]
async fn unknown_image_is_not_found() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let resp = server
        .client()
        .get(server.url("/get_image?image_name=nope.png"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "image \"nope.png\" not found");
}
