mod harness;

use harness::config::ConfigBuilder;
use harness::mock_openai::MockOpenAi;
use harness::server::TestServer;
use serde_json::Value;

#[tokio::test]
async fn chat_returns_the_upstream_reply() {
    let mock = MockOpenAi::start_with_reply("Nice weather today").await.unwrap();
    let config = ConfigBuilder::new().with_openai(&mock.base_url()).build();

    let server = TestServer::start(config).await.unwrap();

    let resp = server
        .client()
        .get(server.url("/chat_with_openai?prompt=hello"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["reply"], "Nice weather today");
    assert_eq!(mock.chat_count(), 1);
}

#[tokio::test]
async fn chat_without_prompt_is_rejected() {
    let mock = MockOpenAi::start().await.unwrap();
    let config = ConfigBuilder::new().with_openai(&mock.base_url()).build();

    let server = TestServer::start(config).await.unwrap();

    let resp = server.client().get(server.url("/chat_with_openai")).send().await.unwrap();

    assert_eq!(resp.status(), 400);

    // This endpoint reports failures under an "error" key
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Prompt is missing.");
    assert_eq!(mock.chat_count(), 0);
}

#[tokio::test]
async fn chat_surfaces_upstream_auth_failures() {
    let mock = MockOpenAi::start_failing(401).await.unwrap();
    let config = ConfigBuilder::new().with_openai(&mock.base_url()).build();

    let server = TestServer::start(config).await.unwrap();

    let resp = server
        .client()
        .get(server.url("/chat_with_openai?prompt=hello"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);

    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn chat_routes_absent_without_credentials() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let resp = server
        .client()
        .get(server.url("/chat_with_openai?prompt=hello"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
}
