use anyhow::Result;
use mockito::Matcher;

use super::Solendir;
use crate::domain::models::Assistant;
use crate::domain::models::AssistantError;

impl Solendir {
    fn with_url(url: String) -> Solendir {
        return Solendir {
            url,
            timeout: "200".to_string(),
        };
    }
}

#[tokio::test]
async fn it_successfully_health_checks() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_body(r#"{"message": "Solendir backend is running!"}"#)
        .create_async()
        .await;

    let assistant = Solendir::with_url(server.url());
    let res = assistant.health_check().await;

    assert!(res.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn it_fails_health_checks() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .with_status(500)
        .create_async()
        .await;

    let assistant = Solendir::with_url(server.url());
    let res = assistant.health_check().await;

    assert!(res.is_err());
    mock.assert_async().await;
}

#[tokio::test]
async fn it_asks() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat")
        .match_body(Matcher::Json(serde_json::json!({ "message": "Hello" })))
        .with_status(200)
        .with_body(r#"{"response": "Hi! How can I help?"}"#)
        .create_async()
        .await;

    let assistant = Solendir::with_url(server.url());
    let res = assistant.ask("Hello").await?;

    assert_eq!(res, "Hi! How can I help?");
    mock.assert_async().await;

    return Ok(());
}

#[tokio::test]
async fn it_returns_empty_reply_without_response_field() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat")
        .with_status(200)
        .with_body(r#"{"detail": "something else"}"#)
        .create_async()
        .await;

    let assistant = Solendir::with_url(server.url());
    let res = assistant.ask("Hello").await?;

    assert_eq!(res, "");
    mock.assert_async().await;

    return Ok(());
}

#[tokio::test]
async fn it_fails_on_error_status() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat")
        .with_status(500)
        .with_body(r#"{"response": "ignored"}"#)
        .create_async()
        .await;

    let assistant = Solendir::with_url(server.url());
    let err = assistant.ask("Hello").await.unwrap_err();

    assert_eq!(
        err,
        AssistantError::Communication("backend responded with status 500".to_string())
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn it_fails_on_malformed_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let assistant = Solendir::with_url(server.url());
    let res = assistant.ask("Hello").await;

    assert!(matches!(res, Err(AssistantError::Communication(_))));
    mock.assert_async().await;
}

#[tokio::test]
async fn it_fails_when_backend_is_down() {
    let assistant = Solendir::with_url("http://127.0.0.1:9".to_string());
    let res = assistant.ask("Hello").await;

    assert!(matches!(res, Err(AssistantError::Communication(_))));
}

#[tokio::test]
async fn it_configures_notion() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/notion/token")
        .match_body(Matcher::Json(serde_json::json!({ "token": "tok123" })))
        .with_status(200)
        .with_body(r#"{"status": "ok"}"#)
        .create_async()
        .await;

    let assistant = Solendir::with_url(server.url());
    assistant.configure_notion("tok123").await?;

    mock.assert_async().await;
    return Ok(());
}
