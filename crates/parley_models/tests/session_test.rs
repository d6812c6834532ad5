//! Session adapter tests against a mock backend.

mod test_utils;

use parley_core::{Mode, RawResponse, Role, Turn};
use parley_error::{GeminiErrorKind, RetryableError};
use parley_interface::Invoker;
use parley_models::{ConversationalInvoker, Session, StatelessInvoker};
use std::sync::Arc;
use test_utils::mock_backend::payload;
use test_utils::{MockBackend, MockResponse};

#[tokio::test]
async fn test_stateless_invoke_returns_reply() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new_success("Hello from mock!", 25));
    let invoker = StatelessInvoker::new(backend.clone());

    let reply = invoker.invoke("Say hello").await?;

    assert_eq!(reply.text(), "Hello from mock!");
    assert_eq!(*reply.total_tokens(), 25);
    assert_eq!(invoker.mode(), Mode::Text);
    assert_eq!(invoker.history_len(), None);
    assert_eq!(backend.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_stateless_never_sends_history() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new_success("ok", 5));
    let invoker = StatelessInvoker::new(backend.clone());

    invoker.invoke("one").await?;
    invoker.invoke("two").await?;

    assert_eq!(backend.history_lengths(), vec![0, 0]);
    Ok(())
}

#[tokio::test]
async fn test_conversational_replays_history() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new_sequence(vec![
        MockResponse::Success(payload("Hi, I'm Gemini.", 20)),
        MockResponse::Success(payload("You said hello.", 40)),
    ]));
    let invoker = ConversationalInvoker::new(backend.clone());

    invoker.invoke("Hello").await?;
    invoker.invoke("What did I say?").await?;

    assert_eq!(backend.history_lengths(), vec![0, 2]);
    assert_eq!(
        backend.last_history(),
        vec![Turn::user("Hello"), Turn::model("Hi, I'm Gemini.")]
    );
    assert_eq!(invoker.history().await.len(), 4);
    assert_eq!(invoker.history_len(), Some(4));
    Ok(())
}

#[tokio::test]
async fn test_failed_attempt_leaves_history_untouched() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new_sequence(vec![
        MockResponse::Error(GeminiErrorKind::HttpError {
            status_code: 503,
            message: "Model is overloaded".to_string(),
        }),
        MockResponse::Success(RawResponse::default()),
        MockResponse::Success(payload("Finally", 12)),
    ]));
    let invoker = ConversationalInvoker::new(backend.clone());

    let err = invoker.invoke("Hello").await.unwrap_err();
    assert!(err.is_retryable());
    let err = invoker.invoke("Hello").await.unwrap_err();
    assert!(err.is_retryable());
    assert!(invoker.history().await.is_empty());

    invoker.invoke("Hello").await?;
    let history = invoker.history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[1].text, "Finally");
    Ok(())
}

#[tokio::test]
async fn test_missing_usage_metadata_is_retryable() {
    let backend = MockBackend::new_with_behavior(test_utils::MockBehavior::Success(RawResponse {
        text: Some("text without usage".to_string()),
        total_token_count: None,
    }));
    let invoker = StatelessInvoker::new(backend);

    let err = invoker.invoke("Hello").await.unwrap_err();
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_unclassified_error_passes_through() {
    let backend = MockBackend::new_error(GeminiErrorKind::HttpError {
        status_code: 401,
        message: "API key not valid".to_string(),
    });
    let invoker = StatelessInvoker::new(backend);

    let err = invoker.invoke("Hello").await.unwrap_err();
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_session_follows_mode() -> anyhow::Result<()> {
    let chat = Session::new(Mode::Chat, MockBackend::new_success("ok", 5));
    assert!(matches!(chat, Session::Conversational(_)));
    assert_eq!(chat.mode(), Mode::Chat);
    chat.invoke("Hello").await?;
    assert_eq!(chat.history_len(), Some(2));

    let text = Session::new(Mode::Text, MockBackend::new_success("ok", 5));
    assert!(matches!(text, Session::Stateless(_)));
    assert_eq!(text.mode(), Mode::Text);
    text.invoke("Hello").await?;
    assert_eq!(text.history_len(), None);
    Ok(())
}
