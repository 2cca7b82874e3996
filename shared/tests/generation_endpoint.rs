use httpmock::prelude::*;
use shared::error::GenerationError;
use shared::openai_client::{GenerationClient, Provider, DEFAULT_CHAT_MODEL};
use std::time::Duration;
use tokio::runtime::Builder;

const ENVELOPE: &str = r#"{
    "primary_recipe": {
        "id": "mock-id-123",
        "title": "Mock Recipe (Generated)",
        "ingredients": ["ingredient1", "ingredient2"],
        "steps": ["step1", "step2"],
        "nutritional_info": {"calories": 500},
        "allergy_disclaimer": "None",
        "appliances": ["oven"],
        "created_at": "2025-01-01T12:00:00Z",
        "updated_at": "2025-01-01T12:00:00Z"
    },
    "alternative_recipes": [{
        "id": "mock-id-456",
        "title": "Alternative Mock Recipe",
        "ingredients": ["ingredientA"],
        "steps": ["stepA"],
        "nutritional_info": {"calories": 400},
        "allergy_disclaimer": "None",
        "appliances": ["stove"],
        "created_at": "2025-01-01",
        "updated_at": "2025-01-01"
    }]
}"#;

fn chat_provider() -> Provider {
    Provider::Chat {
        credential: "test-key".into(),
        model: DEFAULT_CHAT_MODEL.into(),
    }
}

fn client(server: &MockServer, provider: Provider) -> GenerationClient {
    GenerationClient::new(Some(server.url("/generate")), provider, Duration::from_secs(5))
        .expect("client")
}

fn run<F: std::future::Future<Output = anyhow::Result<()>>>(fut: F) -> anyhow::Result<()> {
    let rt = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(anyhow::Error::new)?;
    rt.block_on(fut)
}

#[test]
fn plain_dialect_parses_envelope() -> anyhow::Result<()> {
    run(async {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/generate")
                    .header("content-type", "application/json")
                    .body_contains("\"prompt\"")
                    .body_contains("unique test dish");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(ENVELOPE);
            })
            .await;

        let env = client(&server, Provider::Plain)
            .generate("unique test dish")
            .await?;
        let (primary, alternatives) = env.normalize();
        assert_eq!(primary.id, "mock-id-123");
        assert_eq!(primary.title, "Mock Recipe (Generated)");
        assert_eq!(alternatives.len(), 1);
        assert_eq!(alternatives[0].appliances, vec!["stove"]);

        mock.assert_async().await;
        Ok(())
    })
}

#[test]
fn chat_dialect_sends_bearer_and_strips_fences() -> anyhow::Result<()> {
    run(async {
        let server = MockServer::start_async().await;
        let content = format!("```json\n{ENVELOPE}\n```");
        let body = serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1700000000,
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"total_tokens": 42}
        });
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/generate")
                    .header("authorization", "Bearer test-key")
                    .json_body_partial(r#"{"model": "deepseek-chat", "stream": false}"#)
                    .body_contains("You are a helpful assistant.")
                    .body_contains("spicy tofu");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(body);
            })
            .await;

        let env = client(&server, chat_provider()).generate("spicy tofu").await?;
        assert_eq!(env.primary_recipe.title.as_deref(), Some("Mock Recipe (Generated)"));
        assert_eq!(env.alternative_recipes.len(), 1);

        mock.assert_async().await;
        Ok(())
    })
}

#[test]
fn chat_dialect_empty_choices_is_malformed() -> anyhow::Result<()> {
    run(async {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/generate");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"{"choices":[]}"#);
            })
            .await;

        let res = client(&server, chat_provider()).generate("anything").await;
        assert!(matches!(res, Err(GenerationError::Malformed(_))));
        Ok(())
    })
}

#[test]
fn chat_content_with_prose_is_malformed() -> anyhow::Result<()> {
    run(async {
        let server = MockServer::start_async().await;
        let content = "Sure! Here is your recipe:\n{\"primary_recipe\":{\"title\":\"Pho\"},\"alternative_recipes\":[]}\nEnjoy!";
        server
            .mock_async(|when, then| {
                when.method(POST).path("/generate");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(serde_json::json!({
                        "choices": [{"message": {"role": "assistant", "content": content}}]
                    }));
            })
            .await;

        let res = client(&server, chat_provider()).generate("pho").await;
        assert!(matches!(res, Err(GenerationError::Malformed(_))));
        Ok(())
    })
}

#[test]
fn non_success_status_is_upstream_error() -> anyhow::Result<()> {
    run(async {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/generate");
                then.status(503).body("overloaded");
            })
            .await;

        match client(&server, Provider::Plain).generate("anything").await {
            Err(GenerationError::Upstream { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
        Ok(())
    })
}

#[test]
fn plain_dialect_garbage_is_malformed() -> anyhow::Result<()> {
    run(async {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/generate");
                then.status(200).body("<html>oops</html>");
            })
            .await;

        let res = client(&server, Provider::Plain).generate("anything").await;
        assert!(matches!(res, Err(GenerationError::Malformed(_))));
        Ok(())
    })
}

#[test]
fn slow_provider_times_out_as_transport_error() -> anyhow::Result<()> {
    run(async {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/generate");
                then.status(200)
                    .delay(Duration::from_millis(1500))
                    .body(ENVELOPE);
            })
            .await;

        let client = GenerationClient::new(
            Some(server.url("/generate")),
            Provider::Plain,
            Duration::from_millis(200),
        )?;
        let res = client.generate("anything").await;
        assert!(matches!(res, Err(GenerationError::Transport(_))));
        Ok(())
    })
}
