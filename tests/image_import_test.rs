use mockito::{Matcher, Server};
use recipe_extract::config::ProviderConfig;
use recipe_extract::{AppConfig, GenerationError, ImportError, RecipeImporter};
use serde_json::json;

fn completion_body(content: &str) -> String {
    json!({ "choices": [{ "message": { "content": content } }] }).to_string()
}

fn test_config(server: &Server, model: &str) -> AppConfig {
    let mut config = AppConfig {
        provider: "openai".to_string(),
        ..AppConfig::default()
    };
    config.providers.insert(
        "openai".to_string(),
        ProviderConfig {
            model: model.to_string(),
            api_key: Some("test_key".to_string()),
            base_url: Some(server.url()),
            ..ProviderConfig::defaults_for("openai").unwrap()
        },
    );
    config.image_generation.api_key = Some("bfl_key".to_string());
    config.image_generation.base_url = server.url();
    config.image_generation.poll_interval_ms = 10;
    config
}

const RECIPE_JSON: &str = r#"{
    "title": "Brookies",
    "description": "Brownie meets cookie",
    "ingredients": [
        {"name": "flour", "quantity": "160", "unit": "g"},
        {"name": "cocoa powder", "quantity": "30", "unit": "g"}
    ],
    "instructions": [
        {"step": 1, "description": "Mix the dry ingredients."},
        {"step": 2, "description": "Bake for 25 minutes."}
    ]
}"#;

#[tokio::test]
async fn test_image_to_recipe_with_illustration() {
    let mut server = Server::new_async().await;

    let extraction = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#""name":"Recipe""#.to_string()),
            Matcher::Regex("data:image/png;base64,".to_string()),
        ]))
        .with_status(200)
        .with_body(completion_body(RECIPE_JSON))
        .expect(1)
        .create_async()
        .await;

    let prompt = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Regex("isometric".to_string()))
        .with_status(200)
        .with_body(completion_body("Pop art brownie cubes on a cookie grid"))
        .expect(1)
        .create_async()
        .await;

    let polling_url = format!("{}/v1/get_result", server.url());
    let submit = server
        .mock("POST", "/v1/flux-kontext-pro")
        .match_header("x-key", "bfl_key")
        .match_body(Matcher::PartialJson(
            json!({"prompt": "Pop art brownie cubes on a cookie grid"}),
        ))
        .with_status(200)
        .with_body(json!({"id": "job-42", "polling_url": polling_url}).to_string())
        .create_async()
        .await;

    let poll = server
        .mock("GET", "/v1/get_result")
        .match_query(Matcher::UrlEncoded("id".into(), "job-42".into()))
        .match_header("x-key", "bfl_key")
        .with_status(200)
        .with_body(r#"{"id": "job-42", "status": "Ready", "result": {"sample": "https://cdn.example/brookies.png"}}"#)
        .create_async()
        .await;

    let result = RecipeImporter::builder()
        .image_bytes(b"not really a png".to_vec(), "image/png")
        .illustrate()
        .config(test_config(&server, "gpt-4o"))
        .build()
        .await
        .unwrap();

    assert_eq!(result.recipe.title, "Brookies");
    assert_eq!(result.recipe.ingredients[1].name, "cocoa powder");
    assert_eq!(result.recipe.instructions.len(), 2);
    assert_eq!(
        result.illustration.as_deref(),
        Some("https://cdn.example/brookies.png")
    );

    extraction.assert_async().await;
    prompt.assert_async().await;
    submit.assert_async().await;
    poll.assert_async().await;
}

#[tokio::test]
async fn test_generation_failure_is_reported() {
    let mut server = Server::new_async().await;
    let _extraction = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Regex(r#""name":"Recipe""#.to_string()))
        .with_status(200)
        .with_body(completion_body(RECIPE_JSON))
        .create_async()
        .await;
    let _prompt = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Regex("isometric".to_string()))
        .with_status(200)
        .with_body(completion_body("prompt"))
        .create_async()
        .await;
    let polling_url = format!("{}/v1/get_result", server.url());
    let _submit = server
        .mock("POST", "/v1/flux-kontext-pro")
        .with_status(200)
        .with_body(json!({"id": "job-7", "polling_url": polling_url}).to_string())
        .create_async()
        .await;
    let poll = server
        .mock("GET", "/v1/get_result")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"id": "job-7", "status": "Failed"}"#)
        .expect(1)
        .create_async()
        .await;

    let result = RecipeImporter::builder()
        .image_bytes(b"jpeg".to_vec(), "image/jpeg")
        .illustrate()
        .config(test_config(&server, "gpt-4o"))
        .build()
        .await;

    match result {
        Err(ImportError::Generation(GenerationError::Failed { status, .. })) => {
            assert_eq!(status, "Failed");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    poll.assert_async().await;
}

#[tokio::test]
async fn test_model_without_vision_is_rejected() {
    let mut server = Server::new_async().await;
    let llm = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let result = RecipeImporter::builder()
        .image_bytes(b"jpeg".to_vec(), "image/jpeg")
        .config(test_config(&server, "gpt-3.5-turbo"))
        .build()
        .await;

    assert!(matches!(result, Err(ImportError::Configuration(_))));
    llm.assert_async().await;
}

#[tokio::test]
async fn test_invalid_extraction_is_validation_failure() {
    let mut server = Server::new_async().await;
    let _extraction = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(completion_body(r#"{"title": "Brookies", "ingredients": "lots"}"#))
        .create_async()
        .await;

    let result = RecipeImporter::builder()
        .image_bytes(b"jpeg".to_vec(), "image/jpeg")
        .config(test_config(&server, "gpt-4o"))
        .build()
        .await;

    assert!(matches!(result, Err(ImportError::Validation(_))));
}
