//! Client for the recipe generation endpoint.
//!
//! Two wire dialects are supported: a plain `{"prompt": ..}` body whose
//! response is the recipe envelope itself, and an OpenAI-style chat
//! completion whose first choice carries the envelope as (possibly fenced)
//! JSON text.

use openai::chat::{ChatCompletionMessage, ChatCompletionMessageRole};
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::config::Settings;
use crate::dto::GeneratedRecipes;
use crate::error::{GenerationError, Result};
use crate::json_fence::strip_code_fences;

/// Model used by the chat dialect unless overridden.
pub const DEFAULT_CHAT_MODEL: &str = "deepseek-chat";

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Request/response dialect of the generation endpoint.
#[derive(Clone, PartialEq, Eq)]
pub enum Provider {
    Plain,
    Chat { credential: String, model: String },
}

// The credential never ends up in logs.
impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Plain => f.write_str("Plain"),
            Provider::Chat { model, .. } => f
                .debug_struct("Chat")
                .field("credential", &"***")
                .field("model", model)
                .finish(),
        }
    }
}

impl Provider {
    fn name(&self) -> &'static str {
        match self {
            Provider::Plain => "plain",
            Provider::Chat { .. } => "chat",
        }
    }
}

#[derive(Serialize)]
struct PromptRequest<'a> {
    prompt: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatCompletionMessage],
    stream: bool,
}

// Only the parts of a chat completion we read; providers differ in the rest.
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn msg(role: ChatCompletionMessageRole, txt: &str) -> ChatCompletionMessage {
    ChatCompletionMessage {
        role,
        content: Some(txt.to_string()),
        ..Default::default()
    }
}

/// Instruction sent to the model; the query is embedded verbatim.
pub fn build_prompt(query: &str) -> String {
    format!(
        "Generate a recipe based on the following query: \"{query}\". \
         Return a JSON object with two keys: 'primary_recipe' and 'alternative_recipes'. \
         The 'primary_recipe' should be a JSON object representing the main recipe with keys: \
         id, title, ingredients, steps, nutritional_info, allergy_disclaimer, appliances, created_at, and updated_at. \
         The 'alternative_recipes' should be an array of recipe objects following the same structure."
    )
}

fn body_preview(bytes: &[u8]) -> String {
    String::from_utf8_lossy(&bytes[..bytes.len().min(1024)]).into_owned()
}

/// Long-lived generation client.
///
/// The inner [`reqwest::Client`] pools connections; clones share it.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    http: Client,
    endpoint: Option<String>,
    provider: Provider,
}

impl GenerationClient {
    /// `timeout` bounds the whole round trip, body included.
    pub fn new(endpoint: Option<String>, provider: Provider, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Configuration(e.to_string()))?;
        Ok(Self {
            http,
            endpoint,
            provider,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = Self::new(settings.endpoint(), settings.provider(), settings.timeout())?;
        info!(
            provider = client.provider.name(),
            endpoint_configured = client.endpoint.is_some(),
            "generation client ready"
        );
        Ok(client)
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    /// Ask the provider for a recipe matching `query`.
    ///
    /// A single attempt is made; retrying is left to callers.
    pub async fn generate(&self, query: &str) -> Result<GeneratedRecipes> {
        let endpoint = self.endpoint.as_deref().ok_or_else(|| {
            GenerationError::Configuration("LLM_ENDPOINT environment variable not set".into())
        })?;
        let prompt = build_prompt(query);

        let req = match &self.provider {
            Provider::Plain => self.http.post(endpoint).json(&PromptRequest { prompt: &prompt }),
            Provider::Chat { credential, model } => {
                let messages = [
                    msg(ChatCompletionMessageRole::System, SYSTEM_PROMPT),
                    msg(ChatCompletionMessageRole::User, &prompt),
                ];
                debug!(%model, "\u{2192} chat completion request");
                self.http
                    .post(endpoint)
                    .header(header::AUTHORIZATION, format!("Bearer {credential}"))
                    .json(&ChatRequest {
                        model,
                        messages: &messages,
                        stream: false,
                    })
            }
        };

        let start = Instant::now();
        let res = req.send().await.map_err(|e| {
            error!("network error to generation endpoint: {e}");
            GenerationError::from(e)
        })?;
        let status = res.status();
        let bytes = res.bytes().await?;
        debug!(
            provider = self.provider.name(),
            %status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "\u{2190} generation response"
        );

        if !status.is_success() {
            let body = body_preview(&bytes);
            debug!("\u{2190} body = {body}");
            return Err(GenerationError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        match self.provider {
            Provider::Plain => serde_json::from_slice::<GeneratedRecipes>(&bytes).map_err(|e| {
                debug!("\u{2190} body = {}", body_preview(&bytes));
                GenerationError::Malformed(e.to_string())
            }),
            Provider::Chat { .. } => {
                let chat: ChatResponse = serde_json::from_slice(&bytes)
                    .map_err(|e| GenerationError::Malformed(e.to_string()))?;
                parse_chat_content(chat)
            }
        }
    }
}

fn parse_chat_content(chat: ChatResponse) -> Result<GeneratedRecipes> {
    let choice = chat
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::Malformed("no choices in chat response".into()))?;
    let content = choice.message.content.unwrap_or_default();
    let payload = strip_code_fences(&content);
    debug!("extracted content: {payload}");
    serde_json::from_str::<GeneratedRecipes>(payload)
        .map_err(|e| GenerationError::Malformed(e.to_string()))
}
