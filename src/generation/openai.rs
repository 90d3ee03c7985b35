use super::{SchemaDescriptor, StructuredGenerator};
use crate::config::GeneratorConfig;
use crate::error::{NotesError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

const SYSTEM_PROMPT: &str = "You are an experienced therapist's assistant. \
    Respond only with a JSON object that matches the requested schema.";

// OpenAI-compatible request/response for chat completions
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat<'a>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    strict: bool,
    schema: &'a serde_json::Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

/// Structured generation over an OpenAI-compatible `/chat/completions` endpoint
pub struct OpenAiGenerator {
    api_base: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiGenerator {
    pub fn new(config: &GeneratorConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| NotesError::provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            client,
        })
    }

    /// Build from config, reading the key from config or `OPENAI_API_KEY`
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let api_key = config.resolved_api_key().ok_or_else(|| NotesError::InvalidInput {
            message: "no generator API key configured (set OPENAI_API_KEY)".to_string(),
        })?;
        Self::new(config, api_key)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Pull the JSON object out of a completion's message content.
fn parse_reply(content: &str, schema_name: &str) -> Result<serde_json::Value> {
    // Some compatible servers wrap JSON in a markdown fence
    let trimmed = content.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| NotesError::SchemaViolation {
            schema: schema_name.to_string(),
            message: format!("reply is not valid JSON: {}", e),
        })?;

    if !value.is_object() {
        return Err(NotesError::SchemaViolation {
            schema: schema_name.to_string(),
            message: "reply is not a JSON object".to_string(),
        });
    }

    Ok(value)
}

#[async_trait::async_trait]
impl StructuredGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str, schema: &SchemaDescriptor) -> Result<serde_json::Value> {
        let url = format!("{}/chat/completions", self.api_base);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: &schema.name,
                    // Length bounds are checked on our side after decoding
                    strict: false,
                    schema: &schema.schema,
                },
            },
            temperature: 0.3,
        };

        debug!(
            "Requesting {} from {} (prompt {} chars)",
            schema.name,
            self.model,
            prompt.chars().count()
        );

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotesError::provider(format!("request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            error!("Generation API returned {}: {}", status, text);
            return Err(NotesError::provider(format!("API error {}: {}", status, text)));
        }

        let parsed: ChatResponse = res
            .json()
            .await
            .map_err(|e| NotesError::provider(format!("response parse failed: {}", e)))?;

        let message = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| NotesError::provider("response had no choices"))?;

        if let Some(refusal) = message.refusal {
            return Err(NotesError::provider(format!("model refused: {}", refusal)));
        }

        let content = message
            .content
            .ok_or_else(|| NotesError::provider("response had no content"))?;

        parse_reply(&content, &schema.name)
    }
}
