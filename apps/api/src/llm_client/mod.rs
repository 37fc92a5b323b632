//! LLM Client: the single point of entry for all Gemini API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! All LLM interactions MUST go through this module.
//!
//! Model: gemini-2.5-flash (hardcoded).
//!
//! Every call is a single attempt. There is no retry, backoff or timeout override;
//! transport failures surface to the caller as `LlmError::Http`.

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
/// The model used for all LLM calls.
pub const MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("could not reach the AI service: {0}")]
    Http(#[from] reqwest::Error),

    #[error("the AI service rejected the API key: {message}")]
    Auth { message: String },

    #[error("the AI service quota is exhausted: {message}")]
    Quota { message: String },

    #[error("the AI service returned an error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed response from the AI service: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no response received from the AI service")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (generateContent)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'static str>,
    pub parts: Vec<Part>,
}

/// One piece of request content: inline text, or an inline base64 blob.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    /// Base64 of the raw bytes.
    pub data: String,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Part::InlineData {
            inline_data: Blob {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: &'static str,
    pub response_schema: Value,
}

impl GenerateContentRequest {
    /// A single-turn request that asks for JSON matching `schema`.
    pub fn json(parts: Vec<Part>, system: &str, schema: Value) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user"),
                parts,
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part::text(system)],
            },
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
    #[serde(default)]
    pub thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, skipping thought parts.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text.as_deref())
            .collect();
        Some(text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by all services.
/// Wraps the Gemini generateContent API with structured output helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, GEMINI_API_BASE)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, MODEL)
    }

    /// Makes exactly one call to the Gemini API, returning the full response object.
    pub async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, LlmError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("Gemini API returned {}: {}", status, message);
            return Err(match status.as_u16() {
                401 | 403 => LlmError::Auth { message },
                429 => LlmError::Quota { message },
                code => LlmError::Api {
                    status: code,
                    message,
                },
            });
        }

        let llm_response: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &llm_response.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, candidate_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(llm_response)
    }

    /// Calls the LLM with a declared response schema and deserializes the text as JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        parts: Vec<Part>,
        system: &str,
        schema: Value,
    ) -> Result<T, LlmError> {
        let request = GenerateContentRequest::json(parts, system, schema);
        let response = self.generate(&request).await?;

        let Some(text) = response.text().filter(|t| !t.trim().is_empty()) else {
            let finish_reason = response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.as_deref());
            warn!("LLM returned no text (finish_reason={:?})", finish_reason);
            return Err(LlmError::EmptyContent);
        };

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(&text);

        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{candidate_body, spawn_stub};
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        key: String,
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_request_serializes_to_gemini_shape() {
        let request = GenerateContentRequest::json(
            vec![
                Part::text("instructions"),
                Part::inline_data("application/pdf", "JVBERi0="),
            ],
            "system",
            json!({ "type": "OBJECT" }),
        );
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "instructions");
        assert_eq!(
            value["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "application/pdf"
        );
        assert_eq!(value["contents"][0]["parts"][1]["inlineData"]["data"], "JVBERi0=");
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "system");
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_response_text_skips_thoughts_and_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "thinking...", "thought": true },
                    { "text": "{\"key\":" },
                    { "text": " \"v\"}" }
                ]}
            }]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"key\": \"v\"}"));
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.text().is_none());
    }

    #[tokio::test]
    async fn test_call_json_sends_key_and_decodes() {
        let stub = spawn_stub(StatusCode::OK, candidate_body(r#"{"key": "value"}"#)).await;
        let client = LlmClient::with_base_url("secret".into(), &stub.base_url);

        let probe: Probe = client
            .call_json(vec![Part::text("hi")], "system", json!({}))
            .await
            .unwrap();

        assert_eq!(probe, Probe { key: "value".into() });
        let captured = stub.last_request();
        assert_eq!(captured.api_key.as_deref(), Some("secret"));
        assert_eq!(
            captured.path,
            format!("/v1beta/models/{MODEL}:generateContent")
        );
        assert_eq!(stub.request_count(), 1);
    }

    #[tokio::test]
    async fn test_call_json_empty_text_is_empty_content() {
        let stub = spawn_stub(StatusCode::OK, candidate_body("  ")).await;
        let client = LlmClient::with_base_url("k".into(), &stub.base_url);

        let err = client
            .call_json::<Probe>(vec![Part::text("hi")], "system", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[tokio::test]
    async fn test_call_json_prose_is_parse_error() {
        let stub = spawn_stub(StatusCode::OK, candidate_body("Sure! Here is my analysis.")).await;
        let client = LlmClient::with_base_url("k".into(), &stub.base_url);

        let err = client
            .call_json::<Probe>(vec![Part::text("hi")], "system", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_without_retry() {
        let body = json!({ "error": { "code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED" } });
        let stub = spawn_stub(StatusCode::FORBIDDEN, body.to_string()).await;
        let client = LlmClient::with_base_url("bad".into(), &stub.base_url);

        let err = client
            .call_json::<Probe>(vec![Part::text("hi")], "system", json!({}))
            .await
            .unwrap_err();
        match err {
            LlmError::Auth { message } => assert_eq!(message, "API key not valid"),
            other => panic!("expected Auth, got {other:?}"),
        }
        assert_eq!(stub.request_count(), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_quota_single_attempt() {
        let stub = spawn_stub(StatusCode::TOO_MANY_REQUESTS, "slow down".into()).await;
        let client = LlmClient::with_base_url("k".into(), &stub.base_url);

        let err = client
            .call_json::<Probe>(vec![Part::text("hi")], "system", json!({}))
            .await
            .unwrap_err();
        match err {
            LlmError::Quota { message } => assert_eq!(message, "slow down"),
            other => panic!("expected Quota, got {other:?}"),
        }
        assert_eq!(stub.request_count(), 1);
    }

    #[tokio::test]
    async fn test_server_error_maps_to_api() {
        let stub = spawn_stub(StatusCode::INTERNAL_SERVER_ERROR, "boom".into()).await;
        let client = LlmClient::with_base_url("k".into(), &stub.base_url);

        let err = client
            .call_json::<Probe>(vec![Part::text("hi")], "system", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 500, .. }));
        assert_eq!(stub.request_count(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = LlmClient::with_base_url("k".into(), format!("http://{addr}"));
        let err = client
            .call_json::<Probe>(vec![Part::text("hi")], "system", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Http(_)));
    }
}
