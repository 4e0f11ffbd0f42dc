//! Minimal OpenAI-compatible client used as the hint collaborator.
//!
//! One chat.completions call per hint: the filled hint template as the system
//! message, the player's question as the user message. Calls log model names,
//! latencies and token usage, never the contents.
//!
//! NOTE: We never log the API key.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::Prompts;
use crate::error::AppError;
use crate::hints::{hint_prompt, HintGenerator, HintRequest};

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub hint_model: String,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  /// `timeout` bounds every HTTP call made by this client.
  pub fn from_env(timeout: Duration) -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok()?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let hint_model =
      std::env::var("OPENAI_HINT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());

    let client = reqwest::Client::builder().timeout(timeout).build().ok()?;

    Some(Self { client, api_key, base_url: base_url.trim_end_matches('/').to_string(), hint_model })
  }

  /// Plain-text chat completion.
  #[instrument(level = "info", skip(self, system, user), fields(model = %model))]
  async fn chat_plain(
    &self,
    model: &str,
    system: &str,
    user: &str,
    temperature: f32,
  ) -> Result<String, String> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: model.to_string(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      max_tokens: None,
    };

    let res = self.client.post(&url)
      .header(USER_AGENT, "debug-challenge/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await.map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_openai_error(&body).unwrap_or(body);
      return Err(format!("OpenAI HTTP {}: {}", status, msg));
    }

    let body: ChatCompletionResponse = res.json().await.map_err(|e| e.to_string())?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body.choices.first()
      .and_then(|c| c.message.content.clone())
      .unwrap_or_default().trim().to_string();

    Ok(text)
  }
}

#[async_trait]
impl HintGenerator for OpenAI {
  fn name(&self) -> &'static str {
    "openai"
  }

  #[instrument(level = "info", skip(self, prompts, req), fields(tier = req.tier, hint_level = ?req.level(), problem = %req.problem_id, model = %self.hint_model))]
  async fn generate_hint(&self, prompts: &Prompts, req: &HintRequest) -> Result<String, AppError> {
    let system = hint_prompt(prompts, req);
    let start = Instant::now();
    let result = self.chat_plain(&self.hint_model, &system, &req.user_message, 0.3).await;
    let elapsed = start.elapsed();

    match result {
      Ok(text) if text.is_empty() => {
        error!(?elapsed, "Model returned an empty hint");
        Err(AppError::CollaboratorUnavailable("empty reply from model".into()))
      }
      Ok(text) => {
        info!(?elapsed, reply_len = text.len(), "Hint received from model");
        Ok(text)
      }
      Err(e) => {
        error!(?elapsed, error = %e, "Model call failed during hint generation");
        Err(AppError::CollaboratorUnavailable(e))
      }
    }
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}
