//! Minimal Gemini client for our use-cases.
//!
//! We only call models/*:generateContent and request either plain text, a
//! strict JSON array (quiz), or an inline image part (image edit). Calls are
//! instrumented and log model names, latencies, and response sizes (not contents).
//!
//! NOTE: We never log the API key and we keep payload truncations short to avoid PII leaks.

use std::time::Duration;

use base64::Engine;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::Prompts;
use crate::domain::QuizQuestion;
use crate::util::fill_template;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Which backing model/configuration serves a chat turn.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
  Fast,
  Pro,
  Think,
}
impl Default for ChatMode {
  fn default() -> Self { ChatMode::Pro }
}

#[derive(Clone)]
pub struct Gemini {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub fast_model: String,
  pub pro_model: String,
  pub quiz_model: String,
  pub image_model: String,
}

impl Gemini {
  /// Construct the client if we find GEMINI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("GEMINI_API_KEY").ok()?;
    let base_url = std::env::var("GEMINI_BASE_URL")
      .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into());
    let fast_model =
      std::env::var("GEMINI_FAST_MODEL").unwrap_or_else(|_| "gemini-2.5-flash-lite-latest".into());
    let pro_model =
      std::env::var("GEMINI_PRO_MODEL").unwrap_or_else(|_| "gemini-3-pro-preview".into());
    let quiz_model =
      std::env::var("GEMINI_QUIZ_MODEL").unwrap_or_else(|_| "gemini-3-flash-preview".into());
    let image_model =
      std::env::var("GEMINI_IMAGE_MODEL").unwrap_or_else(|_| "gemini-2.5-flash-image".into());

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(20))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, fast_model, pro_model, quiz_model, image_model })
  }

  /// Single generateContent round trip. Returns the raw candidate parts.
  #[instrument(level = "info", skip(self, req), fields(model = %model))]
  async fn generate(&self, model: &str, req: &GenerateContentRequest) -> Result<Vec<PartOut>, String> {
    let url = format!("{}/models/{}:generateContent", self.base_url, model);

    let res = self.client.post(&url)
      .header(USER_AGENT, "academy-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(API_KEY_HEADER, &self.api_key)
      .json(req).send().await.map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_gemini_error(&body).unwrap_or_else(|| body);
      return Err(format!("Gemini HTTP {}: {}", status, msg));
    }

    let body: GenerateContentResponse = res.json().await.map_err(|e| e.to_string())?;
    if let Some(usage) = &body.usage_metadata {
      info!(prompt_tokens = ?usage.prompt_token_count, candidate_tokens = ?usage.candidates_token_count, total_tokens = ?usage.total_token_count, "Gemini usage");
    }
    let parts = body.candidates.into_iter().next()
      .and_then(|c| c.content)
      .map(|c| c.parts)
      .unwrap_or_default();
    Ok(parts)
  }

  fn first_text(parts: Vec<PartOut>) -> String {
    parts.into_iter().filter_map(|p| p.text).collect::<Vec<_>>().join("").trim().to_string()
  }

  // --- High-level helpers (domain-specialized) ---

  /// Tutor chat turn. Mode selects the backing model: fast is the light
  /// model, pro and think use the strong one, think with a large reasoning
  /// budget.
  #[instrument(level = "info", skip(self, system_instruction, prompt), fields(mode = ?mode, prompt_len = prompt.len()))]
  pub async fn chat(
    &self,
    system_instruction: &str,
    prompt: &str,
    mode: ChatMode,
  ) -> Result<String, String> {
    let model = match mode {
      ChatMode::Fast => &self.fast_model,
      ChatMode::Pro | ChatMode::Think => &self.pro_model,
    };
    let req = GenerateContentRequest {
      contents: vec![Content::text(prompt)],
      system_instruction: Some(Content::text(system_instruction)),
      generation_config: Some(GenerationConfig {
        temperature: Some(0.7),
        response_mime_type: None,
        thinking_config: match mode {
          ChatMode::Think => Some(ThinkingConfig { thinking_budget: 32_768 }),
          _ => None,
        },
      }),
    };

    let start = std::time::Instant::now();
    let parts = self.generate(model, &req).await?;
    info!(elapsed = ?start.elapsed(), "Chat response received");
    Ok(Self::first_text(parts))
  }

  /// Structured quiz generation: a JSON array of MCQs for the given topic.
  #[instrument(level = "info", skip(self, system_instruction, prompts), fields(%topic, %class_name, %subject, model = %self.quiz_model))]
  pub async fn generate_quiz(
    &self,
    system_instruction: &str,
    prompts: &Prompts,
    topic: &str,
    class_name: &str,
    subject: &str,
  ) -> Result<Vec<QuizQuestion>, String> {
    let user = fill_template(
      &prompts.quiz_user_template,
      &[("topic", topic), ("class_name", class_name), ("subject", subject)],
    );
    let req = GenerateContentRequest {
      contents: vec![Content::text(&user)],
      system_instruction: Some(Content::text(system_instruction)),
      generation_config: Some(GenerationConfig {
        temperature: None,
        response_mime_type: Some("application/json".into()),
        thinking_config: None,
      }),
    };

    let start = std::time::Instant::now();
    let result = self.generate(&self.quiz_model, &req).await;
    let elapsed = start.elapsed();
    match &result {
      Ok(_) => info!(?elapsed, "Quiz response received"),
      Err(e) => error!(?elapsed, error = %e, "Model call failed during quiz generation"),
    }

    let text = Self::first_text(result?);
    let questions: Vec<QuizQuestion> = serde_json::from_str(strip_json_fences(&text))
      .map_err(|e| format!("JSON parse error: {}", e))?;
    info!(count = questions.len(), "Quiz parsed");
    Ok(questions)
  }

  /// Image edit: inline source image + instruction text in, edited image
  /// out. `Ok(None)` means the model produced no image part.
  #[instrument(level = "info", skip(self, prompt, image_base64), fields(%mime_type, image_len = image_base64.len(), model = %self.image_model))]
  pub async fn edit_image(
    &self,
    prompt: &str,
    image_base64: &str,
    mime_type: &str,
  ) -> Result<Option<String>, String> {
    // Reject malformed payloads before spending a round trip on them.
    base64::engine::general_purpose::STANDARD
      .decode(image_base64)
      .map_err(|e| format!("Invalid base64 image: {}", e))?;

    let req = GenerateContentRequest {
      contents: vec![Content {
        parts: vec![
          Part {
            text: None,
            inline_data: Some(InlineData { mime_type: mime_type.into(), data: image_base64.into() }),
          },
          Part { text: Some(prompt.into()), inline_data: None },
        ],
      }],
      system_instruction: None,
      generation_config: None,
    };

    let parts = self.generate(&self.image_model, &req).await?;
    let edited = parts.into_iter().find_map(|p| p.inline_data);
    Ok(edited.map(|d| format!("data:{};base64,{}", mime_type, d.data)))
  }
}

/// Models occasionally wrap JSON output in a markdown fence even when asked
/// not to; tolerate that before parsing.
fn strip_json_fences(text: &str) -> &str {
  let t = text.trim();
  let t = t.strip_prefix("```json").or_else(|| t.strip_prefix("```")).unwrap_or(t);
  let t = t.strip_suffix("```").unwrap_or(t);
  t.trim()
}

// --- Wire DTOs ---

#[derive(Serialize)]
struct GenerateContentRequest {
  contents: Vec<Content>,
  #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
  system_instruction: Option<Content>,
  #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
  generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
  parts: Vec<Part>,
}
impl Content {
  fn text(s: &str) -> Self {
    Self { parts: vec![Part { text: Some(s.into()), inline_data: None }] }
  }
}

#[derive(Serialize)]
struct Part {
  #[serde(skip_serializing_if = "Option::is_none")]
  text: Option<String>,
  #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
  inline_data: Option<InlineData>,
}

#[derive(Serialize, Deserialize)]
struct InlineData {
  #[serde(rename = "mimeType")]
  mime_type: String,
  data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
  #[serde(skip_serializing_if = "Option::is_none")]
  temperature: Option<f32>,
  #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
  response_mime_type: Option<String>,
  #[serde(rename = "thinkingConfig", skip_serializing_if = "Option::is_none")]
  thinking_config: Option<ThinkingConfig>,
}

#[derive(Serialize)]
struct ThinkingConfig {
  #[serde(rename = "thinkingBudget")]
  thinking_budget: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
  #[serde(default, rename = "usageMetadata")]
  usage_metadata: Option<UsageMetadata>,
}
#[derive(Deserialize)]
struct Candidate {
  content: Option<ContentOut>,
}
#[derive(Deserialize)]
struct ContentOut {
  #[serde(default)]
  parts: Vec<PartOut>,
}
#[derive(Deserialize)]
struct PartOut {
  #[serde(default)]
  text: Option<String>,
  #[serde(default, rename = "inlineData")]
  inline_data: Option<InlineData>,
}
#[derive(Deserialize)]
struct UsageMetadata {
  #[serde(default, rename = "promptTokenCount")]
  prompt_token_count: Option<u32>,
  #[serde(default, rename = "candidatesTokenCount")]
  candidates_token_count: Option<u32>,
  #[serde(default, rename = "totalTokenCount")]
  total_token_count: Option<u32>,
}

/// Try to extract a clean error message from a Gemini error body.
fn extract_gemini_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}
