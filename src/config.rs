//! Loading app configuration (AI prompt templates) from TOML.
//!
//! The admin-editable settings live in the store (`AdminConfig`); this file
//! covers only operator-side tuning of the Gemini prompts.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub prompts: Prompts,
}

/// Prompt templates used by the Gemini client. Defaults match the original
/// app; override them in TOML to tune tone/structure.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  /// Quiz request; placeholders: {class_name}, {subject}, {topic}.
  pub quiz_user_template: String,
  /// Shown to the student when the chat backend is unavailable or fails.
  pub chat_unavailable: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      quiz_user_template: "NCTB {class_name} {subject} \"{topic}\" MCQ (5 questions). JSON format: question, options[], correctIndex, explanation.".into(),
      chat_unavailable: "দুঃখিত, আমি এই মুহূর্তে উত্তর দিতে পারছি না।".into(),
    }
  }
}

/// Attempt to load `AppConfig` from APP_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_app_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("APP_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<AppConfig>(&s) {
      Ok(cfg) => {
        info!(target: "academy_backend", %path, "Loaded app config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "academy_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "academy_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn prompts_parse_from_toml_with_defaults() {
    let cfg: AppConfig = toml::from_str(
      "[prompts]\nquiz_user_template = \"{topic} quiz\"\nchat_unavailable = \"পরে চেষ্টা করুন\"\n",
    )
    .unwrap();
    assert_eq!(cfg.prompts.quiz_user_template, "{topic} quiz");

    let empty: AppConfig = toml::from_str("").unwrap();
    assert!(empty.prompts.quiz_user_template.contains("MCQ"));
  }
}
