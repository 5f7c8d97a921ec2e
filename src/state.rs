//! Application state: the storage façade, the admin draft config, the
//! in-memory message-request list, prompts, and the optional Gemini client.
//!
//! This module owns:
//!   - the `Database` façade (file-backed, injected everywhere via Arc<AppState>)
//!   - the admin draft (edited in memory, durable only on explicit save)
//!   - message requests (accept/decline never reach the store; the source app
//!     behaves the same way, so requests reset on restart by design-for-now)
//!   - the prompts struct (from TOML or defaults)
//!   - optional Gemini client

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::{load_app_config_from_env, Prompts};
use crate::db::Database;
use crate::domain::{AdminConfig, MessageRequest, RequestStatus};
use crate::gemini::Gemini;
use crate::seeds;
use crate::store;

pub struct AppState {
    pub db: Database,
    pub requests: Arc<RwLock<Vec<MessageRequest>>>,
    pub draft: Arc<RwLock<Option<AdminConfig>>>,
    pub gemini: Option<Gemini>,
    pub prompts: Prompts,
}

impl AppState {
    /// Build state from env: load config, open the store, seed it, init Gemini.
    #[instrument(level = "info", skip_all)]
    pub async fn new() -> store::Result<Self> {
        let prompts = load_app_config_from_env().map(|c| c.prompts).unwrap_or_default();

        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let db = Database::open_at(&data_dir)?;
        db.init(&seeds::initial_config()).await?;

        let gemini = Gemini::from_env();
        if let Some(g) = &gemini {
            info!(target: "academy_backend", base_url = %g.base_url, fast_model = %g.fast_model, pro_model = %g.pro_model, quiz_model = %g.quiz_model, image_model = %g.image_model, "Gemini enabled.");
        } else {
            info!(target: "academy_backend", "Gemini disabled (no GEMINI_API_KEY). AI features degrade to fallbacks.");
        }

        Ok(Self::from_parts(db, prompts, gemini))
    }

    /// Assemble state from explicit parts. Used by `new` and by tests.
    pub fn from_parts(db: Database, prompts: Prompts, gemini: Option<Gemini>) -> Self {
        Self {
            db,
            requests: Arc::new(RwLock::new(Vec::new())),
            draft: Arc::new(RwLock::new(None)),
            gemini,
            prompts,
        }
    }

    /// System instruction for AI calls: the admin-edited one when settings
    /// exist, the built-in default otherwise.
    pub async fn system_instruction(&self) -> String {
        match self.db.get_settings().await {
            Some(cfg) if !cfg.system_instruction.trim().is_empty() => cfg.system_instruction,
            _ => seeds::DEFAULT_SYSTEM_INSTRUCTION.to_string(),
        }
    }

    // --- Message requests (in-memory lifecycle) ---

    #[instrument(level = "info", skip(self), fields(%sender_id, %receiver_id))]
    pub async fn create_request(
        &self,
        sender_id: &str,
        sender_name: &str,
        receiver_id: &str,
    ) -> MessageRequest {
        let req = MessageRequest {
            id: Uuid::new_v4().to_string(),
            sender_id: sender_id.to_string(),
            sender_name: sender_name.to_string(),
            receiver_id: receiver_id.to_string(),
            status: RequestStatus::Pending,
        };
        self.requests.write().await.push(req.clone());
        info!(target: "messaging", request_id = %req.id, "message request created");
        req
    }

    /// Flip a pending request to accepted, in place. Returns the updated
    /// request, or None for an unknown id.
    #[instrument(level = "info", skip(self), fields(%request_id))]
    pub async fn accept_request(&self, request_id: &str) -> Option<MessageRequest> {
        let mut requests = self.requests.write().await;
        match requests.iter_mut().find(|r| r.id == request_id) {
            Some(r) => {
                r.status = RequestStatus::Accepted;
                Some(r.clone())
            }
            None => None,
        }
    }

    /// Remove the request from the list. Like the source app, the removal is
    /// never persisted, so a restart resurrects declined requests.
    #[instrument(level = "info", skip(self), fields(%request_id))]
    pub async fn decline_request(&self, request_id: &str) -> bool {
        let mut requests = self.requests.write().await;
        let before = requests.len();
        requests.retain(|r| r.id != request_id);
        let removed = requests.len() != before;
        if !removed {
            warn!(target: "messaging", %request_id, "decline for unknown request id");
        }
        removed
    }

    pub async fn requests_for(&self, receiver_id: &str) -> Vec<MessageRequest> {
        self.requests
            .read()
            .await
            .iter()
            .filter(|r| r.receiver_id == receiver_id)
            .cloned()
            .collect()
    }

    // --- Admin draft config ---

    /// Load the saved settings (or the seed defaults when absent) into the
    /// draft slot and return a copy for the admin panel.
    #[instrument(level = "info", skip(self))]
    pub async fn open_draft(&self) -> AdminConfig {
        let cfg = self.db.get_settings().await.unwrap_or_else(seeds::initial_config);
        *self.draft.write().await = Some(cfg.clone());
        cfg
    }

    /// Apply one edit to the open draft. `Err` when no draft is open.
    pub async fn edit_draft<F, T>(&self, f: F) -> Result<T, String>
    where
        F: FnOnce(&mut AdminConfig) -> T,
    {
        let mut guard = self.draft.write().await;
        match guard.as_mut() {
            Some(cfg) => Ok(f(cfg)),
            None => Err("No draft open; open the admin panel first.".into()),
        }
    }

    /// Hand the full draft to the store. Replaces the saved settings
    /// wholesale; concurrent admin sessions are last-write-wins.
    #[instrument(level = "info", skip(self))]
    pub async fn save_draft(&self) -> Result<AdminConfig, String> {
        let draft = { self.draft.read().await.clone() };
        match draft {
            Some(cfg) => {
                self.db
                    .save_settings(&cfg)
                    .await
                    .map_err(|e| format!("Save failed: {}", e))?;
                info!(target: "content", classes = cfg.classes.len(), "draft saved to store");
                Ok(cfg)
            }
            None => Err("No draft open; nothing to save.".into()),
        }
    }

    #[instrument(level = "info", skip(self))]
    pub async fn discard_draft(&self) {
        *self.draft.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content;

    fn temp_state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(dir.path()).unwrap();
        (dir, AppState::from_parts(db, Prompts::default(), None))
    }

    #[tokio::test]
    async fn request_lifecycle_accept_and_decline() {
        let (_dir, state) = temp_state();

        let req = state.create_request("u-1", "রাফি", "u-2").await;
        assert_eq!(req.status, RequestStatus::Pending);
        assert_eq!(state.requests_for("u-2").await.len(), 1);
        assert!(state.requests_for("u-1").await.is_empty());

        let accepted = state.accept_request(&req.id).await.unwrap();
        assert_eq!(accepted.status, RequestStatus::Accepted);

        assert!(state.decline_request(&req.id).await);
        assert!(state.requests_for("u-2").await.is_empty());
        assert!(!state.decline_request(&req.id).await);
    }

    #[tokio::test]
    async fn draft_edits_are_not_durable_until_save() {
        let (_dir, state) = temp_state();
        state.db.init(&seeds::initial_config()).await.unwrap();

        state.open_draft().await;
        state
            .edit_draft(|cfg| content::add_subject(cfg, "c7", "গণিত"))
            .await
            .unwrap();

        // Store still holds the seed tree.
        let saved = state.db.get_settings().await.unwrap();
        let c7 = saved.classes.iter().find(|c| c.id == "c7").unwrap();
        assert!(c7.subjects.is_empty());

        let saved_cfg = state.save_draft().await.unwrap();
        let c7 = saved_cfg.classes.iter().find(|c| c.id == "c7").unwrap();
        assert_eq!(c7.subjects[0].title, "গণিত");

        // And the denormalized content copy followed.
        let classes = state.db.get_content_classes().await;
        let c7 = classes.iter().find(|c| c.id == "c7").unwrap();
        assert_eq!(c7.subjects.len(), 1);
    }

    #[tokio::test]
    async fn editing_without_a_draft_is_an_error() {
        let (_dir, state) = temp_state();
        let res = state.edit_draft(|cfg| content::add_subject(cfg, "c6", "x")).await;
        assert!(res.is_err());
        assert!(state.save_draft().await.is_err());
    }

    #[tokio::test]
    async fn discard_throws_away_edits() {
        let (_dir, state) = temp_state();
        state.db.init(&seeds::initial_config()).await.unwrap();

        state.open_draft().await;
        state
            .edit_draft(|cfg| content::add_subject(cfg, "c8", "ইংরেজি"))
            .await
            .unwrap();
        state.discard_draft().await;

        // Reopening restores the saved tree.
        let cfg = state.open_draft().await;
        let c8 = cfg.classes.iter().find(|c| c.id == "c8").unwrap();
        assert!(c8.subjects.is_empty());
    }
}
