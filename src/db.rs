//! Persistence façade over the key-value store.
//!
//! Five logical collections (settings, users, session, messages, content),
//! JSON at the boundary. All reads tolerate missing or corrupted data by
//! returning an empty/absent result; only writes can fail.
//!
//! The façade is a plain service object built once at startup and injected
//! through `AppState`; it is deliberately not a global.
//!
//! Every method is async even though the store underneath is synchronous, so
//! the surface survives a later swap to a remote store unchanged.

use std::path::Path;

use tracing::{info, instrument, warn};

use crate::domain::{AdminConfig, ChatMessage, ClassCategory, UserProfile};
use crate::store::{
  KvStore, Result, KEY_CONTENT, KEY_MESSAGES, KEY_SESSION, KEY_SETTINGS, KEY_USERS,
};

pub struct Database {
  kv: KvStore,
}

impl Database {
  pub fn open_at(dir: &Path) -> Result<Self> {
    Ok(Self { kv: KvStore::open_at(dir)? })
  }

  /// First-launch seeding. Settings (plus the denormalized content copy) are
  /// written only when absent; users and messages are ensured as empty lists.
  /// Calling this twice with the same seed leaves storage untouched.
  #[instrument(level = "info", skip(self, seed))]
  pub async fn init(&self, seed: &AdminConfig) -> Result<()> {
    if !self.kv.contains(KEY_SETTINGS) {
      info!(target: "store", "seeding initial settings");
      self.save_settings(seed).await?;
    }
    if !self.kv.contains(KEY_USERS) {
      self.kv.set(KEY_USERS, "[]")?;
    }
    if !self.kv.contains(KEY_MESSAGES) {
      self.kv.set(KEY_MESSAGES, "[]")?;
    }
    Ok(())
  }

  fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
    let raw = self.kv.get(key)?;
    match serde_json::from_str(&raw) {
      Ok(v) => Some(v),
      Err(e) => {
        warn!(target: "store", %key, error = %e, "corrupted value treated as absent");
        None
      }
    }
  }

  // --- Settings & content ---

  #[instrument(level = "debug", skip(self))]
  pub async fn get_settings(&self) -> Option<AdminConfig> {
    self.read_json(KEY_SETTINGS)
  }

  /// Persist the full config. The content tree is additionally duplicated
  /// under its own key so class browsing never deserializes the whole
  /// settings blob. Two independent writes; a crash between them can leave
  /// the copies inconsistent (known limitation of the storage layout).
  #[instrument(level = "info", skip(self, settings), fields(classes = settings.classes.len()))]
  pub async fn save_settings(&self, settings: &AdminConfig) -> Result<()> {
    self.kv.set(KEY_SETTINGS, &serde_json::to_string(settings)?)?;
    self.kv.set(KEY_CONTENT, &serde_json::to_string(&settings.classes)?)?;
    Ok(())
  }

  #[instrument(level = "debug", skip(self))]
  pub async fn get_content_classes(&self) -> Vec<ClassCategory> {
    self.read_json(KEY_CONTENT).unwrap_or_default()
  }

  // --- Users & session ---

  #[instrument(level = "debug", skip(self))]
  pub async fn get_all_users(&self) -> Vec<UserProfile> {
    self.read_json(KEY_USERS).unwrap_or_default()
  }

  #[instrument(level = "debug", skip(self))]
  pub async fn get_user_session(&self) -> Option<UserProfile> {
    self.read_json(KEY_SESSION)
  }

  /// Credential check by linear scan, exact match on mobile and password.
  /// A match becomes the active session and is returned; no match is `None`,
  /// not an error — the caller decides how to phrase the failure.
  #[instrument(level = "info", skip(self, password), fields(%mobile))]
  pub async fn login(&self, mobile: &str, password: &str) -> Result<Option<UserProfile>> {
    let users = self.get_all_users().await;
    let found = users.into_iter().find(|u| {
      u.student_mobile == mobile && u.password.as_deref() == Some(password)
    });
    match found {
      Some(user) => {
        self.kv.set(KEY_SESSION, &serde_json::to_string(&user)?)?;
        info!(target: "store", user_id = %user.id, "login succeeded");
        Ok(Some(user))
      }
      None => Ok(None),
    }
  }

  /// Dual write: overwrite the session slot AND upsert the user row (replace
  /// by id, else append). One public operation on purpose — registration,
  /// login refresh and theme changes all rely on both effects together.
  #[instrument(level = "info", skip(self, user), fields(user_id = %user.id))]
  pub async fn save_user_session(&self, user: &UserProfile) -> Result<()> {
    self.kv.set(KEY_SESSION, &serde_json::to_string(user)?)?;

    let mut users = self.get_all_users().await;
    match users.iter_mut().find(|u| u.id == user.id) {
      Some(slot) => *slot = user.clone(),
      None => users.push(user.clone()),
    }
    self.kv.set(KEY_USERS, &serde_json::to_string(&users)?)?;
    Ok(())
  }

  /// Drops only the session pointer; the user row stays in the collection.
  #[instrument(level = "info", skip(self))]
  pub async fn logout(&self) -> Result<()> {
    self.kv.remove(KEY_SESSION)
  }

  // --- Messages ---

  #[instrument(level = "debug", skip(self))]
  pub async fn get_messages(&self) -> Vec<ChatMessage> {
    self.read_json(KEY_MESSAGES).unwrap_or_default()
  }

  /// Append-only message log in call order.
  #[instrument(level = "info", skip(self, msg), fields(msg_id = %msg.id))]
  pub async fn send_message(&self, msg: &ChatMessage) -> Result<()> {
    let mut msgs = self.get_messages().await;
    msgs.push(msg.clone());
    self.kv.set(KEY_MESSAGES, &serde_json::to_string(&msgs)?)?;
    Ok(())
  }

  #[cfg(test)]
  pub fn raw(&self) -> &KvStore {
    &self.kv
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Theme;
  use crate::seeds::initial_config;

  fn sample_user(id: &str, mobile: &str, pass: &str) -> UserProfile {
    UserProfile {
      id: id.into(),
      name: "রাফি আহমেদ".into(),
      class_name: "Class 8".into(),
      school: "আইডিয়াল একাডেমি".into(),
      student_mobile: mobile.into(),
      parent_mobile: String::new(),
      password: Some(pass.into()),
      points: 100,
      rank: 0,
      brain_power: 50,
      streak: 1,
      followers_count: 0,
      is_following: None,
      allow_messaging: true,
      theme: Some(Theme::Dark),
    }
  }

  fn sample_message(id: &str, text: &str) -> ChatMessage {
    ChatMessage {
      id: id.into(),
      sender_id: "u-1".into(),
      receiver_id: "u-2".into(),
      text: text.into(),
      timestamp: 1_724_832_000_000,
    }
  }

  #[tokio::test]
  async fn init_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(dir.path()).unwrap();
    let seed = initial_config();

    db.init(&seed).await.unwrap();
    let settings_1 = db.raw().get(KEY_SETTINGS).unwrap();
    let users_1 = db.raw().get(KEY_USERS).unwrap();
    let messages_1 = db.raw().get(KEY_MESSAGES).unwrap();
    let content_1 = db.raw().get(KEY_CONTENT).unwrap();

    db.init(&seed).await.unwrap();
    assert_eq!(db.raw().get(KEY_SETTINGS).unwrap(), settings_1);
    assert_eq!(db.raw().get(KEY_USERS).unwrap(), users_1);
    assert_eq!(db.raw().get(KEY_MESSAGES).unwrap(), messages_1);
    assert_eq!(db.raw().get(KEY_CONTENT).unwrap(), content_1);
  }

  #[tokio::test]
  async fn init_does_not_clobber_existing_users() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(dir.path()).unwrap();
    db.init(&initial_config()).await.unwrap();

    db.save_user_session(&sample_user("u-1", "01711111111", "secret")).await.unwrap();
    db.init(&initial_config()).await.unwrap();
    assert_eq!(db.get_all_users().await.len(), 1);
  }

  #[tokio::test]
  async fn save_user_session_couples_session_and_collection() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(dir.path()).unwrap();
    db.init(&initial_config()).await.unwrap();

    let user = sample_user("u-1", "01711111111", "secret");
    db.save_user_session(&user).await.unwrap();

    assert_eq!(db.get_user_session().await, Some(user.clone()));
    let users = db.get_all_users().await;
    assert_eq!(users, vec![user.clone()]);

    // Saving again with a changed theme replaces the row, never duplicates it.
    let mut updated = user;
    updated.theme = Some(Theme::Light);
    db.save_user_session(&updated).await.unwrap();
    assert_eq!(db.get_all_users().await, vec![updated.clone()]);
    assert_eq!(db.get_user_session().await, Some(updated));
  }

  #[tokio::test]
  async fn save_user_session_makes_any_user_the_active_session() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(dir.path()).unwrap();
    db.init(&initial_config()).await.unwrap();

    db.save_user_session(&sample_user("u-1", "01711111111", "a")).await.unwrap();
    db.save_user_session(&sample_user("u-2", "01722222222", "b")).await.unwrap();

    // The last saved user is the session, matching the coupled contract.
    assert_eq!(db.get_user_session().await.unwrap().id, "u-2");
    assert_eq!(db.get_all_users().await.len(), 2);
  }

  #[tokio::test]
  async fn login_requires_exact_match_on_both_fields() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(dir.path()).unwrap();
    db.init(&initial_config()).await.unwrap();

    let user = sample_user("u-1", "01711111111", "secret");
    db.save_user_session(&user).await.unwrap();
    db.logout().await.unwrap();

    assert_eq!(db.login("01711111111", "secret").await.unwrap(), Some(user.clone()));
    assert_eq!(db.login("01711111111", "wrong").await.unwrap(), None);
    assert_eq!(db.login("01799999999", "secret").await.unwrap(), None);

    // A successful login re-establishes the session.
    assert_eq!(db.get_user_session().await, Some(user));
  }

  #[tokio::test]
  async fn logout_keeps_the_user_record() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(dir.path()).unwrap();
    db.init(&initial_config()).await.unwrap();

    db.save_user_session(&sample_user("u-1", "01711111111", "secret")).await.unwrap();
    db.logout().await.unwrap();

    assert_eq!(db.get_user_session().await, None);
    assert_eq!(db.get_all_users().await.len(), 1);
  }

  #[tokio::test]
  async fn settings_round_trip_and_denormalized_content() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(dir.path()).unwrap();

    let mut cfg = initial_config();
    cfg.app_name = "টেস্ট একাডেমি".into();
    cfg.messaging_enabled = false;
    db.save_settings(&cfg).await.unwrap();

    assert_eq!(db.get_settings().await, Some(cfg.clone()));
    assert_eq!(db.get_content_classes().await, cfg.classes);
  }

  #[tokio::test]
  async fn messages_are_append_only_in_call_order() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(dir.path()).unwrap();
    db.init(&initial_config()).await.unwrap();

    for i in 0..4 {
      db.send_message(&sample_message(&format!("m-{i}"), "হ্যালো")).await.unwrap();
    }
    let msgs = db.get_messages().await;
    assert_eq!(msgs.len(), 4);
    let ids: Vec<_> = msgs.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["m-0", "m-1", "m-2", "m-3"]);
  }

  #[tokio::test]
  async fn corrupted_collections_read_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(dir.path()).unwrap();

    db.raw().set(KEY_USERS, "{not json").unwrap();
    db.raw().set(KEY_SETTINGS, "[]").unwrap();
    db.raw().set(KEY_MESSAGES, "42").unwrap();

    assert!(db.get_all_users().await.is_empty());
    assert_eq!(db.get_settings().await, None);
    assert!(db.get_messages().await.is_empty());
    assert_eq!(db.login("x", "y").await.unwrap(), None);
  }
}
