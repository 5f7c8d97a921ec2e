//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Registration / login / logout / theme changes (through the façade)
//!   - Peer messaging (append-only log, gated on the messaging toggle)
//!   - Leaderboard ranking
//!   - Quiz / chat / image-edit orchestration with Gemini fallbacks

use tracing::{error, info, instrument};

use crate::domain::{ChatMessage, LeaderboardEntry, QuizQuestion, Theme, UserProfile};
use crate::gemini::ChatMode;
use crate::seeds::ACADEMY_NAME;
use crate::state::AppState;
use crate::util::{now_millis, timestamp_id};

// User-facing messages stay in Bengali, matching the app frontend.
const MSG_NEED_MOBILE_AND_PASSWORD: &str = "মোবাইল ও পাসওয়ার্ড দিন!";
const MSG_NEED_NAME: &str = "আপনার নাম দিন!";
const MSG_BAD_CREDENTIALS: &str = "মোবাইল বা পাসওয়ার্ড সঠিক নয়!";
const MSG_SYSTEM_ERROR: &str = "সিস্টেম এরর! আবার চেষ্টা করুন।";
const MSG_MESSAGING_DISABLED: &str = "মেসেজিং এই মুহূর্তে বন্ধ আছে।";
const MSG_NOT_LOGGED_IN: &str = "আগে লগইন করুন!";

/// Create a student account with the fixed starter values and make it the
/// active session (the façade's dual write does both at once).
#[instrument(level = "info", skip(state, password), fields(%mobile, %class_name))]
pub async fn register(
  state: &AppState,
  name: &str,
  class_name: &str,
  mobile: &str,
  password: &str,
) -> Result<UserProfile, String> {
  if mobile.trim().is_empty() || password.is_empty() {
    return Err(MSG_NEED_MOBILE_AND_PASSWORD.into());
  }
  if name.trim().is_empty() {
    return Err(MSG_NEED_NAME.into());
  }

  let user = UserProfile {
    id: timestamp_id("u"),
    name: name.to_string(),
    class_name: class_name.to_string(),
    school: ACADEMY_NAME.into(),
    student_mobile: mobile.to_string(),
    parent_mobile: String::new(),
    password: Some(password.to_string()),
    points: 100,
    rank: 0,
    brain_power: 50,
    streak: 1,
    followers_count: 0,
    is_following: None,
    allow_messaging: true,
    theme: Some(Theme::Dark),
  };

  match state.db.save_user_session(&user).await {
    Ok(()) => {
      info!(target: "academy_backend", user_id = %user.id, "student registered");
      Ok(user)
    }
    Err(e) => {
      error!(target: "academy_backend", error = %e, "registration write failed");
      Err(MSG_SYSTEM_ERROR.into())
    }
  }
}

/// Credential login. A failed match gets one generic message; we do not
/// reveal whether the mobile or the password was wrong.
#[instrument(level = "info", skip(state, password), fields(%mobile))]
pub async fn login(state: &AppState, mobile: &str, password: &str) -> Result<UserProfile, String> {
  if mobile.trim().is_empty() || password.is_empty() {
    return Err(MSG_NEED_MOBILE_AND_PASSWORD.into());
  }
  match state.db.login(mobile, password).await {
    Ok(Some(user)) => Ok(user),
    Ok(None) => Err(MSG_BAD_CREDENTIALS.into()),
    Err(e) => {
      error!(target: "academy_backend", error = %e, "login store failure");
      Err(MSG_SYSTEM_ERROR.into())
    }
  }
}

/// Theme toggle for the logged-in student. Persists through the session/user
/// dual write so the preference survives re-login.
#[instrument(level = "info", skip(state), fields(theme = ?theme))]
pub async fn set_theme(state: &AppState, theme: Theme) -> Result<UserProfile, String> {
  let mut user = state.db.get_user_session().await.ok_or(MSG_NOT_LOGGED_IN)?;
  user.theme = Some(theme);
  state
    .db
    .save_user_session(&user)
    .await
    .map_err(|e| {
      error!(target: "academy_backend", error = %e, "theme write failed");
      MSG_SYSTEM_ERROR.to_string()
    })?;
  Ok(user)
}

/// Append one peer message to the log. Requires a session and the global
/// messaging toggle.
#[instrument(level = "info", skip(state, text), fields(%receiver_id, text_len = text.len()))]
pub async fn send_chat_message(
  state: &AppState,
  receiver_id: &str,
  text: &str,
) -> Result<ChatMessage, String> {
  let sender = state.db.get_user_session().await.ok_or(MSG_NOT_LOGGED_IN)?;
  let messaging_enabled = state
    .db
    .get_settings()
    .await
    .map(|c| c.messaging_enabled)
    .unwrap_or(true);
  if !messaging_enabled {
    return Err(MSG_MESSAGING_DISABLED.into());
  }

  let msg = ChatMessage {
    id: timestamp_id("m"),
    sender_id: sender.id,
    receiver_id: receiver_id.to_string(),
    text: text.to_string(),
    timestamp: now_millis(),
  };
  state.db.send_message(&msg).await.map_err(|e| {
    error!(target: "messaging", error = %e, "message write failed");
    MSG_SYSTEM_ERROR.to_string()
  })?;
  Ok(msg)
}

/// Stable ranking: points descending, ties keep their original relative
/// order, rank is the 1-based position.
pub fn rank_users(users: &[UserProfile], viewer_id: Option<&str>) -> Vec<LeaderboardEntry> {
  let mut sorted: Vec<&UserProfile> = users.iter().collect();
  sorted.sort_by(|a, b| b.points.cmp(&a.points));
  sorted
    .into_iter()
    .enumerate()
    .map(|(idx, u)| LeaderboardEntry {
      id: u.id.clone(),
      name: u.name.clone(),
      class_name: u.class_name.clone(),
      school: u.school.clone(),
      points: u.points,
      rank: (idx + 1) as u32,
      is_current_user: viewer_id.filter(|v| *v == u.id).map(|_| true),
    })
    .collect()
}

/// Leaderboard over the whole user collection; empty when ranking is turned
/// off in the admin settings.
#[instrument(level = "info", skip(state))]
pub async fn leaderboard(state: &AppState, viewer_id: Option<&str>) -> Vec<LeaderboardEntry> {
  let ranking_enabled = state
    .db
    .get_settings()
    .await
    .map(|c| c.ranking_enabled)
    .unwrap_or(true);
  if !ranking_enabled {
    return vec![];
  }
  rank_users(&state.db.get_all_users().await, viewer_id)
}

// -------- AI orchestration (fallbacks, never fatal) --------

/// Tutor chat turn. Any failure degrades to the configured apology line.
#[instrument(level = "info", skip(state, prompt), fields(mode = ?mode, prompt_len = prompt.len()))]
pub async fn do_chat(state: &AppState, prompt: &str, mode: ChatMode) -> String {
  if let Some(g) = &state.gemini {
    let system = state.system_instruction().await;
    match g.chat(&system, prompt, mode).await {
      Ok(text) if !text.is_empty() => return text,
      Ok(_) => error!(target: "academy_backend", "Gemini chat returned empty text"),
      Err(e) => error!(target: "academy_backend", error = %e, "Gemini chat failed"),
    }
  }
  state.prompts.chat_unavailable.clone()
}

/// Quiz generation. Failures come back as an empty set; the frontend prompts
/// the student to retry.
#[instrument(level = "info", skip(state), fields(%topic, %class_name, %subject))]
pub async fn do_quiz(
  state: &AppState,
  topic: &str,
  class_name: &str,
  subject: &str,
) -> Vec<QuizQuestion> {
  if let Some(g) = &state.gemini {
    let system = state.system_instruction().await;
    match g.generate_quiz(&system, &state.prompts, topic, class_name, subject).await {
      Ok(questions) => return questions,
      Err(e) => error!(target: "academy_backend", error = %e, "Gemini quiz generation failed"),
    }
  }
  vec![]
}

/// Image edit. `None` signals failure or an absent client; no retry.
#[instrument(level = "info", skip(state, prompt, image_base64), fields(%mime_type, image_len = image_base64.len()))]
pub async fn do_edit_image(
  state: &AppState,
  prompt: &str,
  image_base64: &str,
  mime_type: &str,
) -> Option<String> {
  let g = state.gemini.as_ref()?;
  match g.edit_image(prompt, image_base64, mime_type).await {
    Ok(result) => result,
    Err(e) => {
      error!(target: "academy_backend", error = %e, "Gemini image edit failed");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Prompts;
  use crate::db::Database;
  use crate::seeds::initial_config;

  fn temp_state() -> (tempfile::TempDir, AppState) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(dir.path()).unwrap();
    (dir, AppState::from_parts(db, Prompts::default(), None))
  }

  fn user_with_points(id: &str, name: &str, points: i64) -> UserProfile {
    UserProfile {
      id: id.into(),
      name: name.into(),
      class_name: "Class 9".into(),
      school: ACADEMY_NAME.into(),
      student_mobile: format!("0171{id}"),
      parent_mobile: String::new(),
      password: Some("pw".into()),
      points,
      rank: 0,
      brain_power: 50,
      streak: 1,
      followers_count: 0,
      is_following: None,
      allow_messaging: true,
      theme: None,
    }
  }

  #[test]
  fn ranking_orders_by_points_descending() {
    let users = vec![
      user_with_points("u-1", "ক", 10),
      user_with_points("u-2", "খ", 50),
      user_with_points("u-3", "গ", 30),
    ];
    let entries = rank_users(&users, None);
    let ranked: Vec<(i64, u32)> = entries.iter().map(|e| (e.points, e.rank)).collect();
    assert_eq!(ranked, [(50, 1), (30, 2), (10, 3)]);
  }

  #[test]
  fn ranking_breaks_ties_by_original_order() {
    let users = vec![
      user_with_points("u-1", "ক", 30),
      user_with_points("u-2", "খ", 30),
      user_with_points("u-3", "গ", 40),
    ];
    let entries = rank_users(&users, Some("u-2"));
    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["u-3", "u-1", "u-2"]);
    assert_eq!(entries[2].is_current_user, Some(true));
    assert_eq!(entries[0].is_current_user, None);
  }

  #[tokio::test]
  async fn registration_assigns_starter_values_and_session() {
    let (_dir, state) = temp_state();
    state.db.init(&initial_config()).await.unwrap();

    let user = register(&state, "রাফি আহমেদ", "Class 6", "01712345678", "secret")
      .await
      .unwrap();
    assert!(user.id.starts_with("u-"));
    assert_eq!(user.points, 100);
    assert_eq!(user.brain_power, 50);
    assert_eq!(user.streak, 1);
    assert_eq!(user.school, ACADEMY_NAME);
    assert_eq!(user.theme, Some(Theme::Dark));

    // The dual write made the new student the active session.
    assert_eq!(state.db.get_user_session().await.unwrap().id, user.id);
    assert_eq!(state.db.get_all_users().await.len(), 1);
  }

  #[tokio::test]
  async fn registration_validates_required_fields() {
    let (_dir, state) = temp_state();
    state.db.init(&initial_config()).await.unwrap();

    assert!(register(&state, "নাম", "Class 6", "", "pw").await.is_err());
    assert!(register(&state, "নাম", "Class 6", "0171", "").await.is_err());
    assert!(register(&state, "", "Class 6", "0171", "pw").await.is_err());
    assert!(state.db.get_all_users().await.is_empty());
  }

  #[tokio::test]
  async fn login_failure_is_one_generic_message() {
    let (_dir, state) = temp_state();
    state.db.init(&initial_config()).await.unwrap();
    register(&state, "রাফি", "Class 6", "01712345678", "secret").await.unwrap();
    state.db.logout().await.unwrap();

    let unknown_mobile = login(&state, "01799999999", "secret").await.unwrap_err();
    let wrong_password = login(&state, "01712345678", "nope").await.unwrap_err();
    assert_eq!(unknown_mobile, wrong_password);

    assert!(login(&state, "01712345678", "secret").await.is_ok());
  }

  #[tokio::test]
  async fn theme_change_persists_to_user_row() {
    let (_dir, state) = temp_state();
    state.db.init(&initial_config()).await.unwrap();
    register(&state, "রাফি", "Class 6", "01712345678", "secret").await.unwrap();

    let updated = set_theme(&state, Theme::Light).await.unwrap();
    assert_eq!(updated.theme, Some(Theme::Light));
    assert_eq!(state.db.get_all_users().await[0].theme, Some(Theme::Light));
  }

  #[tokio::test]
  async fn messaging_respects_the_admin_toggle() {
    let (_dir, state) = temp_state();
    state.db.init(&initial_config()).await.unwrap();
    register(&state, "রাফি", "Class 6", "01712345678", "secret").await.unwrap();

    let msg = send_chat_message(&state, "u-other", "হ্যালো!").await.unwrap();
    assert!(msg.id.starts_with("m-"));
    assert_eq!(state.db.get_messages().await.len(), 1);

    let mut cfg = state.db.get_settings().await.unwrap();
    cfg.messaging_enabled = false;
    state.db.save_settings(&cfg).await.unwrap();
    assert!(send_chat_message(&state, "u-other", "আবার").await.is_err());
    assert_eq!(state.db.get_messages().await.len(), 1);
  }

  #[tokio::test]
  async fn leaderboard_is_empty_when_ranking_disabled() {
    let (_dir, state) = temp_state();
    state.db.init(&initial_config()).await.unwrap();
    register(&state, "রাফি", "Class 6", "01712345678", "secret").await.unwrap();
    assert_eq!(leaderboard(&state, None).await.len(), 1);

    let mut cfg = state.db.get_settings().await.unwrap();
    cfg.ranking_enabled = false;
    state.db.save_settings(&cfg).await.unwrap();
    assert!(leaderboard(&state, None).await.is_empty());
  }

  #[tokio::test]
  async fn ai_helpers_degrade_without_a_client() {
    let (_dir, state) = temp_state();
    state.db.init(&initial_config()).await.unwrap();

    let reply = do_chat(&state, "পদার্থবিজ্ঞান কী?", ChatMode::Fast).await;
    assert_eq!(reply, state.prompts.chat_unavailable);
    assert!(do_quiz(&state, "সালোকসংশ্লেষণ", "Class 9", "জীববিজ্ঞান").await.is_empty());
    assert_eq!(do_edit_image(&state, "make it blue", "aGVsbG8=", "image/png").await, None);
  }
}
