//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs include parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{State, Query}, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::content;
use crate::domain::UserProfile;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

// --- Auth & session ---

#[instrument(level = "info", skip(state, body), fields(mobile = %body.mobile))]
pub async fn http_post_register(
  State(state): State<Arc<AppState>>,
  Json(body): Json<RegisterIn>,
) -> impl IntoResponse {
  match register(&state, &body.name, &body.class_name, &body.mobile, &body.password).await {
    Ok(user) => Json(AuthOut { user: Some(user), error: None }),
    Err(message) => Json(AuthOut { user: None, error: Some(message) }),
  }
}

#[instrument(level = "info", skip(state, body), fields(mobile = %body.mobile))]
pub async fn http_post_login(
  State(state): State<Arc<AppState>>,
  Json(body): Json<LoginIn>,
) -> impl IntoResponse {
  match login(&state, &body.mobile, &body.password).await {
    Ok(user) => {
      info!(target: "academy_backend", user_id = %user.id, "HTTP login succeeded");
      Json(AuthOut { user: Some(user), error: None })
    }
    Err(message) => Json(AuthOut { user: None, error: Some(message) }),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_logout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let ok = state.db.logout().await.is_ok();
  Json(SavedOut { ok, error: None })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(SessionOut { user: state.db.get_user_session().await })
}

/// Persist a full user record AND make it the active session (the façade's
/// coupled dual write). The frontend uses this for profile edits.
#[instrument(level = "info", skip(state, body), fields(user_id = %body.id))]
pub async fn http_post_session(
  State(state): State<Arc<AppState>>,
  Json(body): Json<UserProfile>,
) -> impl IntoResponse {
  match state.db.save_user_session(&body).await {
    Ok(()) => Json(SavedOut { ok: true, error: None }),
    Err(e) => Json(SavedOut { ok: false, error: Some(e.to_string()) }),
  }
}

#[instrument(level = "info", skip(state, body), fields(theme = ?body.theme))]
pub async fn http_post_theme(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ThemeIn>,
) -> impl IntoResponse {
  match set_theme(&state, body.theme).await {
    Ok(user) => Json(AuthOut { user: Some(user), error: None }),
    Err(message) => Json(AuthOut { user: None, error: Some(message) }),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_users(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(UsersOut { users: state.db.get_all_users().await })
}

// --- Settings, content, leaderboard ---

#[instrument(level = "info", skip(state))]
pub async fn http_get_settings(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(SettingsOut { settings: state.db.get_settings().await })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_content(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(ContentOut { classes: state.db.get_content_classes().await })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_leaderboard(
  State(state): State<Arc<AppState>>,
  Query(q): Query<LeaderboardQuery>,
) -> impl IntoResponse {
  let entries = leaderboard(&state, q.viewer_id.as_deref()).await;
  info!(target: "academy_backend", count = entries.len(), "HTTP leaderboard served");
  Json(LeaderboardOut { entries })
}

// --- Peer messaging ---

#[instrument(level = "info", skip(state))]
pub async fn http_get_messages(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(MessagesOut { messages: state.db.get_messages().await })
}

#[instrument(level = "info", skip(state, body), fields(receiver = %body.receiver_id, text_len = body.text.len()))]
pub async fn http_post_message(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SendMessageIn>,
) -> impl IntoResponse {
  match send_chat_message(&state, &body.receiver_id, &body.text).await {
    Ok(msg) => Json(SendMessageOut { message: Some(msg), error: None }),
    Err(message) => Json(SendMessageOut { message: None, error: Some(message) }),
  }
}

#[instrument(level = "info", skip(state), fields(receiver = %q.receiver_id))]
pub async fn http_get_requests(
  State(state): State<Arc<AppState>>,
  Query(q): Query<RequestsQuery>,
) -> impl IntoResponse {
  Json(RequestsOut { requests: state.requests_for(&q.receiver_id).await })
}

#[instrument(level = "info", skip(state, body), fields(sender = %body.sender_id, receiver = %body.receiver_id))]
pub async fn http_post_request(
  State(state): State<Arc<AppState>>,
  Json(body): Json<CreateRequestIn>,
) -> impl IntoResponse {
  let req = state.create_request(&body.sender_id, &body.sender_name, &body.receiver_id).await;
  Json(RequestOut { request: Some(req) })
}

#[instrument(level = "info", skip(state, body), fields(request_id = %body.request_id))]
pub async fn http_post_request_accept(
  State(state): State<Arc<AppState>>,
  Json(body): Json<RequestActionIn>,
) -> impl IntoResponse {
  Json(RequestOut { request: state.accept_request(&body.request_id).await })
}

#[instrument(level = "info", skip(state, body), fields(request_id = %body.request_id))]
pub async fn http_post_request_decline(
  State(state): State<Arc<AppState>>,
  Json(body): Json<RequestActionIn>,
) -> impl IntoResponse {
  let removed = state.decline_request(&body.request_id).await;
  Json(SavedOut { ok: removed, error: None })
}

// --- AI features ---

#[instrument(level = "info", skip(state, body), fields(topic = %body.topic, class_name = %body.class_name))]
pub async fn http_post_quiz(
  State(state): State<Arc<AppState>>,
  Json(body): Json<QuizIn>,
) -> impl IntoResponse {
  let questions = do_quiz(&state, &body.topic, &body.class_name, &body.subject).await;
  info!(target: "academy_backend", count = questions.len(), "HTTP quiz served");
  Json(QuizOut { questions })
}

#[instrument(level = "info", skip(state, body), fields(mode = ?body.mode, prompt_len = body.prompt.len()))]
pub async fn http_post_chat(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ChatIn>,
) -> impl IntoResponse {
  let text = do_chat(&state, &body.prompt, body.mode).await;
  Json(ChatOut { text })
}

#[instrument(level = "info", skip(state, body), fields(mime = %body.mime_type, image_len = body.image_base64.len()))]
pub async fn http_post_image_edit(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ImageEditIn>,
) -> impl IntoResponse {
  let image = do_edit_image(&state, &body.prompt, &body.image_base64, &body.mime_type).await;
  Json(ImageEditOut { image })
}

// --- Admin draft (content tree editing) ---

#[instrument(level = "info", skip(state))]
pub async fn http_get_draft(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(DraftOut { config: state.open_draft().await })
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_draft_save(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  match state.save_draft().await {
    Ok(_) => Json(SavedOut { ok: true, error: None }),
    Err(message) => Json(SavedOut { ok: false, error: Some(message) }),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_draft_discard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  state.discard_draft().await;
  Json(SavedOut { ok: true, error: None })
}

fn edit_out(result: Result<bool, String>) -> Json<EditOut> {
  match result {
    Ok(changed) => Json(EditOut { changed, error: None }),
    Err(message) => Json(EditOut { changed: false, error: Some(message) }),
  }
}

#[instrument(level = "info", skip(state, body), fields(class_id = %body.class_id, title = %body.title))]
pub async fn http_post_add_subject(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AddSubjectIn>,
) -> impl IntoResponse {
  edit_out(state.edit_draft(|cfg| content::add_subject(cfg, &body.class_id, &body.title)).await)
}

#[instrument(level = "info", skip(state, body), fields(class_id = %body.class_id, subject_id = %body.subject_id))]
pub async fn http_post_add_chapter(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AddChapterIn>,
) -> impl IntoResponse {
  edit_out(
    state
      .edit_draft(|cfg| content::add_chapter(cfg, &body.class_id, &body.subject_id, &body.title))
      .await,
  )
}

#[instrument(level = "info", skip(state, body), fields(class_id = %body.class_id, chapter_id = %body.chapter_id))]
pub async fn http_post_add_lesson(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AddLessonIn>,
) -> impl IntoResponse {
  let result = state
    .edit_draft(|cfg| {
      content::add_lesson(
        cfg,
        &body.class_id,
        &body.subject_id,
        &body.chapter_id,
        &body.title,
        &body.video_url,
        &body.description,
      )
    })
    .await;
  // Flatten draft errors and validation errors into one message slot.
  match result {
    Ok(Ok(changed)) => Json(EditOut { changed, error: None }),
    Ok(Err(e)) => Json(EditOut { changed: false, error: Some(e.to_string()) }),
    Err(message) => Json(EditOut { changed: false, error: Some(message) }),
  }
}

#[instrument(level = "info", skip(state, body), fields(subject_id = %body.subject_id))]
pub async fn http_post_delete_subject(
  State(state): State<Arc<AppState>>,
  Json(body): Json<DeleteSubjectIn>,
) -> impl IntoResponse {
  edit_out(
    state
      .edit_draft(|cfg| content::delete_subject(cfg, &body.class_id, &body.subject_id))
      .await,
  )
}

#[instrument(level = "info", skip(state, body), fields(chapter_id = %body.chapter_id))]
pub async fn http_post_delete_chapter(
  State(state): State<Arc<AppState>>,
  Json(body): Json<DeleteChapterIn>,
) -> impl IntoResponse {
  edit_out(
    state
      .edit_draft(|cfg| {
        content::delete_chapter(cfg, &body.class_id, &body.subject_id, &body.chapter_id)
      })
      .await,
  )
}

#[instrument(level = "info", skip(state, body), fields(lesson_id = %body.lesson_id))]
pub async fn http_post_delete_lesson(
  State(state): State<Arc<AppState>>,
  Json(body): Json<DeleteLessonIn>,
) -> impl IntoResponse {
  edit_out(
    state
      .edit_draft(|cfg| {
        content::delete_lesson(
          cfg,
          &body.class_id,
          &body.subject_id,
          &body.chapter_id,
          &body.lesson_id,
        )
      })
      .await,
  )
}
