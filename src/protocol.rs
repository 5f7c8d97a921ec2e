//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{
    AdminConfig, ChatMessage, ClassCategory, LeaderboardEntry, MessageRequest, QuizQuestion,
    Theme, UserProfile,
};
use crate::gemini::ChatMode;

/// Messages the client can send over WebSocket (the AI tutor panel).
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    TutorMessage {
        prompt: String,
        #[serde(default)]
        mode: ChatMode,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    TutorReply {
        text: String,
    },
    Error {
        message: String,
    },
}

//
// HTTP request/response DTOs
//

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterIn {
    pub name: String,
    pub class_name: String,
    pub mobile: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginIn {
    pub mobile: String,
    pub password: String,
}

/// Auth success carries the profile; failure carries one generic message.
#[derive(Serialize)]
pub struct AuthOut {
    pub user: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct SessionOut {
    pub user: Option<UserProfile>,
}

#[derive(Debug, Deserialize)]
pub struct ThemeIn {
    pub theme: Theme,
}

#[derive(Serialize)]
pub struct UsersOut {
    pub users: Vec<UserProfile>,
}

#[derive(Serialize)]
pub struct SettingsOut {
    pub settings: Option<AdminConfig>,
}

#[derive(Serialize)]
pub struct ContentOut {
    pub classes: Vec<ClassCategory>,
}

#[derive(Serialize)]
pub struct SavedOut {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardQuery {
    pub viewer_id: Option<String>,
}

#[derive(Serialize)]
pub struct LeaderboardOut {
    pub entries: Vec<LeaderboardEntry>,
}

#[derive(Serialize)]
pub struct MessagesOut {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageIn {
    pub receiver_id: String,
    pub text: String,
}

#[derive(Serialize)]
pub struct SendMessageOut {
    pub message: Option<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestsQuery {
    pub receiver_id: String,
}

#[derive(Serialize)]
pub struct RequestsOut {
    pub requests: Vec<MessageRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestIn {
    pub sender_id: String,
    pub sender_name: String,
    pub receiver_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestActionIn {
    pub request_id: String,
}

#[derive(Serialize)]
pub struct RequestOut {
    pub request: Option<MessageRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizIn {
    pub topic: String,
    pub class_name: String,
    pub subject: String,
}

#[derive(Serialize)]
pub struct QuizOut {
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct ChatIn {
    pub prompt: String,
    #[serde(default)]
    pub mode: ChatMode,
}

#[derive(Serialize)]
pub struct ChatOut {
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageEditIn {
    pub prompt: String,
    pub image_base64: String,
    pub mime_type: String,
}

/// `image` is a data URL on success and absent when the edit failed.
#[derive(Serialize)]
pub struct ImageEditOut {
    pub image: Option<String>,
}

//
// Admin draft DTOs
//

#[derive(Serialize)]
pub struct DraftOut {
    pub config: AdminConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSubjectIn {
    pub class_id: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChapterIn {
    pub class_id: String,
    pub subject_id: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLessonIn {
    pub class_id: String,
    pub subject_id: String,
    pub chapter_id: String,
    pub title: String,
    pub video_url: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSubjectIn {
    pub class_id: String,
    pub subject_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteChapterIn {
    pub class_id: String,
    pub subject_id: String,
    pub chapter_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteLessonIn {
    pub class_id: String,
    pub subject_id: String,
    pub chapter_id: String,
    pub lesson_id: String,
}

/// Outcome of one draft edit. `changed` is false for validation no-ops and
/// unknown targets; `error` carries the blocking prompt text when the edit
/// was rejected outright.
#[derive(Serialize)]
pub struct EditOut {
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
