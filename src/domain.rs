//! Domain models used by the backend: user profiles, messages, the admin
//! configuration, and the Class → Subject → Chapter → Lesson content tree.
//!
//! Wire and storage names stay camelCase so the JSON files remain readable by
//! the original frontend.

use serde::{Deserialize, Serialize};

/// How students authenticate.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
  Otp,
  Password,
  Both,
}
impl Default for AuthMethod {
  fn default() -> Self { AuthMethod::Password }
}

/// A single video lesson, the leaf of the content tree.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
  pub id: String,
  pub title: String,
  pub video_url: String,
  pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Chapter {
  pub id: String,
  pub title: String,
  pub lessons: Vec<Lesson>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Subject {
  pub id: String,
  pub title: String,
  pub icon: String,
  pub chapters: Vec<Chapter>,
}

/// Top level of the content tree (one per school class).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClassCategory {
  pub id: String,
  pub title: String,
  pub icon: String,
  pub subjects: Vec<Subject>,
}

/// Paid-course entry. The source app left these untyped; the schema is fixed
/// here so the collection stays concrete.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CourseEntry {
  pub id: String,
  pub title: String,
  #[serde(default)] pub description: String,
  #[serde(default)] pub price: f64,
}

/// Emoji set for the navigation bar.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NavIcons {
  pub dashboard: String,
  pub lesson: String,
  pub quiz: String,
  pub leaderboard: String,
  pub messages: String,
  pub admin: String,
  pub ai: String,
}
impl Default for NavIcons {
  fn default() -> Self {
    Self {
      dashboard: "🏠".into(),
      lesson: "📚".into(),
      quiz: "📝".into(),
      leaderboard: "🏆".into(),
      messages: "💬".into(),
      admin: "⚙️".into(),
      ai: "🤖".into(),
    }
  }
}

/// Global singleton configuration: branding, feature toggles, auth policy and
/// the whole content tree. Replaced wholesale on every save.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminConfig {
  pub app_name: String,
  pub app_logo: String,
  pub brand_color: String,
  pub secondary_color: String,
  pub system_instruction: String,
  pub welcome_message: String,
  pub messaging_enabled: bool,
  pub ranking_enabled: bool,
  pub auth_method: AuthMethod,
  pub parent_mobile_mandatory: bool,
  pub classes: Vec<ClassCategory>,
  #[serde(default)] pub courses: Vec<CourseEntry>,
  #[serde(default)] pub nav_icons: NavIcons,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
  Light,
  Dark,
}

/// Student record. Credentials are stored as-is (plaintext) to stay
/// byte-compatible with the original storage layout.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
  pub id: String,
  pub name: String,
  pub class_name: String,
  pub school: String,
  pub student_mobile: String,
  #[serde(default)] pub parent_mobile: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub password: Option<String>,
  pub points: i64,
  pub rank: u32,
  pub brain_power: i64,
  pub streak: u32,
  pub followers_count: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub is_following: Option<bool>,
  pub allow_messaging: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub theme: Option<Theme>,
}

/// Peer-to-peer chat message. Append-only; there is no edit or delete.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
  pub id: String,
  pub sender_id: String,
  pub receiver_id: String,
  pub text: String,
  pub timestamp: u64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
  Pending,
  Accepted,
  Declined,
}

/// Messaging handshake between two students. Lives in server memory only;
/// accept/decline never reach the store (matches the source app, where a
/// reload resurrects declined requests).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
  pub id: String,
  pub sender_id: String,
  pub sender_name: String,
  pub receiver_id: String,
  pub status: RequestStatus,
}

/// One multiple-choice question as returned by the quiz generator.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
  pub question: String,
  pub options: Vec<String>,
  pub correct_index: u32,
  pub explanation: String,
}

/// Public leaderboard row derived from the user collection.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
  pub id: String,
  pub name: String,
  pub class_name: String,
  pub school: String,
  pub points: i64,
  pub rank: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub is_current_user: Option<bool>,
}
