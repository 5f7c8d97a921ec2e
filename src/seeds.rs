//! Built-in seed data: the default admin configuration (branding, toggles and
//! the starter content tree) plus the default tutor system instruction.
//!
//! `Database::init` writes this config on first launch only; afterwards the
//! admin panel owns it.

use crate::domain::{
  AdminConfig, AuthMethod, Chapter, ClassCategory, Lesson, NavIcons, Subject,
};

/// Persona prompt for the AI tutor. Bengali-first, mirrors the tone used by
/// popular ed-tech platforms; admins can replace it from the settings panel.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "আপনি 'আইডিয়াল একাডেমি' (Ideal Academy) এর একজন এনার্জেটিক এবং স্মার্ট টিউটর। \
আপনার কথা বলার ভঙ্গি হবে খুবই বন্ধুত্বপূর্ণ, উৎসাহমূলক এবং সাবলীল - ঠিক যেমন ১০এমএস বা অন্যান্য জনপ্রিয় এডটেক প্ল্যাটফর্মের ইন্সট্রাক্টরদের মতো।\n\n\
মূল নিয়মাবলী:\n\
১. অভিবাদন: \"হ্যালো স্টুডেন্টস!\", \"কেমন আছো সবাই?\", \"আইডিয়াল একাডেমি-তে তোমাকে স্বাগতম!\", \"আজকে আমরা ফাটিয়ে দেব!\" - এই ধরণের এনার্জেটিক কথা দিয়ে শুরু করতে পারেন।\n\
২. ভাষা: শুদ্ধ বাংলা এবং ইংরেজির স্মার্ট মিশ্রণ। টেকনিক্যাল শব্দগুলো অবশ্যই ইংরেজিতে উল্লেখ করবেন।\n\
৩. উত্তর কাঠামো: ছোট ছোট প্যারাগ্রাফ, বুলেট পয়েন্ট এবং ইমোজি ব্যবহার করুন।";

/// Name every registered student gets as their school field.
pub const ACADEMY_NAME: &str = "আইডিয়াল একাডেমি";

/// Placeholder used when a lesson is published without a description.
pub const LESSON_DESC_PLACEHOLDER: &str = "এই লেসনের বিস্তারিত শীঘ্রই যোগ হবে।";

fn empty_class(id: &str, title: &str, icon: &str) -> ClassCategory {
  ClassCategory { id: id.into(), title: title.into(), icon: icon.into(), subjects: vec![] }
}

/// First-launch configuration: Class 6 ships with one worked example so the
/// admin panel and lesson viewer are not empty on a fresh install.
pub fn initial_config() -> AdminConfig {
  AdminConfig {
    app_name: ACADEMY_NAME.into(),
    app_logo: "🚀".into(),
    brand_color: "#F43F5E".into(),
    secondary_color: "#0F172A".into(),
    system_instruction: DEFAULT_SYSTEM_INSTRUCTION.into(),
    welcome_message: "চলো আজকে সেরা ফলাফল করি!".into(),
    messaging_enabled: true,
    ranking_enabled: true,
    auth_method: AuthMethod::Password,
    parent_mobile_mandatory: false,
    classes: vec![
      ClassCategory {
        id: "c6".into(),
        title: "Class 6".into(),
        icon: "📝".into(),
        subjects: vec![Subject {
          id: "s1".into(),
          title: "বিজ্ঞান".into(),
          icon: "🔬".into(),
          chapters: vec![Chapter {
            id: "ch1".into(),
            title: "প্রথম অধ্যায়".into(),
            lessons: vec![Lesson {
              id: "l1".into(),
              title: "বৈজ্ঞানিক পদ্ধতি".into(),
              video_url: "https://www.youtube.com/embed/dQw4w9WgXcQ".into(),
              description: "বিজ্ঞানের প্রাথমিক ধারণা।".into(),
            }],
          }],
        }],
      },
      empty_class("c7", "Class 7", "🎨"),
      empty_class("c8", "Class 8", "📐"),
      empty_class("c9", "Class 9", "🔭"),
      empty_class("c10", "Class 10", "📈"),
      empty_class("c11", "Class 11", "🧪"),
      empty_class("c12", "Class 12", "🧬"),
    ],
    courses: vec![],
    nav_icons: NavIcons::default(),
  }
}
