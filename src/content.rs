//! Content tree editing: structural CRUD over Class → Subject → Chapter →
//! Lesson, operating on a draft `AdminConfig`.
//!
//! Nothing here touches the store. The admin surface opens a draft, applies
//! any number of edits in memory, and only an explicit save hands the full
//! draft to `Database::save_settings`. There is no incremental persistence
//! and no concurrency guard between admin sessions (last write wins).

use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{AdminConfig, Chapter, ClassCategory, Lesson, Subject};
use crate::seeds::LESSON_DESC_PLACEHOLDER;
use crate::util::timestamp_id;

/// Validation failures surfaced to the admin as a blocking prompt.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EditError {
  /// A lesson needs both a title and a video link before it can be published.
  #[error("টাইটেল এবং ভিডিও লিঙ্ক অবশ্যই দিতে হবে!")]
  MissingLessonFields,
}

fn find_class<'a>(cfg: &'a mut AdminConfig, class_id: &str) -> Option<&'a mut ClassCategory> {
  cfg.classes.iter_mut().find(|c| c.id == class_id)
}

fn find_subject<'a>(
  cfg: &'a mut AdminConfig,
  class_id: &str,
  subject_id: &str,
) -> Option<&'a mut Subject> {
  find_class(cfg, class_id)?.subjects.iter_mut().find(|s| s.id == subject_id)
}

fn find_chapter<'a>(
  cfg: &'a mut AdminConfig,
  class_id: &str,
  subject_id: &str,
  chapter_id: &str,
) -> Option<&'a mut Chapter> {
  find_subject(cfg, class_id, subject_id)?.chapters.iter_mut().find(|c| c.id == chapter_id)
}

/// Append a subject with an empty chapter list to the selected class.
/// No-op (returns false) when the title is empty or the class is unknown.
#[instrument(level = "debug", skip(cfg), fields(%class_id))]
pub fn add_subject(cfg: &mut AdminConfig, class_id: &str, title: &str) -> bool {
  if title.trim().is_empty() {
    return false;
  }
  match find_class(cfg, class_id) {
    Some(cls) => {
      let subject = Subject {
        id: timestamp_id("s"),
        title: title.to_string(),
        icon: "📚".into(),
        chapters: vec![],
      };
      debug!(target: "content", subject_id = %subject.id, "subject added to draft");
      cls.subjects.push(subject);
      true
    }
    None => false,
  }
}

/// Append a chapter with an empty lesson list under the named subject.
/// No-op when the title is empty or the path is unknown.
#[instrument(level = "debug", skip(cfg), fields(%class_id, %subject_id))]
pub fn add_chapter(cfg: &mut AdminConfig, class_id: &str, subject_id: &str, title: &str) -> bool {
  if title.trim().is_empty() {
    return false;
  }
  match find_subject(cfg, class_id, subject_id) {
    Some(sub) => {
      let chapter = Chapter { id: timestamp_id("ch"), title: title.to_string(), lessons: vec![] };
      debug!(target: "content", chapter_id = %chapter.id, "chapter added to draft");
      sub.chapters.push(chapter);
      true
    }
    None => false,
  }
}

/// Publish a lesson under the named chapter. Title and video link are
/// mandatory; an empty description falls back to the fixed placeholder.
/// Returns Ok(false) when the target chapter does not exist.
#[instrument(level = "debug", skip(cfg, description), fields(%class_id, %subject_id, %chapter_id))]
pub fn add_lesson(
  cfg: &mut AdminConfig,
  class_id: &str,
  subject_id: &str,
  chapter_id: &str,
  title: &str,
  video_url: &str,
  description: &str,
) -> Result<bool, EditError> {
  if title.trim().is_empty() || video_url.trim().is_empty() {
    return Err(EditError::MissingLessonFields);
  }
  match find_chapter(cfg, class_id, subject_id, chapter_id) {
    Some(ch) => {
      let lesson = Lesson {
        id: timestamp_id("l"),
        title: title.to_string(),
        video_url: video_url.to_string(),
        description: if description.trim().is_empty() {
          LESSON_DESC_PLACEHOLDER.into()
        } else {
          description.to_string()
        },
      };
      debug!(target: "content", lesson_id = %lesson.id, "lesson added to draft");
      ch.lessons.push(lesson);
      Ok(true)
    }
    None => Ok(false),
  }
}

/// Remove a subject by id. Its chapters and lessons go with it.
#[instrument(level = "debug", skip(cfg), fields(%class_id, %subject_id))]
pub fn delete_subject(cfg: &mut AdminConfig, class_id: &str, subject_id: &str) -> bool {
  match find_class(cfg, class_id) {
    Some(cls) => {
      let before = cls.subjects.len();
      cls.subjects.retain(|s| s.id != subject_id);
      cls.subjects.len() != before
    }
    None => false,
  }
}

#[instrument(level = "debug", skip(cfg), fields(%class_id, %subject_id, %chapter_id))]
pub fn delete_chapter(
  cfg: &mut AdminConfig,
  class_id: &str,
  subject_id: &str,
  chapter_id: &str,
) -> bool {
  match find_subject(cfg, class_id, subject_id) {
    Some(sub) => {
      let before = sub.chapters.len();
      sub.chapters.retain(|c| c.id != chapter_id);
      sub.chapters.len() != before
    }
    None => false,
  }
}

#[instrument(level = "debug", skip(cfg), fields(%class_id, %subject_id, %chapter_id, %lesson_id))]
pub fn delete_lesson(
  cfg: &mut AdminConfig,
  class_id: &str,
  subject_id: &str,
  chapter_id: &str,
  lesson_id: &str,
) -> bool {
  match find_chapter(cfg, class_id, subject_id, chapter_id) {
    Some(ch) => {
      let before = ch.lessons.len();
      ch.lessons.retain(|l| l.id != lesson_id);
      ch.lessons.len() != before
    }
    None => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn empty_class_config() -> AdminConfig {
    let mut cfg = crate::seeds::initial_config();
    cfg.classes = vec![ClassCategory {
      id: "c6".into(),
      title: "Class 6".into(),
      icon: "📝".into(),
      subjects: vec![],
    }];
    cfg
  }

  #[test]
  fn add_subject_then_chapter_then_lesson() {
    let mut cfg = empty_class_config();

    assert!(add_subject(&mut cfg, "c6", "বিজ্ঞান"));
    assert_eq!(cfg.classes[0].subjects.len(), 1);
    let subject_id = cfg.classes[0].subjects[0].id.clone();
    assert_eq!(cfg.classes[0].subjects[0].title, "বিজ্ঞান");
    assert!(cfg.classes[0].subjects[0].chapters.is_empty());

    assert!(add_chapter(&mut cfg, "c6", &subject_id, "প্রথম অধ্যায়"));
    let chapter_id = cfg.classes[0].subjects[0].chapters[0].id.clone();
    assert!(cfg.classes[0].subjects[0].chapters[0].lessons.is_empty());

    let added = add_lesson(&mut cfg, "c6", &subject_id, &chapter_id, "T", "U", "").unwrap();
    assert!(added);
    let lesson = &cfg.classes[0].subjects[0].chapters[0].lessons[0];
    assert_eq!(lesson.title, "T");
    assert_eq!(lesson.video_url, "U");
    assert_eq!(lesson.description, LESSON_DESC_PLACEHOLDER);
  }

  #[test]
  fn empty_titles_are_no_ops() {
    let mut cfg = empty_class_config();
    assert!(!add_subject(&mut cfg, "c6", ""));
    assert!(!add_subject(&mut cfg, "c6", "   "));
    assert!(cfg.classes[0].subjects.is_empty());

    add_subject(&mut cfg, "c6", "গণিত");
    let subject_id = cfg.classes[0].subjects[0].id.clone();
    assert!(!add_chapter(&mut cfg, "c6", &subject_id, ""));
    assert!(cfg.classes[0].subjects[0].chapters.is_empty());
  }

  #[test]
  fn unknown_class_is_a_no_op() {
    let mut cfg = empty_class_config();
    assert!(!add_subject(&mut cfg, "c99", "বিজ্ঞান"));
    assert!(cfg.classes[0].subjects.is_empty());
  }

  #[test]
  fn missing_video_url_blocks_the_lesson() {
    let mut cfg = empty_class_config();
    add_subject(&mut cfg, "c6", "বিজ্ঞান");
    let subject_id = cfg.classes[0].subjects[0].id.clone();
    add_chapter(&mut cfg, "c6", &subject_id, "প্রথম অধ্যায়");
    let chapter_id = cfg.classes[0].subjects[0].chapters[0].id.clone();

    let err = add_lesson(&mut cfg, "c6", &subject_id, &chapter_id, "T", "", "desc");
    assert_eq!(err, Err(EditError::MissingLessonFields));
    assert!(cfg.classes[0].subjects[0].chapters[0].lessons.is_empty());

    let err = add_lesson(&mut cfg, "c6", &subject_id, &chapter_id, "", "U", "desc");
    assert_eq!(err, Err(EditError::MissingLessonFields));
    assert!(cfg.classes[0].subjects[0].chapters[0].lessons.is_empty());
  }

  #[test]
  fn delete_subject_cascades() {
    let mut cfg = empty_class_config();
    add_subject(&mut cfg, "c6", "বিজ্ঞান");
    let subject_id = cfg.classes[0].subjects[0].id.clone();
    add_chapter(&mut cfg, "c6", &subject_id, "প্রথম অধ্যায়");
    let chapter_id = cfg.classes[0].subjects[0].chapters[0].id.clone();
    add_lesson(&mut cfg, "c6", &subject_id, &chapter_id, "T", "U", "d").unwrap();

    assert!(delete_subject(&mut cfg, "c6", &subject_id));
    assert!(cfg.classes[0].subjects.is_empty());
    // Deleting again reports nothing removed.
    assert!(!delete_subject(&mut cfg, "c6", &subject_id));
  }

  #[test]
  fn delete_chapter_and_lesson_by_id() {
    let mut cfg = empty_class_config();
    add_subject(&mut cfg, "c6", "বিজ্ঞান");
    let sid = cfg.classes[0].subjects[0].id.clone();
    add_chapter(&mut cfg, "c6", &sid, "প্রথম অধ্যায়");
    let chid = cfg.classes[0].subjects[0].chapters[0].id.clone();
    add_lesson(&mut cfg, "c6", &sid, &chid, "T", "U", "d").unwrap();
    let lid = cfg.classes[0].subjects[0].chapters[0].lessons[0].id.clone();

    assert!(delete_lesson(&mut cfg, "c6", &sid, &chid, &lid));
    assert!(cfg.classes[0].subjects[0].chapters[0].lessons.is_empty());
    assert!(delete_chapter(&mut cfg, "c6", &sid, &chid));
    assert!(cfg.classes[0].subjects[0].chapters.is_empty());
  }
}
