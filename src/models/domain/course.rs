use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Course {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn new(author_id: &str, title: &str, description: Option<String>) -> Self {
        let now = Utc::now();
        Course {
            id: Uuid::new_v4().to_string(),
            author_id: author_id.to_string(),
            title: title.to_string(),
            description,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Chapter {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

impl Chapter {
    pub fn new(course_id: &str, title: &str, order: i32) -> Self {
        Chapter {
            id: Uuid::new_v4().to_string(),
            course_id: course_id.to_string(),
            title: title.to_string(),
            order,
            created_at: Utc::now(),
        }
    }
}

/// A lesson inside a chapter. `unlock_after_lesson_id` is the single
/// explicit predecessor link used by unlock gating; it must reference a
/// lesson in the same chapter.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Lesson {
    pub id: String,
    pub chapter_id: String,
    pub course_id: String,
    pub name: String,
    pub description: Option<String>,
    pub content: String,
    pub order: i32,
    pub is_locked: bool,
    pub unlock_after_lesson_id: Option<String>,
    pub is_mandatory: bool,
    pub requires_quiz_pass: bool,
    pub min_quiz_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lesson {
    pub fn new(
        chapter_id: &str,
        course_id: &str,
        name: &str,
        content: &str,
        order: i32,
    ) -> Self {
        let now = Utc::now();
        Lesson {
            id: Uuid::new_v4().to_string(),
            chapter_id: chapter_id.to_string(),
            course_id: course_id.to_string(),
            name: name.to_string(),
            description: None,
            content: content.to_string(),
            order,
            is_locked: false,
            unlock_after_lesson_id: None,
            is_mandatory: true,
            requires_quiz_pass: false,
            min_quiz_score: None,
            created_at: now,
            updated_at: now,
        }
    }
}
