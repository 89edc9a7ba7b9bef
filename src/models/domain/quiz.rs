use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PASSING_SCORE: f64 = 70.0;
pub const DEFAULT_MAX_ATTEMPTS: i32 = 3;

/// Quiz definition attached to a lesson. Identity (`id`, `lesson_id`,
/// `course_id`) is fixed at creation; configuration stays mutable until the
/// quiz is deleted.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub lesson_id: String,
    pub course_id: String,
    pub title: String,
    pub description: Option<String>,
    pub time_limit_minutes: Option<i64>,
    pub passing_score: f64,
    pub max_attempts: i32,
    pub is_final_quiz: bool,
    pub is_prerequisite_quiz: bool,
    pub blocks_lesson_completion: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quiz {
    pub fn new(lesson_id: &str, course_id: &str, title: &str) -> Self {
        let now = Utc::now();
        Quiz {
            id: Uuid::new_v4().to_string(),
            lesson_id: lesson_id.to_string(),
            course_id: course_id.to_string(),
            title: title.to_string(),
            description: None,
            time_limit_minutes: None,
            passing_score: DEFAULT_PASSING_SCORE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            is_final_quiz: false,
            is_prerequisite_quiz: false,
            blocks_lesson_completion: false,
            created_at: now,
            updated_at: now,
        }
    }
}
