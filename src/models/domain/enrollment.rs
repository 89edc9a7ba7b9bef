use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Enrollment {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub progress_percentage: f64,
    pub current_lesson_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Enrollment {
    pub fn new(user_id: &str, course_id: &str) -> Self {
        let now = Utc::now();
        Enrollment {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            progress_percentage: 0.0,
            current_lesson_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Per-lesson progress for one learner. Keyed by (user_id, lesson_id);
/// `progress_percentage` only ever moves up.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct LessonProgress {
    pub user_id: String,
    pub lesson_id: String,
    pub course_id: String,
    pub is_completed: bool,
    pub progress_percentage: f64,
    pub time_spent_seconds: i64,
    pub first_accessed_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl LessonProgress {
    pub fn new(user_id: &str, lesson_id: &str, course_id: &str, percentage: f64) -> Self {
        let now = Utc::now();
        let completed = percentage >= 100.0;
        LessonProgress {
            user_id: user_id.to_string(),
            lesson_id: lesson_id.to_string(),
            course_id: course_id.to_string(),
            is_completed: completed,
            progress_percentage: percentage,
            time_spent_seconds: 0,
            first_accessed_at: now,
            last_accessed_at: now,
            completed_at: if completed { Some(now) } else { None },
        }
    }

    /// Applies a progress report: percentage is monotonic, time accumulates.
    pub fn apply(&mut self, percentage: f64, time_spent_seconds: i64) {
        let now = Utc::now();
        self.progress_percentage = self.progress_percentage.max(percentage);
        self.time_spent_seconds += time_spent_seconds;
        self.last_accessed_at = now;
        if self.progress_percentage >= 100.0 && !self.is_completed {
            self.is_completed = true;
            self.completed_at = Some(now);
        }
    }
}
