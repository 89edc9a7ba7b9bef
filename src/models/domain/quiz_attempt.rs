use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    InProgress,
    Submitted,
}

impl AttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::InProgress => "in_progress",
            AttemptStatus::Submitted => "submitted",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct UserAnswer {
    pub question_id: String,
    pub selected_option_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_text: Option<String>,
    pub is_correct: bool,
    pub points_earned: i32,
}

/// One learner's timed instance of taking a quiz. Becomes immutable once
/// `status` is `Submitted`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizAttempt {
    pub id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub attempt_number: i32,
    pub status: AttemptStatus,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    pub score: i32,
    pub total_points: i32,
    pub percentage_score: f64,
    pub passed: bool,
    pub time_spent_minutes: i64,
    pub answers: Vec<UserAnswer>,
}

impl QuizAttempt {
    pub fn start(quiz_id: &str, user_id: &str, attempt_number: i32) -> Self {
        QuizAttempt {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            user_id: user_id.to_string(),
            attempt_number,
            status: AttemptStatus::InProgress,
            started_at: Utc::now(),
            submitted_at: None,
            score: 0,
            total_points: 0,
            percentage_score: 0.0,
            passed: false,
            answers: Vec::new(),
            time_spent_minutes: 0,
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.status == AttemptStatus::Submitted
    }

    /// Writes the terminal grading result onto this attempt.
    pub fn finish(
        &mut self,
        score: i32,
        total_points: i32,
        passing_score: f64,
        answers: Vec<UserAnswer>,
    ) {
        let now = Utc::now();
        let percentage = if total_points > 0 {
            f64::from(score) / f64::from(total_points) * 100.0
        } else {
            0.0
        };

        self.status = AttemptStatus::Submitted;
        self.submitted_at = Some(now);
        self.score = score;
        self.total_points = total_points;
        self.percentage_score = percentage;
        self.passed = percentage >= passing_score;
        self.answers = answers;
        self.time_spent_minutes = (now - self.started_at).num_minutes().max(0);
    }
}
