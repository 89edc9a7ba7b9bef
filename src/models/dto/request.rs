use once_cell::sync::Lazy;
use serde::Deserialize;
use validator::Validate;

use crate::models::domain::question::QuestionType;
use crate::models::domain::user::UserRole;

static USERNAME_REGEX: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^[a-zA-Z0-9_]+$").expect("USERNAME_REGEX is a valid regex pattern")
});

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(min = 3, max = 50),
        regex(
            path = *USERNAME_REGEX,
            message = "Username must be alphanumeric with underscores"
        )
    )]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 200))]
    pub full_name: String,

    #[serde(default)]
    pub role: UserRole,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateChapterRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(range(min = 1))]
    pub order: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLessonRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(length(min = 1))]
    pub content: String,

    #[validate(range(min = 1))]
    pub order: i32,

    #[serde(default)]
    pub is_locked: bool,

    pub unlock_after_lesson_id: Option<String>,

    #[serde(default = "default_true")]
    pub is_mandatory: bool,

    #[serde(default)]
    pub requires_quiz_pass: bool,

    #[validate(range(min = 0.0, max = 100.0))]
    pub min_quiz_score: Option<f64>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuizRequest {
    pub lesson_id: String,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 1))]
    pub time_limit_minutes: Option<i64>,

    #[validate(range(min = 0.0, max = 100.0))]
    pub passing_score: Option<f64>,

    #[validate(range(min = 1))]
    pub max_attempts: Option<i32>,

    #[serde(default)]
    pub is_final_quiz: bool,

    #[serde(default)]
    pub is_prerequisite_quiz: bool,

    #[serde(default)]
    pub blocks_lesson_completion: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 1))]
    pub time_limit_minutes: Option<i64>,

    #[validate(range(min = 0.0, max = 100.0))]
    pub passing_score: Option<f64>,

    #[validate(range(min = 1))]
    pub max_attempts: Option<i32>,

    pub is_final_quiz: Option<bool>,
    pub is_prerequisite_quiz: Option<bool>,
    pub blocks_lesson_completion: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnswerOptionInput {
    #[validate(length(max = 500))]
    pub text: String,

    #[serde(default)]
    pub is_correct: bool,

    #[validate(range(min = 1))]
    pub order: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 2000))]
    pub question_text: String,

    pub question_type: QuestionType,

    #[validate(range(min = 1, max = 100))]
    pub points: i32,

    /// Defaults to the next free order in the quiz.
    #[validate(range(min = 1))]
    pub order: Option<i32>,

    #[validate(length(max = 2000))]
    pub explanation: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub options: Vec<AnswerOptionInput>,

    /// Required for `true_false` questions; ignored otherwise.
    pub true_false_answer: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 2000))]
    pub question_text: String,

    pub question_type: QuestionType,

    #[validate(range(min = 1, max = 100))]
    pub points: i32,

    #[validate(length(max = 2000))]
    pub explanation: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub options: Vec<AnswerOptionInput>,

    pub true_false_answer: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReorderQuestionsRequest {
    #[validate(length(min = 1))]
    pub question_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuestionAnswerInput {
    pub question_id: String,

    #[serde(default)]
    pub selected_option_ids: Vec<String>,

    #[validate(length(max = 10000))]
    pub answer_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAttemptRequest {
    #[serde(default)]
    #[validate(nested)]
    pub answers: Vec<QuestionAnswerInput>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LessonProgressRequest {
    #[validate(range(min = 0.0, max = 100.0))]
    pub progress_percentage: f64,

    #[validate(range(min = 0))]
    pub time_spent_seconds: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaginationParams {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: Some(0),
            limit: Some(20),
        }
    }
}

impl PaginationParams {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).min(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_create_user_request() {
        let request = CreateUserRequest {
            username: "johndoe".to_string(),
            email: "john@example.com".to_string(),
            full_name: "John Doe".to_string(),
            role: UserRole::Learner,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_invalid_email() {
        let request = CreateUserRequest {
            username: "johndoe".to_string(),
            email: "invalid-email".to_string(),
            full_name: "John Doe".to_string(),
            role: UserRole::Learner,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_username_rejects_spaces() {
        let request = CreateUserRequest {
            username: "john doe".to_string(),
            email: "john@example.com".to_string(),
            full_name: "John Doe".to_string(),
            role: UserRole::Learner,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_question_points_out_of_range() {
        let request = CreateQuestionRequest {
            question_text: "What is ownership?".to_string(),
            question_type: QuestionType::MultipleChoice,
            points: 101,
            order: None,
            explanation: None,
            options: vec![],
            true_false_answer: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_pagination_limit_is_clamped() {
        let params = PaginationParams {
            offset: None,
            limit: Some(500),
        };
        assert_eq!(params.limit(), 100);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_reorder_requires_ids() {
        let request = ReorderQuestionsRequest {
            question_ids: vec![],
        };
        assert!(request.validate().is_err());
    }
}
