use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    Essay,
    FillBlank,
}

impl QuestionType {
    /// Only option-backed question types take part in automatic grading.
    pub fn is_gradable(&self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::TrueFalse)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AnswerOption {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
    pub order: i32,
}

impl AnswerOption {
    pub fn new(text: &str, is_correct: bool, order: i32) -> Self {
        AnswerOption {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            is_correct,
            order,
        }
    }
}

/// A question owned by exactly one quiz; answer options are embedded and
/// owned exclusively by the question.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub quiz_id: String,
    pub question_text: String,
    pub question_type: QuestionType,
    pub points: i32,
    pub order: i32,
    pub explanation: Option<String>,
    pub options: Vec<AnswerOption>,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn new(
        quiz_id: &str,
        question_text: &str,
        question_type: QuestionType,
        points: i32,
        order: i32,
    ) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            question_text: question_text.to_string(),
            question_type,
            points,
            order,
            explanation: None,
            options: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn correct_option_ids(&self) -> Vec<&str> {
        self.options
            .iter()
            .filter(|o| o.is_correct)
            .map(|o| o.id.as_str())
            .collect()
    }

    /// Synthesizes the fixed True/False option pair from the stored answer.
    pub fn true_false_options(answer_is_true: bool) -> Vec<AnswerOption> {
        vec![
            AnswerOption::new("True", answer_is_true, 1),
            AnswerOption::new("False", !answer_is_true, 2),
        ]
    }
}
