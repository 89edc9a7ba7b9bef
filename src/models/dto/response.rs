use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::question::{Question, QuestionType};
use crate::models::domain::quiz_attempt::QuizAttempt;
use crate::models::domain::user::{User, UserRole};
use crate::models::domain::Quiz;

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PagedResponse<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Learner-facing option: correctness and explanations stay server-side.
#[derive(Debug, Clone, Serialize)]
pub struct TakeOptionDto {
    pub option_id: String,
    pub text: String,
    pub order: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TakeQuestionDto {
    pub question_id: String,
    pub question_text: String,
    pub question_type: QuestionType,
    pub points: i32,
    pub order: i32,
    pub options: Vec<TakeOptionDto>,
}

impl From<Question> for TakeQuestionDto {
    fn from(question: Question) -> Self {
        TakeQuestionDto {
            question_id: question.id,
            question_text: question.question_text,
            question_type: question.question_type,
            points: question.points,
            order: question.order,
            options: question
                .options
                .into_iter()
                .map(|o| TakeOptionDto {
                    option_id: o.id,
                    text: o.text,
                    order: o.order,
                })
                .collect(),
        }
    }
}

/// Returned when a learner starts (or resumes) a quiz attempt.
#[derive(Debug, Serialize)]
pub struct QuizTakeView {
    pub quiz_id: String,
    pub title: String,
    pub description: Option<String>,
    pub time_limit_minutes: Option<i64>,
    pub passing_score: f64,
    pub max_attempts: i32,
    pub attempt_id: String,
    pub attempt_number: i32,
    pub is_ongoing_attempt: bool,
    pub started_at: DateTime<Utc>,
    pub questions: Vec<TakeQuestionDto>,
}

impl QuizTakeView {
    pub fn new(
        quiz: Quiz,
        attempt: &QuizAttempt,
        is_ongoing_attempt: bool,
        questions: Vec<Question>,
    ) -> Self {
        QuizTakeView {
            quiz_id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            time_limit_minutes: quiz.time_limit_minutes,
            passing_score: quiz.passing_score,
            max_attempts: quiz.max_attempts,
            attempt_id: attempt.id.clone(),
            attempt_number: attempt.attempt_number,
            is_ongoing_attempt,
            started_at: attempt.started_at,
            questions: questions.into_iter().map(TakeQuestionDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnswerResultDto {
    pub question_id: String,
    pub question_text: String,
    pub selected_option_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_text: Option<String>,
    pub is_correct: bool,
    pub points_earned: i32,
    pub points_possible: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AttemptResultDto {
    pub attempt_id: String,
    pub quiz_id: String,
    pub quiz_title: String,
    pub attempt_number: i32,
    pub score: i32,
    pub total_points: i32,
    pub percentage_score: f64,
    pub passing_score: f64,
    pub passed: bool,
    pub started_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub time_spent_minutes: i64,
    pub answers: Vec<AnswerResultDto>,
}

impl AttemptResultDto {
    pub fn from_parts(attempt: QuizAttempt, quiz: &Quiz, questions: &[Question]) -> Self {
        let answers = attempt
            .answers
            .into_iter()
            .map(|answer| {
                let question = questions.iter().find(|q| q.id == answer.question_id);
                AnswerResultDto {
                    question_text: question
                        .map(|q| q.question_text.clone())
                        .unwrap_or_default(),
                    points_possible: question.map(|q| q.points).unwrap_or(0),
                    explanation: question.and_then(|q| q.explanation.clone()),
                    question_id: answer.question_id,
                    selected_option_ids: answer.selected_option_ids,
                    answer_text: answer.answer_text,
                    is_correct: answer.is_correct,
                    points_earned: answer.points_earned,
                }
            })
            .collect();

        AttemptResultDto {
            attempt_id: attempt.id,
            quiz_id: attempt.quiz_id,
            quiz_title: quiz.title.clone(),
            attempt_number: attempt.attempt_number,
            score: attempt.score,
            total_points: attempt.total_points,
            percentage_score: attempt.percentage_score,
            passing_score: quiz.passing_score,
            passed: attempt.passed,
            started_at: attempt.started_at,
            submitted_at: attempt.submitted_at,
            time_spent_minutes: attempt.time_spent_minutes,
            answers,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LessonAccessDto {
    pub lesson_id: String,
    pub accessible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CourseProgressDto {
    pub course_id: String,
    pub progress_percentage: f64,
    pub completed_lessons: i64,
    pub total_lessons: i64,
}
