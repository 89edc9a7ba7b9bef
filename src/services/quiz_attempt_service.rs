use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::{
        domain::{
            quiz_attempt::{QuizAttempt, UserAnswer},
            Question, QuestionType, Quiz, UserRole,
        },
        dto::{
            request::{PaginationParams, QuestionAnswerInput, SubmitAttemptRequest},
            response::{AttemptResultDto, PagedResponse, QuizTakeView},
        },
    },
    repositories::{
        CourseRepository, EnrollmentRepository, QuestionRepository, QuizAttemptRepository,
        QuizRepository,
    },
};

/// Fallback used for abandoned-attempt cleanup when a quiz has no time limit.
const DEFAULT_TIME_LIMIT_MINUTES: i64 = 60;
const ABANDONED_GRACE_MINUTES: i64 = 30;

pub struct QuizAttemptService {
    attempts: Arc<dyn QuizAttemptRepository>,
    quizzes: Arc<dyn QuizRepository>,
    questions: Arc<dyn QuestionRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
    courses: Arc<dyn CourseRepository>,
}

impl QuizAttemptService {
    pub fn new(
        attempts: Arc<dyn QuizAttemptRepository>,
        quizzes: Arc<dyn QuizRepository>,
        questions: Arc<dyn QuestionRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
        courses: Arc<dyn CourseRepository>,
    ) -> Self {
        Self {
            attempts,
            quizzes,
            questions,
            enrollments,
            courses,
        }
    }

    /// Starts a quiz for a learner, or resumes their ongoing attempt.
    pub async fn start_attempt(&self, quiz_id: &str, claims: &Claims) -> AppResult<QuizTakeView> {
        let quiz = self.find_quiz(quiz_id).await?;

        self.cleanup_abandoned_attempts(&quiz).await?;

        if claims.role == UserRole::Learner {
            let enrolled = self
                .enrollments
                .is_enrolled(&claims.sub, &quiz.course_id)
                .await?;
            if !enrolled {
                return Err(AppError::Unauthorized(
                    "You must be enrolled in this course to take the quiz".to_string(),
                ));
            }
        }

        let questions = self.questions.find_by_quiz(&quiz.id).await?;
        if questions.is_empty() {
            return Err(AppError::ValidationError(
                "This quiz does not have any questions yet".to_string(),
            ));
        }

        if let Some(ongoing) = self.attempts.find_in_progress(&claims.sub, &quiz.id).await? {
            log::info!(
                "Resuming attempt {} for user {} on quiz {}",
                ongoing.id,
                claims.sub,
                quiz.id
            );
            return Ok(QuizTakeView::new(quiz, &ongoing, true, questions));
        }

        let submitted = self.attempts.count_submitted(&claims.sub, &quiz.id).await?;
        let next_attempt_number = submitted as i32 + 1;

        if next_attempt_number > quiz.max_attempts {
            log::warn!(
                "User {} exceeded max attempts on quiz {} ({}/{})",
                claims.sub,
                quiz.id,
                submitted,
                quiz.max_attempts
            );
            return Err(AppError::AttemptsExhausted(format!(
                "You have used all {} attempts for this quiz",
                quiz.max_attempts
            )));
        }

        let attempt = self
            .attempts
            .create(QuizAttempt::start(&quiz.id, &claims.sub, next_attempt_number))
            .await?;

        log::info!(
            "Created attempt {} (number {}) for user {} on quiz {}",
            attempt.id,
            attempt.attempt_number,
            claims.sub,
            quiz.id
        );

        Ok(QuizTakeView::new(quiz, &attempt, false, questions))
    }

    /// Grades and terminally persists an in-progress attempt.
    pub async fn submit_attempt(
        &self,
        attempt_id: &str,
        claims: &Claims,
        request: SubmitAttemptRequest,
    ) -> AppResult<AttemptResultDto> {
        let mut attempt = self
            .attempts
            .find_by_id(attempt_id)
            .await?
            .filter(|a| a.user_id == claims.sub)
            .ok_or_else(|| {
                AppError::NotFound(format!("Attempt with id '{}' not found", attempt_id))
            })?;

        if attempt.is_submitted() {
            return Err(AppError::ValidationError(
                "This quiz attempt has already been submitted".to_string(),
            ));
        }

        let quiz = self.find_quiz(&attempt.quiz_id).await?;

        if let Some(limit) = quiz.time_limit_minutes {
            let elapsed = (Utc::now() - attempt.started_at).num_minutes();
            if elapsed > limit {
                log::warn!(
                    "Attempt {} submitted {} minutes over the {}-minute limit",
                    attempt.id,
                    elapsed - limit,
                    limit
                );
            }
        }

        let questions = self.questions.find_by_quiz(&quiz.id).await?;
        let (score, total_points, answers) = Self::grade(&questions, &request.answers);

        attempt.finish(score, total_points, quiz.passing_score, answers);
        let attempt = self.attempts.finalize(attempt).await?;

        log::info!(
            "Attempt {} submitted: {}/{} points ({:.1}%), passed={}",
            attempt.id,
            attempt.score,
            attempt.total_points,
            attempt.percentage_score,
            attempt.passed
        );

        Ok(AttemptResultDto::from_parts(attempt, &quiz, &questions))
    }

    pub async fn get_result(&self, attempt_id: &str, claims: &Claims) -> AppResult<AttemptResultDto> {
        let attempt = self
            .attempts
            .find_by_id(attempt_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Attempt with id '{}' not found", attempt_id))
            })?;

        if !attempt.is_submitted() {
            return Err(AppError::ValidationError(
                "This attempt has not been submitted yet".to_string(),
            ));
        }

        let quiz = self.find_quiz(&attempt.quiz_id).await?;
        self.require_result_access(&attempt, &quiz, claims).await?;

        let questions = self.questions.find_by_quiz(&quiz.id).await?;
        Ok(AttemptResultDto::from_parts(attempt, &quiz, &questions))
    }

    pub async fn list_attempts(
        &self,
        quiz_id: &str,
        claims: &Claims,
        pagination: &PaginationParams,
    ) -> AppResult<PagedResponse<AttemptResultDto>> {
        let quiz = self.find_quiz(quiz_id).await?;
        let questions = self.questions.find_by_quiz(&quiz.id).await?;

        let (attempts, total) = self
            .attempts
            .get_user_attempts(&claims.sub, &quiz.id, pagination.offset(), pagination.limit())
            .await?;

        let items = attempts
            .into_iter()
            .map(|attempt| AttemptResultDto::from_parts(attempt, &quiz, &questions))
            .collect();

        Ok(PagedResponse { items, total })
    }

    /// Scores submitted answers against the quiz's questions. Returns
    /// (earned points, gradable point total, per-question results).
    ///
    /// Only option-backed types are scored; essay/fill_blank answers are
    /// recorded verbatim with zero points and stay out of the total.
    pub fn grade(
        questions: &[Question],
        submitted: &[QuestionAnswerInput],
    ) -> (i32, i32, Vec<UserAnswer>) {
        let by_question: HashMap<&str, &QuestionAnswerInput> = submitted
            .iter()
            .map(|answer| (answer.question_id.as_str(), answer))
            .collect();

        let mut score = 0;
        let mut total_points = 0;
        let mut answers = Vec::new();

        for question in questions {
            if question.question_type.is_gradable() {
                total_points += question.points;
            }

            let Some(submission) = by_question.get(question.id.as_str()) else {
                continue;
            };

            let (is_correct, points_earned) = Self::grade_question(question, submission);
            score += points_earned;

            answers.push(UserAnswer {
                question_id: question.id.clone(),
                selected_option_ids: submission.selected_option_ids.clone(),
                answer_text: submission.answer_text.clone(),
                is_correct,
                points_earned,
            });
        }

        (score, total_points, answers)
    }

    fn grade_question(question: &Question, submission: &QuestionAnswerInput) -> (bool, i32) {
        let selected = &submission.selected_option_ids;
        let correct = question.correct_option_ids();

        let is_correct = match question.question_type {
            QuestionType::MultipleChoice => {
                // Every correct option selected, nothing incorrect, at least one pick
                !selected.is_empty()
                    && correct.iter().all(|id| selected.iter().any(|s| s == id))
                    && selected.iter().all(|s| correct.contains(&s.as_str()))
            }
            QuestionType::TrueFalse => {
                selected.len() == 1 && correct.contains(&selected[0].as_str())
            }
            QuestionType::Essay | QuestionType::FillBlank => false,
        };

        if is_correct {
            (true, question.points)
        } else {
            (false, 0)
        }
    }

    async fn cleanup_abandoned_attempts(&self, quiz: &Quiz) -> AppResult<()> {
        let limit = quiz
            .time_limit_minutes
            .unwrap_or(DEFAULT_TIME_LIMIT_MINUTES);
        let cutoff = Utc::now() - Duration::minutes(limit + ABANDONED_GRACE_MINUTES);

        let removed = self
            .attempts
            .delete_expired_in_progress(&quiz.id, cutoff)
            .await?;

        if removed > 0 {
            log::info!(
                "Cleaned up {} abandoned attempts on quiz {}",
                removed,
                quiz.id
            );
        }

        Ok(())
    }

    async fn require_result_access(
        &self,
        attempt: &QuizAttempt,
        quiz: &Quiz,
        claims: &Claims,
    ) -> AppResult<()> {
        if claims.role == UserRole::Admin || attempt.user_id == claims.sub {
            return Ok(());
        }

        // The course author may review learner results
        let course = self.courses.find_course_by_id(&quiz.course_id).await?;
        if course.map(|c| c.author_id == claims.sub).unwrap_or(false) {
            return Ok(());
        }

        Err(AppError::Unauthorized(
            "You cannot view this quiz attempt".to_string(),
        ))
    }

    async fn find_quiz(&self, quiz_id: &str) -> AppResult<Quiz> {
        self.quizzes.find_by_id(quiz_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id))
        })
    }
}
