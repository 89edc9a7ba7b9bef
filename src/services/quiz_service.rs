use std::sync::Arc;

use chrono::Utc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{
            quiz::{DEFAULT_MAX_ATTEMPTS, DEFAULT_PASSING_SCORE},
            AttemptStatus, Question, Quiz,
        },
        dto::request::{CreateQuizRequest, UpdateQuizRequest},
    },
    repositories::{CourseRepository, QuestionRepository, QuizAttemptRepository, QuizRepository},
};

pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
    questions: Arc<dyn QuestionRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
    courses: Arc<dyn CourseRepository>,
}

impl QuizService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        questions: Arc<dyn QuestionRepository>,
        attempts: Arc<dyn QuizAttemptRepository>,
        courses: Arc<dyn CourseRepository>,
    ) -> Self {
        Self {
            quizzes,
            questions,
            attempts,
            courses,
        }
    }

    pub async fn create_quiz(
        &self,
        request: CreateQuizRequest,
        instructor_id: &str,
    ) -> AppResult<Quiz> {
        let lesson = self
            .courses
            .find_lesson_by_id(&request.lesson_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Lesson with id '{}' not found", request.lesson_id))
            })?;

        self.require_course_author(&lesson.course_id, instructor_id)
            .await?;

        let mut quiz = Quiz::new(&lesson.id, &lesson.course_id, &request.title);
        quiz.description = request.description;
        quiz.time_limit_minutes = request.time_limit_minutes;
        quiz.passing_score = request.passing_score.unwrap_or(DEFAULT_PASSING_SCORE);
        quiz.max_attempts = request.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS);
        quiz.is_final_quiz = request.is_final_quiz;
        quiz.is_prerequisite_quiz = request.is_prerequisite_quiz;
        quiz.blocks_lesson_completion = request.blocks_lesson_completion;

        let quiz = self.quizzes.create(quiz).await?;

        log::info!(
            "Quiz {} created on lesson {} by {}",
            quiz.id,
            quiz.lesson_id,
            instructor_id
        );
        Ok(quiz)
    }

    pub async fn update_quiz(
        &self,
        quiz_id: &str,
        request: UpdateQuizRequest,
        instructor_id: &str,
    ) -> AppResult<Quiz> {
        let mut quiz = self.owned_quiz(quiz_id, instructor_id).await?;

        if let Some(title) = request.title {
            quiz.title = title;
        }
        if request.description.is_some() {
            quiz.description = request.description;
        }
        if request.time_limit_minutes.is_some() {
            quiz.time_limit_minutes = request.time_limit_minutes;
        }
        if let Some(passing_score) = request.passing_score {
            quiz.passing_score = passing_score;
        }
        if let Some(max_attempts) = request.max_attempts {
            quiz.max_attempts = max_attempts;
        }
        if let Some(is_final_quiz) = request.is_final_quiz {
            quiz.is_final_quiz = is_final_quiz;
        }
        if let Some(is_prerequisite_quiz) = request.is_prerequisite_quiz {
            quiz.is_prerequisite_quiz = is_prerequisite_quiz;
        }
        if let Some(blocks) = request.blocks_lesson_completion {
            quiz.blocks_lesson_completion = blocks;
        }
        quiz.updated_at = Utc::now();

        let quiz = self.quizzes.update(quiz).await?;
        log::info!("Quiz {} updated by {}", quiz.id, instructor_id);
        Ok(quiz)
    }

    pub async fn delete_quiz(&self, quiz_id: &str, instructor_id: &str) -> AppResult<()> {
        let quiz = self.owned_quiz(quiz_id, instructor_id).await?;

        let active = self
            .attempts
            .count_by_status(&quiz.id, AttemptStatus::InProgress)
            .await?;
        if active > 0 {
            return Err(AppError::ValidationError(format!(
                "Cannot delete quiz: {} student(s) are currently taking this quiz",
                active
            )));
        }

        let completed = self
            .attempts
            .count_by_status(&quiz.id, AttemptStatus::Submitted)
            .await?;
        if completed > 0 {
            return Err(AppError::ValidationError(format!(
                "Cannot delete quiz: {} student(s) have already taken this quiz",
                completed
            )));
        }

        if quiz.is_prerequisite_quiz {
            return Err(AppError::ValidationError(
                "Cannot delete quiz: this quiz is a prerequisite for course progression"
                    .to_string(),
            ));
        }

        if quiz.blocks_lesson_completion {
            return Err(AppError::ValidationError(
                "Cannot delete quiz: this quiz blocks lesson completion".to_string(),
            ));
        }

        // No FK cascade in Mongo: remove owned questions explicitly.
        let removed = self.questions.delete_by_quiz(&quiz.id).await?;
        self.quizzes.delete(&quiz.id).await?;

        log::info!(
            "Quiz {} deleted by {} ({} questions removed)",
            quiz.id,
            instructor_id,
            removed
        );
        Ok(())
    }

    pub async fn get_quiz_for_author(
        &self,
        quiz_id: &str,
        instructor_id: &str,
    ) -> AppResult<(Quiz, Vec<Question>)> {
        let quiz = self.owned_quiz(quiz_id, instructor_id).await?;
        let questions = self.questions.find_by_quiz(&quiz.id).await?;
        Ok((quiz, questions))
    }

    pub async fn list_lesson_quizzes(&self, lesson_id: &str) -> AppResult<Vec<Quiz>> {
        self.quizzes.list_by_lesson(lesson_id).await
    }

    async fn owned_quiz(&self, quiz_id: &str, instructor_id: &str) -> AppResult<Quiz> {
        let quiz = self.quizzes.find_by_id(quiz_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id))
        })?;

        self.require_course_author(&quiz.course_id, instructor_id)
            .await?;

        Ok(quiz)
    }

    async fn require_course_author(&self, course_id: &str, user_id: &str) -> AppResult<()> {
        let course = self
            .courses
            .find_course_by_id(course_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Course with id '{}' not found", course_id))
            })?;

        if course.author_id != user_id {
            return Err(AppError::Unauthorized(
                "You can only manage quizzes in your own courses".to_string(),
            ));
        }

        Ok(())
    }
}
