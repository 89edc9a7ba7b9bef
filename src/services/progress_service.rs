use std::sync::Arc;

use chrono::Utc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Lesson, LessonProgress},
        dto::{
            request::LessonProgressRequest,
            response::{CourseProgressDto, LessonAccessDto},
        },
    },
    repositories::{
        CourseRepository, EnrollmentRepository, ProgressRepository, QuizAttemptRepository,
        QuizRepository,
    },
};

pub struct ProgressService {
    progress: Arc<dyn ProgressRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
    courses: Arc<dyn CourseRepository>,
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
}

impl ProgressService {
    pub fn new(
        progress: Arc<dyn ProgressRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
        courses: Arc<dyn CourseRepository>,
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn QuizAttemptRepository>,
    ) -> Self {
        Self {
            progress,
            enrollments,
            courses,
            quizzes,
            attempts,
        }
    }

    pub async fn update_lesson_progress(
        &self,
        user_id: &str,
        lesson_id: &str,
        request: LessonProgressRequest,
    ) -> AppResult<LessonProgress> {
        let lesson = self.find_lesson(lesson_id).await?;
        self.require_enrollment(user_id, &lesson.course_id).await?;

        let record = match self.progress.find(user_id, &lesson.id).await? {
            Some(mut existing) => {
                existing.apply(request.progress_percentage, request.time_spent_seconds);
                existing
            }
            None => {
                let mut fresh = LessonProgress::new(
                    user_id,
                    &lesson.id,
                    &lesson.course_id,
                    request.progress_percentage,
                );
                fresh.time_spent_seconds = request.time_spent_seconds;
                fresh
            }
        };

        let record = self.progress.upsert(record).await?;
        self.recompute_course_progress(user_id, &lesson.course_id)
            .await?;

        Ok(record)
    }

    /// Marks a lesson complete. Refused while a blocking quiz on the lesson
    /// is not yet passed.
    pub async fn mark_lesson_completed(
        &self,
        user_id: &str,
        lesson_id: &str,
    ) -> AppResult<LessonProgress> {
        let lesson = self.find_lesson(lesson_id).await?;
        self.require_enrollment(user_id, &lesson.course_id).await?;

        for quiz in self.quizzes.list_by_lesson(&lesson.id).await? {
            if quiz.blocks_lesson_completion && !self.attempts.has_passed(user_id, &quiz.id).await?
            {
                return Err(AppError::ValidationError(format!(
                    "You must pass the quiz '{}' to complete this lesson",
                    quiz.title
                )));
            }
        }

        self.update_lesson_progress(
            user_id,
            lesson_id,
            LessonProgressRequest {
                progress_percentage: 100.0,
                time_spent_seconds: 0,
            },
        )
        .await
    }

    /// Access check for a lesson: enrollment plus the unlock rule.
    pub async fn can_access_lesson(
        &self,
        user_id: &str,
        lesson_id: &str,
    ) -> AppResult<LessonAccessDto> {
        let lesson = self.find_lesson(lesson_id).await?;

        if !self
            .enrollments
            .is_enrolled(user_id, &lesson.course_id)
            .await?
        {
            return Ok(LessonAccessDto {
                lesson_id: lesson.id,
                accessible: false,
                reason: Some("You are not enrolled in this course".to_string()),
            });
        }

        let (accessible, reason) = self.is_lesson_unlocked(user_id, &lesson).await?;
        Ok(LessonAccessDto {
            lesson_id: lesson.id,
            accessible,
            reason,
        })
    }

    pub async fn get_course_progress(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> AppResult<CourseProgressDto> {
        let enrollment = self.require_enrollment(user_id, course_id).await?;

        let completed = self.progress.count_completed(user_id, course_id).await?;
        let total = self.courses.count_lessons(course_id).await?;

        Ok(CourseProgressDto {
            course_id: course_id.to_string(),
            progress_percentage: enrollment.progress_percentage,
            completed_lessons: completed,
            total_lessons: total,
        })
    }

    /// Wipes the user's lesson progress for a course and zeroes the
    /// enrollment percentage (single transaction in the store).
    pub async fn reset_course_progress(&self, user_id: &str, course_id: &str) -> AppResult<u64> {
        self.require_enrollment(user_id, course_id).await?;

        let removed = self.progress.reset_course_progress(user_id, course_id).await?;

        log::info!(
            "Progress reset for user {} in course {} ({} records)",
            user_id,
            course_id,
            removed
        );
        Ok(removed)
    }

    /// Single-hop unlock rule. Returns (unlocked, reason-when-locked).
    async fn is_lesson_unlocked(
        &self,
        user_id: &str,
        lesson: &Lesson,
    ) -> AppResult<(bool, Option<String>)> {
        if !lesson.is_locked {
            return Ok((true, None));
        }

        if let Some(predecessor_id) = lesson.unlock_after_lesson_id.as_deref() {
            let completed = self
                .progress
                .find(user_id, predecessor_id)
                .await?
                .map(|p| p.is_completed)
                .unwrap_or(false);

            let predecessor = self.find_lesson(predecessor_id).await?;

            if !completed {
                return Ok((
                    false,
                    Some(format!("Complete '{}' first", predecessor.name)),
                ));
            }

            if predecessor.requires_quiz_pass
                && !self.has_passed_lesson_quiz(user_id, &predecessor).await?
            {
                return Ok((
                    false,
                    Some(format!("Pass the quiz for '{}' first", predecessor.name)),
                ));
            }

            return Ok((true, None));
        }

        // Locked without an explicit predecessor: fall back to course order
        let outline = self.courses.course_outline(&lesson.course_id).await?;
        let Some(index) = outline.iter().position(|l| l.id == lesson.id) else {
            return Ok((false, Some("Lesson is locked".to_string())));
        };

        if index == 0 {
            return Ok((true, None));
        }

        let previous = &outline[index - 1];
        let completed = self
            .progress
            .find(user_id, &previous.id)
            .await?
            .map(|p| p.is_completed)
            .unwrap_or(false);

        if completed {
            Ok((true, None))
        } else {
            Ok((false, Some(format!("Complete '{}' first", previous.name))))
        }
    }

    /// Whether the learner satisfies the lesson's quiz-pass requirement:
    /// best score at or above `min_quiz_score` when set, a passed attempt
    /// otherwise. A lesson without quizzes has nothing to pass.
    async fn has_passed_lesson_quiz(&self, user_id: &str, lesson: &Lesson) -> AppResult<bool> {
        let quizzes = self.quizzes.list_by_lesson(&lesson.id).await?;
        if quizzes.is_empty() {
            return Ok(true);
        }

        for quiz in quizzes {
            let passed = match lesson.min_quiz_score {
                Some(min_score) => self
                    .attempts
                    .best_percentage(user_id, &quiz.id)
                    .await?
                    .map(|best| best >= min_score)
                    .unwrap_or(false),
                None => self.attempts.has_passed(user_id, &quiz.id).await?,
            };
            if passed {
                return Ok(true);
            }
        }

        Ok(false)
    }

    async fn recompute_course_progress(&self, user_id: &str, course_id: &str) -> AppResult<()> {
        let completed = self.progress.count_completed(user_id, course_id).await?;
        let total = self.courses.count_lessons(course_id).await?;

        let percentage = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        if let Some(mut enrollment) = self
            .enrollments
            .find_by_user_and_course(user_id, course_id)
            .await?
        {
            enrollment.progress_percentage = percentage;
            enrollment.updated_at = Utc::now();
            self.enrollments.update(enrollment).await?;
        }

        Ok(())
    }

    async fn require_enrollment(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> AppResult<crate::models::domain::Enrollment> {
        self.enrollments
            .find_by_user_and_course(user_id, course_id)
            .await?
            .ok_or_else(|| {
                AppError::Unauthorized("You are not enrolled in this course".to_string())
            })
    }

    async fn find_lesson(&self, lesson_id: &str) -> AppResult<Lesson> {
        self.courses
            .find_lesson_by_id(lesson_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Lesson with id '{}' not found", lesson_id))
            })
    }
}
