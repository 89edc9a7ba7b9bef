//! In-memory repository implementations shared by the integration suites.
#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use brainstorm_server::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::{
        quiz_attempt::{AttemptStatus, QuizAttempt},
        Chapter, Course, Enrollment, Lesson, LessonProgress, Question, Quiz, User, UserRole,
    },
    repositories::{
        CourseRepository, EnrollmentRepository, ProgressRepository, QuestionRepository,
        QuizAttemptRepository, QuizRepository, UserRepository,
    },
};

pub fn claims_for(sub: &str, role: UserRole) -> Claims {
    Claims {
        sub: sub.to_string(),
        username: sub.to_string(),
        role,
        iat: 0,
        exp: 9999999999,
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(AppError::AlreadyExists(format!(
                "User with username '{}' already exists",
                user.username
            )));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(username).cloned())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryCourseRepository {
    courses: RwLock<HashMap<String, Course>>,
    chapters: RwLock<HashMap<String, Chapter>>,
    lessons: RwLock<HashMap<String, Lesson>>,
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn create_course(&self, course: Course) -> AppResult<Course> {
        self.courses
            .write()
            .await
            .insert(course.id.clone(), course.clone());
        Ok(course)
    }

    async fn find_course_by_id(&self, id: &str) -> AppResult<Option<Course>> {
        Ok(self.courses.read().await.get(id).cloned())
    }

    async fn create_chapter(&self, chapter: Chapter) -> AppResult<Chapter> {
        self.chapters
            .write()
            .await
            .insert(chapter.id.clone(), chapter.clone());
        Ok(chapter)
    }

    async fn find_chapter_by_id(&self, id: &str) -> AppResult<Option<Chapter>> {
        Ok(self.chapters.read().await.get(id).cloned())
    }

    async fn create_lesson(&self, lesson: Lesson) -> AppResult<Lesson> {
        self.lessons
            .write()
            .await
            .insert(lesson.id.clone(), lesson.clone());
        Ok(lesson)
    }

    async fn find_lesson_by_id(&self, id: &str) -> AppResult<Option<Lesson>> {
        Ok(self.lessons.read().await.get(id).cloned())
    }

    async fn lessons_by_chapter(&self, chapter_id: &str) -> AppResult<Vec<Lesson>> {
        let mut lessons: Vec<Lesson> = self
            .lessons
            .read()
            .await
            .values()
            .filter(|l| l.chapter_id == chapter_id)
            .cloned()
            .collect();
        lessons.sort_by_key(|l| l.order);
        Ok(lessons)
    }

    async fn course_outline(&self, course_id: &str) -> AppResult<Vec<Lesson>> {
        let chapter_order: HashMap<String, i32> = self
            .chapters
            .read()
            .await
            .values()
            .filter(|c| c.course_id == course_id)
            .map(|c| (c.id.clone(), c.order))
            .collect();

        let mut lessons: Vec<Lesson> = self
            .lessons
            .read()
            .await
            .values()
            .filter(|l| l.course_id == course_id)
            .cloned()
            .collect();

        lessons.sort_by_key(|l| {
            (
                chapter_order.get(&l.chapter_id).copied().unwrap_or(i32::MAX),
                l.order,
            )
        });
        Ok(lessons)
    }

    async fn count_lessons(&self, course_id: &str) -> AppResult<i64> {
        Ok(self
            .lessons
            .read()
            .await
            .values()
            .filter(|l| l.course_id == course_id)
            .count() as i64)
    }
}

pub type SharedEnrollments = Arc<RwLock<HashMap<String, Enrollment>>>;

pub struct InMemoryEnrollmentRepository {
    enrollments: SharedEnrollments,
}

impl InMemoryEnrollmentRepository {
    pub fn new(enrollments: SharedEnrollments) -> Self {
        Self { enrollments }
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryEnrollmentRepository {
    async fn create(&self, enrollment: Enrollment) -> AppResult<Enrollment> {
        let mut enrollments = self.enrollments.write().await;
        let duplicate = enrollments
            .values()
            .any(|e| e.user_id == enrollment.user_id && e.course_id == enrollment.course_id);
        if duplicate {
            return Err(AppError::AlreadyExists(
                "Enrollment already exists".to_string(),
            ));
        }
        enrollments.insert(enrollment.id.clone(), enrollment.clone());
        Ok(enrollment)
    }

    async fn find_by_user_and_course(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> AppResult<Option<Enrollment>> {
        Ok(self
            .enrollments
            .read()
            .await
            .values()
            .find(|e| e.user_id == user_id && e.course_id == course_id)
            .cloned())
    }

    async fn is_enrolled(&self, user_id: &str, course_id: &str) -> AppResult<bool> {
        Ok(self
            .find_by_user_and_course(user_id, course_id)
            .await?
            .is_some())
    }

    async fn update(&self, enrollment: Enrollment) -> AppResult<Enrollment> {
        let mut enrollments = self.enrollments.write().await;
        if !enrollments.contains_key(&enrollment.id) {
            return Err(AppError::NotFound(format!(
                "Enrollment with id '{}' not found",
                enrollment.id
            )));
        }
        enrollments.insert(enrollment.id.clone(), enrollment.clone());
        Ok(enrollment)
    }
}

pub struct InMemoryProgressRepository {
    records: RwLock<HashMap<(String, String), LessonProgress>>,
    enrollments: SharedEnrollments,
}

impl InMemoryProgressRepository {
    pub fn new(enrollments: SharedEnrollments) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            enrollments,
        }
    }
}

#[async_trait]
impl ProgressRepository for InMemoryProgressRepository {
    async fn upsert(&self, progress: LessonProgress) -> AppResult<LessonProgress> {
        self.records.write().await.insert(
            (progress.user_id.clone(), progress.lesson_id.clone()),
            progress.clone(),
        );
        Ok(progress)
    }

    async fn find(&self, user_id: &str, lesson_id: &str) -> AppResult<Option<LessonProgress>> {
        Ok(self
            .records
            .read()
            .await
            .get(&(user_id.to_string(), lesson_id.to_string()))
            .cloned())
    }

    async fn completed_lesson_ids(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> AppResult<Vec<String>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|p| p.user_id == user_id && p.course_id == course_id && p.is_completed)
            .map(|p| p.lesson_id.clone())
            .collect())
    }

    async fn count_completed(&self, user_id: &str, course_id: &str) -> AppResult<i64> {
        Ok(self.completed_lesson_ids(user_id, course_id).await?.len() as i64)
    }

    async fn reset_course_progress(&self, user_id: &str, course_id: &str) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, p| !(p.user_id == user_id && p.course_id == course_id));
        let removed = (before - records.len()) as u64;

        let mut enrollments = self.enrollments.write().await;
        if let Some(enrollment) = enrollments
            .values_mut()
            .find(|e| e.user_id == user_id && e.course_id == course_id)
        {
            enrollment.progress_percentage = 0.0;
            enrollment.updated_at = Utc::now();
        }

        Ok(removed)
    }
}

#[derive(Default)]
pub struct InMemoryQuizRepository {
    quizzes: RwLock<HashMap<String, Quiz>>,
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.contains_key(&quiz.id) {
            return Err(AppError::AlreadyExists(format!(
                "Quiz with id '{}' already exists",
                quiz.id
            )));
        }
        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        Ok(self.quizzes.read().await.get(id).cloned())
    }

    async fn list_by_lesson(&self, lesson_id: &str) -> AppResult<Vec<Quiz>> {
        Ok(self
            .quizzes
            .read()
            .await
            .values()
            .filter(|q| q.lesson_id == lesson_id)
            .cloned()
            .collect())
    }

    async fn update(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if !quizzes.contains_key(&quiz.id) {
            return Err(AppError::NotFound(format!(
                "Quiz with id '{}' not found",
                quiz.id
            )));
        }
        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        if self.quizzes.write().await.remove(id).is_none() {
            return Err(AppError::NotFound(format!(
                "Quiz with id '{}' not found",
                id
            )));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryQuestionRepository {
    questions: RwLock<HashMap<String, Question>>,
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn create(&self, question: Question) -> AppResult<Question> {
        self.questions
            .write()
            .await
            .insert(question.id.clone(), question.clone());
        Ok(question)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        Ok(self.questions.read().await.get(id).cloned())
    }

    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<Question>> {
        let mut questions: Vec<Question> = self
            .questions
            .read()
            .await
            .values()
            .filter(|q| q.quiz_id == quiz_id)
            .cloned()
            .collect();
        questions.sort_by_key(|q| q.order);
        Ok(questions)
    }

    async fn update(&self, question: Question) -> AppResult<Question> {
        let mut questions = self.questions.write().await;
        if !questions.contains_key(&question.id) {
            return Err(AppError::NotFound(format!(
                "Question with id '{}' not found",
                question.id
            )));
        }
        questions.insert(question.id.clone(), question.clone());
        Ok(question)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        if self.questions.write().await.remove(id).is_none() {
            return Err(AppError::NotFound(format!(
                "Question with id '{}' not found",
                id
            )));
        }
        Ok(())
    }

    async fn delete_by_quiz(&self, quiz_id: &str) -> AppResult<u64> {
        let mut questions = self.questions.write().await;
        let before = questions.len();
        questions.retain(|_, q| q.quiz_id != quiz_id);
        Ok((before - questions.len()) as u64)
    }

    async fn max_order(&self, quiz_id: &str) -> AppResult<i32> {
        Ok(self
            .questions
            .read()
            .await
            .values()
            .filter(|q| q.quiz_id == quiz_id)
            .map(|q| q.order)
            .max()
            .unwrap_or(0))
    }

    async fn set_orders(&self, quiz_id: &str, orders: Vec<(String, i32)>) -> AppResult<()> {
        let mut questions = self.questions.write().await;
        for (question_id, order) in orders {
            if let Some(question) = questions.get_mut(&question_id) {
                if question.quiz_id == quiz_id {
                    question.order = order;
                }
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryQuizAttemptRepository {
    attempts: RwLock<HashMap<String, QuizAttempt>>,
}

#[async_trait]
impl QuizAttemptRepository for InMemoryQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let mut attempts = self.attempts.write().await;
        if attempts.contains_key(&attempt.id) {
            return Err(AppError::AlreadyExists(format!(
                "Attempt with id '{}' already exists",
                attempt.id
            )));
        }
        attempts.insert(attempt.id.clone(), attempt.clone());
        Ok(attempt)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>> {
        Ok(self.attempts.read().await.get(id).cloned())
    }

    async fn find_in_progress(
        &self,
        user_id: &str,
        quiz_id: &str,
    ) -> AppResult<Option<QuizAttempt>> {
        Ok(self
            .attempts
            .read()
            .await
            .values()
            .find(|a| {
                a.user_id == user_id
                    && a.quiz_id == quiz_id
                    && a.status == AttemptStatus::InProgress
            })
            .cloned())
    }

    async fn count_submitted(&self, user_id: &str, quiz_id: &str) -> AppResult<i64> {
        Ok(self
            .attempts
            .read()
            .await
            .values()
            .filter(|a| {
                a.user_id == user_id
                    && a.quiz_id == quiz_id
                    && a.status == AttemptStatus::Submitted
            })
            .count() as i64)
    }

    async fn count_by_status(&self, quiz_id: &str, status: AttemptStatus) -> AppResult<i64> {
        Ok(self
            .attempts
            .read()
            .await
            .values()
            .filter(|a| a.quiz_id == quiz_id && a.status == status)
            .count() as i64)
    }

    async fn finalize(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let mut attempts = self.attempts.write().await;
        match attempts.get(&attempt.id) {
            Some(stored) if stored.status == AttemptStatus::InProgress => {
                attempts.insert(attempt.id.clone(), attempt.clone());
                Ok(attempt)
            }
            _ => Err(AppError::ValidationError(
                "This quiz attempt has already been submitted".to_string(),
            )),
        }
    }

    async fn delete_expired_in_progress(
        &self,
        quiz_id: &str,
        started_before: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut attempts = self.attempts.write().await;
        let before = attempts.len();
        attempts.retain(|_, a| {
            !(a.quiz_id == quiz_id
                && a.status == AttemptStatus::InProgress
                && a.started_at < started_before)
        });
        Ok((before - attempts.len()) as u64)
    }

    async fn has_passed(&self, user_id: &str, quiz_id: &str) -> AppResult<bool> {
        Ok(self
            .attempts
            .read()
            .await
            .values()
            .any(|a| {
                a.user_id == user_id
                    && a.quiz_id == quiz_id
                    && a.status == AttemptStatus::Submitted
                    && a.passed
            }))
    }

    async fn best_percentage(&self, user_id: &str, quiz_id: &str) -> AppResult<Option<f64>> {
        Ok(self
            .attempts
            .read()
            .await
            .values()
            .filter(|a| {
                a.user_id == user_id
                    && a.quiz_id == quiz_id
                    && a.status == AttemptStatus::Submitted
            })
            .map(|a| a.percentage_score)
            .fold(None, |best, score| match best {
                Some(b) if b >= score => Some(b),
                _ => Some(score),
            }))
    }

    async fn get_user_attempts(
        &self,
        user_id: &str,
        quiz_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizAttempt>, i64)> {
        let mut items: Vec<QuizAttempt> = self
            .attempts
            .read()
            .await
            .values()
            .filter(|a| a.user_id == user_id && a.quiz_id == quiz_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.attempt_number.cmp(&a.attempt_number));

        let total = items.len() as i64;
        let start = (offset.max(0) as usize).min(items.len());
        let end = (start + limit.max(0) as usize).min(items.len());

        Ok((items[start..end].to_vec(), total))
    }
}
