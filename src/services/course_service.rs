use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Chapter, Course, Enrollment, Lesson},
        dto::request::{CreateChapterRequest, CreateCourseRequest, CreateLessonRequest},
    },
    repositories::{CourseRepository, EnrollmentRepository},
};

pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
}

impl CourseService {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
    ) -> Self {
        Self {
            courses,
            enrollments,
        }
    }

    pub async fn create_course(
        &self,
        request: CreateCourseRequest,
        author_id: &str,
    ) -> AppResult<Course> {
        let course = Course::new(author_id, &request.title, request.description);
        let course = self.courses.create_course(course).await?;

        log::info!("Course {} created by {}", course.id, author_id);
        Ok(course)
    }

    pub async fn get_course(&self, course_id: &str) -> AppResult<(Course, Vec<Lesson>)> {
        let course = self
            .courses
            .find_course_by_id(course_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Course with id '{}' not found", course_id))
            })?;

        let outline = self.courses.course_outline(course_id).await?;
        Ok((course, outline))
    }

    pub async fn add_chapter(
        &self,
        course_id: &str,
        request: CreateChapterRequest,
        author_id: &str,
    ) -> AppResult<Chapter> {
        let course = self.owned_course(course_id, author_id).await?;

        let chapter = Chapter::new(&course.id, &request.title, request.order);
        let chapter = self.courses.create_chapter(chapter).await?;

        log::info!("Chapter {} added to course {}", chapter.id, course.id);
        Ok(chapter)
    }

    pub async fn add_lesson(
        &self,
        chapter_id: &str,
        request: CreateLessonRequest,
        author_id: &str,
    ) -> AppResult<Lesson> {
        let chapter = self
            .courses
            .find_chapter_by_id(chapter_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Chapter with id '{}' not found", chapter_id))
            })?;

        self.owned_course(&chapter.course_id, author_id).await?;

        if let Some(unlock_after) = request.unlock_after_lesson_id.as_deref() {
            self.validate_unlock_after_lesson(chapter_id, unlock_after)
                .await?;
        }

        let mut lesson = Lesson::new(
            &chapter.id,
            &chapter.course_id,
            &request.name,
            &request.content,
            request.order,
        );
        lesson.description = request.description;
        lesson.is_locked = request.is_locked;
        lesson.unlock_after_lesson_id = request.unlock_after_lesson_id;
        lesson.is_mandatory = request.is_mandatory;
        lesson.requires_quiz_pass = request.requires_quiz_pass;
        lesson.min_quiz_score = request.min_quiz_score;

        let lesson = self.courses.create_lesson(lesson).await?;

        log::info!("Lesson {} added to chapter {}", lesson.id, chapter.id);
        Ok(lesson)
    }

    pub async fn enroll(&self, course_id: &str, user_id: &str) -> AppResult<Enrollment> {
        let course = self
            .courses
            .find_course_by_id(course_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Course with id '{}' not found", course_id))
            })?;

        if self.enrollments.is_enrolled(user_id, &course.id).await? {
            return Err(AppError::AlreadyExists(format!(
                "User is already enrolled in course '{}'",
                course.id
            )));
        }

        let enrollment = self
            .enrollments
            .create(Enrollment::new(user_id, &course.id))
            .await?;

        log::info!("User {} enrolled in course {}", user_id, course.id);
        Ok(enrollment)
    }

    /// The explicit predecessor of a lesson must live in the same chapter.
    async fn validate_unlock_after_lesson(
        &self,
        chapter_id: &str,
        unlock_after_lesson_id: &str,
    ) -> AppResult<()> {
        let in_chapter = self
            .courses
            .lessons_by_chapter(chapter_id)
            .await?
            .iter()
            .any(|l| l.id == unlock_after_lesson_id);

        if !in_chapter {
            return Err(AppError::ValidationError(
                "The unlock-after lesson must belong to the same chapter".to_string(),
            ));
        }

        Ok(())
    }

    async fn owned_course(&self, course_id: &str, author_id: &str) -> AppResult<Course> {
        let course = self
            .courses
            .find_course_by_id(course_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Course with id '{}' not found", course_id))
            })?;

        if course.author_id != author_id {
            return Err(AppError::Unauthorized(
                "You can only modify your own courses".to_string(),
            ));
        }

        Ok(course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::course_repository::MockCourseRepository;
    use crate::repositories::enrollment_repository::MockEnrollmentRepository;

    fn make_service(
        courses: MockCourseRepository,
        enrollments: MockEnrollmentRepository,
    ) -> CourseService {
        CourseService::new(Arc::new(courses), Arc::new(enrollments))
    }

    fn lesson_request(unlock_after: Option<String>) -> CreateLessonRequest {
        CreateLessonRequest {
            name: "Lesson".to_string(),
            description: None,
            content: "Content".to_string(),
            order: 1,
            is_locked: false,
            unlock_after_lesson_id: unlock_after,
            is_mandatory: true,
            requires_quiz_pass: false,
            min_quiz_score: None,
        }
    }

    #[tokio::test]
    async fn add_chapter_rejects_non_author() {
        let mut courses = MockCourseRepository::new();
        courses
            .expect_find_course_by_id()
            .returning(|_| Ok(Some(Course::new("instructor-1", "Rust 101", None))));

        let service = make_service(courses, MockEnrollmentRepository::new());

        let result = service
            .add_chapter(
                "course-1",
                CreateChapterRequest {
                    title: "Basics".to_string(),
                    order: 1,
                },
                "someone-else",
            )
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn add_lesson_rejects_unlock_after_from_other_chapter() {
        let course = Course::new("instructor-1", "Rust 101", None);
        let course_id = course.id.clone();
        let chapter = Chapter::new(&course_id, "Basics", 1);
        let chapter_id = chapter.id.clone();

        let mut courses = MockCourseRepository::new();
        {
            let chapter = chapter.clone();
            courses
                .expect_find_chapter_by_id()
                .returning(move |_| Ok(Some(chapter.clone())));
        }
        courses
            .expect_find_course_by_id()
            .returning(move |_| Ok(Some(course.clone())));
        courses
            .expect_lessons_by_chapter()
            .returning(|_| Ok(vec![]));

        let service = make_service(courses, MockEnrollmentRepository::new());

        let result = service
            .add_lesson(
                &chapter_id,
                lesson_request(Some("lesson-from-elsewhere".to_string())),
                "instructor-1",
            )
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn enroll_twice_is_conflict() {
        let course = Course::new("instructor-1", "Rust 101", None);
        let mut courses = MockCourseRepository::new();
        courses
            .expect_find_course_by_id()
            .returning(move |_| Ok(Some(course.clone())));

        let mut enrollments = MockEnrollmentRepository::new();
        enrollments.expect_is_enrolled().returning(|_, _| Ok(true));

        let service = make_service(courses, enrollments);

        let result = service.enroll("course-1", "learner-1").await;
        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
    }
}
