use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoCourseRepository, MongoEnrollmentRepository, MongoProgressRepository,
        MongoQuestionRepository, MongoQuizAttemptRepository, MongoQuizRepository,
        MongoUserRepository, UserRepository,
    },
    services::{
        CourseService, ProgressService, QuestionService, QuizAttemptService, QuizService,
        UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub course_service: Arc<CourseService>,
    pub quiz_service: Arc<QuizService>,
    pub question_service: Arc<QuestionService>,
    pub attempt_service: Arc<QuizAttemptService>,
    pub progress_service: Arc<ProgressService>,
    pub db: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let user_repository = Arc::new(MongoUserRepository::new(&db));
        user_repository.ensure_indexes().await?;

        let course_repository = Arc::new(MongoCourseRepository::new(&db));
        course_repository.ensure_indexes().await?;

        let enrollment_repository = Arc::new(MongoEnrollmentRepository::new(&db));
        enrollment_repository.ensure_indexes().await?;

        let progress_repository = Arc::new(MongoProgressRepository::new(&db));
        progress_repository.ensure_indexes().await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;

        let question_repository = Arc::new(MongoQuestionRepository::new(&db));
        question_repository.ensure_indexes().await?;

        let attempt_repository = Arc::new(MongoQuizAttemptRepository::new(&db));
        attempt_repository.ensure_indexes().await?;

        let user_service = Arc::new(UserService::new(user_repository));
        let course_service = Arc::new(CourseService::new(
            course_repository.clone(),
            enrollment_repository.clone(),
        ));
        let quiz_service = Arc::new(QuizService::new(
            quiz_repository.clone(),
            question_repository.clone(),
            attempt_repository.clone(),
            course_repository.clone(),
        ));
        let question_service = Arc::new(QuestionService::new(
            question_repository.clone(),
            quiz_repository.clone(),
            course_repository.clone(),
        ));
        let attempt_service = Arc::new(QuizAttemptService::new(
            attempt_repository.clone(),
            quiz_repository.clone(),
            question_repository.clone(),
            enrollment_repository.clone(),
            course_repository.clone(),
        ));
        let progress_service = Arc::new(ProgressService::new(
            progress_repository,
            enrollment_repository,
            course_repository,
            quiz_repository,
            attempt_repository,
        ));

        Ok(Self {
            user_service,
            course_service,
            quiz_service,
            question_service,
            attempt_service,
            progress_service,
            db,
            config: Arc::new(config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
