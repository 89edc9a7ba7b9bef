pub mod course_service;
pub mod progress_service;
pub mod question_service;
pub mod quiz_attempt_service;
pub mod quiz_service;
pub mod user_service;

pub use course_service::CourseService;
pub use progress_service::ProgressService;
pub use question_service::QuestionService;
pub use quiz_attempt_service::QuizAttemptService;
pub use quiz_service::QuizService;
pub use user_service::UserService;
