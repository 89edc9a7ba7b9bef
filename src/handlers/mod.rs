pub mod attempt_handler;
pub mod course_handler;
pub mod progress_handler;
pub mod question_handler;
pub mod quiz_handler;
pub mod user_handler;

pub use attempt_handler::{get_attempt_result, list_attempts, start_attempt, submit_attempt};
pub use course_handler::{add_chapter, add_lesson, create_course, enroll, get_course};
pub use progress_handler::{
    complete_lesson, course_progress, lesson_access, reset_course_progress,
    update_lesson_progress,
};
pub use question_handler::{
    create_question, delete_question, duplicate_question, reorder_questions, update_question,
};
pub use quiz_handler::{create_quiz, delete_quiz, get_quiz, list_lesson_quizzes, update_quiz};
pub use user_handler::{create_user, get_user, health_check, health_check_live, health_check_ready};
