pub mod course;
pub mod enrollment;
pub mod question;
pub mod quiz;
pub mod quiz_attempt;
pub mod user;

pub use course::{Chapter, Course, Lesson};
pub use enrollment::{Enrollment, LessonProgress};
pub use question::{AnswerOption, Question, QuestionType};
pub use quiz::Quiz;
pub use quiz_attempt::{AttemptStatus, QuizAttempt, UserAnswer};
pub use user::{User, UserRole};
