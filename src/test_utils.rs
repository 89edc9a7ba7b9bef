use crate::models::domain::{
    question::AnswerOption, Chapter, Course, Lesson, Question, QuestionType, Quiz, User, UserRole,
};



#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_roles() {
        let learner = test_learner();
        let instructor = test_instructor();

        assert_eq!(learner.role, crate::models::domain::UserRole::Learner);
        assert_eq!(instructor.role, crate::models::domain::UserRole::Instructor);
    }

    #[test]
    fn test_course_structure_is_linked() {
        let (course, chapter, lesson) = test_course_structure("instructor-1");

        assert_eq!(chapter.course_id, course.id);
        assert_eq!(lesson.chapter_id, chapter.id);
        assert_eq!(lesson.course_id, course.id);
    }

    #[test]
    fn test_mc_question_has_a_correct_option() {
        let question = test_mc_question("quiz-1", 5, 1);
        assert!(question.options.iter().any(|o| o.is_correct));
    }
}
