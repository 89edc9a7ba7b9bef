use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{question::AnswerOption, Question, QuestionType, Quiz},
        dto::request::{
            AnswerOptionInput, CreateQuestionRequest, ReorderQuestionsRequest,
            UpdateQuestionRequest,
        },
    },
    repositories::{CourseRepository, QuestionRepository, QuizRepository},
};

const MAX_ANSWER_OPTIONS: usize = 10;

pub struct QuestionService {
    questions: Arc<dyn QuestionRepository>,
    quizzes: Arc<dyn QuizRepository>,
    courses: Arc<dyn CourseRepository>,
}

impl QuestionService {
    pub fn new(
        questions: Arc<dyn QuestionRepository>,
        quizzes: Arc<dyn QuizRepository>,
        courses: Arc<dyn CourseRepository>,
    ) -> Self {
        Self {
            questions,
            quizzes,
            courses,
        }
    }

    pub async fn create_question(
        &self,
        quiz_id: &str,
        request: CreateQuestionRequest,
        instructor_id: &str,
    ) -> AppResult<Question> {
        let quiz = self.owned_quiz(quiz_id, instructor_id).await?;

        let order = match request.order {
            Some(order) => {
                let existing = self.questions.find_by_quiz(&quiz.id).await?;
                if existing.iter().any(|q| q.order == order) {
                    return Err(AppError::ValidationError(
                        "A question with this order already exists in the quiz".to_string(),
                    ));
                }
                order
            }
            None => self.questions.max_order(&quiz.id).await? + 1,
        };

        let options = Self::build_options(
            request.question_type,
            &request.options,
            request.true_false_answer,
        )?;

        let mut question = Question::new(
            &quiz.id,
            &request.question_text,
            request.question_type,
            request.points,
            order,
        );
        question.explanation = request.explanation;
        question.options = options;

        let question = self.questions.create(question).await?;

        log::info!("Question {} created in quiz {}", question.id, quiz.id);
        Ok(question)
    }

    pub async fn update_question(
        &self,
        question_id: &str,
        request: UpdateQuestionRequest,
        instructor_id: &str,
    ) -> AppResult<Question> {
        let mut question = self.owned_question(question_id, instructor_id).await?;

        let options = Self::build_options(
            request.question_type,
            &request.options,
            request.true_false_answer,
        )?;

        question.question_text = request.question_text;
        question.question_type = request.question_type;
        question.points = request.points;
        question.explanation = request.explanation;
        question.options = options;

        let question = self.questions.update(question).await?;

        log::info!("Question {} updated", question.id);
        Ok(question)
    }

    pub async fn duplicate_question(
        &self,
        question_id: &str,
        instructor_id: &str,
    ) -> AppResult<Question> {
        let original = self.owned_question(question_id, instructor_id).await?;

        let next_order = self.questions.max_order(&original.quiz_id).await? + 1;

        let mut copy = Question::new(
            &original.quiz_id,
            &format!("Copy of {}", original.question_text),
            original.question_type,
            original.points,
            next_order,
        );
        copy.explanation = original.explanation.clone();
        copy.options = original
            .options
            .iter()
            .map(|o| AnswerOption::new(&o.text, o.is_correct, o.order))
            .collect();

        let copy = self.questions.create(copy).await?;

        log::info!(
            "Question {} duplicated as {} in quiz {}",
            original.id,
            copy.id,
            copy.quiz_id
        );
        Ok(copy)
    }

    pub async fn delete_question(&self, question_id: &str, instructor_id: &str) -> AppResult<()> {
        let question = self.owned_question(question_id, instructor_id).await?;

        self.questions.delete(&question.id).await?;
        log::info!("Question {} deleted from quiz {}", question.id, question.quiz_id);
        Ok(())
    }

    /// Assigns contiguous order values 1..N following the given id sequence.
    /// The sequence must cover the quiz's questions exactly.
    pub async fn reorder_questions(
        &self,
        quiz_id: &str,
        request: ReorderQuestionsRequest,
        instructor_id: &str,
    ) -> AppResult<Vec<Question>> {
        let quiz = self.owned_quiz(quiz_id, instructor_id).await?;

        let existing = self.questions.find_by_quiz(&quiz.id).await?;

        if request.question_ids.len() != existing.len() {
            return Err(AppError::ValidationError(format!(
                "Reorder must include every question: got {}, quiz has {}",
                request.question_ids.len(),
                existing.len()
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for id in &request.question_ids {
            if !existing.iter().any(|q| &q.id == id) {
                return Err(AppError::ValidationError(format!(
                    "Question '{}' does not belong to this quiz",
                    id
                )));
            }
            if !seen.insert(id) {
                return Err(AppError::ValidationError(format!(
                    "Question '{}' appears more than once",
                    id
                )));
            }
        }

        let orders: Vec<(String, i32)> = request
            .question_ids
            .iter()
            .enumerate()
            .map(|(index, id)| (id.clone(), index as i32 + 1))
            .collect();

        self.questions.set_orders(&quiz.id, orders).await?;

        log::info!("Questions reordered for quiz {}", quiz.id);
        self.questions.find_by_quiz(&quiz.id).await
    }

    /// Option rules by question type. `multiple_choice` keeps the supplied
    /// options after discarding blank ones; `true_false` synthesizes the
    /// fixed pair; text-based types persist none.
    fn build_options(
        question_type: QuestionType,
        inputs: &[AnswerOptionInput],
        true_false_answer: Option<bool>,
    ) -> AppResult<Vec<AnswerOption>> {
        match question_type {
            QuestionType::MultipleChoice => {
                let valid: Vec<&AnswerOptionInput> = inputs
                    .iter()
                    .filter(|o| !o.text.trim().is_empty())
                    .collect();

                if valid.len() < 2 {
                    return Err(AppError::ValidationError(
                        "Multiple choice questions must have at least 2 answer options"
                            .to_string(),
                    ));
                }
                if valid.len() > MAX_ANSWER_OPTIONS {
                    return Err(AppError::ValidationError(format!(
                        "Multiple choice questions cannot have more than {} answer options",
                        MAX_ANSWER_OPTIONS
                    )));
                }
                if !valid.iter().any(|o| o.is_correct) {
                    return Err(AppError::ValidationError(
                        "Multiple choice questions must have at least one correct answer"
                            .to_string(),
                    ));
                }

                Ok(valid
                    .into_iter()
                    .map(|o| AnswerOption::new(o.text.trim(), o.is_correct, o.order))
                    .collect())
            }
            QuestionType::TrueFalse => {
                let answer = true_false_answer.ok_or_else(|| {
                    AppError::ValidationError(
                        "True/False questions must have a correct answer selected".to_string(),
                    )
                })?;
                Ok(Question::true_false_options(answer))
            }
            QuestionType::Essay | QuestionType::FillBlank => Ok(Vec::new()),
        }
    }

    async fn owned_question(
        &self,
        question_id: &str,
        instructor_id: &str,
    ) -> AppResult<Question> {
        let question = self
            .questions
            .find_by_id(question_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Question with id '{}' not found", question_id))
            })?;

        self.owned_quiz(&question.quiz_id, instructor_id).await?;
        Ok(question)
    }

    async fn owned_quiz(&self, quiz_id: &str, instructor_id: &str) -> AppResult<Quiz> {
        let quiz = self.quizzes.find_by_id(quiz_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id))
        })?;

        let course = self
            .courses
            .find_course_by_id(&quiz.course_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Course with id '{}' not found", quiz.course_id))
            })?;

        if course.author_id != instructor_id {
            return Err(AppError::Unauthorized(
                "You can only manage questions in your own courses".to_string(),
            ));
        }

        Ok(quiz)
    }
}
