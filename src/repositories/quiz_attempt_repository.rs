use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::quiz_attempt::{AttemptStatus, QuizAttempt},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>>;
    async fn find_in_progress(&self, user_id: &str, quiz_id: &str)
        -> AppResult<Option<QuizAttempt>>;
    async fn count_submitted(&self, user_id: &str, quiz_id: &str) -> AppResult<i64>;
    async fn count_by_status(&self, quiz_id: &str, status: AttemptStatus) -> AppResult<i64>;
    /// Persists the terminal result. Only replaces the document while it is
    /// still in progress; a submitted attempt is never rewritten.
    async fn finalize(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;
    /// Removes abandoned in-progress attempts started before the cutoff.
    async fn delete_expired_in_progress(
        &self,
        quiz_id: &str,
        started_before: DateTime<Utc>,
    ) -> AppResult<u64>;
    async fn has_passed(&self, user_id: &str, quiz_id: &str) -> AppResult<bool>;
    async fn best_percentage(&self, user_id: &str, quiz_id: &str) -> AppResult<Option<f64>>;
    async fn get_user_attempts(
        &self,
        user_id: &str,
        quiz_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizAttempt>, i64)>;
}

pub struct MongoQuizAttemptRepository {
    collection: Collection<QuizAttempt>,
}

impl MongoQuizAttemptRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quiz_attempts");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_attempts collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let user_quiz_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "quiz_id": 1, "status": 1 })
            .options(
                IndexOptions::builder()
                    .name("user_quiz_status".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(user_quiz_index).await?;

        Ok(())
    }
}

#[async_trait]
impl QuizAttemptRepository for MongoQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        self.collection.insert_one(&attempt).await?;
        Ok(attempt)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>> {
        let attempt = self.collection.find_one(doc! { "id": id }).await?;
        Ok(attempt)
    }

    async fn find_in_progress(
        &self,
        user_id: &str,
        quiz_id: &str,
    ) -> AppResult<Option<QuizAttempt>> {
        let attempt = self
            .collection
            .find_one(doc! {
                "user_id": user_id,
                "quiz_id": quiz_id,
                "status": AttemptStatus::InProgress.as_str(),
            })
            .await?;
        Ok(attempt)
    }

    async fn count_submitted(&self, user_id: &str, quiz_id: &str) -> AppResult<i64> {
        let count = self
            .collection
            .count_documents(doc! {
                "user_id": user_id,
                "quiz_id": quiz_id,
                "status": AttemptStatus::Submitted.as_str(),
            })
            .await?;
        Ok(count as i64)
    }

    async fn count_by_status(&self, quiz_id: &str, status: AttemptStatus) -> AppResult<i64> {
        let count = self
            .collection
            .count_documents(doc! {
                "quiz_id": quiz_id,
                "status": status.as_str(),
            })
            .await?;
        Ok(count as i64)
    }

    async fn finalize(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let result = self
            .collection
            .replace_one(
                doc! {
                    "id": &attempt.id,
                    "status": AttemptStatus::InProgress.as_str(),
                },
                &attempt,
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::ValidationError(
                "This quiz attempt has already been submitted".to_string(),
            ));
        }

        Ok(attempt)
    }

    async fn delete_expired_in_progress(
        &self,
        quiz_id: &str,
        started_before: DateTime<Utc>,
    ) -> AppResult<u64> {
        let open: Vec<QuizAttempt> = self
            .collection
            .find(doc! {
                "quiz_id": quiz_id,
                "status": AttemptStatus::InProgress.as_str(),
            })
            .await?
            .try_collect()
            .await?;

        let expired_ids: Vec<String> = open
            .into_iter()
            .filter(|a| a.started_at < started_before)
            .map(|a| a.id)
            .collect();

        if expired_ids.is_empty() {
            return Ok(0);
        }

        let result = self
            .collection
            .delete_many(doc! { "id": { "$in": expired_ids } })
            .await?;

        Ok(result.deleted_count)
    }

    async fn has_passed(&self, user_id: &str, quiz_id: &str) -> AppResult<bool> {
        let attempt = self
            .collection
            .find_one(doc! {
                "user_id": user_id,
                "quiz_id": quiz_id,
                "status": AttemptStatus::Submitted.as_str(),
                "passed": true,
            })
            .await?;
        Ok(attempt.is_some())
    }

    async fn best_percentage(&self, user_id: &str, quiz_id: &str) -> AppResult<Option<f64>> {
        let best: Option<QuizAttempt> = self
            .collection
            .find_one(doc! {
                "user_id": user_id,
                "quiz_id": quiz_id,
                "status": AttemptStatus::Submitted.as_str(),
            })
            .sort(doc! { "percentage_score": -1 })
            .await?;

        Ok(best.map(|a| a.percentage_score))
    }

    async fn get_user_attempts(
        &self,
        user_id: &str,
        quiz_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizAttempt>, i64)> {
        let filter = doc! { "user_id": user_id, "quiz_id": quiz_id };

        let total = self.collection.count_documents(filter.clone()).await?;

        let attempts = self
            .collection
            .find(filter)
            .skip(offset as u64)
            .limit(limit)
            .sort(doc! { "attempt_number": -1 })
            .await?
            .try_collect()
            .await?;

        Ok((attempts, total as i64))
    }
}
