use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{IndexOptions, ReplaceOptions},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{Enrollment, LessonProgress},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    async fn upsert(&self, progress: LessonProgress) -> AppResult<LessonProgress>;
    async fn find(&self, user_id: &str, lesson_id: &str) -> AppResult<Option<LessonProgress>>;
    async fn completed_lesson_ids(&self, user_id: &str, course_id: &str)
        -> AppResult<Vec<String>>;
    async fn count_completed(&self, user_id: &str, course_id: &str) -> AppResult<i64>;
    /// Deletes the user's lesson progress for a course and zeroes the
    /// enrollment percentage as one atomic unit. Returns the number of
    /// progress records removed.
    async fn reset_course_progress(&self, user_id: &str, course_id: &str) -> AppResult<u64>;
}

pub struct MongoProgressRepository {
    collection: Collection<LessonProgress>,
    enrollments: Collection<Enrollment>,
    db: Database,
}

impl MongoProgressRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.get_collection("lesson_progress"),
            enrollments: db.get_collection("enrollments"),
            db: db.clone(),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for lesson_progress collection");

        let user_lesson_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "lesson_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_lesson_unique".to_string())
                    .build(),
            )
            .build();

        let user_course_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "course_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("user_course".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(user_lesson_index).await?;
        self.collection.create_index(user_course_index).await?;

        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for MongoProgressRepository {
    async fn upsert(&self, progress: LessonProgress) -> AppResult<LessonProgress> {
        let filter = doc! {
            "user_id": &progress.user_id,
            "lesson_id": &progress.lesson_id,
        };
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(filter, &progress)
            .with_options(options)
            .await?;

        Ok(progress)
    }

    async fn find(&self, user_id: &str, lesson_id: &str) -> AppResult<Option<LessonProgress>> {
        let progress = self
            .collection
            .find_one(doc! { "user_id": user_id, "lesson_id": lesson_id })
            .await?;
        Ok(progress)
    }

    async fn completed_lesson_ids(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> AppResult<Vec<String>> {
        let records: Vec<LessonProgress> = self
            .collection
            .find(doc! {
                "user_id": user_id,
                "course_id": course_id,
                "is_completed": true,
            })
            .await?
            .try_collect()
            .await?;

        Ok(records.into_iter().map(|p| p.lesson_id).collect())
    }

    async fn count_completed(&self, user_id: &str, course_id: &str) -> AppResult<i64> {
        let count = self
            .collection
            .count_documents(doc! {
                "user_id": user_id,
                "course_id": course_id,
                "is_completed": true,
            })
            .await?;
        Ok(count as i64)
    }

    async fn reset_course_progress(&self, user_id: &str, course_id: &str) -> AppResult<u64> {
        let mut session = self.db.start_session().await?;
        session.start_transaction().await?;

        let filter = doc! { "user_id": user_id, "course_id": course_id };

        let outcome = async {
            let deleted = self
                .collection
                .delete_many(filter.clone())
                .session(&mut session)
                .await?;

            self.enrollments
                .update_one(
                    filter.clone(),
                    doc! { "$set": { "progress_percentage": 0.0_f64 } },
                )
                .session(&mut session)
                .await?;

            Ok::<u64, mongodb::error::Error>(deleted.deleted_count)
        }
        .await;

        match outcome {
            Ok(deleted) => {
                session.commit_transaction().await?;
                log::info!(
                    "Reset {} progress records for user {} in course {}",
                    deleted,
                    user_id,
                    course_id
                );
                Ok(deleted)
            }
            Err(err) => {
                session.abort_transaction().await?;
                Err(err.into())
            }
        }
    }
}
