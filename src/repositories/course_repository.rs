use std::collections::HashMap;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{Chapter, Course, Lesson},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn create_course(&self, course: Course) -> AppResult<Course>;
    async fn find_course_by_id(&self, id: &str) -> AppResult<Option<Course>>;
    async fn create_chapter(&self, chapter: Chapter) -> AppResult<Chapter>;
    async fn find_chapter_by_id(&self, id: &str) -> AppResult<Option<Chapter>>;
    async fn create_lesson(&self, lesson: Lesson) -> AppResult<Lesson>;
    async fn find_lesson_by_id(&self, id: &str) -> AppResult<Option<Lesson>>;
    async fn lessons_by_chapter(&self, chapter_id: &str) -> AppResult<Vec<Lesson>>;
    /// All lessons of a course ordered by (chapter order, lesson order).
    async fn course_outline(&self, course_id: &str) -> AppResult<Vec<Lesson>>;
    async fn count_lessons(&self, course_id: &str) -> AppResult<i64>;
}

pub struct MongoCourseRepository {
    courses: Collection<Course>,
    chapters: Collection<Chapter>,
    lessons: Collection<Lesson>,
}

impl MongoCourseRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            courses: db.get_collection("courses"),
            chapters: db.get_collection("chapters"),
            lessons: db.get_collection("lessons"),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for course collections");

        for (keys, name, collection_name) in [
            (doc! { "id": 1 }, "id_unique", "courses"),
            (doc! { "id": 1 }, "id_unique", "chapters"),
            (doc! { "id": 1 }, "id_unique", "lessons"),
        ] {
            let index = IndexModel::builder()
                .keys(keys)
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name(name.to_string())
                        .build(),
                )
                .build();
            match collection_name {
                "courses" => self.courses.create_index(index).await?,
                "chapters" => self.chapters.create_index(index).await?,
                _ => self.lessons.create_index(index).await?,
            };
        }

        let chapter_lookup = IndexModel::builder()
            .keys(doc! { "chapter_id": 1, "order": 1 })
            .options(IndexOptions::builder().name("chapter_order".to_string()).build())
            .build();
        self.lessons.create_index(chapter_lookup).await?;

        Ok(())
    }
}

#[async_trait]
impl CourseRepository for MongoCourseRepository {
    async fn create_course(&self, course: Course) -> AppResult<Course> {
        self.courses.insert_one(&course).await?;
        Ok(course)
    }

    async fn find_course_by_id(&self, id: &str) -> AppResult<Option<Course>> {
        let course = self.courses.find_one(doc! { "id": id }).await?;
        Ok(course)
    }

    async fn create_chapter(&self, chapter: Chapter) -> AppResult<Chapter> {
        self.chapters.insert_one(&chapter).await?;
        Ok(chapter)
    }

    async fn find_chapter_by_id(&self, id: &str) -> AppResult<Option<Chapter>> {
        let chapter = self.chapters.find_one(doc! { "id": id }).await?;
        Ok(chapter)
    }

    async fn create_lesson(&self, lesson: Lesson) -> AppResult<Lesson> {
        self.lessons.insert_one(&lesson).await?;
        Ok(lesson)
    }

    async fn find_lesson_by_id(&self, id: &str) -> AppResult<Option<Lesson>> {
        let lesson = self.lessons.find_one(doc! { "id": id }).await?;
        Ok(lesson)
    }

    async fn lessons_by_chapter(&self, chapter_id: &str) -> AppResult<Vec<Lesson>> {
        let lessons: Vec<Lesson> = self
            .lessons
            .find(doc! { "chapter_id": chapter_id })
            .sort(doc! { "order": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(lessons)
    }

    async fn course_outline(&self, course_id: &str) -> AppResult<Vec<Lesson>> {
        let chapters: Vec<Chapter> = self
            .chapters
            .find(doc! { "course_id": course_id })
            .sort(doc! { "order": 1 })
            .await?
            .try_collect()
            .await?;

        let chapter_order: HashMap<String, i32> = chapters
            .into_iter()
            .map(|c| (c.id, c.order))
            .collect();

        let mut lessons: Vec<Lesson> = self
            .lessons
            .find(doc! { "course_id": course_id })
            .await?
            .try_collect()
            .await?;

        lessons.sort_by_key(|l| {
            (
                chapter_order.get(&l.chapter_id).copied().unwrap_or(i32::MAX),
                l.order,
            )
        });

        Ok(lessons)
    }

    async fn count_lessons(&self, course_id: &str) -> AppResult<i64> {
        let count = self
            .lessons
            .count_documents(doc! { "course_id": course_id })
            .await?;
        Ok(count as i64)
    }
}
