use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{require_instructor, AuthenticatedUser},
    errors::AppError,
    models::dto::request::{CreateChapterRequest, CreateCourseRequest, CreateLessonRequest},
    models::dto::response::ApiResponse,
};

#[post("/api/courses")]
async fn create_course(
    state: web::Data<AppState>,
    request: web::Json<CreateCourseRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_instructor(&auth.0)?;
    let request = request.into_inner();
    request.validate()?;

    let course = state
        .course_service
        .create_course(request, &auth.0.sub)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(course, "Course created successfully")))
}

#[get("/api/courses/{id}")]
async fn get_course(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (course, lessons) = state.course_service.get_course(&id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "course": course,
        "lessons": lessons,
    })))
}

#[post("/api/courses/{id}/chapters")]
async fn add_chapter(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<CreateChapterRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_instructor(&auth.0)?;
    let request = request.into_inner();
    request.validate()?;

    let chapter = state
        .course_service
        .add_chapter(&id, request, &auth.0.sub)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(chapter, "Chapter created successfully")))
}

#[post("/api/chapters/{id}/lessons")]
async fn add_lesson(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<CreateLessonRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_instructor(&auth.0)?;
    let request = request.into_inner();
    request.validate()?;

    let lesson = state
        .course_service
        .add_lesson(&id, request, &auth.0.sub)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(lesson, "Lesson created successfully")))
}

#[post("/api/courses/{id}/enroll")]
async fn enroll(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let enrollment = state.course_service.enroll(&id, &auth.0.sub).await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(enrollment, "Enrolled successfully")))
}
