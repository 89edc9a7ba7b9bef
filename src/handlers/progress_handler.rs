use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::LessonProgressRequest,
    models::dto::response::ApiResponse,
};

#[post("/api/lessons/{id}/progress")]
async fn update_lesson_progress(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<LessonProgressRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let progress = state
        .progress_service
        .update_lesson_progress(&auth.0.sub, &id, request)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(progress, "Progress updated")))
}

#[post("/api/lessons/{id}/complete")]
async fn complete_lesson(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let progress = state
        .progress_service
        .mark_lesson_completed(&auth.0.sub, &id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(progress, "Lesson completed")))
}

#[get("/api/lessons/{id}/access")]
async fn lesson_access(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let access = state
        .progress_service
        .can_access_lesson(&auth.0.sub, &id)
        .await?;
    Ok(HttpResponse::Ok().json(access))
}

#[get("/api/courses/{id}/progress")]
async fn course_progress(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let progress = state
        .progress_service
        .get_course_progress(&auth.0.sub, &id)
        .await?;
    Ok(HttpResponse::Ok().json(progress))
}

#[post("/api/courses/{id}/progress/reset")]
async fn reset_course_progress(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let removed = state
        .progress_service
        .reset_course_progress(&auth.0.sub, &id)
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Course progress reset",
        "removed_records": removed,
    })))
}
