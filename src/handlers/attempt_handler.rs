use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{PaginationParams, SubmitAttemptRequest},
};

#[post("/api/quizzes/{id}/attempts")]
async fn start_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let view = state.attempt_service.start_attempt(&id, &auth.0).await?;

    let mut status = if view.is_ongoing_attempt {
        HttpResponse::Ok()
    } else {
        HttpResponse::Created()
    };
    Ok(status.json(view))
}

#[post("/api/attempts/{id}/submit")]
async fn submit_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubmitAttemptRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let result = state
        .attempt_service
        .submit_attempt(&id, &auth.0, request)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/api/attempts/{id}")]
async fn get_attempt_result(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let result = state.attempt_service.get_result(&id, &auth.0).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/api/quizzes/{id}/attempts")]
async fn list_attempts(
    state: web::Data<AppState>,
    id: web::Path<String>,
    query: web::Query<PaginationParams>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let pagination = query.into_inner();
    pagination.validate()?;

    let page = state
        .attempt_service
        .list_attempts(&id, &auth.0, &pagination)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}
