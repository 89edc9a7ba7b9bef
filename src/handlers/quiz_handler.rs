use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{require_instructor, AuthenticatedUser},
    errors::AppError,
    models::dto::request::{CreateQuizRequest, UpdateQuizRequest},
    models::dto::response::ApiResponse,
};

#[post("/api/quizzes")]
async fn create_quiz(
    state: web::Data<AppState>,
    request: web::Json<CreateQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_instructor(&auth.0)?;
    let request = request.into_inner();
    request.validate()?;

    let quiz = state.quiz_service.create_quiz(request, &auth.0.sub).await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(quiz, "Quiz created successfully")))
}

#[get("/api/quizzes/{id}")]
async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_instructor(&auth.0)?;

    let (quiz, questions) = state
        .quiz_service
        .get_quiz_for_author(&id, &auth.0.sub)
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "quiz": quiz,
        "questions": questions,
    })))
}

#[put("/api/quizzes/{id}")]
async fn update_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_instructor(&auth.0)?;
    let request = request.into_inner();
    request.validate()?;

    let quiz = state
        .quiz_service
        .update_quiz(&id, request, &auth.0.sub)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(quiz, "Quiz updated successfully")))
}

#[delete("/api/quizzes/{id}")]
async fn delete_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_instructor(&auth.0)?;

    state.quiz_service.delete_quiz(&id, &auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Quiz deleted successfully"
    })))
}

#[get("/api/lessons/{id}/quizzes")]
async fn list_lesson_quizzes(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quizzes = state.quiz_service.list_lesson_quizzes(&id).await?;
    Ok(HttpResponse::Ok().json(quizzes))
}
