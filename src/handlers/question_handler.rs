use actix_web::{delete, post, put, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{require_instructor, AuthenticatedUser},
    errors::AppError,
    models::dto::request::{CreateQuestionRequest, ReorderQuestionsRequest, UpdateQuestionRequest},
    models::dto::response::ApiResponse,
};

#[post("/api/quizzes/{id}/questions")]
async fn create_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<CreateQuestionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_instructor(&auth.0)?;
    let request = request.into_inner();
    request.validate()?;

    let question = state
        .question_service
        .create_question(&id, request, &auth.0.sub)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(question, "Question created successfully")))
}

#[put("/api/questions/{id}")]
async fn update_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateQuestionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_instructor(&auth.0)?;
    let request = request.into_inner();
    request.validate()?;

    let question = state
        .question_service
        .update_question(&id, request, &auth.0.sub)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(question, "Question updated successfully")))
}

#[post("/api/questions/{id}/duplicate")]
async fn duplicate_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_instructor(&auth.0)?;

    let question = state
        .question_service
        .duplicate_question(&id, &auth.0.sub)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(question, "Question duplicated successfully")))
}

#[delete("/api/questions/{id}")]
async fn delete_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_instructor(&auth.0)?;

    state
        .question_service
        .delete_question(&id, &auth.0.sub)
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Question deleted successfully"
    })))
}

#[post("/api/quizzes/{id}/questions/reorder")]
async fn reorder_questions(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<ReorderQuestionsRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_instructor(&auth.0)?;
    let request = request.into_inner();
    request.validate()?;

    let questions = state
        .question_service
        .reorder_questions(&id, request, &auth.0.sub)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(questions, "Questions reordered successfully")))
}
