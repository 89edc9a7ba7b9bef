use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use brainstorm_server::{
    app_state::AppState,
    auth::{AuthMiddleware, JwtService},
    config::Config,
    handlers,
    middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        config.validate_for_production();
    }

    let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);
    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    let state = AppState::new(config)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = match state.config.cors_allowed_origin.as_deref() {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header(),
            None => Cors::permissive(),
        };

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(jwt_service.clone()))
            .wrap(cors)
            .wrap(RequestIdMiddleware)
            .wrap(Logger::default())
            .service(handlers::health_check)
            .service(handlers::health_check_live)
            .service(handlers::health_check_ready)
            .service(
                web::scope("")
                    .wrap(AuthMiddleware)
                    .service(handlers::create_user)
                    .service(handlers::get_user)
                    .service(handlers::create_course)
                    .service(handlers::get_course)
                    .service(handlers::add_chapter)
                    .service(handlers::add_lesson)
                    .service(handlers::enroll)
                    .service(handlers::create_quiz)
                    .service(handlers::get_quiz)
                    .service(handlers::update_quiz)
                    .service(handlers::delete_quiz)
                    .service(handlers::list_lesson_quizzes)
                    .service(handlers::create_question)
                    .service(handlers::update_question)
                    .service(handlers::duplicate_question)
                    .service(handlers::delete_question)
                    .service(handlers::reorder_questions)
                    .service(handlers::start_attempt)
                    .service(handlers::submit_attempt)
                    .service(handlers::get_attempt_result)
                    .service(handlers::list_attempts)
                    .service(handlers::update_lesson_progress)
                    .service(handlers::complete_lesson)
                    .service(handlers::lesson_access)
                    .service(handlers::course_progress)
                    .service(handlers::reset_course_progress),
            )
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
