use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};

use tutor_server::{
    app_state::AppState, config::Config, errors::AppError, handlers, middleware::RequestIdMiddleware,
};

fn cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(to_io)?;
    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    let origins = config.cors_allowed_origins.clone();

    log::info!(
        "Connecting to MongoDB database '{}' (token lifetime {}h)",
        config.mongo_db_name,
        config.jwt_expiration_hours
    );
    let state = AppState::new(config).await.map_err(to_io)?;

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors(&origins))
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

fn to_io(err: AppError) -> std::io::Error {
    log::error!("Startup failed: {}", err);
    std::io::Error::other(err.to_string())
}
