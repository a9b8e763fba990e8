use actix_cors::Cors;
use actix_web::{self, middleware::Logger, web, App, HttpServer};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use crate::{
    configs::connect_database,
    modules::{
        course::{repository_pg::CoursePgRepository, service::CourseService},
        media::store_http::HttpMediaStore,
        user::repository_pg::UserPgRepository,
    },
};

mod api;
mod configs;
mod constants;
mod modules;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    let media_store = HttpMediaStore::new(
        ENV.media_store_url.clone(),
        ENV.media_store_key.clone(),
        Duration::from_secs(ENV.media_timeout_secs),
    )
    .map_err(|_| std::io::Error::other("Media store client error"))?;

    let course_repo = CoursePgRepository::new(db_pool.clone());
    let user_repo = UserPgRepository::new(db_pool.clone());

    let course_service = CourseService::with_dependencies(
        Arc::new(course_repo),
        Arc::new(user_repo),
        Arc::new(media_store),
    );

    println!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(ENV.frontend_url.as_str())
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(course_service.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .service(health_check)
            .service(web::scope("/api").configure(modules::course::route::configure))
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
