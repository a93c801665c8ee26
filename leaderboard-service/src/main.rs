use std::io;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use leaderboard_service::{handlers, Config, LeaderboardService, RedisRankStore};
use redis_utils::RedisPool;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[actix_web::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("config error: {e}")))?;

    info!(
        "Starting {} on {}:{}",
        config.app.service_name, config.app.host, config.app.port
    );

    let pool = RedisPool::connect(&config.redis.url)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("redis error: {e}")))?;
    let store = Arc::new(RedisRankStore::new(pool.manager()));
    let service = web::Data::new(LeaderboardService::new(store, &config.ranking));

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(Logger::default())
            .route(
                "/api/v1/health",
                web::get()
                    .to(|| async { HttpResponse::Ok().json(serde_json::json!({"status": "ok"})) }),
            )
            .route(
                "/api/v1/health/live",
                web::get().to(|| async { HttpResponse::Ok().finish() }),
            )
            .route(
                "/api/v1/health/ready",
                web::get().to(|| async { HttpResponse::Ok().finish() }),
            )
            .service(web::scope("/api/v1").configure(handlers::routes))
    })
    .bind(&bind_address)?
    .run()
    .await
}
