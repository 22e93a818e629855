mod authentication;
mod config;
mod data_formats;
mod db_helpers;
mod errors;
mod handlers;
mod models;
mod validation;

use anyhow::Context;
pub use anyhow::Result;
use authentication::JwtKeys;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
pub use config::Config;
pub use data_formats::*;
use handlers::*;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};
use std::{
    net::{SocketAddr, TcpListener},
    sync::Arc,
};
pub type JsonResponse<T> = (StatusCode, Json<T>);

pub async fn run_app(app: Router, config: Config) -> Result<()> {
    let db = init_db(&config).await?;
    let keys = JwtKeys::new(&config.jwt_secret, config.jwt_expiry_days);
    let app = app
        .layer(Extension(Arc::new(db)))
        .layer(Extension(Arc::new(keys)));
    log::info!("Server started on {}", config.bind_address);
    axum::Server::bind(&config.bind_address)
        .serve(app.into_make_service())
        .await
        .context("Server stopped unexpectedly")?;
    Ok(())
}

pub async fn init_db(config: &Config) -> Result<SqlitePool> {
    let db_url = config.database_url.as_str();
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        log::info!("Creating database {}", db_url);
        Sqlite::create_database(db_url)
            .await
            .with_context(|| format!("Failed to create database {}", db_url))?;
    } else {
        log::info!("Database already exists");
    }
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(db_url)
        .await
        .with_context(|| format!("Failed to connect to {}", db_url))?;
    log::info!("Running migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    log::info!("Migrations completed");
    Ok(pool)
}

pub fn get_random_free_port() -> (u16, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("could not bind an ephemeral port");
    match listener.local_addr() {
        Ok(addr) => (addr.port(), addr),
        Err(_) => panic!("Could not get a free port"),
    }
}

pub fn make_router() -> Router {
    Router::new()
        .route("/check_health", get(alive))
        .route("/auth/register", post(register_user))
        .route("/auth/login", post(login_user))
        .route("/users", get(list_users))
        .route("/users/search", get(search_users))
        .route("/users/:id", get(get_profile))
        .route("/users/:id/update", patch(update_profile))
        .route("/users/:id/toggle-follow", post(toggle_follow))
        .route("/users/:id/posts", get(list_user_posts))
        .route("/posts", post(create_post))
        .route("/posts/:id/toggle-like", post(toggle_like))
        .route("/posts/:id/replies", post(create_reply))
        .fallback(not_found)
}
