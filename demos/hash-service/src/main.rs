use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use injectra::{module, Container, ContainerBuilder, ContainerConfig, HasContainer, Inject};
use serde::Deserialize;
use std::sync::Arc;

mod service;
mod store;

use service::{HashDbService, Hasher};
use store::{HashRecord, HashStore};

#[module(providers = [HashStore, Hasher, HashDbService])]
struct AppModule;

#[derive(Clone)]
struct AppState {
    container: Arc<Container>,
}

impl HasContainer for AppState {
    fn get_container(&self) -> &Container {
        &self.container
    }
}

#[derive(Deserialize)]
struct CreateHash {
    text: String,
    #[serde(default = "default_algorithm")]
    algorithm: String,
}

fn default_algorithm() -> String {
    "sha256".to_string()
}

type ApiError = (StatusCode, String);

async fn create_hash(
    Inject(svc): Inject<HashDbService>,
    Json(body): Json<CreateHash>,
) -> Result<Json<HashRecord>, ApiError> {
    svc.create(&body.text, &body.algorithm)
        .map(Json)
        .map_err(|e| (StatusCode::BAD_REQUEST, e))
}

async fn get_hash(
    Inject(svc): Inject<HashDbService>,
    Path(id): Path<u64>,
) -> Result<Json<HashRecord>, ApiError> {
    svc.get(id)
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))
}

#[derive(Deserialize)]
struct UpdateHash {
    algorithm: String,
}

#[derive(Deserialize)]
struct Lookup {
    text: String,
}

async fn lookup_hash(
    Inject(svc): Inject<HashDbService>,
    Query(query): Query<Lookup>,
) -> Result<Json<HashRecord>, ApiError> {
    svc.get_by_input(&query.text)
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))
}

async fn update_hash(
    Inject(svc): Inject<HashDbService>,
    Path(id): Path<u64>,
    Query(query): Query<UpdateHash>,
) -> Result<Json<HashRecord>, ApiError> {
    match svc.update(id, &query.algorithm) {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Not found".to_string())),
        Err(e) => Err((StatusCode::BAD_REQUEST, e)),
    }
}

async fn list_hashes(Inject(svc): Inject<HashDbService>) -> Json<Vec<HashRecord>> {
    Json(svc.list())
}

async fn delete_hash(
    Inject(svc): Inject<HashDbService>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if svc.delete(id) {
        Ok(Json(serde_json::json!({ "deleted": id })))
    } else {
        Err((StatusCode::NOT_FOUND, "Not found".to_string()))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = ContainerConfig::from_env()?;
    let container = ContainerBuilder::new()
        .config(config)
        .module::<AppModule>()
        .build()?;

    let state = AppState {
        container: Arc::new(container),
    };

    let router = Router::new()
        .route("/hash", get(list_hashes).post(create_hash))
        .route("/hash/lookup", get(lookup_hash))
        .route("/hash/{id}", get(get_hash).put(update_hash).delete(delete_hash))
        .with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("Hash service listening on http://127.0.0.1:{}", port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
