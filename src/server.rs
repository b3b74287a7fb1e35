use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::api::{ErrorBody, TODOS_PATH};
use crate::error::{Error, Result};
use crate::models::{NewTask, Task, TaskPatch};
use crate::storage::Store;

#[derive(Clone)]
pub struct AppState {
    store: Arc<Store>,
}

/// Builds the `/api/todos` router with permissive CORS and request tracing.
pub fn router(store: Arc<Store>) -> Router {
    Router::new()
        .route(TODOS_PATH, get(list_todos).post(create_todo))
        .route(
            &format!("{}/:id", TODOS_PATH),
            put(update_todo).delete(delete_todo),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { store })
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn serve(addr: SocketAddr, store: Arc<Store>) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(
        path = %store.path().display(),
        "Server running on http://{}",
        listener.local_addr()?
    );
    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

/// Runs a store call on the blocking pool; the store does synchronous file I/O.
async fn with_store<T, F>(state: &AppState, f: F) -> Result<T>
where
    F: FnOnce(&Store) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || f(&store))
        .await
        .map_err(std::io::Error::from)?
}

async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Task>>> {
    Ok(Json(with_store(&state, |store| store.list()).await?))
}

async fn create_todo(
    State(state): State<AppState>,
    Json(new): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>)> {
    let task = with_store(&state, move |store| store.create(&new)).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>> {
    Ok(Json(with_store(&state, move |store| store.update(&id, &patch)).await?))
}

async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>> {
    Ok(Json(with_store(&state, move |store| store.delete(&id)).await?))
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "Not found".to_string()),
            Error::EmptyTitle | Error::InvalidDueDate(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            _ => {
                error!(error = %self, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
