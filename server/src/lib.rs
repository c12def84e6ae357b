//! HTTP surface of the todo service.
//!
//! # Design
//! Handlers are thin: parse the path and body, call one `TodoStore` method,
//! serialize the result. The store is injected as `Arc<dyn TodoStore>` so
//! tests can swap in `MemoryStore`. Every failure becomes an `ApiError` and
//! leaves through the same JSON envelope.

pub mod auth;
pub mod config;
pub mod error;

use std::{future::Future, sync::Arc, time::Duration};

use axum::{
    error_handling::HandleErrorLayer,
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{Method, StatusCode, Uri},
    middleware,
    routing::{get, post},
    BoxError, Json, Router,
};
use tokio::net::TcpListener;
use todo_core::{Secret, SecretInput, Todo, TodoInput, TodoStore};
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use auth::Credentials;
pub use config::{Config, ConfigError};
pub use error::{ApiError, ErrorBody};

pub type Store = Arc<dyn TodoStore>;

/// Build the router. With `credentials`, every route sits behind the
/// basic-auth gate.
pub fn app(store: Store, credentials: Option<Credentials>) -> Router {
    let router = Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .route("/admin/secrets", post(create_secret))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(store);

    match credentials {
        Some(credentials) => {
            router.layer(middleware::from_fn_with_state(credentials, auth::require_basic_auth))
        }
        None => router,
    }
}

/// Wrap a router with request tracing and a per-request deadline. A request
/// that overruns the deadline is answered with 408 and the error envelope.
pub fn with_service_layers(router: Router, request_timeout: Duration) -> Router {
    router
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(middleware_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(TraceLayer::new_for_http())
}

async fn middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(err.to_string())
    }
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}

async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}

/// Serve `router` until `shutdown` resolves, then drain in-flight requests.
pub async fn run(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on SIGINT or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("shutdown signal received, draining connections");
}

async fn list_todos(State(store): State<Store>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(store.list().await?))
}

async fn create_todo(
    State(store): State<Store>,
    input: Result<Json<TodoInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let Json(input) = input?;
    let todo = store.insert(&input.body).await?;
    info!(id = todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn get_todo(
    State(store): State<Store>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Path(id) = id?;
    Ok(Json(store.get(id).await?))
}

async fn update_todo(
    State(store): State<Store>,
    id: Result<Path<i64>, PathRejection>,
    input: Result<Json<TodoInput>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Path(id) = id?;
    let Json(input) = input?;
    let todo = store.update(id, &input.body).await?;
    info!(id, "todo updated");
    Ok(Json(todo))
}

async fn delete_todo(
    State(store): State<Store>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    store.delete(id).await?;
    info!(id, "todo deleted");
    Ok(StatusCode::OK)
}

async fn create_secret(
    State(store): State<Store>,
    input: Result<Json<SecretInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Secret>), ApiError> {
    let Json(input) = input?;
    let secret = store.insert_secret(&input.key).await?;
    info!(id = secret.id, "secret created");
    Ok((StatusCode::CREATED, Json(secret)))
}
