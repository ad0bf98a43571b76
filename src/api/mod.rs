//! API module
//!
//! Contains the route table and HTTP request handlers for the bookshelf API

pub mod books;

pub use books::SharedState;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health indicator
    pub status: String,
    /// Crate version
    pub version: String,
    /// Number of books currently stored
    pub books: usize,
}

/// Build the application router
///
/// Middleware is layered on by the binary; tests drive this router directly.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .with_state(state)
}

/// GET /health - Liveness probe
async fn health_check(State(state): State<SharedState>) -> Json<HealthResponse> {
    let books = state.read().await.count();
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        books,
    })
}
