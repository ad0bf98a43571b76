//! Book API handlers
//!
//! Contains HTTP request handlers for book CRUD operations.

use crate::error::AppError;
use crate::services::books::messages;
use crate::services::BookService;
use crate::state::book::is_truthy;
use crate::state::{Book, BookId, BookPayload};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to the book service
pub type SharedState = Arc<RwLock<BookService>>;

/// Response envelope
///
/// `status` is always `"success"` here; failures are rendered by `AppError`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Status indicator
    pub status: &'static str,
    /// Human-readable message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Operation result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    fn success(message: Option<&str>, data: Option<T>) -> Self {
        Self {
            status: "success",
            message: message.map(str::to_string),
            data,
        }
    }
}

/// Data returned when a book is created
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookIdData {
    /// ID of the new book
    pub book_id: BookId,
}

/// Data returned when listing books
#[derive(Debug, Serialize)]
pub struct NotesData {
    /// All books in creation order
    pub notes: Vec<Book>,
}

/// Decode a request body into a payload
///
/// An empty body or a falsy JSON scalar (`null`, `false`, `0`, `""`) yields
/// `None`. Any other non-object value carries no fields and yields an empty
/// payload.
fn parse_payload(body: &Bytes) -> Result<Option<BookPayload>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let invalid = |e: serde_json::Error| {
        tracing::debug!(error = %e, "Failed to decode book payload");
        AppError::Validation(messages::PAYLOAD_INVALID.to_string())
    };

    let value: Value = serde_json::from_slice(body).map_err(invalid)?;
    match value {
        ref v if !is_truthy(v) => Ok(None),
        Value::Object(_) => serde_json::from_value(value).map(Some).map_err(invalid),
        _ => Ok(Some(BookPayload::default())),
    }
}

/// POST /books - Create a new book
pub async fn create_book(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<BookIdData>>), AppError> {
    let payload = parse_payload(&body)?;

    let mut state = state.write().await;
    let book_id = state.create(payload)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(messages::CREATED),
            Some(BookIdData { book_id }),
        )),
    ))
}

/// GET /books - List all books
pub async fn list_books(State(state): State<SharedState>) -> Json<ApiResponse<NotesData>> {
    let state = state.read().await;
    let notes = state.list().to_vec();

    Json(ApiResponse::success(None, Some(NotesData { notes })))
}

/// GET /books/:id - Get a specific book
pub async fn get_book(
    State(state): State<SharedState>,
    Path(id): Path<BookId>,
) -> Result<Json<ApiResponse<NotesData>>, AppError> {
    let state = state.read().await;
    let notes = state.get(&id)?.to_vec();

    Ok(Json(ApiResponse::success(None, Some(NotesData { notes }))))
}

/// PUT /books/:id - Replace a book
pub async fn update_book(
    State(state): State<SharedState>,
    Path(id): Path<BookId>,
    body: Bytes,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let payload = parse_payload(&body)?.unwrap_or_default();

    let mut state = state.write().await;
    state.update(&id, payload)?;

    Ok(Json(ApiResponse::success(Some(messages::UPDATED), None)))
}

/// DELETE /books/:id - Delete a book
pub async fn delete_book(
    State(state): State<SharedState>,
    Path(id): Path<BookId>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let mut state = state.write().await;
    state.delete(&id)?;

    Ok(Json(ApiResponse::success(Some(messages::DELETED), None)))
}
