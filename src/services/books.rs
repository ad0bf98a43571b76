//! Book record service
//!
//! Owns the book store and implements the five shelf operations: validation,
//! record lifecycle and the exact client-facing messages for each outcome.
//! HTTP concerns (status codes for success, envelopes) live in `api::books`.

use crate::config::BookServiceConfig;
use crate::error::AppError;
use crate::state::{Book, BookId, BookPayload, BookStore, InMemoryBookStore};
use chrono::Utc;
use tracing::{debug, error, warn};

/// Client-facing messages
pub mod messages {
    /// Create called without a payload
    pub const PAYLOAD_EMPTY: &str = "Payload request kosong";
    /// Request body is not valid JSON
    pub const PAYLOAD_INVALID: &str = "Payload request tidak valid";
    /// A required attribute is missing or falsy
    pub const INCOMPLETE: &str = "Data buku tidak lengkap";
    /// `pageCount` or `readPage` is not a whole number
    pub const PAGE_TYPE: &str = "Tipe data pageCount dan readPage harus number";
    /// `readPage` is greater than `pageCount` on create
    pub const READ_PAGE_EXCEEDS: &str = "readPage tidak boleh lebih besar dari pageCount";
    /// Another attribute has the wrong type on create
    pub const FIELD_TYPE: &str = "Tipe data buku tidak sesuai";
    /// Book created
    pub const CREATED: &str = "Buku berhasil ditambahkan";
    /// Book could not be found right after it was inserted
    pub const CREATE_FAILED: &str = "Buku gagal ditambahkan";
    /// Lookup by ID failed
    pub const NOT_FOUND: &str = "Catatan tidak ditemukan";
    /// Update called without a name
    pub const UPDATE_NAME_REQUIRED: &str = "Gagal memperbarui buku. Mohon isi nama buku";
    /// `readPage` is greater than `pageCount` on update
    pub const UPDATE_READ_PAGE_EXCEEDS: &str =
        "Gagal memperbarui buku. readPage tidak boleh lebih besar dari pageCount";
    /// Another attribute has the wrong type on update
    pub const UPDATE_FIELD_TYPE: &str = "Gagal memperbarui buku. Tipe data buku tidak sesuai";
    /// Update target does not exist
    pub const UPDATE_NOT_FOUND: &str = "Gagal memperbarui buku. Id tidak ditemukan";
    /// Book updated
    pub const UPDATED: &str = "Buku berhasil diperbarui";
    /// Delete target does not exist
    pub const DELETE_NOT_FOUND: &str = "Buku gagal dihapus. Id tidak ditemukan";
    /// Book deleted
    pub const DELETED: &str = "Buku berhasil dihapus";
}

/// Book record service
///
/// Holds the store it operates on; the store is injected so tests can run
/// against isolated or deliberately faulty storage.
pub struct BookService {
    store: Box<dyn BookStore>,
    config: BookServiceConfig,
}

impl Default for BookService {
    fn default() -> Self {
        Self::new(BookServiceConfig::default())
    }
}

impl BookService {
    /// Create a service backed by an empty in-memory store
    pub fn new(config: BookServiceConfig) -> Self {
        Self::with_store(Box::new(InMemoryBookStore::new()), config)
    }

    /// Create a service backed by the given store
    pub fn with_store(store: Box<dyn BookStore>, config: BookServiceConfig) -> Self {
        Self { store, config }
    }

    /// Number of books currently on the shelf
    pub fn count(&self) -> usize {
        self.store.len()
    }

    /// Add a new book
    ///
    /// # Arguments
    /// * `payload` - Decoded request body, `None` when the body was empty or `null`
    ///
    /// # Returns
    /// * `Ok(BookId)` - ID of the stored book
    /// * `Err(AppError::Validation)` - First violated rule, checked in order:
    ///   empty payload, missing fields, page counter types, readPage > pageCount
    /// * `Err(AppError::Internal)` - The book was not found after insertion
    pub fn create(&mut self, payload: Option<BookPayload>) -> Result<BookId, AppError> {
        let payload = payload.ok_or_else(|| reject(messages::PAYLOAD_EMPTY))?;

        if !payload.has_required_fields() {
            return Err(reject(messages::INCOMPLETE));
        }
        if !payload.has_integer_page_counters() {
            return Err(reject(messages::PAGE_TYPE));
        }
        if payload.read_page_exceeds_page_count() {
            return Err(reject(messages::READ_PAGE_EXCEEDS));
        }

        let fields = payload.into_fields().map_err(|field| {
            warn!(field, "Rejected book with mistyped field");
            AppError::Validation(messages::FIELD_TYPE.to_string())
        })?;

        let id = Book::generate_id();
        let book = Book::new(id.clone(), fields, Utc::now());
        self.store.insert(book);

        if self.store.find(&id).is_none() {
            error!(book_id = %id, "Book missing from store after insertion");
            return Err(AppError::Internal(messages::CREATE_FAILED.to_string()));
        }

        debug!(book_id = %id, count = self.store.len(), "Book created");
        Ok(id)
    }

    /// All books in the order they were created
    pub fn list(&self) -> &[Book] {
        self.store.all()
    }

    /// Check that a book exists and return the shelf
    ///
    /// On success this returns the whole collection, in the same shape as
    /// `list`, rather than only the matched book.
    pub fn get(&self, id: &str) -> Result<&[Book], AppError> {
        if self.store.find(id).is_none() {
            debug!(book_id = %id, "Book not found");
            return Err(AppError::NotFound(messages::NOT_FOUND.to_string()));
        }
        Ok(self.store.all())
    }

    /// Replace a book's attributes
    ///
    /// PUT semantics: every client-controlled attribute is overwritten, and
    /// attributes missing from the payload become absent. `finished` is only
    /// re-derived when `recompute_finished_on_update` is set.
    ///
    /// # Returns
    /// * `Ok(())` - The book was updated
    /// * `Err(AppError::Validation)` - Missing name, readPage > pageCount, or a mistyped field
    /// * `Err(AppError::NotFound)` - No book with this ID
    pub fn update(&mut self, id: &str, payload: BookPayload) -> Result<(), AppError> {
        if !payload.has_name() {
            return Err(reject(messages::UPDATE_NAME_REQUIRED));
        }
        if payload.read_page_exceeds_page_count() {
            return Err(reject(messages::UPDATE_READ_PAGE_EXCEEDS));
        }

        let recompute_finished = self.config.recompute_finished_on_update;
        let book = self.store.find_mut(id).ok_or_else(|| {
            debug!(book_id = %id, "Update target not found");
            AppError::NotFound(messages::UPDATE_NOT_FOUND.to_string())
        })?;

        let fields = payload.into_fields().map_err(|field| {
            warn!(book_id = %id, field, "Rejected update with mistyped field");
            AppError::Validation(messages::UPDATE_FIELD_TYPE.to_string())
        })?;

        book.apply(fields, Utc::now());
        if recompute_finished {
            book.refresh_finished();
        }

        debug!(book_id = %id, finished = book.finished, "Book updated");
        Ok(())
    }

    /// Remove a book from the shelf
    /// Returns the removed book
    pub fn delete(&mut self, id: &str) -> Result<Book, AppError> {
        let removed = self.store.remove(id).ok_or_else(|| {
            debug!(book_id = %id, "Delete target not found");
            AppError::NotFound(messages::DELETE_NOT_FOUND.to_string())
        })?;

        debug!(book_id = %id, count = self.store.len(), "Book deleted");
        Ok(removed)
    }
}

fn reject(message: &str) -> AppError {
    warn!(reason = message, "Rejected book payload");
    AppError::Validation(message.to_string())
}
