// State management module
// Handles the book record model and its storage

pub mod book;
pub mod store;

pub use book::{Book, BookFields, BookId, BookPayload};
pub use store::{BookStore, InMemoryBookStore};
