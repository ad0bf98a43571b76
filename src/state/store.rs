// Book record store
// Holds the shelf's records in insertion order

use super::book::Book;

/// Storage for book records
///
/// Implementations keep records in insertion order and treat `id` as the only
/// key. Callers are expected to serialize mutations (the service sits behind a
/// lock), so methods take `&mut self` rather than locking internally.
pub trait BookStore: Send + Sync {
    /// Append a record at the end of the collection
    fn insert(&mut self, book: Book);

    /// All records in insertion order
    fn all(&self) -> &[Book];

    /// Look up a record by ID
    fn find(&self, id: &str) -> Option<&Book>;

    /// Get a mutable reference to a record by ID
    fn find_mut(&mut self, id: &str) -> Option<&mut Book>;

    /// Remove a record, keeping the order of the rest
    /// Returns the removed record if it existed
    fn remove(&mut self, id: &str) -> Option<Book>;

    /// Number of stored records
    fn len(&self) -> usize {
        self.all().len()
    }

    /// Whether the store holds no records
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Volatile store backed by a `Vec`
///
/// Starts empty and is never persisted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookStore {
    books: Vec<Book>,
}

impl InMemoryBookStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }
}

impl BookStore for InMemoryBookStore {
    fn insert(&mut self, book: Book) {
        self.books.push(book);
    }

    fn all(&self) -> &[Book] {
        &self.books
    }

    fn find(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Book> {
        self.books.iter_mut().find(|book| book.id == id)
    }

    fn remove(&mut self, id: &str) -> Option<Book> {
        let index = self.position(id)?;
        Some(self.books.remove(index))
    }
}

impl From<Vec<Book>> for InMemoryBookStore {
    fn from(books: Vec<Book>) -> Self {
        Self { books }
    }
}
