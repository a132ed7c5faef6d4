use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use crate::models::Book;

/// Map-backed catalog keyed by record id.
///
/// Iteration is in ascending id order, which keeps repeated list calls
/// stable. Saving with an explicit id is a full-record replacement; the id
/// generator is advanced past explicit ids so a later insert never reuses
/// one. Generator arithmetic saturates at `i64::MAX` and never wraps; an
/// explicit id at that ceiling has no successor, so the gateway refuses it
/// before it reaches the store.
pub struct BookStore {
    books: RwLock<BTreeMap<i64, Book>>,
    next_id: AtomicI64,
}

impl BookStore {
    pub fn new() -> Self {
        Self {
            books: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Store preloaded with the demo catalog.
    pub fn with_sample_catalog() -> Self {
        let store = Self::new();
        for (title, author, page_count, category) in [
            ("Clean Code", "Robert C. Martin", 464, "PROGRAMMING"),
            ("Effective Java", "Joshua Bloch", 416, "PROGRAMMING"),
            ("The Pragmatic Programmer", "David Thomas", 352, "PROGRAMMING"),
            ("Design Patterns", "Gang of Four", 395, "PROGRAMMING"),
            ("Spring in Action", "Craig Walls", 520, "FRAMEWORKS"),
            ("Microservices Patterns", "Chris Richardson", 518, "ARCHITECTURE"),
            ("Domain-Driven Design", "Eric Evans", 560, "ARCHITECTURE"),
        ] {
            let content = format!("Contenido del libro {title}");
            store.save(Book::new(title, author, page_count, category, &content));
        }
        store
    }

    /// Saves `book` and returns the stored record with its id set.
    pub fn save(&self, mut book: Book) -> Book {
        let id = match book.id {
            Some(id) => {
                // Saturating: an explicit id at the ceiling must never wrap
                // the generator negative.
                self.next_id.fetch_max(id.saturating_add(1), Ordering::SeqCst);
                id
            }
            None => self.next_fresh_id(),
        };
        book.id = Some(id);
        self.books
            .write()
            .expect("book store lock poisoned")
            .insert(id, book.clone());
        book
    }

    /// Next generated id. Saturates at `i64::MAX` once the id space is
    /// exhausted; it never wraps.
    fn next_fresh_id(&self) -> i64 {
        let bumped = self
            .next_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |id| {
                Some(id.saturating_add(1))
            });
        match bumped {
            Ok(previous) | Err(previous) => previous,
        }
    }

    pub fn find_by_id(&self, id: i64) -> Option<Book> {
        self.books
            .read()
            .expect("book store lock poisoned")
            .get(&id)
            .cloned()
    }

    /// First record whose title matches, ignoring ASCII case.
    pub fn find_by_title(&self, title: &str) -> Option<Book> {
        self.books
            .read()
            .expect("book store lock poisoned")
            .values()
            .find(|book| book.title.eq_ignore_ascii_case(title))
            .cloned()
    }

    /// Every record by this author, ignoring ASCII case, in id order.
    pub fn find_by_author(&self, author: &str) -> Vec<Book> {
        self.books
            .read()
            .expect("book store lock poisoned")
            .values()
            .filter(|book| book.author.eq_ignore_ascii_case(author))
            .cloned()
            .collect()
    }

    pub fn find_all(&self) -> Vec<Book> {
        self.books
            .read()
            .expect("book store lock poisoned")
            .values()
            .cloned()
            .collect()
    }

    /// Removes the record; `true` when something was actually removed.
    pub fn delete_by_id(&self, id: i64) -> bool {
        self.books
            .write()
            .expect("book store lock poisoned")
            .remove(&id)
            .is_some()
    }
}

impl Default for BookStore {
    fn default() -> Self {
        Self::new()
    }
}
