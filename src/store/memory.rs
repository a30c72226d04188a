use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::models::Book;

use super::logic::{BookLogic, GenreGroups};
use super::validation::{validate, ValidationError};

/// Thread-safe in-memory implementation of [`BookLogic`].
///
/// The record table and the id counter sit behind one lock, so an id is handed
/// out in the same critical section that inserts the record. Records are
/// replaced as whole values, which means a reader never sees half an update.
#[derive(Debug, Default)]
pub struct BookStore {
    state: Mutex<StoreState>,
}

#[derive(Debug, Default)]
struct StoreState {
    /// Keyed by id so iteration order is already ascending by id.
    books: BTreeMap<i64, Book>,
    /// Last id handed out. Never decremented, so deleted ids are not reused.
    last_id: i64,
}

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored books.
    pub fn len(&self) -> usize {
        self.lock().books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().books.is_empty()
    }

    /// State is only mutated after validation passes, so a panic in another
    /// thread cannot leave it half-written and a poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BookLogic for BookStore {
    fn create(&self, mut book: Book) -> Result<Book, ValidationError> {
        validate(&book)?;

        let mut state = self.lock();
        state.last_id += 1;
        book.id = state.last_id;
        state.books.insert(book.id, book.clone());
        drop(state);

        debug!("created book {} ({})", book.id, book.title);
        Ok(book)
    }

    fn read(&self, id: i64) -> Option<Book> {
        self.lock().books.get(&id).cloned()
    }

    fn read_all(&self) -> Vec<Book> {
        self.lock().books.values().cloned().collect()
    }

    fn update(&self, book: Book) -> Result<bool, ValidationError> {
        validate(&book)?;

        let mut state = self.lock();
        let Some(slot) = state.books.get_mut(&book.id) else {
            return Ok(false);
        };
        let id = book.id;
        *slot = book;
        drop(state);

        debug!("updated book {id}");
        Ok(true)
    }

    fn delete(&self, id: i64) -> bool {
        let removed = self.lock().books.remove(&id).is_some();
        if removed {
            debug!("deleted book {id}");
        }
        removed
    }

    fn group_by_genre(&self) -> GenreGroups {
        let state = self.lock();
        let mut groups = GenreGroups::new();
        for book in state.books.values() {
            groups
                .entry(book.genre_label())
                .or_default()
                .push(book.clone());
        }
        groups
    }

    fn find_by_author(&self, author_part: &str) -> Vec<Book> {
        let needle = author_part.trim().to_lowercase();
        self.lock()
            .books
            .values()
            .filter(|book| needle.is_empty() || book.author.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenreLabel;

    fn dune() -> Book {
        Book::new("Dune", "Frank Herbert", "Sci-Fi", 1965, 592)
    }

    fn clean_code() -> Book {
        Book::new("Clean Code", "Robert C. Martin", "Programming", 2008, 464).read(true)
    }

    #[test]
    fn create_assigns_sequential_ids_and_ignores_input_id() {
        let store = BookStore::new();
        let mut input = dune();
        input.id = 42;

        let first = store.create(input).unwrap();
        let second = store.create(clean_code()).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(store.read(42).is_none());
    }

    #[test]
    fn create_then_read_round_trips_fields() {
        let store = BookStore::new();
        let input = clean_code();
        let created = store.create(input.clone()).unwrap();

        let stored = store.read(created.id).unwrap();
        assert_eq!(stored, Book { id: created.id, ..input });
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = BookStore::new();
        let first = store.create(dune()).unwrap();
        assert!(store.delete(first.id));
        assert!(store.read(first.id).is_none());

        let second = store.create(dune()).unwrap();
        assert_eq!(second.id, 2);
    }

    #[test]
    fn returned_books_are_independent_copies() {
        let store = BookStore::new();
        let mut created = store.create(dune()).unwrap();
        created.title = "Changed".to_string();

        let mut read = store.read(created.id).unwrap();
        read.author = "Someone Else".to_string();

        let stored = store.read(created.id).unwrap();
        assert_eq!(stored.title, "Dune");
        assert_eq!(stored.author, "Frank Herbert");
    }

    #[test]
    fn invalid_create_leaves_store_untouched() {
        let store = BookStore::new();
        let mut bad = dune();
        bad.author = "J123".to_string();

        assert_eq!(store.create(bad), Err(ValidationError::DigitInAuthor));
        assert!(store.is_empty());

        // The failed attempt must not consume an id.
        assert_eq!(store.create(dune()).unwrap().id, 1);
    }

    #[test]
    fn update_replaces_every_field() {
        let store = BookStore::new();
        let created = store.create(dune()).unwrap();

        let replacement = Book {
            id: created.id,
            title: "Dune Messiah".to_string(),
            author: "Frank Herbert".to_string(),
            genre: String::new(),
            year: 1969,
            pages: 256,
            is_read: true,
        };
        assert_eq!(store.update(replacement.clone()), Ok(true));
        assert_eq!(store.read(created.id), Some(replacement));
    }

    #[test]
    fn update_unknown_id_returns_false() {
        let store = BookStore::new();
        store.create(dune()).unwrap();
        let before = store.read_all();

        let mut ghost = clean_code();
        ghost.id = 99;
        assert_eq!(store.update(ghost), Ok(false));
        assert_eq!(store.read_all(), before);
    }

    #[test]
    fn update_with_invalid_fields_is_an_error() {
        let store = BookStore::new();
        let created = store.create(dune()).unwrap();

        let mut bad = created.clone();
        bad.pages = 0;
        assert_eq!(store.update(bad), Err(ValidationError::TooFewPages(0)));
        assert_eq!(store.read(created.id), Some(created));
    }

    #[test]
    fn delete_missing_id_returns_false() {
        let store = BookStore::new();
        assert!(!store.delete(1));
        let created = store.create(dune()).unwrap();
        assert!(store.delete(created.id));
        assert!(!store.delete(created.id));
    }

    #[test]
    fn read_all_is_ordered_by_id() {
        let store = BookStore::new();
        for _ in 0..5 {
            store.create(dune()).unwrap();
        }
        store.delete(3);
        let ids: Vec<i64> = store.read_all().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5]);
    }

    #[test]
    fn group_by_genre_partitions_records() {
        let store = BookStore::new();
        store.create(clean_code()).unwrap();
        store.create(dune()).unwrap();
        store
            .create(Book::new("Untitled Notes", "Anonymous", "", 2000, 10))
            .unwrap();
        store.create(clean_code()).unwrap();

        let groups = store.group_by_genre();
        let labels: Vec<&str> = groups.keys().map(GenreLabel::as_str).collect();
        assert_eq!(labels, vec!["Programming", "Sci-Fi", "Unspecified"]);

        let programming = GenreLabel::Named("Programming".to_string());
        let ids: Vec<i64> = groups[&programming].iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(groups[&GenreLabel::Unspecified][0].genre, "");

        let mut grouped: Vec<Book> = groups.into_values().flatten().collect();
        grouped.sort_by_key(|b| b.id);
        assert_eq!(grouped, store.read_all());
    }

    #[test]
    fn group_by_genre_on_empty_store_is_empty() {
        assert!(BookStore::new().group_by_genre().is_empty());
    }

    #[test]
    fn find_by_author_ignores_case_and_trims() {
        let store = BookStore::new();
        let dune = store.create(dune()).unwrap();
        store.create(clean_code()).unwrap();

        for query in ["herbert", "HERBERT", "Her", "  frank  "] {
            assert_eq!(store.find_by_author(query), vec![dune.clone()], "{query}");
        }
        assert!(store.find_by_author("Tolkien").is_empty());
    }

    #[test]
    fn blank_author_query_matches_everything() {
        let store = BookStore::new();
        store.create(dune()).unwrap();
        store.create(clean_code()).unwrap();

        assert_eq!(store.find_by_author(""), store.read_all());
        assert_eq!(store.find_by_author("   "), store.read_all());
    }
}
