use std::collections::BTreeMap;

use crate::models::{Book, GenreLabel};

use super::validation::ValidationError;

/// Genre label mapped to the books carrying it, labels in ascending order and
/// each group ordered by id.
pub type GenreGroups = BTreeMap<GenreLabel, Vec<Book>>;

/// The capability set both front-ends program against. Every method takes or
/// returns owned `Book` values, so implementations never share their records.
pub trait BookLogic: Send + Sync {
    /// Validate and insert `book`, returning the stored copy with its newly
    /// assigned id. Any id on the input is ignored.
    fn create(&self, book: Book) -> Result<Book, ValidationError>;

    /// Look up a single book. Absence is `None`, not an error.
    fn read(&self, id: i64) -> Option<Book>;

    /// Every book, ascending by id.
    fn read_all(&self) -> Vec<Book>;

    /// Replace every field of the book with `book.id`. Validation runs first;
    /// `Ok(false)` means no such book exists.
    fn update(&self, book: Book) -> Result<bool, ValidationError>;

    /// Remove a book, reporting whether anything was removed.
    fn delete(&self, id: i64) -> bool;

    /// Partition all books by genre label.
    fn group_by_genre(&self) -> GenreGroups;

    /// Books whose author contains `author_part` ignoring case. A blank query
    /// matches everything.
    fn find_by_author(&self, author_part: &str) -> Vec<Book>;
}
