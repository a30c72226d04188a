use anyhow::{Context, Result};

use crate::models::Book;

use super::logic::BookLogic;

/// Sample records both front-ends start with, so a fresh session has something
/// to list, group and search.
pub(crate) fn demo_books() -> Vec<Book> {
    vec![
        Book::new("CLR via C#", "Jeffrey Richter", "Programming", 2012, 900),
        Book::new("Clean Code", "Robert C. Martin", "Programming", 2008, 464).read(true),
        Book::new("Dune", "Frank Herbert", "Sci-Fi", 1965, 592),
    ]
}

/// Insert [`demo_books`] through the regular `create` path and return the
/// stored copies.
pub fn seed_demo_books(logic: &dyn BookLogic) -> Result<Vec<Book>> {
    demo_books()
        .into_iter()
        .map(|book| {
            let title = book.title.clone();
            logic
                .create(book)
                .with_context(|| format!("failed to seed demo book '{title}'"))
        })
        .collect()
}
