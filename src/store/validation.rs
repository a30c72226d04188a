use thiserror::Error;

use crate::models::{Book, BookField};

/// Earliest accepted publication year.
pub const MIN_YEAR: i32 = 0;
/// Latest accepted publication year.
pub const MAX_YEAR: i32 = 3000;
/// A book needs at least one page.
pub const MIN_PAGES: i32 = 1;

/// Business-rule violations reported by `create` and `update`. The store never
/// mutates anything when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required.")]
    EmptyTitle,
    #[error("Author is required.")]
    EmptyAuthor,
    #[error("Author must not contain digits.")]
    DigitInAuthor,
    #[error("Genre must not contain digits.")]
    DigitInGenre,
    #[error("Year {0} is outside 0..=3000.")]
    YearOutOfRange(i32),
    #[error("Pages must be at least 1 (got {0}).")]
    TooFewPages(i32),
}

impl ValidationError {
    /// The field that failed validation.
    pub fn field(&self) -> BookField {
        match self {
            ValidationError::EmptyTitle => BookField::Title,
            ValidationError::EmptyAuthor | ValidationError::DigitInAuthor => BookField::Author,
            ValidationError::DigitInGenre => BookField::Genre,
            ValidationError::YearOutOfRange(_) => BookField::Year,
            ValidationError::TooFewPages(_) => BookField::Pages,
        }
    }
}

/// Check every field rule, reporting the first violation in field order.
pub(crate) fn validate(book: &Book) -> Result<(), ValidationError> {
    if book.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if book.author.trim().is_empty() {
        return Err(ValidationError::EmptyAuthor);
    }
    if contains_digit(&book.author) {
        return Err(ValidationError::DigitInAuthor);
    }
    if !book.genre.trim().is_empty() && contains_digit(&book.genre) {
        return Err(ValidationError::DigitInGenre);
    }
    if !(MIN_YEAR..=MAX_YEAR).contains(&book.year) {
        return Err(ValidationError::YearOutOfRange(book.year));
    }
    if book.pages < MIN_PAGES {
        return Err(ValidationError::TooFewPages(book.pages));
    }
    Ok(())
}

/// Any Unicode numeric character counts, not just ASCII `0-9`.
fn contains_digit(text: &str) -> bool {
    text.chars().any(char::is_numeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> Book {
        Book::new("Dune", "Frank Herbert", "Sci-Fi", 1965, 592)
    }

    #[test]
    fn accepts_valid_book() {
        assert_eq!(validate(&dune()), Ok(()));
    }

    #[test]
    fn accepts_empty_genre_and_year_bounds() {
        let mut book = dune();
        book.genre.clear();
        book.year = MIN_YEAR;
        assert_eq!(validate(&book), Ok(()));
        book.year = MAX_YEAR;
        assert_eq!(validate(&book), Ok(()));
    }

    #[test]
    fn rejects_blank_title() {
        let mut book = dune();
        book.title = "  \t".to_string();
        let err = validate(&book).unwrap_err();
        assert_eq!(err, ValidationError::EmptyTitle);
        assert_eq!(err.field(), BookField::Title);
    }

    #[test]
    fn rejects_author_problems() {
        let mut book = dune();
        book.author = " ".to_string();
        assert_eq!(validate(&book), Err(ValidationError::EmptyAuthor));

        book.author = "J123".to_string();
        let err = validate(&book).unwrap_err();
        assert_eq!(err, ValidationError::DigitInAuthor);
        assert_eq!(err.field(), BookField::Author);

        book.author = "Agent ٧".to_string();
        assert_eq!(validate(&book), Err(ValidationError::DigitInAuthor));
    }

    #[test]
    fn rejects_digit_in_genre() {
        let mut book = dune();
        book.genre = "Sci-Fi 2".to_string();
        let err = validate(&book).unwrap_err();
        assert_eq!(err.field(), BookField::Genre);
    }

    #[test]
    fn rejects_year_out_of_range() {
        let mut book = dune();
        book.year = -1;
        assert_eq!(validate(&book), Err(ValidationError::YearOutOfRange(-1)));
        book.year = 3001;
        let err = validate(&book).unwrap_err();
        assert_eq!(err.field(), BookField::Year);
        assert_eq!(err.to_string(), "Year 3001 is outside 0..=3000.");
    }

    #[test]
    fn rejects_non_positive_pages() {
        let mut book = dune();
        book.pages = 0;
        assert_eq!(validate(&book), Err(ValidationError::TooFewPages(0)));
        book.pages = -5;
        assert_eq!(validate(&book).unwrap_err().field(), BookField::Pages);
    }
}
