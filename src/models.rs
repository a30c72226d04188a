//! Domain model shared by the store and both front-ends. `Book` is a plain
//! value type: the store hands out clones and takes ownership of whatever it is
//! given, so nothing outside the store can alias a stored record.

use std::cmp::Ordering;
use std::fmt;

/// Text shown for books whose genre is blank. The stored genre itself stays
/// empty.
pub const UNSPECIFIED_GENRE: &str = "Unspecified";

/// Grouping key for [`Book::genre_label`]. Blank genres get their own variant
/// so they never share a group with a book whose genre is literally
/// "Unspecified".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenreLabel {
    Named(String),
    Unspecified,
}

impl GenreLabel {
    /// Text of the label; [`UNSPECIFIED_GENRE`] for blank genres.
    pub fn as_str(&self) -> &str {
        match self {
            GenreLabel::Named(name) => name,
            GenreLabel::Unspecified => UNSPECIFIED_GENRE,
        }
    }

    pub fn is_unspecified(&self) -> bool {
        matches!(self, GenreLabel::Unspecified)
    }
}

/// Labels sort by their text. On equal text a named genre comes first.
impl Ord for GenreLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str()
            .cmp(other.as_str())
            .then_with(|| self.is_unspecified().cmp(&other.is_unspecified()))
    }
}

impl PartialOrd for GenreLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GenreLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// One catalog entry.
pub struct Book {
    /// Store-assigned identifier. Anything a caller puts here is ignored by
    /// `create`; `update` uses it as the lookup key.
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Free-form genre. May be empty.
    pub genre: String,
    pub year: i32,
    pub pages: i32,
    pub is_read: bool,
}

impl Book {
    /// Build an unsaved book (id 0) from its field values.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        year: i32,
        pages: i32,
    ) -> Self {
        Self {
            id: 0,
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            year,
            pages,
            is_read: false,
        }
    }

    /// Builder-style setter for the read flag, handy when seeding.
    pub fn read(mut self, is_read: bool) -> Self {
        self.is_read = is_read;
        self
    }

    /// Genre label used for grouping. Blank genres collapse into
    /// [`GenreLabel::Unspecified`].
    pub fn genre_label(&self) -> GenreLabel {
        if self.genre.trim().is_empty() {
            GenreLabel::Unspecified
        } else {
            GenreLabel::Named(self.genre.clone())
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} — {} ({}), {}",
            self.title, self.author, self.year, self.genre
        )
    }
}

/// The validated fields of a [`Book`]. Validation errors point at one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookField {
    Title,
    Author,
    Genre,
    Year,
    Pages,
}

impl fmt::Display for BookField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Genre => "genre",
            BookField::Year => "year",
            BookField::Pages => "pages",
        };
        f.write_str(name)
    }
}
