use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::Book;

/// Year shown in a fresh add dialog.
const DEFAULT_YEAR: &str = "2000";
/// Page count shown in a fresh add dialog.
const DEFAULT_PAGES: &str = "100";

/// Fields of the add/edit dialog, in focus order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum FormField {
    #[default]
    Title,
    Author,
    Genre,
    Year,
    Pages,
    Read,
}

impl FormField {
    pub(crate) const ALL: [FormField; 6] = [
        FormField::Title,
        FormField::Author,
        FormField::Genre,
        FormField::Year,
        FormField::Pages,
        FormField::Read,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Author => "Author",
            FormField::Genre => "Genre",
            FormField::Year => "Year",
            FormField::Pages => "Pages",
            FormField::Read => "Read",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Internal representation of the add/edit book dialog. Numbers are kept as
/// text while the user types and parsed on save.
#[derive(Clone, Debug)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) genre: String,
    pub(crate) year: String,
    pub(crate) pages: String,
    pub(crate) is_read: bool,
    pub(crate) active: FormField,
    pub(crate) error: Option<String>,
}

impl Default for BookForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            genre: String::new(),
            year: DEFAULT_YEAR.to_string(),
            pages: DEFAULT_PAGES.to_string(),
            is_read: false,
            active: FormField::Title,
            error: None,
        }
    }
}

impl BookForm {
    /// Populate the form from an existing book when editing.
    pub(crate) fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            year: book.year.to_string(),
            pages: book.pages.to_string(),
            is_read: book.is_read,
            active: FormField::Title,
            error: None,
        }
    }

    pub(crate) fn focus_next(&mut self) {
        self.active = self.active.next();
    }

    pub(crate) fn focus_previous(&mut self) {
        self.active = self.active.previous();
    }

    /// Append a character to the active field. Digits are refused in author
    /// and genre, anything but digits in year and pages; on the read toggle a
    /// space flips the flag. Returns whether the input was accepted.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            FormField::Title => self.title.push(ch),
            FormField::Author | FormField::Genre if ch.is_numeric() => return false,
            FormField::Author => self.author.push(ch),
            FormField::Genre => self.genre.push(ch),
            FormField::Year | FormField::Pages if !ch.is_ascii_digit() => return false,
            FormField::Year => self.year.push(ch),
            FormField::Pages => self.pages.push(ch),
            FormField::Read if ch == ' ' => self.is_read = !self.is_read,
            FormField::Read => return false,
        }
        true
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        let field = match self.active {
            FormField::Title => &mut self.title,
            FormField::Author => &mut self.author,
            FormField::Genre => &mut self.genre,
            FormField::Year => &mut self.year,
            FormField::Pages => &mut self.pages,
            FormField::Read => return,
        };
        field.pop();
    }

    /// Turn the inputs into a book ready for the store. Only the number fields
    /// are checked here; every business rule is left to the store so both
    /// front-ends report the same messages.
    pub(crate) fn parse_inputs(&self) -> Result<Book> {
        let year = parse_number(&self.year, "Year")?;
        let pages = parse_number(&self.pages, "Pages")?;
        Ok(Book::new(
            self.title.trim(),
            self.author.trim(),
            self.genre.trim(),
            year,
            pages,
        )
        .read(self.is_read))
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: FormField) -> Line<'static> {
        let is_active = self.active == field;
        let value = self.display_value(field);
        let placeholder = match field {
            FormField::Title | FormField::Author => "<required>",
            FormField::Genre => "<optional>",
            FormField::Year | FormField::Pages => "<number>",
            FormField::Read => "",
        };

        let display = if value.is_empty() {
            placeholder.to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Character length of the requested field as displayed.
    pub(crate) fn value_len(&self, field: FormField) -> usize {
        self.display_value(field).chars().count()
    }

    fn display_value(&self, field: FormField) -> String {
        match field {
            FormField::Title => self.title.clone(),
            FormField::Author => self.author.clone(),
            FormField::Genre => self.genre.clone(),
            FormField::Year => self.year.clone(),
            FormField::Pages => self.pages.clone(),
            FormField::Read => String::from(if self.is_read { "[x]" } else { "[ ]" }),
        }
    }
}

fn parse_number(raw: &str, name: &str) -> Result<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(anyhow!("{name} is required."));
    }
    raw.parse::<i32>()
        .map_err(|_| anyhow!("{name} must be a whole number."))
}

/// State for confirming deletion of the selected book.
#[derive(Clone, Debug)]
pub(crate) struct ConfirmBookDelete {
    pub(crate) id: i64,
    pub(crate) title: String,
}

impl ConfirmBookDelete {
    pub(crate) fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
        }
    }
}
