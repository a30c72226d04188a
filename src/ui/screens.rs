use crate::models::Book;
use crate::store::BookLogic;

/// The record list shown on the main screen, with its optional author filter
/// and the current selection.
pub(crate) struct BookListScreen {
    pub(crate) books: Vec<Book>,
    pub(crate) filter: Option<String>,
    pub(crate) selected: usize,
}

impl BookListScreen {
    pub(crate) fn load(logic: &dyn BookLogic) -> Self {
        let mut screen = Self {
            books: Vec::new(),
            filter: None,
            selected: 0,
        };
        screen.reload(logic);
        screen
    }

    /// Re-query the store, going through `find_by_author` when a filter is set.
    pub(crate) fn reload(&mut self, logic: &dyn BookLogic) {
        self.books = match self.active_filter() {
            Some(query) => logic.find_by_author(query),
            None => logic.read_all(),
        };
        self.ensure_in_bounds();
    }

    /// Reload and move the selection onto `id` if it is still visible.
    pub(crate) fn reload_focused(&mut self, logic: &dyn BookLogic, id: i64) {
        self.reload(logic);
        if let Some(idx) = self.books.iter().position(|b| b.id == id) {
            self.selected = idx;
        }
    }

    pub(crate) fn set_filter(&mut self, logic: &dyn BookLogic, filter: Option<String>) {
        self.filter = filter;
        self.reload(logic);
    }

    /// The filter text, ignoring a blank one.
    pub(crate) fn active_filter(&self) -> Option<&str> {
        self.filter
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
    }

    pub(crate) fn current_book(&self) -> Option<&Book> {
        self.books.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.books.is_empty() {
            return;
        }
        let last = self.books.len() - 1;
        self.selected = self.selected.saturating_add_signed(offset).min(last);
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.books.len().saturating_sub(1);
    }

    fn ensure_in_bounds(&mut self) {
        if self.books.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.books.len() {
            self.selected = self.books.len() - 1;
        }
    }
}

/// Per-genre counts shown by the genre summary popup.
pub(crate) struct GenreSummary {
    pub(crate) rows: Vec<(String, usize)>,
}

impl GenreSummary {
    pub(crate) fn load(logic: &dyn BookLogic) -> Self {
        let rows = logic
            .group_by_genre()
            .into_iter()
            .map(|(label, books)| (label.to_string(), books.len()))
            .collect();
        Self { rows }
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        if self.rows.is_empty() {
            return vec!["Empty".to_string()];
        }
        self.rows
            .iter()
            .map(|(label, count)| {
                let noun = if *count == 1 { "book" } else { "books" };
                format!("[{label}] {count} {noun}")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{seed_demo_books, BookStore};

    #[test]
    fn filter_goes_through_author_search() {
        let store = BookStore::new();
        seed_demo_books(&store).unwrap();
        let mut screen = BookListScreen::load(&store);
        assert_eq!(screen.books.len(), 3);

        screen.set_filter(&store, Some("  rich ".to_string()));
        assert_eq!(screen.books.len(), 1);
        assert_eq!(screen.books[0].author, "Jeffrey Richter");

        screen.set_filter(&store, Some("   ".to_string()));
        assert_eq!(screen.books.len(), 3);
    }

    #[test]
    fn selection_is_clamped() {
        let store = BookStore::new();
        seed_demo_books(&store).unwrap();
        let mut screen = BookListScreen::load(&store);

        screen.move_selection(-3);
        assert_eq!(screen.selected, 0);
        screen.move_selection(10);
        assert_eq!(screen.selected, 2);

        store.delete(3);
        screen.reload(&store);
        assert_eq!(screen.selected, 1);
    }

    #[test]
    fn reload_focused_follows_the_book() {
        let store = BookStore::new();
        seed_demo_books(&store).unwrap();
        let mut screen = BookListScreen::load(&store);
        screen.reload_focused(&store, 2);
        assert_eq!(screen.current_book().map(|b| b.id), Some(2));
    }

    #[test]
    fn genre_summary_counts_groups() {
        let store = BookStore::new();
        assert_eq!(GenreSummary::load(&store).lines(), vec!["Empty"]);

        seed_demo_books(&store).unwrap();
        assert_eq!(
            GenreSummary::load(&store).lines(),
            vec!["[Programming] 2 books", "[Sci-Fi] 1 book"]
        );
    }
}
