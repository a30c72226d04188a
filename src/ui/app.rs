use std::mem;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use log::{info, warn};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::store::BookLogic;

use super::forms::{BookForm, ConfirmBookDelete, FormField};
use super::helpers::{book_list_line, centered_rect, surface_error};
use super::screens::{BookListScreen, GenreSummary};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows taken by the author filter input above the list.
const FILTER_BAR_HEIGHT: u16 = 3;
/// Rows jumped by PageUp/PageDown.
const PAGE_STEP: isize = 5;

/// Fine-grained modes layered over the record list.
enum Mode {
    Normal,
    AddingBook(BookForm),
    EditingBook { id: i64, form: BookForm },
    ConfirmDelete(ConfirmBookDelete),
    Filtering(SearchState),
    ShowingGroups(GenreSummary),
}

/// State for the live author filter. `previous` is the filter that was active
/// when the bar opened.
struct SearchState {
    query: String,
    previous: Option<String>,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state for the form front-end.
pub struct App {
    logic: Arc<dyn BookLogic>,
    list: BookListScreen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(logic: Arc<dyn BookLogic>) -> Self {
        let list = BookListScreen::load(logic.as_ref());
        Self {
            logic,
            list,
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Feed one key press through the current mode. Returns `true` when the
    /// user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingBook(form) => self.handle_add_book(code, form),
            Mode::EditingBook { id, form } => self.handle_edit_book(code, id, form),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
            Mode::Filtering(state) => self.handle_filter(code, state),
            Mode::ShowingGroups(summary) => match code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('g') | KeyCode::Char('q') => {
                    Mode::Normal
                }
                _ => Mode::ShowingGroups(summary),
            },
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Up => self.list.move_selection(-1),
            KeyCode::Down => self.list.move_selection(1),
            KeyCode::PageUp => self.list.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.list.move_selection(PAGE_STEP),
            KeyCode::Home => self.list.select_first(),
            KeyCode::End => self.list.select_last(),
            KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::AddingBook(BookForm::default()));
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Some(book) = self.list.current_book() {
                    let mode = Mode::EditingBook {
                        id: book.id,
                        form: BookForm::from_book(book),
                    };
                    self.clear_status();
                    return Ok(mode);
                }
                self.set_status("No book selected to edit.", StatusKind::Error);
            }
            KeyCode::Char('-') | KeyCode::Delete => {
                if let Some(book) = self.list.current_book() {
                    let confirm = ConfirmBookDelete::from(book);
                    self.clear_status();
                    return Ok(Mode::ConfirmDelete(confirm));
                }
                self.set_status("No book selected to delete.", StatusKind::Error);
            }
            KeyCode::Char('f') | KeyCode::Char('/') => {
                self.clear_status();
                let previous = self.list.filter.clone();
                return Ok(Mode::Filtering(SearchState {
                    query: previous.clone().unwrap_or_default(),
                    previous,
                }));
            }
            KeyCode::Char('g') | KeyCode::Char('G') => {
                return Ok(Mode::ShowingGroups(GenreSummary::load(self.logic.as_ref())));
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.toggle_read()?,
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_add_book(&mut self, code: KeyCode, mut form: BookForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Enter => match self.save_new_book(&form) {
                Ok(()) => return Mode::Normal,
                Err(err) => self.report_form_error(&mut form, &err),
            },
            other => edit_form(&mut form, other),
        }
        Mode::AddingBook(form)
    }

    fn handle_edit_book(&mut self, code: KeyCode, id: i64, mut form: BookForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Enter => match self.save_existing_book(id, &form) {
                Ok(()) => return Mode::Normal,
                Err(err) => self.report_form_error(&mut form, &err),
            },
            other => edit_form(&mut form, other),
        }
        Mode::EditingBook { id, form }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmBookDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                if self.logic.delete(confirm.id) {
                    info!("form deleted book {}", confirm.id);
                    self.set_status(format!("Deleted '{}'.", confirm.title), StatusKind::Info);
                } else {
                    self.set_status("Book no longer exists.", StatusKind::Error);
                }
                self.list.reload(self.logic.as_ref());
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn handle_filter(&mut self, code: KeyCode, mut state: SearchState) -> Mode {
        match code {
            KeyCode::Esc => {
                self.list.set_filter(self.logic.as_ref(), None);
                if state.previous.is_some() {
                    self.set_status("Filter cleared.", StatusKind::Info);
                }
                return Mode::Normal;
            }
            KeyCode::Enter => {
                let filter = Some(state.query).filter(|q| !q.trim().is_empty());
                self.list.set_filter(self.logic.as_ref(), filter);
                return Mode::Normal;
            }
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => state.query.push(ch),
            _ => return Mode::Filtering(state),
        }
        self.list
            .set_filter(self.logic.as_ref(), Some(state.query.clone()));
        Mode::Filtering(state)
    }

    fn toggle_read(&mut self) -> Result<()> {
        let Some(mut book) = self.list.current_book().cloned() else {
            self.set_status("No book selected.", StatusKind::Error);
            return Ok(());
        };
        book.is_read = !book.is_read;
        let (id, is_read, title) = (book.id, book.is_read, book.title.clone());
        let updated = self
            .logic
            .update(book)
            .with_context(|| format!("failed to toggle read flag of book {id}"))?;
        if updated {
            let state = if is_read { "read" } else { "unread" };
            self.set_status(format!("Marked '{title}' as {state}."), StatusKind::Info);
        } else {
            self.set_status("Book no longer exists.", StatusKind::Error);
        }
        self.list.reload_focused(self.logic.as_ref(), id);
        Ok(())
    }

    fn save_new_book(&mut self, form: &BookForm) -> Result<()> {
        let book = form.parse_inputs()?;
        let created = self.logic.create(book).context("failed to add book")?;
        info!("form added book {}", created.id);
        self.list.reload_focused(self.logic.as_ref(), created.id);
        self.set_status(format!("Added '{}'.", created.title), StatusKind::Info);
        Ok(())
    }

    fn save_existing_book(&mut self, id: i64, form: &BookForm) -> Result<()> {
        let mut book = form.parse_inputs()?;
        book.id = id;
        let title = book.title.clone();
        if self.logic.update(book).context("failed to save book")? {
            self.set_status(format!("Updated '{title}'."), StatusKind::Info);
        } else {
            self.set_status("Book no longer exists.", StatusKind::Error);
        }
        self.list.reload_focused(self.logic.as_ref(), id);
        Ok(())
    }

    fn report_form_error(&mut self, form: &mut BookForm, err: &anyhow::Error) {
        let message = surface_error(err);
        warn!("form rejected book input: {message}");
        form.error = Some(message.clone());
        self.set_status(message, StatusKind::Error);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.mode {
            Mode::Filtering(state) => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(FILTER_BAR_HEIGHT), Constraint::Min(0)])
                    .split(content_area);
                self.draw_filter_bar(frame, chunks[0], state);
                self.draw_book_list(frame, chunks[1]);
            }
            _ => self.draw_book_list(frame, content_area),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingBook(form) => self.draw_book_form(frame, area, "Add Book", form),
            Mode::EditingBook { form, .. } => self.draw_book_form(frame, area, "Edit Book", form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::ShowingGroups(summary) => self.draw_genre_summary(frame, area, summary),
            Mode::Normal | Mode::Filtering(_) => {}
        }
    }

    fn draw_book_list(&self, frame: &mut Frame, area: Rect) {
        let title = match self.list.active_filter() {
            Some(query) => format!("Books (author contains '{query}')"),
            None => "Books".to_string(),
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        if self.list.books.is_empty() {
            let message = if self.list.active_filter().is_some() {
                "Nothing found."
            } else {
                "The list is empty. Press '+' to add a book."
            };
            let paragraph = Paragraph::new(message)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let items: Vec<ListItem> = self
            .list
            .books
            .iter()
            .map(|book| ListItem::new(book_list_line(book)))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(self.list.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&str, &str)] = match &self.mode {
            Mode::Normal => &[
                ("[↑↓]", " Navigate   "),
                ("[+]", " Add   "),
                ("[E]", " Edit   "),
                ("[-]", " Delete   "),
                ("[R]", " Read/unread   "),
                ("[F]", " Filter by author   "),
                ("[G]", " Genres   "),
                ("[Q]", " Quit"),
            ],
            Mode::AddingBook(_) | Mode::EditingBook { .. } => &[
                ("[Tab]", " Next field   "),
                ("[Space]", " Toggle read   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::ConfirmDelete(_) => &[("[Y]", " Delete   "), ("[N]", " Keep")],
            Mode::Filtering(_) => &[("[Enter]", " Keep filter   "), ("[Esc]", " Clear filter")],
            Mode::ShowingGroups(_) => &[("[Esc]", " Close")],
        };

        let spans: Vec<Span<'static>> = hints
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(label.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn draw_filter_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Filter by author");
        let paragraph = Paragraph::new(Span::raw(format!("Author: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);

        let inner = block.inner(area);
        let cursor_x = inner.x + "Author: ".len() as u16 + state.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &BookForm) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = FormField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if form.active != FormField::Read {
            let row = FormField::ALL
                .iter()
                .position(|field| *field == form.active)
                .unwrap_or(0) as u16;
            let prefix = form.active.label().len() as u16 + 2;
            let cursor_x = inner.x + prefix + form.value_len(form.active) as u16;
            frame.set_cursor_position((cursor_x, inner.y + row));
        }
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmBookDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete '{}'?", confirm.title)),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_genre_summary(&self, frame: &mut Frame, area: Rect, summary: &GenreSummary) {
        let popup_area = centered_rect(50, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Genres").borders(Borders::ALL);
        let lines: Vec<Line> = summary.lines().into_iter().map(Line::from).collect();
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}

/// Keys shared by the add and edit dialogs that only touch the form itself.
fn edit_form(form: &mut BookForm, code: KeyCode) {
    match code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(ch) => {
            if form.push_char(ch) {
                form.error = None;
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::store::{seed_demo_books, BookStore};

    fn seeded_app() -> (Arc<BookStore>, App) {
        let store = Arc::new(BookStore::new());
        seed_demo_books(store.as_ref()).unwrap();
        let app = App::new(store.clone());
        (store, app)
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            app.handle_key(*key).unwrap();
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn quits_on_q() {
        let (_, mut app) = seeded_app();
        assert!(!app.handle_key(KeyCode::Down).unwrap());
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn adds_book_through_dialog() {
        let (store, mut app) = seeded_app();
        press(&mut app, &[KeyCode::Char('+')]);
        type_text(&mut app, "Solaris");
        press(&mut app, &[KeyCode::Tab]);
        type_text(&mut app, "Stanis1aw Lem");
        press(&mut app, &[KeyCode::Tab]);
        type_text(&mut app, "Sci-Fi");
        // Year starts at 2000; clear it before typing.
        press(&mut app, &[KeyCode::Tab]);
        press(&mut app, &[KeyCode::Backspace; 4]);
        type_text(&mut app, "1961");
        press(&mut app, &[KeyCode::Enter]);

        assert!(matches!(app.mode, Mode::Normal));
        let added = store.read(4).unwrap();
        assert_eq!(added.title, "Solaris");
        assert_eq!(added.author, "Stanisaw Lem");
        assert_eq!(added.year, 1961);
        assert_eq!(added.pages, 100);
        assert_eq!(app.list.current_book().map(|b| b.id), Some(4));
    }

    #[test]
    fn validation_error_keeps_dialog_open() {
        let (store, mut app) = seeded_app();
        press(&mut app, &[KeyCode::Char('+')]);
        type_text(&mut app, "Nameless");
        press(&mut app, &[KeyCode::Enter]);

        match &app.mode {
            Mode::AddingBook(form) => {
                assert_eq!(form.error.as_deref(), Some("Author is required."));
            }
            _ => panic!("dialog should stay open"),
        }
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn edits_selected_book() {
        let (store, mut app) = seeded_app();
        press(&mut app, &[KeyCode::End, KeyCode::Char('e')]);
        type_text(&mut app, " Messiah");
        press(&mut app, &[KeyCode::Enter]);

        assert_eq!(store.read(3).unwrap().title, "Dune Messiah");
        assert_eq!(app.list.current_book().map(|b| b.id), Some(3));
    }

    #[test]
    fn delete_requires_confirmation() {
        let (store, mut app) = seeded_app();
        press(&mut app, &[KeyCode::Char('-'), KeyCode::Char('n')]);
        assert_eq!(store.len(), 3);

        press(&mut app, &[KeyCode::Char('-'), KeyCode::Char('y')]);
        assert_eq!(store.len(), 2);
        assert!(store.read(1).is_none());
    }

    #[test]
    fn filter_narrows_list_and_esc_clears_it() {
        let (_, mut app) = seeded_app();
        press(&mut app, &[KeyCode::Char('f')]);
        type_text(&mut app, "HERB");
        assert_eq!(app.list.books.len(), 1);
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.list.active_filter(), Some("HERB"));
        assert_eq!(app.list.books.len(), 1);

        press(&mut app, &[KeyCode::Char('f'), KeyCode::Esc]);
        assert_eq!(app.list.active_filter(), None);
        assert_eq!(app.list.books.len(), 3);
    }

    #[test]
    fn live_filter_results_stay_visible() {
        let (_, mut app) = seeded_app();
        press(&mut app, &[KeyCode::Char('f')]);
        type_text(&mut app, "HERB");

        let screen = render(&app);
        assert!(screen.contains("Author: HERB"));
        assert!(screen.contains("Dune — Frank Herbert (1965), Sci-Fi"));
        assert!(!screen.contains("Clean Code"));
    }

    #[test]
    fn toggles_read_flag() {
        let (store, mut app) = seeded_app();
        press(&mut app, &[KeyCode::Char('r')]);
        assert!(store.read(1).unwrap().is_read);
        press(&mut app, &[KeyCode::Char('r')]);
        assert!(!store.read(1).unwrap().is_read);
    }

    #[test]
    fn renders_list_and_genre_summary() {
        let (_, mut app) = seeded_app();
        let screen = render(&app);
        assert!(screen.contains("Dune — Frank Herbert (1965), Sci-Fi"));

        press(&mut app, &[KeyCode::Char('g')]);
        let screen = render(&app);
        assert!(screen.contains("[Programming] 2 books"));
        press(&mut app, &[KeyCode::Esc]);
        assert!(matches!(app.mode, Mode::Normal));
    }
}
