//! Line-based console front-end. It owns no business rules: every action is a
//! single call into [`BookLogic`], and validation errors coming back from the
//! store are printed before the menu is shown again.

mod prompts;

use std::io::{self, BufRead, Write};

use anyhow::Result;
use log::{info, warn};

use crate::models::Book;
use crate::store::{BookLogic, MAX_YEAR, MIN_PAGES, MIN_YEAR};

use prompts::{InputClosed, Prompter};

const MENU: &str = "1) List books
2) Add
3) Edit
4) Delete
5) Group by genre
6) Find by author
0) Exit";

/// Run the menu on the process stdin/stdout until the user picks `0` or input
/// ends.
pub fn run_console(logic: &dyn BookLogic) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    Console::new(logic, stdin.lock(), stdout.lock()).run()
}

/// Menu loop over arbitrary input/output streams.
pub struct Console<'a, R, W> {
    logic: &'a dyn BookLogic,
    prompter: Prompter<R, W>,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    pub fn new(logic: &'a dyn BookLogic, input: R, output: W) -> Self {
        Self {
            logic,
            prompter: Prompter::new(input, output),
        }
    }

    /// Hand back the output stream, mostly so tests can inspect it.
    pub fn into_output(self) -> W {
        self.prompter.into_output()
    }

    /// Loop until the user exits. End of input counts as exiting.
    pub fn run(&mut self) -> Result<()> {
        info!("console front-end started");
        let result = match self.menu_loop() {
            Err(err) if err.is::<InputClosed>() => Ok(()),
            other => other,
        };
        info!("console front-end stopped");
        result
    }

    fn menu_loop(&mut self) -> Result<()> {
        loop {
            self.prompter.say(MENU)?;
            match self.prompter.menu_choice(0, 6)? {
                0 => return Ok(()),
                1 => self.list_books()?,
                2 => self.add_book()?,
                3 => self.edit_book()?,
                4 => self.delete_book()?,
                5 => self.show_groups()?,
                _ => self.search_by_author()?,
            }
            self.prompter.say("")?;
        }
    }

    fn list_books(&mut self) -> Result<()> {
        let books = self.logic.read_all();
        if books.is_empty() {
            return self.prompter.say("The list is empty.");
        }
        for book in books {
            self.prompter.say(format!("{} :: {book}", book.id))?;
        }
        Ok(())
    }

    fn add_book(&mut self) -> Result<()> {
        let book = self.input_book()?;
        match self.logic.create(book) {
            Ok(created) => {
                info!("console added book {}", created.id);
                self.prompter.say("Added.")
            }
            Err(err) => {
                warn!("console rejected new book: {err}");
                self.prompter.say(format!("Not added: {err}"))
            }
        }
    }

    fn edit_book(&mut self) -> Result<()> {
        let id = self.existing_id("Id of the book to edit: ")?;
        let Some(current) = self.logic.read(id) else {
            return self.prompter.say("Book not found.");
        };
        let edited = self.edit_fields(current)?;
        match self.logic.update(edited) {
            Ok(true) => self.prompter.say("Saved."),
            Ok(false) => self.prompter.say("Book not found."),
            Err(err) => {
                warn!("console rejected edit of book {id}: {err}");
                self.prompter.say(format!("Not saved: {err}"))
            }
        }
    }

    fn delete_book(&mut self) -> Result<()> {
        let id = self.existing_id("Id of the book to delete: ")?;
        if self.logic.delete(id) {
            self.prompter.say("Deleted.")
        } else {
            self.prompter.say("Book not found.")
        }
    }

    fn show_groups(&mut self) -> Result<()> {
        let groups = self.logic.group_by_genre();
        if groups.is_empty() {
            return self.prompter.say("Empty.");
        }
        for (label, books) in groups {
            self.prompter.say(format!("[{label}]"))?;
            for book in books {
                self.prompter.say(format!("  - {book}"))?;
            }
        }
        Ok(())
    }

    fn search_by_author(&mut self) -> Result<()> {
        let query = self
            .prompter
            .text("Author (part of the name, may be empty): ", true)?;
        let found = self.logic.find_by_author(&query);
        if found.is_empty() {
            return self.prompter.say("Nothing found.");
        }
        for book in found {
            self.prompter.say(book.to_string())?;
        }
        Ok(())
    }

    /// Keep asking until the id names a stored book.
    fn existing_id(&mut self, prompt: &str) -> Result<i64> {
        loop {
            let id = i64::from(self.prompter.int(prompt, Some(1), None)?);
            if self.logic.read(id).is_some() {
                return Ok(id);
            }
            self.prompter
                .say("No book with that id. Please try again.")?;
        }
    }

    fn input_book(&mut self) -> Result<Book> {
        let p = &mut self.prompter;
        let title = p.text("Title: ", false)?;
        let author = p.text_without_digits("Author: ", false)?;
        let genre = p.text_without_digits("Genre: ", true)?;
        let year = p.int(
            &format!("Year ({MIN_YEAR}..{MAX_YEAR}): "),
            Some(MIN_YEAR),
            Some(MAX_YEAR),
        )?;
        let pages = p.int("Pages (>0): ", Some(MIN_PAGES), None)?;
        let is_read = p.yes_no("Read?", Some(false))?;

        Ok(Book::new(title, author, genre, year, pages).read(is_read))
    }

    /// Prompt for every field showing its current value. Blank answers keep
    /// the current value.
    fn edit_fields(&mut self, mut book: Book) -> Result<Book> {
        let p = &mut self.prompter;
        let title = p.text(&format!("Title ({}): ", book.title), true)?;
        let author = p.text_without_digits(&format!("Author ({}): ", book.author), true)?;
        let genre = p.text_without_digits(&format!("Genre ({}): ", book.genre), true)?;
        let year = p.optional_int("Year", book.year, Some(MIN_YEAR), Some(MAX_YEAR))?;
        let pages = p.optional_int("Pages", book.pages, Some(MIN_PAGES), None)?;
        let currently = if book.is_read { "yes" } else { "no" };
        let is_read = p.yes_no(&format!("Read (currently {currently})?"), Some(book.is_read))?;

        if !title.is_empty() {
            book.title = title;
        }
        if !author.is_empty() {
            book.author = author;
        }
        if !genre.is_empty() {
            book.genre = genre;
        }
        book.year = year;
        book.pages = pages;
        book.is_read = is_read;
        Ok(book)
    }
}
