//! Ratatui form front-end: a record list with an author filter, add/edit and
//! delete dialogs, and a genre summary popup, all driving the same
//! [`BookLogic`](crate::store::BookLogic) calls as the console menu.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
