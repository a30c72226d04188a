//! Business-logic layer split across logical submodules.

mod logic;
mod memory;
mod seed;
mod validation;

pub use logic::{BookLogic, GenreGroups};
pub use memory::BookStore;
pub use seed::seed_demo_books;
pub use validation::{ValidationError, MAX_YEAR, MIN_PAGES, MIN_YEAR};
