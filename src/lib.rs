//! Core library surface for the book catalog.
//!
//! The store is the only part with business rules; the console menu and the
//! terminal form are thin front-ends over the [`BookLogic`] trait, so the
//! binary as well as tests can reuse the same pieces.
pub mod config;
pub mod console;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

pub use config::{Cli, Frontend};
pub use console::{run_console, Console};
pub use logging::init_logging;

/// The domain type every layer manipulates.
pub use models::{Book, BookField, GenreLabel, UNSPECIFIED_GENRE};

/// The business-logic interface and its in-memory implementation.
pub use store::{seed_demo_books, BookLogic, BookStore, GenreGroups, ValidationError};

/// The form front-end entry point and state container.
pub use ui::{run_app, App};
