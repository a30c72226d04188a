//! Binary entry point: parse the command line, set up logging, build the
//! shared store, optionally seed it, and hand it to the chosen front-end.
use std::sync::Arc;

use book_catalog::{
    init_logging, run_app, run_console, seed_demo_books, App, BookLogic, BookStore, Cli, Frontend,
};
use clap::Parser;
use log::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let frontend = cli.frontend();
    init_logging(frontend, cli.log_level)?;

    let store: Arc<dyn BookLogic> = Arc::new(BookStore::new());
    if cli.seed_demo_data() {
        let seeded = seed_demo_books(store.as_ref())?;
        info!("seeded {} demo books", seeded.len());
    }

    match frontend {
        Frontend::Console => run_console(store.as_ref()),
        Frontend::Form => {
            let mut app = App::new(store);
            run_app(&mut app)
        }
    }
}
