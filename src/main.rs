use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use circulation_core::{FileStore, Library, LibraryConfig, LibraryError};

mod report;

#[derive(Parser)]
#[command(name = "circ")]
#[command(about = "Enroll patrons and check books in and out")]
struct Cli {
    /// JSON settings file
    #[arg(short, long, global = true, env = "CIRC_CONFIG")]
    config: Option<PathBuf>,

    /// Book records file (overrides settings)
    #[arg(long, global = true, env = "CIRC_BOOKS")]
    books: Option<PathBuf>,

    /// Patron records file (overrides settings)
    #[arg(long, global = true, env = "CIRC_PATRONS")]
    patrons: Option<PathBuf>,

    /// Most books one patron may hold (overrides settings)
    #[arg(long, global = true)]
    max_out: Option<u32>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enroll a new patron and print their ID
    Enroll { name: String },
    /// Lend a book to a patron
    Checkout { book_id: i32, patron_id: i32 },
    /// Return a book
    Checkin { book_id: i32 },
    /// List the collection
    Books,
    /// List enrolled patrons
    Patrons,
    /// How many books a patron has out
    Loans { patron_id: i32 },
    /// A patron's name
    Name { patron_id: i32 },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "circulation=info,circulation_core=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let store = FileStore::from_config(&config);
    let mut library = Library::new(store, config).context("Failed to load library records")?;

    let config = library.config();
    tracing::debug!(
        "Using {} and {} (at most {} books per patron)",
        config.book_file.display(),
        config.patron_file.display(),
        config.max_books_allowed_out
    );

    match run(&mut library, cli.command, cli.json) {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast_ref::<LibraryError>() {
            Some(lib_err) => {
                let status = lib_err.status();
                eprintln!("error: {lib_err} [{status}]");
                std::process::exit(status.code().abs());
            }
            None => Err(err),
        },
    }
}

fn resolve_config(cli: &Cli) -> anyhow::Result<LibraryConfig> {
    let mut config = LibraryConfig::load_or_default(cli.config.as_deref())?;
    if let Some(books) = &cli.books {
        config.book_file = books.clone();
    }
    if let Some(patrons) = &cli.patrons {
        config.patron_file = patrons.clone();
    }
    if let Some(max_out) = cli.max_out {
        config.max_books_allowed_out = max_out;
    }
    config.validate()?;
    Ok(config)
}

fn run(library: &mut Library<FileStore>, command: Commands, json: bool) -> anyhow::Result<()> {
    match command {
        Commands::Enroll { name } => {
            let patron_id = library.enroll(&name)?;
            report::enrolled(patron_id, &name, json)?;
        }
        Commands::Checkout { book_id, patron_id } => {
            library.checkout(book_id, patron_id)?;
            report::success(json)?;
        }
        Commands::Checkin { book_id } => {
            library.checkin(book_id)?;
            report::success(json)?;
        }
        Commands::Books => {
            library.numb_books()?;
            report::books(library.books(), json)?;
        }
        Commands::Patrons => {
            library.numb_patrons()?;
            report::patrons(library.patrons(), json)?;
        }
        Commands::Loans { patron_id } => {
            let count = library.how_many_books_checked_out(patron_id)?;
            report::loans(patron_id, count, json)?;
        }
        Commands::Name { patron_id } => {
            let name = library.what_is_patron_name(patron_id)?;
            report::name(patron_id, &name, json)?;
        }
    }
    Ok(())
}
