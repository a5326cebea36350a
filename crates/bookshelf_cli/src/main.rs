//! Bookshelf command-line front end.
//!
//! # Responsibility
//! - Collect and validate user input before it reaches the core.
//! - Render books and statistics as plain tables or JSON.

use anyhow::{Context, Result};
use bookshelf_core::{
    init_logging, Book, BookForm, ConfigOverrides, LibraryConfig, LibraryService, LibraryStats,
    SqliteBookRepository, DEFAULT_FORM_YEAR,
};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(version)]
#[command(about = "Manage your personal book collection", long_about = None)]
struct Args {
    /// SQLite database file (default: <data dir>/bookshelf/library.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Directory for rolling log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a new book
    Add {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        author: String,
        /// Publication year (1000-2100)
        #[arg(short, long, default_value_t = DEFAULT_FORM_YEAR)]
        year: i32,
        #[arg(short, long)]
        genre: String,
        /// Mark the book as read
        #[arg(short, long)]
        read: bool,
    },

    /// Remove every book with exactly this title, or list removable titles
    Remove { title: Option<String> },

    /// Search titles and authors
    Search { term: String },

    /// List all books
    List,

    /// Show library statistics
    Stats,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = LibraryConfig::resolve(ConfigOverrides {
        db_path: args.db,
        log_dir: args.log_dir,
        log_level: args.log_level,
    })
    .context("Failed to resolve configuration")?;
    config
        .prepare_dirs()
        .context("Failed to prepare data directories")?;
    start_logging(&config);

    let service = LibraryService::new(SqliteBookRepository::new(config.db_path.clone()));
    service.initialize().with_context(|| {
        format!(
            "Failed to initialize library at {}",
            config.db_path.display()
        )
    })?;

    match args.command {
        Commands::Add {
            title,
            author,
            year,
            genre,
            read,
        } => {
            let mut form = BookForm {
                title,
                author,
                year,
                genre,
                read,
            };
            let book = form.submit().context("Invalid book")?;
            let id = service.add_book(&book).context("Failed to add book")?;
            if args.json {
                println!("{}", serde_json::json!({ "id": id }));
            } else {
                println!("Added '{}' (id {id})", book.title);
            }
        }
        Commands::Remove { title } => {
            let titles = service
                .removable_titles()
                .context("Failed to list removable books")?;
            if titles.is_empty() {
                eprintln!("No books available to remove");
                return Ok(());
            }

            let Some(title) = title else {
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&titles)?);
                } else {
                    println!("Books you can remove:");
                    for title in &titles {
                        println!("  {title}");
                    }
                }
                return Ok(());
            };

            let removed = service
                .remove_book(&title)
                .context("Failed to remove book")?;
            if args.json {
                println!("{}", serde_json::json!({ "removed": removed }));
            } else if removed == 0 {
                eprintln!("No book titled '{title}'");
            } else {
                println!("Removed {removed} book(s) titled '{title}'");
            }
        }
        Commands::Search { term } => {
            let books = service.search_books(&term).context("Search failed")?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&books)?);
            } else if books.is_empty() {
                eprintln!("No books found for '{term}'");
            } else {
                print_books(&books);
            }
        }
        Commands::List => {
            let books = service.list_books().context("Failed to list books")?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&books)?);
            } else if books.is_empty() {
                eprintln!("Your library is empty");
            } else {
                print_books(&books);
            }
        }
        Commands::Stats => {
            let stats = service
                .library_stats()
                .context("Failed to read statistics")?;
            print_stats(&stats, args.json);
        }
    }

    Ok(())
}

/// Logging failures are reported but never block the command.
fn start_logging(config: &LibraryConfig) {
    match init_logging(&config.log_level, &config.log_dir) {
        Ok(()) => info!(
            "event=cli_start module=cli status=ok version={}",
            bookshelf_core::core_version()
        ),
        Err(err) => eprintln!("warning: logging disabled: {err}"),
    }
}

fn print_books(books: &[Book]) {
    let title_width = column_width("Title", books.iter().map(|b| b.title.as_str()));
    let author_width = column_width("Author", books.iter().map(|b| b.author.as_str()));
    let genre_width = column_width("Genre", books.iter().map(|b| b.genre.as_str()));

    println!(
        "{:<title_width$}  {:<author_width$}  {:>4}  {:<genre_width$}  Read",
        "Title", "Author", "Year", "Genre"
    );
    for book in books {
        println!(
            "{:<title_width$}  {:<author_width$}  {:>4}  {:<genre_width$}  {}",
            book.title,
            book.author,
            book.year,
            book.genre,
            if book.read { "yes" } else { "no" }
        );
    }
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|value| value.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0)
}

fn print_stats(stats: &LibraryStats, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "total": stats.total,
                "read": stats.read,
                "percent_read": stats.percent_read(),
            })
        );
        return;
    }

    println!("Total books:     {}", stats.total);
    println!("Books read:      {}", stats.read);
    println!("Percentage read: {:.2}%", stats.percent_read());
}

#[cfg(test)]
mod tests {
    use super::{column_width, Args, Commands};
    use clap::Parser;

    #[test]
    fn add_defaults_year_and_read() {
        let args = Args::try_parse_from([
            "bookshelf", "add", "--title", "Dune", "--author", "Herbert", "--genre", "SciFi",
        ])
        .unwrap();

        match args.command {
            Commands::Add { year, read, .. } => {
                assert_eq!(year, 2025);
                assert!(!read);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_are_accepted_after_subcommand() {
        let args = Args::try_parse_from(["bookshelf", "list", "--json", "--db", "/tmp/x.db"])
            .unwrap();
        assert!(args.json);
        assert_eq!(args.db.as_deref(), Some(std::path::Path::new("/tmp/x.db")));
    }

    #[test]
    fn remove_title_is_optional() {
        let args = Args::try_parse_from(["bookshelf", "remove"]).unwrap();
        assert!(matches!(args.command, Commands::Remove { title: None }));

        let args = Args::try_parse_from(["bookshelf", "remove", "Dune"]).unwrap();
        assert!(matches!(args.command, Commands::Remove { title: Some(t) } if t == "Dune"));
    }

    #[test]
    fn column_width_covers_header_and_values() {
        assert_eq!(column_width("Title", ["Dune"].into_iter()), 5);
        assert_eq!(column_width("Title", ["Neuromancer"].into_iter()), 11);
    }
}
