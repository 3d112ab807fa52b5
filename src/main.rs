//! Scripture Index command-line interface
//!
//! Verse lookup, keyword search, cross-references and corpus statistics over
//! JSON Bible translations and a tab-separated cross-reference list.

use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scripture_index::books::{next_chapter, prev_chapter};
use scripture_index::models::{CrossReferences, IndexConfig, SearchQuery, Testament};
use scripture_index::output::{
    print_books, print_chapter, print_comparison, print_cross_references, print_search_results,
    print_statistics, print_translations, print_verse, write_json,
};
use scripture_index::query::{QueryEngine, ScriptureIndex};
use scripture_index::session::Session;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scripture-index")]
#[command(about = "Verse lookup, keyword search and cross-references for Bible translations")]
#[command(version)]
struct Cli {
    /// Directory holding the translation files and cross-reference list [default: .]
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Translation to query [default: KJV]
    #[arg(long, short, global = true)]
    translation: Option<String>,

    /// Cross-reference file name inside the data directory [default: cross_references.txt]
    #[arg(long, global = true)]
    cross_refs: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    /// Suppress progress output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log load details (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for query results
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON on stdout
    Json,
}

/// Testament filter (CLI version, mirrors models::Testament)
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliTestament {
    /// Genesis through Malachi
    Ot,
    /// Matthew through Revelation
    Nt,
}

impl From<CliTestament> for Testament {
    fn from(t: CliTestament) -> Self {
        match t {
            CliTestament::Ot => Testament::Old,
            CliTestament::Nt => Testament::New,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show a verse and its top cross-references
    Verse {
        /// Reference, e.g. John 3:16
        #[arg(required = true, num_args = 1..)]
        reference: Vec<String>,

        /// Number of cross-references to show [default: 5]
        #[arg(long)]
        limit: Option<usize>,

        /// Skip cross-references
        #[arg(long)]
        no_refs: bool,
    },

    /// Search verses containing every word of a term
    Search {
        /// Search term
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,

        /// Maximum results to show [default: 15]
        #[arg(long)]
        limit: Option<usize>,

        /// Restrict to one testament
        #[arg(long, value_enum)]
        testament: Option<CliTestament>,

        /// Restrict to one book
        #[arg(long)]
        book: Option<String>,

        /// Match the term as an exact phrase
        #[arg(long)]
        exact: bool,
    },

    /// Show cross-references for a verse
    Refs {
        /// Reference, e.g. Genesis 1:1
        #[arg(required = true, num_args = 1..)]
        reference: Vec<String>,

        /// Number of cross-references to show [default: 5]
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Read a whole chapter
    Chapter {
        /// Book and chapter, e.g. Song of Solomon 2
        #[arg(required = true, num_args = 2..)]
        book_and_chapter: Vec<String>,
    },

    /// Show a verse in every loaded translation
    Compare {
        /// Reference, e.g. Psalms 23:1
        #[arg(required = true, num_args = 1..)]
        reference: Vec<String>,
    },

    /// Show a verse from the verse-of-the-day list
    Daily {
        /// Seed for a repeatable pick
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show a random verse with its cross-references
    Random {
        /// Seed for a repeatable pick
        #[arg(long)]
        seed: Option<u64>,

        /// Number of cross-references to show [default: 5]
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show corpus and cross-reference statistics
    Stats,

    /// List the canonical books with chapter coverage
    Books,

    /// List configured translations and whether they loaded
    Translations,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    // Start with library defaults, then overlay user-specified values
    let defaults = IndexConfig::default();
    let config = IndexConfig {
        data_dir: cli.data_dir.clone().unwrap_or(defaults.data_dir),
        default_translation: cli
            .translation
            .clone()
            .unwrap_or(defaults.default_translation),
        cross_reference_file: cli
            .cross_refs
            .clone()
            .unwrap_or(defaults.cross_reference_file),
        ..defaults
    };

    let show_progress = !cli.quiet && cli.format == OutputFormat::Text;
    let index = ScriptureIndex::load(&config, show_progress);
    let query = index.query();

    let mut session = Session::new(&config.default_translation, config.history_limit);
    if let Some(id) = &cli.translation {
        if !session.switch_translation(&index.store, id) {
            warn!(translation = %id, "translation not loaded");
        }
    }
    let translation = session.translation().to_string();

    match cli.command {
        Commands::Verse {
            reference,
            limit,
            no_refs,
        } => {
            let requested = reference.join(" ");
            let limit = limit.unwrap_or(config.cross_reference_limit);

            // Continue with the stored key so case-folded input still finds its edges
            let found = query
                .resolve_reference(&translation, &requested)
                .zip(query.get_verse(&translation, &requested));
            let Some((reference, text)) = found else {
                println!("Verse not found: {}", requested);
                return Ok(());
            };

            let refs_limit = (!no_refs).then_some(limit);
            show_verse(&query, &mut session, &translation, reference, text, refs_limit, cli.format)?;
        }

        Commands::Search {
            term,
            limit,
            testament,
            book,
            exact,
        } => {
            let search = SearchQuery {
                term: term.join(" "),
                limit: limit.unwrap_or(config.search_limit),
                testament: testament.map(Testament::from),
                book,
                exact_phrase: exact,
            };
            let results = query.search_keyword(&translation, &search);

            match cli.format {
                OutputFormat::Json => emit_json(&results)?,
                OutputFormat::Text => print_search_results(&results),
            }
        }

        Commands::Refs { reference, limit } => {
            let requested = reference.join(" ");
            let reference = query
                .resolve_reference(&translation, &requested)
                .unwrap_or(requested.as_str());
            let refs = query.cross_references(
                reference,
                limit.unwrap_or(config.cross_reference_limit),
            );

            match cli.format {
                OutputFormat::Json => emit_json(&refs)?,
                OutputFormat::Text => print_cross_references(&refs, &query, &translation),
            }
        }

        Commands::Chapter { book_and_chapter } => {
            let Some((book, chapter)) = split_book_chapter(&book_and_chapter) else {
                println!("Expected <book> <chapter>, got: {}", book_and_chapter.join(" "));
                return Ok(());
            };

            let Some(view) = query.chapter(&translation, &book, chapter) else {
                println!("Chapter not found: {} {}", book, chapter);
                return Ok(());
            };
            session.open_chapter(&view.book, view.chapter);

            match cli.format {
                OutputFormat::Json => emit_json(&view)?,
                OutputFormat::Text => {
                    print_chapter(&view);
                    if let Some((book, chapter)) = session.current_chapter() {
                        let prev = prev_chapter(book, chapter);
                        let next = next_chapter(book, chapter);
                        println!();
                        if let Some((b, c)) = prev {
                            println!("Previous: {} {}", b, c);
                        }
                        if let Some((b, c)) = next {
                            println!("Next: {} {}", b, c);
                        }
                    }
                }
            }
        }

        Commands::Compare { reference } => {
            let reference = reference.join(" ");
            let rows = query.compare_translations(&reference);

            match cli.format {
                OutputFormat::Json => emit_json(&rows)?,
                OutputFormat::Text => print_comparison(&reference, &rows),
            }
        }

        Commands::Daily { seed } => {
            let mut rng = seeded_rng(seed);
            let Some((reference, text)) =
                query.daily_verse(&translation, &config.daily_verses, &mut rng)
            else {
                println!("No verse of the day available in {}", translation);
                return Ok(());
            };

            if cli.format == OutputFormat::Text {
                println!("\n=== Verse of the Day ===");
            }
            show_verse(&query, &mut session, &translation, reference, text, None, cli.format)?;
        }

        Commands::Random { seed, limit } => {
            let mut rng = seeded_rng(seed);
            let Some((reference, text)) = query.random_verse(&translation, &mut rng) else {
                println!("No verses loaded for {}", translation);
                return Ok(());
            };

            let limit = limit.unwrap_or(config.cross_reference_limit);
            show_verse(&query, &mut session, &translation, reference, text, Some(limit), cli.format)?;
        }

        Commands::Stats => {
            let stats = query.statistics(&translation);

            match cli.format {
                OutputFormat::Json => emit_json(&stats)?,
                OutputFormat::Text => print_statistics(&stats),
            }
        }

        Commands::Books => {
            let books = query.book_overview(&translation);

            match cli.format {
                OutputFormat::Json => emit_json(&books)?,
                OutputFormat::Text => print_books(&books),
            }
        }

        Commands::Translations => {
            let loaded = index.store.ids();

            match cli.format {
                OutputFormat::Json => emit_json(&config.translations)?,
                OutputFormat::Text => print_translations(&config.translations, &loaded, &translation),
            }
        }
    }

    Ok(())
}

/// Print one verse, recording it in the session history. Cross-references
/// are shown when `refs_limit` is set.
fn show_verse(
    query: &QueryEngine,
    session: &mut Session,
    translation: &str,
    reference: &str,
    text: &str,
    refs_limit: Option<usize>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    session.record_view(reference);
    let refs = refs_limit.map(|limit| query.cross_references(reference, limit));

    match format {
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct VerseOutput<'a> {
                reference: &'a str,
                translation: &'a str,
                text: &'a str,
                #[serde(skip_serializing_if = "Option::is_none")]
                cross_references: Option<&'a CrossReferences>,
            }
            emit_json(&VerseOutput {
                reference,
                translation,
                text,
                cross_references: refs.as_ref(),
            })?;
        }
        OutputFormat::Text => {
            print_verse(reference, translation, text);
            if let Some(refs) = &refs {
                print_cross_references(refs, query, translation);
            }
        }
    }

    Ok(())
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn emit_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(value, &mut handle)?;
    Ok(())
}

/// Split `["Song", "of", "Solomon", "2"]` into ("Song of Solomon", 2).
fn split_book_chapter(args: &[String]) -> Option<(String, u32)> {
    let (last, book) = args.split_last()?;
    if book.is_empty() {
        return None;
    }
    let chapter: u32 = last.parse().ok().filter(|&c| c > 0)?;
    Some((book.join(" "), chapter))
}
