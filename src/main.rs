//! docstream - render document trees to Markdown, HTML, LaTeX, EPUB and text

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, Log, Metadata, Record};

use docstream::export::{ExportConfig, Format};
use docstream::{Book, export_book, optimize};

#[derive(Parser)]
#[command(name = "docstream")]
#[command(version, about = "Render document trees to several formats in one pass", long_about = None)]
#[command(after_help = "EXAMPLES:
    docstream docs/ out/                  Render every docs/*.json to Markdown
    docstream docs/ out/ -f md,html,epub  Render three formats per book
    docstream docs/ out/ -b handbook      Render only docs/handbook.json")]
struct Cli {
    /// Directory of document JSON files, one book per file
    #[arg(value_name = "INPUT_DIR")]
    input_dir: PathBuf,

    /// Directory the rendered files are written to
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Comma-separated output formats (markdown|md, html, latex|tex, epub, plaintext|txt)
    #[arg(short, long, default_value = "markdown")]
    formats: String,

    /// Only render the book with this file stem
    #[arg(short, long, value_name = "BOOK")]
    book: Option<String>,

    /// Suppress output messages
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug details
    #[arg(short, long)]
    verbose: bool,
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}: {}", record.level().as_str().to_lowercase(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Render every selected book. Returns `Ok(false)` if any book or format
/// failed after all of them were attempted.
fn run(cli: &Cli) -> docstream::Result<bool> {
    // An unsupported format is a configuration error: fail before touching
    // any document.
    let formats = Format::parse_list(&cli.formats)?;
    let config = ExportConfig::new(&cli.output_dir, formats);

    let books = find_books(&cli.input_dir, cli.book.as_deref())?;
    if books.is_empty() {
        log::warn!("no matching *.json documents in {}", cli.input_dir.display());
    }

    let mut ok = true;
    for (stem, path) in books {
        let mut book = match Book::open(&path) {
            Ok(book) => book,
            Err(e) => {
                eprintln!("error: {}: {e}", path.display());
                ok = false;
                continue;
            }
        };

        optimize(&mut book);
        let report = export_book(&book, &stem, &config);

        for output in &report.outputs {
            match &output.result {
                Ok(written) => {
                    if !cli.quiet {
                        println!("{stem}: {} -> {}", output.format, written.display());
                    }
                }
                Err(e) => eprintln!("error: {stem}: {}: {e}", output.format),
            }
        }
        ok &= report.is_success();
    }

    Ok(ok)
}

/// Collect `(stem, path)` for each `*.json` file, sorted by stem.
fn find_books(dir: &Path, only: Option<&str>) -> docstream::Result<Vec<(String, PathBuf)>> {
    let mut books = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if only.is_some_and(|wanted| wanted != stem) {
            continue;
        }
        books.push((stem.to_string(), path.clone()));
    }
    books.sort();
    Ok(books)
}
