//! Prints the effective defaults and resolves keys for the project in the
//! current directory.
//!
//! ```text
//! lingualizer [--locale <LOCALE>] [KEY]...
//! ```
//!
//! Without keys every key of the loaded tables is printed.

use std::io::{
    self,
    Write,
};
use std::process::ExitCode;

use clap::Parser;
use lingualizer::{
    Locale,
    TranslationStore,
    TranslationValue,
};
use tracing_subscriber::EnvFilter;

/// Resolve translation keys for the project in the current directory
#[derive(Parser, Debug)]
#[command(name = "lingualizer")]
#[command(version)]
struct Args {
    /// Locale to resolve keys in (defaults to the configured default locale)
    #[arg(short, long)]
    locale: Option<Locale>,

    /// Keys to resolve, e.g. `menu.file.open`
    keys: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Loads the store and writes the requested values to stdout.
fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let mut store = TranslationStore::discover(&cwd)?;

    let mut out = io::stdout().lock();
    store.print_defaults(&mut out)?;

    if let Some(locale) = args.locale {
        store.set_locale(locale)?;
    }

    let keys = if args.keys.is_empty() { store.keys() } else { args.keys };

    for key in keys {
        let rendered = match store.get(&key) {
            Some(TranslationValue::Text(text)) => text.clone(),
            Some(TranslationValue::Other(value)) => value.to_string(),
            Some(TranslationValue::Table(_) | TranslationValue::List(_)) => "<nested>".to_string(),
            None => "<missing>".to_string(),
        };
        writeln!(out, "{key} = {rendered}")?;
    }

    Ok(())
}
