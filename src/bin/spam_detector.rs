//! Classifies a message as spam by scoring it against a keyword database.
//!
//! Prints exactly one line, `SPAM` or `NOT_SPAM`, on success. Invalid input
//! is reported on stderr with a nonzero exit status. Set `RUST_LOG=debug` to
//! trace loading and scoring.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use bucket_hash::spam;

/// Keyword-scoring spam detector
#[derive(Parser, Debug)]
#[command(name = "spam-detector")]
#[command(version)]
#[command(about = "Score a message against a keyword database and classify it as spam")]
struct Args {
    /// Keyword database, one `word,score` pair per line
    database: PathBuf,

    /// Message to classify
    message: PathBuf,

    /// Minimum score at which the message counts as spam
    #[arg(allow_hyphen_values = true)]
    threshold: String,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match spam::run(&args.database, &args.message, &args.threshold) {
        Ok(verdict) => {
            println!("{verdict}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::debug!("{err:?}");
            eprintln!("Invalid input: {err}");
            ExitCode::FAILURE
        }
    }
}
