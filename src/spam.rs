//! Keyword-scoring spam detection on top of [`BucketHashTable`].
//!
//! A keyword database maps lower-cased words to scores. A message is scored
//! by summing, for each of its lines, the score of every keyword once per
//! non-overlapping occurrence in the lower-cased line. The message is spam
//! when the total reaches the threshold.

use std::fmt;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

use log::debug;
use log::info;
use thiserror::Error;

use crate::BucketHashTable;

/// Errors produced while loading inputs or classifying a message.
#[derive(Error, Debug)]
pub enum SpamError {
    /// An input file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An input file does not exist.
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// A database line is not exactly two non-empty comma-separated fields.
    #[error("malformed database line {line}: {content:?}")]
    MalformedLine {
        /// One-based line number.
        line: usize,
        /// Raw line content.
        content: String,
    },

    /// A database score is not a non-negative integer.
    #[error("invalid score on database line {line}: {value:?}")]
    InvalidScore {
        /// One-based line number.
        line: usize,
        /// Raw score field.
        value: String,
    },

    /// The threshold is not a non-negative integer.
    #[error("invalid threshold: {0:?}")]
    InvalidThreshold(String),

    /// The keyword table rejected the loaded data.
    #[error(transparent)]
    Table(#[from] crate::Error),
}

/// Result type alias for spam detection.
pub type Result<T> = std::result::Result<T, SpamError>;

/// Keywords and their scores.
#[derive(Debug, Clone, Default)]
pub struct KeywordDatabase {
    keywords: BucketHashTable<String, u64>,
}

impl KeywordDatabase {
    /// Parses a database from `word,score` lines.
    ///
    /// Empty fields between commas are skipped, so `word,,5` is accepted and
    /// `,5` is not. Words are lower-cased; scores may be surrounded by
    /// whitespace. A word listed twice keeps its last score.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bucket_hash::spam::KeywordDatabase;
    /// #
    /// let db = KeywordDatabase::from_reader("Spam,10\nbuy,5\n".as_bytes()).unwrap();
    /// assert_eq!(db.len(), 2);
    /// assert_eq!(db.score_line("buy SPAM, buy"), 20);
    /// ```
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::parse(reader, Path::new("<reader>"))
    }

    /// Loads a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SpamError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let database = Self::parse(BufReader::new(file), path)?;
        debug!(
            "loaded {} keywords from {}",
            database.len(),
            path.display()
        );
        Ok(database)
    }

    fn parse<R: BufRead>(reader: R, path: &Path) -> Result<Self> {
        let mut words = Vec::new();
        let mut scores = Vec::new();

        for (index, line) in lossy_lines(reader).enumerate() {
            let line = line.map_err(|source| SpamError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let line_number = index + 1;

            let fields: Vec<&str> = line.split(',').filter(|f| !f.is_empty()).collect();
            let [word, score] = fields[..] else {
                return Err(SpamError::MalformedLine {
                    line: line_number,
                    content: line,
                });
            };

            let score = score
                .trim()
                .parse::<u64>()
                .map_err(|_| SpamError::InvalidScore {
                    line: line_number,
                    value: score.to_string(),
                })?;
            words.push(word.to_lowercase());
            scores.push(score);
        }

        Ok(Self {
            keywords: BucketHashTable::from_keys_values(words, scores)?,
        })
    }

    /// Returns the number of distinct keywords.
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Returns `true` if the database holds no keywords.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Returns the score of `word`, if it is a keyword.
    pub fn score_of(&self, word: &str) -> Option<u64> {
        self.keywords.get(&word.to_lowercase()).copied()
    }

    /// Scores a single line of text.
    pub fn score_line(&self, line: &str) -> u64 {
        let line = line.to_lowercase();
        self.keywords
            .iter()
            .map(|(word, score)| {
                let hits = line.match_indices(word.as_str()).count() as u64;
                score.saturating_mul(hits)
            })
            .fold(0, u64::saturating_add)
    }

    /// Scores every line read from `message`.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected, so
    /// any readable message can be scored.
    pub fn score_message<R: BufRead>(&self, message: R) -> std::io::Result<u64> {
        let mut total = 0u64;
        for line in lossy_lines(message) {
            total = total.saturating_add(self.score_line(&line?));
        }
        Ok(total)
    }
}

/// Splits `reader` into lines like [`BufRead::lines`], decoding each line
/// with [`String::from_utf8_lossy`] instead of failing on invalid UTF-8.
fn lossy_lines<R: BufRead>(reader: R) -> LossyLines<R> {
    LossyLines {
        reader,
        buf: Vec::new(),
    }
}

struct LossyLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = std::io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.ends_with(b"\n") {
                    self.buf.pop();
                    if self.buf.ends_with(b"\r") {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

/// Parses a non-negative integer threshold.
///
/// # Examples
///
/// ```rust
/// # use bucket_hash::spam::parse_threshold;
/// #
/// assert_eq!(parse_threshold("10").unwrap(), 10);
/// assert!(parse_threshold("-1").is_err());
/// assert!(parse_threshold("ten").is_err());
/// ```
pub fn parse_threshold(value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| SpamError::InvalidThreshold(value.to_string()))
}

/// Classification of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The score reached the threshold.
    Spam,
    /// The score stayed below the threshold.
    NotSpam,
}

impl Verdict {
    /// Classifies `score` against `threshold`.
    pub fn classify(score: u64, threshold: u64) -> Self {
        if score >= threshold {
            Verdict::Spam
        } else {
            Verdict::NotSpam
        }
    }

    /// Returns the label printed for this verdict.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Spam => "SPAM",
            Verdict::NotSpam => "NOT_SPAM",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores `message` against `database` and classifies it.
pub fn detect<R: BufRead>(database: &KeywordDatabase, message: R, threshold: u64) -> Result<Verdict> {
    classify_message(database, message, threshold, Path::new("<message>"))
}

fn classify_message<R: BufRead>(
    database: &KeywordDatabase,
    message: R,
    threshold: u64,
    path: &Path,
) -> Result<Verdict> {
    let score = database
        .score_message(message)
        .map_err(|source| SpamError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let verdict = Verdict::classify(score, threshold);
    info!(
        "{} scored {score} against threshold {threshold}: {verdict}",
        path.display()
    );
    Ok(verdict)
}

/// Runs the full detection pipeline on files.
///
/// Inputs are checked in order: both files exist, the threshold parses, the
/// database loads, then the message is scored.
pub fn run(database: &Path, message: &Path, threshold: &str) -> Result<Verdict> {
    for path in [database, message] {
        if !path.exists() {
            return Err(SpamError::MissingFile(path.to_path_buf()));
        }
    }
    let threshold = parse_threshold(threshold)?;
    let database = KeywordDatabase::open(database)?;

    let file = File::open(message).map_err(|source| SpamError::Io {
        path: message.to_path_buf(),
        source,
    })?;
    classify_message(&database, BufReader::new(file), threshold, message)
}
