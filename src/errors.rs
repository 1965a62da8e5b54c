/*!
 * Error types for the ass2lrc application.
 *
 * Expected conditions (a malformed dialogue line, a file without a
 * `PlayResY` header, an output that already exists) are plain values that
 * callers aggregate. Invalid configuration ends up in `AppError`; I/O
 * failures travel as `anyhow` errors with context attached.
 */

use thiserror::Error;

/// Reasons a single `Dialogue:` line produced no lyric entry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LineSkip {
    /// Fewer than 10 comma-separated fields
    #[error("malformed dialogue record: expected 10 fields, found {fields}")]
    MalformedRecord {
        /// Number of fields actually present
        fields: usize,
    },

    /// Start time does not look like `H:MM:SS.cc`
    #[error("unparseable start time: {0:?}")]
    InvalidTime(String),

    /// Nothing left after stripping tags and whitespace
    #[error("empty payload after tag cleanup")]
    EmptyPayload,
}

/// Reasons a whole file was not converted
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSkip {
    /// No usable `PlayResY` header, so the filter cannot run
    #[error("missing or non-numeric PlayResY header")]
    MissingResolution,

    /// Not a single dialogue line survived parsing
    #[error("no parsable dialogue entries")]
    NoEntries,

    /// The destination lyric file is already there
    #[error("output file already exists")]
    OutputExists,
}

impl FileSkip {
    /// Short machine-readable reason
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingResolution => "missing_resolution",
            Self::NoEntries => "no_entries",
            Self::OutputExists => "exists",
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
