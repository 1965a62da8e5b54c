use std::fmt;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context};
use log::{debug, warn};
use crate::errors::{FileSkip, LineSkip};
use crate::timestamp_resolver;

// @module: ASS dialogue extraction and LRC output

// @const: Prefix of an ASS event line carrying dialogue
pub const DIALOGUE_MARKER: &str = "Dialogue:";

// @const: Number of comma-separated fields in a dialogue record
pub const DIALOGUE_FIELD_COUNT: usize = 10;

// @const: ASS start time, one or two fractional digits
static ASS_TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2})\.(\d{1,2})").unwrap()
});

// @const: Override block such as {\pos(1,2)\fs40}
static OVERRIDE_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{.*?\}").unwrap()
});

// @struct: One timed lyric line
#[derive(Debug, Clone, PartialEq)]
pub struct TimeEntry {
    // @field: Start time in seconds
    pub total_seconds: f64,

    // @field: Rendered LRC timestamp (MM:SS.hh)
    pub timestamp: String,

    // @field: Lyric text
    pub text: String,
}

impl TimeEntry {
    /// Creates an entry, deriving the timestamp text from the time
    pub fn new(total_seconds: f64, text: String) -> Self {
        TimeEntry {
            total_seconds,
            timestamp: timestamp_resolver::format_lrc_timestamp(total_seconds),
            text,
        }
    }

    /// Copy of this entry moved to another time, timestamp recomputed
    pub fn retimed(&self, total_seconds: f64) -> Self {
        Self::new(total_seconds, self.text.clone())
    }

    /// Parse an ASS timestamp (`H:MM:SS.cc` or `H:MM:SS.c`) into seconds
    pub fn parse_timestamp(timestamp: &str) -> Option<f64> {
        let caps = ASS_TIME_REGEX.captures(timestamp.trim())?;

        let hours: u64 = caps[1].parse().ok()?;
        let minutes: u64 = caps[2].parse().ok()?;
        let seconds: u64 = caps[3].parse().ok()?;
        // "5" means 50 hundredths
        let centis: u64 = format!("{:0<2}", &caps[4]).parse().ok()?;

        // Absurd hour counts overflow and are rejected like any bad time
        let whole = hours
            .checked_mul(3600)?
            .checked_add(minutes * 60 + seconds)?;

        Some(whole as f64 + centis as f64 / 100.0)
    }
}

impl fmt::Display for TimeEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}]{}", self.timestamp, self.text)
    }
}

/// The two fields of a dialogue record that matter for lyrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialogueLine<'a> {
    /// Raw start time field
    pub start: &'a str,
    /// Everything after the ninth comma
    pub payload: &'a str,
}

impl<'a> DialogueLine<'a> {
    /// Split a `Dialogue:` line into its fields.
    ///
    /// Returns `None` for lines that are not dialogue records. The text field
    /// may itself contain commas, so the line is split at most nine times.
    pub fn parse(line: &'a str) -> Option<Result<Self, LineSkip>> {
        if !line.starts_with(DIALOGUE_MARKER) {
            return None;
        }

        let fields: Vec<&str> = line.splitn(DIALOGUE_FIELD_COUNT, ',').collect();
        if fields.len() < DIALOGUE_FIELD_COUNT {
            return Some(Err(LineSkip::MalformedRecord { fields: fields.len() }));
        }

        Some(Ok(DialogueLine {
            start: fields[1].trim(),
            payload: fields[DIALOGUE_FIELD_COUNT - 1].trim(),
        }))
    }

    /// Turn the record into a lyric entry
    pub fn to_entry(&self) -> Result<TimeEntry, LineSkip> {
        let total_seconds = TimeEntry::parse_timestamp(self.start)
            .ok_or_else(|| LineSkip::InvalidTime(self.start.to_string()))?;

        let text = clean_ass_text(self.payload);
        if text.is_empty() {
            return Err(LineSkip::EmptyPayload);
        }

        Ok(TimeEntry::new(total_seconds, text))
    }
}

/// Strip override blocks and turn `\N` / `\n` breaks into spaces
pub fn clean_ass_text(text: &str) -> String {
    OVERRIDE_BLOCK_REGEX
        .replace_all(text, "")
        .replace("\\N", " ")
        .replace("\\n", " ")
        .trim()
        .to_string()
}

/// Entries parsed from a script, plus the dialogue lines that were skipped
#[derive(Debug, Default)]
pub struct ExtractReport {
    /// Parsed entries in input order
    pub entries: Vec<TimeEntry>,
    /// (1-based line number, reason) for every skipped dialogue line
    pub skipped: Vec<(usize, LineSkip)>,
}

/// Parse all dialogue records of a script in input order
pub fn extract_entries(content: &str) -> ExtractReport {
    let mut report = ExtractReport::default();

    for (index, line) in content.lines().enumerate() {
        let Some(record) = DialogueLine::parse(line) else {
            continue;
        };

        match record.and_then(|dialogue| dialogue.to_entry()) {
            Ok(entry) => report.entries.push(entry),
            Err(reason) => {
                debug!("Skipping dialogue at line {}: {}", index + 1, reason);
                report.skipped.push((index + 1, reason));
            }
        }
    }

    report
}

/// Whether a write created the file or found one already there
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// New file written
    Created,
    /// Destination existed, nothing written
    AlreadyExists,
}

/// Collection of lyric entries with metadata
#[derive(Debug)]
pub struct LyricCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// Resolved entries, ascending by time
    pub entries: Vec<TimeEntry>,

    /// Dialogue lines that did not produce an entry
    pub skipped_lines: usize,
}

impl LyricCollection {
    /// Create an empty collection
    pub fn new(source_file: PathBuf) -> Self {
        LyricCollection {
            source_file,
            entries: Vec::new(),
            skipped_lines: 0,
        }
    }

    /// Parse filtered ASS text and resolve timestamp collisions.
    ///
    /// Fails with `FileSkip::NoEntries` when no dialogue line survives.
    pub fn from_ass_string(source_file: PathBuf, content: &str) -> Result<Self, FileSkip> {
        let report = extract_entries(content);

        if report.entries.is_empty() {
            warn!("No dialogue entries found in {}", source_file.display());
            return Err(FileSkip::NoEntries);
        }

        let mut collection = Self::new(source_file);
        collection.skipped_lines = report.skipped.len();
        collection.entries = timestamp_resolver::resolve_collisions(report.entries);
        Ok(collection)
    }

    /// Render as LRC: one `[MM:SS.hh]text` line per entry, no trailing newline
    pub fn to_lrc_string(&self) -> String {
        timestamp_resolver::render_lrc(&self.entries)
    }

    /// Write the LRC file, refusing to touch an existing one.
    ///
    /// Existence check and creation are a single `create_new` open, so two
    /// writers racing for the same path cannot both succeed.
    pub fn write_to_lrc<P: AsRef<Path>>(&self, path: P) -> Result<WriteStatus> {
        let path = path.as_ref();

        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(WriteStatus::AlreadyExists),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to create lyric file: {}", path.display()));
            }
        };

        file.write_all(self.to_lrc_string().as_bytes())
            .with_context(|| format!("Failed to write lyric file: {}", path.display()))?;

        Ok(WriteStatus::Created)
    }
}

impl fmt::Display for LyricCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: {} lyric line(s), {} dialogue line(s) skipped",
            self.source_file.display(),
            self.entries.len(),
            self.skipped_lines
        )
    }
}
