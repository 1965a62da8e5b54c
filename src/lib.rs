/*!
 * # ass2lrc - ASS subtitles to LRC lyrics
 *
 * A Rust library and command-line tool that turns styled ASS subtitle
 * scripts into plain timestamped LRC lyric files.
 *
 * ## Features
 *
 * - Drop dialogue lines animated with `\move` or pinned with `\pos` into the
 *   upper half of the frame, relative to the script's `PlayResY`
 * - Extract dialogue text with override tags and line-break escapes removed
 * - Spread lines that share a start time so every LRC timestamp is unique
 * - Never overwrite an existing lyric file
 * - Batch processing of whole folders
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `line_filter`: Positional cleanup of ASS scripts
 * - `subtitle_processor`: Dialogue parsing and LRC output
 * - `timestamp_resolver`: Collision resolution and LRC timestamp formatting
 * - `file_utils`: File system operations
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `errors`: Skip reasons and error types
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod line_filter;
pub mod subtitle_processor;
pub mod timestamp_resolver;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, FileOutcome, FileReport, RunSummary};
pub use line_filter::{FilterOutcome, extract_resolution, filter_lines};
pub use subtitle_processor::{LyricCollection, TimeEntry, extract_entries};
pub use timestamp_resolver::{format_lrc_timestamp, resolve_collisions};
pub use errors::{AppError, FileSkip, LineSkip};
