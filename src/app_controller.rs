use anyhow::{Result, anyhow};
use log::{error, warn, info, debug};
use std::fmt;
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle};
use crate::app_config::Config;
use crate::errors::FileSkip;
use crate::file_utils::FileManager;
use crate::line_filter;
use crate::subtitle_processor::{LyricCollection, WriteStatus};

// @module: Application controller for ASS to LRC conversion

/// What happened to one input file
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Lyric file written
    Converted {
        /// Path of the new LRC file
        output: PathBuf,
        /// Number of lyric lines written
        entries: usize,
    },
    /// File left unconverted for an expected reason
    Skipped(FileSkip),
}

/// Per-file result handed back to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    /// Original subtitle file
    pub input: PathBuf,
    /// Where the filtered script was written, if the filter ran
    pub filtered_path: Option<PathBuf>,
    /// The filter removed at least one line
    pub filter_changed: bool,
    /// Conversion result
    pub outcome: FileOutcome,
}

impl FileReport {
    fn skipped(input: &Path, filtered_path: Option<PathBuf>, filter_changed: bool, reason: FileSkip) -> Self {
        Self {
            input: input.to_path_buf(),
            filtered_path,
            filter_changed,
            outcome: FileOutcome::Skipped(reason),
        }
    }
}

/// Totals for a run over one or more files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files picked up
    pub total: usize,
    /// Files whose filter pass removed lines
    pub modified: usize,
    /// Files converted to LRC
    pub converted: usize,
    /// Files without a usable PlayResY header
    pub missing_resolution: usize,
    /// Files without any parsable dialogue
    pub no_entries: usize,
    /// Files whose LRC already existed
    pub already_exists: usize,
    /// Files that hit an I/O error
    pub failed: usize,
}

impl RunSummary {
    /// Account for one processed file
    pub fn record(&mut self, report: &FileReport) {
        self.total += 1;
        if report.filter_changed {
            self.modified += 1;
        }
        match report.outcome {
            FileOutcome::Converted { .. } => self.converted += 1,
            FileOutcome::Skipped(FileSkip::MissingResolution) => self.missing_resolution += 1,
            FileOutcome::Skipped(FileSkip::NoEntries) => self.no_entries += 1,
            FileOutcome::Skipped(FileSkip::OutputExists) => self.already_exists += 1,
        }
    }

    /// Account for a file that failed with an error
    pub fn record_failure(&mut self) {
        self.total += 1;
        self.failed += 1;
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} subtitle file(s): {} filtered, {} converted, {} already converted, {} without PlayResY, {} without dialogue, {} errors",
            self.total,
            self.modified,
            self.converted,
            self.already_exists,
            self.missing_resolution,
            self.no_entries,
            self.failed
        )
    }
}

/// Main application controller for subtitle conversion
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Filter and convert one subtitle file.
    ///
    /// Expected skips come back inside the report; only I/O failures are errors.
    pub fn process_file(&self, input_file: &Path) -> Result<FileReport> {
        let file_name = Self::display_name(input_file);
        let parent = input_file.parent().unwrap_or(Path::new(""));

        let decoded = FileManager::read_lossy(input_file)?;
        if decoded.had_bom {
            debug!("{}: stripped UTF-8 byte order mark", file_name);
        }
        if decoded.lossy {
            warn!("{}: undecodable bytes replaced with U+FFFD", file_name);
        }

        let filtered = line_filter::filter_script(&decoded.text);
        if !filtered.applicable {
            warn!("{} not converted [{}]: no PlayResY header", file_name, FileSkip::MissingResolution.as_str());
            return Ok(FileReport::skipped(input_file, None, false, FileSkip::MissingResolution));
        }

        let filtered_path = parent.join(&self.config.filtered_dir).join(input_file.file_name().unwrap_or_default());
        FileManager::write_to_file(&filtered_path, &filtered.text)?;
        if filtered.changed {
            debug!("{}: removed {} positioned line(s)", file_name, filtered.removed);
        } else {
            info!("Unchanged: {}", file_name);
        }

        let collection = match LyricCollection::from_ass_string(input_file.to_path_buf(), &filtered.text) {
            Ok(collection) => collection,
            Err(reason) => {
                warn!("{} not converted [{}]: {}", file_name, reason.as_str(), reason);
                return Ok(FileReport::skipped(input_file, Some(filtered_path), filtered.changed, reason));
            }
        };
        debug!("Parsed {}", collection);

        let output_path = FileManager::generate_output_path(input_file, parent, &self.config.output_extension);
        match collection.write_to_lrc(&output_path)? {
            WriteStatus::Created => {
                info!("Success: {}", output_path.display());
                Ok(FileReport {
                    input: input_file.to_path_buf(),
                    filtered_path: Some(filtered_path),
                    filter_changed: filtered.changed,
                    outcome: FileOutcome::Converted {
                        output: output_path,
                        entries: collection.entries.len(),
                    },
                })
            }
            WriteStatus::AlreadyExists => {
                info!(
                    "{} not converted [{}]: {} already exists",
                    file_name,
                    FileSkip::OutputExists.as_str(),
                    output_path.display()
                );
                Ok(FileReport::skipped(
                    input_file,
                    Some(filtered_path),
                    filtered.changed,
                    FileSkip::OutputExists,
                ))
            }
        }
    }

    /// Run the workflow on a single subtitle file
    pub fn run(&self, input_file: &Path) -> Result<RunSummary> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let mut summary = RunSummary::default();
        let report = self.process_file(input_file)?;
        summary.record(&report);
        Ok(summary)
    }

    /// Run the workflow in folder mode, processing every subtitle file found.
    /// One file failing never stops the others.
    pub fn run_folder(&self, input_dir: &Path) -> Result<RunSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_files(
            input_dir,
            &self.config.input_extension,
            self.config.recursive,
            Some(&self.config.filtered_dir),
        )?;

        let mut summary = RunSummary::default();
        if files.is_empty() {
            warn!("No .{} files found in {:?}", self.config.input_extension, input_dir);
            return Ok(summary);
        }

        let folder_pb = ProgressBar::new(files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));

        for file in &files {
            folder_pb.set_message(format!("Processing: {}", Self::display_name(file)));

            match folder_pb.suspend(|| self.process_file(file)) {
                Ok(report) => summary.record(&report),
                Err(e) => {
                    error!("Error processing file {}: {:#}", Self::display_name(file), e);
                    summary.record_failure();
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_and_clear();

        info!("{} ({})", summary, Self::format_duration(start_time.elapsed()));
        Ok(summary)
    }

    fn display_name(path: &Path) -> String {
        path.file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string())
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
