use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @const: UTF-8 byte order mark
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Text decoded from disk with a record of what had to be repaired
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedText {
    /// Decoded content, BOM removed
    pub text: String,
    /// A leading UTF-8 BOM was stripped
    pub had_bom: bool,
    /// Invalid byte sequences were replaced with U+FFFD
    pub lossy: bool,
}

impl DecodedText {
    /// Decode raw bytes as UTF-8, stripping a BOM and replacing invalid sequences
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let (body, had_bom) = match bytes.strip_prefix(UTF8_BOM) {
            Some(rest) => (rest, true),
            None => (bytes, false),
        };

        match std::str::from_utf8(body) {
            Ok(text) => Self { text: text.to_string(), had_bom, lossy: false },
            Err(_) => Self {
                text: String::from_utf8_lossy(body).into_owned(),
                had_bom,
                lossy: true,
            },
        }
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Output path with the input's stem and a new extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        extension: &str,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(extension.trim_start_matches('.'));

        output_dir.as_ref().join(output_filename)
    }

    /// Find files with a specific extension in a directory.
    ///
    /// Only the top level is scanned unless `recursive` is set. Directories
    /// named `skip_dir` are never entered.
    pub fn find_files<P: AsRef<Path>>(
        dir: P,
        extension: &str,
        recursive: bool,
        skip_dir: Option<&str>,
    ) -> Result<Vec<PathBuf>> {
        let extension = extension.trim_start_matches('.');
        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut result = Vec::new();

        let walker = WalkDir::new(dir.as_ref())
            .follow_links(true)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || skip_dir.is_none_or(|skip| entry.file_name() != skip)
            });

        for entry in walker {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
            {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Read a file, tolerating a BOM and undecodable bytes
    pub fn read_lossy<P: AsRef<Path>>(path: P) -> Result<DecodedText> {
        let bytes = fs::read(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))?;
        Ok(DecodedText::from_bytes(&bytes))
    }

    /// Write a string to a file, replacing any previous content
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
