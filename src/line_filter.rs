/*!
 * Positional cleanup of ASS scripts.
 *
 * Drops dialogue lines that are animated with `\move` or pinned with `\pos`
 * into the upper half of the frame. The vertical midpoint comes from the
 * script's `PlayResY` header, so a script without one cannot be filtered.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

// @const: Script resolution header, anchored per line
static PLAY_RES_Y_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*PlayResY[ \t]*:[ \t]*(\d+)[ \t]*\r?$").unwrap()
});

// @const: Animated move override
static MOVE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\\move\s*\(").unwrap()
});

// @const: Static position override, captures the raw x and y arguments
static POS_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\\pos\s*\(([^,()]*),([^()]*)\)").unwrap()
});

/// Result of running the filter over one script
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    /// Retained lines, terminators untouched
    pub text: String,
    /// Whether at least one line was removed
    pub changed: bool,
    /// False when the script had no usable resolution header
    pub applicable: bool,
    /// Number of removed lines
    pub removed: usize,
}

impl FilterOutcome {
    fn not_applicable(text: &str) -> Self {
        Self {
            text: text.to_string(),
            changed: false,
            applicable: false,
            removed: 0,
        }
    }
}

/// Why a line was dropped
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Exclusion {
    /// Line carries a `\move` animation
    Animated,
    /// Line is pinned above the vertical midpoint
    AboveMidpoint {
        /// Parsed y coordinate
        y: f64,
    },
}

/// Read the `PlayResY` header value, if present and numeric
pub fn extract_resolution(text: &str) -> Option<u64> {
    PLAY_RES_Y_REGEX
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

/// Decide whether a single line must be dropped for the given midpoint
pub fn exclusion_for_line(line: &str, midpoint: f64) -> Option<Exclusion> {
    if MOVE_TAG_REGEX.is_match(line) {
        return Some(Exclusion::Animated);
    }

    let caps = POS_TAG_REGEX.captures(line)?;
    // Non-numeric coordinates keep the line
    caps[1].trim().parse::<f64>().ok()?;
    let y: f64 = caps[2].trim().parse().ok()?;
    (y < midpoint).then_some(Exclusion::AboveMidpoint { y })
}

/// Remove animated and upper-half positioned lines.
///
/// `resolution` is the value of the script's `PlayResY` header. Without it
/// nothing is removed and the outcome is flagged as not applicable.
pub fn filter_lines(text: &str, resolution: Option<u64>) -> FilterOutcome {
    let Some(resolution) = resolution else {
        return FilterOutcome::not_applicable(text);
    };

    let midpoint = resolution as f64 / 2.0;
    let mut kept = String::with_capacity(text.len());
    let mut removed = 0;

    for (index, line) in text.split_inclusive('\n').enumerate() {
        match exclusion_for_line(line, midpoint) {
            Some(reason) => {
                debug!("Dropping line {} ({:?})", index + 1, reason);
                removed += 1;
            }
            None => kept.push_str(line),
        }
    }

    FilterOutcome {
        text: kept,
        changed: removed > 0,
        applicable: true,
        removed,
    }
}

/// Extract the resolution from the script itself, then filter it
pub fn filter_script(text: &str) -> FilterOutcome {
    filter_lines(text, extract_resolution(text))
}
