/*!
 * Timestamp collision resolution for lyric entries.
 *
 * LRC players show one line per timestamp, so dialogue lines that start at
 * the same instant must be spread out. Each collision group is spread evenly
 * over the gap up to the next distinct timestamp, or stepped forward by a
 * fixed 50 ms when there is no usable gap.
 */

use log::debug;

use crate::subtitle_processor::TimeEntry;

/// Two start times closer than this are the same instant
pub const COLLISION_TOLERANCE: f64 = 1e-9;

/// A gap at or below this is too small to subdivide
pub const MIN_SPAN: f64 = 1e-6;

/// Step used when a group cannot be spread over a gap
pub const FALLBACK_STEP: f64 = 0.05;

fn sort_by_time(entries: &mut [TimeEntry]) {
    // sort_by is stable, equal times keep their input order
    entries.sort_by(|a, b| a.total_seconds.total_cmp(&b.total_seconds));
}

/// End index (exclusive) of the collision group starting at `start`
fn group_end(entries: &[TimeEntry], start: usize) -> usize {
    let base = entries[start].total_seconds;
    entries[start + 1..]
        .iter()
        .position(|e| (e.total_seconds - base).abs() >= COLLISION_TOLERANCE)
        .map_or(entries.len(), |offset| start + 1 + offset)
}

/// Step between members of a group of `len` entries at `current`
fn group_step(current: f64, next: Option<f64>, len: usize) -> f64 {
    match next {
        Some(next) if next - current > MIN_SPAN => (next - current) / len as f64,
        _ => FALLBACK_STEP,
    }
}

/// Sort entries by time and spread out entries that share a start time.
///
/// Relative input order inside a collision group becomes output order.
/// Entries that never collide come back unchanged.
pub fn resolve_collisions(mut entries: Vec<TimeEntry>) -> Vec<TimeEntry> {
    sort_by_time(&mut entries);

    let mut resolved = Vec::with_capacity(entries.len());
    let mut i = 0;

    while i < entries.len() {
        let j = group_end(&entries, i);
        let group = &entries[i..j];

        if group.len() == 1 {
            resolved.push(group[0].clone());
            i = j;
            continue;
        }

        let current = group[0].total_seconds;
        let next = entries.get(j).map(|e| e.total_seconds);
        let step = group_step(current, next, group.len());
        debug!(
            "Spreading {} entries at {:.2}s with step {:.3}s",
            group.len(), current, step
        );

        resolved.extend(
            group
                .iter()
                .enumerate()
                .map(|(k, entry)| entry.retimed(current + step * k as f64)),
        );
        i = j;
    }

    // Guard against float noise at group boundaries
    sort_by_time(&mut resolved);
    resolved
}

/// Format seconds as an LRC timestamp `MM:SS.hh`.
///
/// Minutes are not wrapped at the hour. Hundredths round to nearest, ties to
/// even, and carry into seconds and minutes.
pub fn format_lrc_timestamp(total_seconds: f64) -> String {
    let mut minutes = (total_seconds / 60.0).floor() as u64;
    let mut seconds = (total_seconds % 60.0).floor() as u64;

    let fraction = total_seconds - (minutes * 60 + seconds) as f64;
    let mut hundredths = (fraction * 100.0).round_ties_even() as u64;

    if hundredths >= 100 {
        hundredths -= 100;
        seconds += 1;
    }
    if seconds >= 60 {
        seconds -= 60;
        minutes += 1;
    }

    format!("{:02}:{:02}.{:02}", minutes, seconds, hundredths)
}

/// One `[timestamp]text` line per entry, joined by `\n`
pub fn render_lrc(entries: &[TimeEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
