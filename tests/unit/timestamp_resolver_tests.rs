/*!
 * Tests for collision resolution and LRC timestamp formatting
 */

use ass2lrc::subtitle_processor::TimeEntry;
use ass2lrc::timestamp_resolver::{format_lrc_timestamp, render_lrc, resolve_collisions, FALLBACK_STEP};

fn entries(pairs: &[(f64, &str)]) -> Vec<TimeEntry> {
    pairs.iter()
        .map(|(seconds, text)| TimeEntry::new(*seconds, text.to_string()))
        .collect()
}

fn times(entries: &[TimeEntry]) -> Vec<f64> {
    entries.iter().map(|e| e.total_seconds).collect()
}

/// Three lines at 10s before a line at 11s split the second in thirds
#[test]
fn test_resolve_collisions_withThreeWayGroup_shouldSplitSpan() {
    let resolved = resolve_collisions(entries(&[(10.0, "A"), (10.0, "B"), (10.0, "C"), (11.0, "D")]));

    let expected = [10.0, 10.0 + 1.0 / 3.0, 10.0 + 2.0 / 3.0, 11.0];
    for (entry, want) in resolved.iter().zip(expected) {
        assert!((entry.total_seconds - want).abs() < 1e-9);
    }

    assert_eq!(
        render_lrc(&resolved),
        "[00:10.00]A\n[00:10.33]B\n[00:10.67]C\n[00:11.00]D"
    );
}

/// Spread groups are strictly increasing and stay below the next timestamp
#[test]
fn test_resolve_collisions_withFollowingGroup_shouldStayInsideSpan() {
    for size in 2..=12 {
        let mut input: Vec<(f64, &str)> = vec![(42.5, "x"); size];
        input.push((44.0, "next"));

        let resolved = resolve_collisions(entries(&input));
        let resolved_times = times(&resolved);

        assert_eq!(resolved_times[0], 42.5);
        assert!(resolved_times[size - 1] < 44.0);
        assert!(resolved_times.windows(2).all(|w| w[0] < w[1]), "size {}", size);
    }
}

/// A trailing group steps forward by 50 ms
#[test]
fn test_resolve_collisions_withTrailingGroup_shouldUseFixedStep() {
    let resolved = resolve_collisions(entries(&[(1.0, "a"), (90.0, "b"), (90.0, "c"), (90.0, "d")]));
    let resolved_times = times(&resolved);

    assert_eq!(resolved_times[0], 1.0);
    for pair in resolved_times[1..].windows(2) {
        assert!((pair[1] - pair[0] - FALLBACK_STEP).abs() < 1e-9);
    }

    let stamps: Vec<&str> = resolved.iter().map(|e| e.timestamp.as_str()).collect();
    assert_eq!(stamps, vec!["00:01.00", "01:30.00", "01:30.05", "01:30.10"]);
}

/// Equal times arriving out of order keep their input order
#[test]
fn test_resolve_collisions_withUnsortedInput_shouldSortAndKeepGroupOrder() {
    let resolved = resolve_collisions(entries(&[(5.0, "late"), (2.0, "first"), (2.0, "second"), (3.0, "mid")]));

    let texts: Vec<&str> = resolved.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second", "mid", "late"]);
    assert_eq!(resolved[1].timestamp, "00:02.50");
}

/// Distinct timestamps come back untouched
#[test]
fn test_resolve_collisions_withNoCollisions_shouldBeIdentity() {
    let input = entries(&[(0.5, "a"), (1.25, "b"), (61.0, "c"), (3600.99, "d")]);
    let resolved = resolve_collisions(input.clone());
    assert_eq!(resolved, input);

    let again = resolve_collisions(resolved.clone());
    assert_eq!(again, resolved);
}

/// Timestamps of moved entries are recomputed, not copied
#[test]
fn test_resolve_collisions_withGroup_shouldRecomputeTimestampText() {
    let resolved = resolve_collisions(entries(&[(59.0, "a"), (59.0, "b"), (60.0, "c")]));

    assert_eq!(resolved[0].timestamp, "00:59.00");
    assert_eq!(resolved[1].timestamp, "00:59.50");
    assert_eq!(resolved[2].timestamp, "01:00.00");
}

/// Empty input is fine
#[test]
fn test_resolve_collisions_withEmptyInput_shouldReturnEmpty() {
    assert!(resolve_collisions(Vec::new()).is_empty());
    assert_eq!(render_lrc(&[]), "");
}

/// Formatting pads every field and carries rounding overflow
#[test]
fn test_format_lrc_timestamp_withEdgeValues_shouldPadAndCarry() {
    assert_eq!(format_lrc_timestamp(0.0), "00:00.00");
    assert_eq!(format_lrc_timestamp(5.05), "00:05.05");
    assert_eq!(format_lrc_timestamp(119.996), "02:00.00");
    assert_eq!(format_lrc_timestamp(6000.0), "100:00.00");
}
