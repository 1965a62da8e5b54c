/*!
 * End-to-end tests for filtering and converting subtitle files
 */

use std::fs;
use anyhow::Result;
use ass2lrc::app_config::Config;
use ass2lrc::app_controller::{Controller, FileOutcome};
use ass2lrc::errors::FileSkip;
use crate::common;

/// A full run filters the script, writes the intermediate and the lyrics
#[test]
fn test_process_file_withSampleScript_shouldWriteFilteredAndLrc() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_script(temp_dir.path(), "song.ass")?;
    let controller = Controller::with_config(Config::default())?;

    let report = controller.process_file(&input)?;

    let filtered_path = temp_dir.path().join("filtered").join("song.ass");
    let output_path = temp_dir.path().join("song.lrc");

    assert!(report.filter_changed);
    assert_eq!(report.filtered_path.as_deref(), Some(filtered_path.as_path()));
    assert_eq!(
        report.outcome,
        FileOutcome::Converted { output: output_path.clone(), entries: 4 }
    );

    let filtered = fs::read_to_string(&filtered_path)?;
    assert!(!filtered.contains("Credits"));
    assert!(!filtered.contains("Flying"));
    assert!(filtered.contains("Fourth"));

    assert_eq!(
        fs::read_to_string(&output_path)?,
        "[00:10.00]First\n[00:10.33]Second\n[00:10.67]Third\n[00:11.00]Fourth"
    );

    Ok(())
}

/// An existing lyric file is never touched
#[test]
fn test_process_file_withExistingOutput_shouldReportExistsAndKeepBytes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_script(temp_dir.path(), "song.ass")?;
    let output_path = common::create_test_file(temp_dir.path(), "song.lrc", "[00:00.00]hand made")?;
    let controller = Controller::with_config(Config::default())?;

    let report = controller.process_file(&input)?;

    assert_eq!(report.outcome, FileOutcome::Skipped(FileSkip::OutputExists));
    assert_eq!(fs::read_to_string(&output_path)?, "[00:00.00]hand made");

    Ok(())
}

/// Without PlayResY nothing is filtered, written or converted
#[test]
fn test_process_file_withoutResolution_shouldSkipEverything() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = common::ass_script(None, &[common::dialogue("0:00:01.00", "Hello")]);
    let input = common::create_test_file(temp_dir.path(), "nores.ass", &script)?;
    let controller = Controller::with_config(Config::default())?;

    let report = controller.process_file(&input)?;

    assert_eq!(report.outcome, FileOutcome::Skipped(FileSkip::MissingResolution));
    assert!(report.filtered_path.is_none());
    assert!(!temp_dir.path().join("filtered").exists());
    assert!(!temp_dir.path().join("nores.lrc").exists());

    Ok(())
}

/// A script whose dialogue is all filtered away produces no lyrics
#[test]
fn test_process_file_withOnlyFilteredDialogue_shouldReportNoEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = common::ass_script(Some(1080), &[common::dialogue("0:00:01.00", "{\\pos(10,10)}Sign")]);
    let input = common::create_test_file(temp_dir.path(), "signs.ass", &script)?;
    let controller = Controller::with_config(Config::default())?;

    let report = controller.process_file(&input)?;

    assert_eq!(report.outcome, FileOutcome::Skipped(FileSkip::NoEntries));
    assert!(report.filter_changed);
    assert!(!temp_dir.path().join("signs.lrc").exists());

    Ok(())
}

/// Folder mode aggregates every outcome and a second run converts nothing new
#[test]
fn test_run_folder_withMixedFiles_shouldAggregateSummary() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_script(root, "one.ass")?;
    common::create_test_file(
        root,
        "two.ass",
        &common::ass_script(Some(720), &[common::dialogue("0:00:02.00", "Plain")]),
    )?;
    common::create_test_file(root, "three.ass", &common::ass_script(None, &[]))?;
    common::create_test_file(root, "four.ass", &common::ass_script(Some(720), &[]))?;

    let controller = Controller::with_config(Config::default())?;

    let summary = controller.run_folder(root)?;
    assert_eq!(summary.total, 4);
    assert_eq!(summary.modified, 1);
    assert_eq!(summary.converted, 2);
    assert_eq!(summary.missing_resolution, 1);
    assert_eq!(summary.no_entries, 1);
    assert_eq!(summary.failed, 0);

    // The filtered copies are not picked up as inputs on the next run
    let summary = controller.run_folder(root)?;
    assert_eq!(summary.total, 4);
    assert_eq!(summary.converted, 0);
    assert_eq!(summary.already_exists, 2);

    Ok(())
}

/// A custom filtered directory name is honoured
#[test]
fn test_run_withCustomFilteredDir_shouldWriteThere() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_script(temp_dir.path(), "song.ass")?;

    let mut config = Config::default();
    config.filtered_dir = "cleaned".to_string();
    let controller = Controller::with_config(config)?;

    let summary = controller.run(&input)?;

    assert_eq!(summary.converted, 1);
    assert!(temp_dir.path().join("cleaned").join("song.ass").exists());
    assert!(!temp_dir.path().join("filtered").exists());

    Ok(())
}

/// Invalid configuration is rejected up front
#[test]
fn test_controller_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.filtered_dir = "../escape".to_string();
    assert!(Controller::with_config(config).is_err());
}

/// Missing inputs are errors
#[test]
fn test_run_withMissingPaths_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(Config::default())?;

    assert!(controller.run(&temp_dir.path().join("missing.ass")).is_err());
    assert!(controller.run_folder(&temp_dir.path().join("missing")).is_err());

    Ok(())
}
