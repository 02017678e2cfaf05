/*!
 * End-to-end tests for the split workflow: parse, classify, distribute, write
 */

use std::fs;
use anyhow::Result;
use rolesplit::app_config::{Config, OutputFormat};
use rolesplit::app_controller::Controller;
use rolesplit::output_writer::OUTPUT_DIR_NAME;
use crate::common;

/// Test the default end-to-end run on a representative script
#[test]
fn test_process_file_withDefaultConfig_shouldWritePerActorFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_script(&temp_dir.path().to_path_buf(), "Серия 01.ass")?;

    let controller = Controller::new_for_test()?;
    let report = controller.process_file(&source)?;

    assert!(report.is_clean());
    let output_dir = temp_dir.path().join(OUTPUT_DIR_NAME);
    assert!(output_dir.is_dir());

    let mut names: Vec<String> = fs::read_dir(&output_dir)?
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "Серия 01 - Актер 1 - (4).ass",
            "Серия 01 - Актер 2 - (4).ass",
            "Серия 01 - Надписи - (1).ass",
        ]
    );
    Ok(())
}

/// Test the SRT export path with the sign bucket forced to ASS
#[test]
fn test_process_file_withSrtConfig_shouldWriteSrtAndAssSigns() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_script(&temp_dir.path().to_path_buf(), "Серия 02.ass")?;

    let mut config = Config::default();
    config.output_format = OutputFormat::Srt;
    let controller = Controller::with_config(config)?;
    let report = controller.process_file(&source)?;

    assert!(report.is_clean());
    let output_dir = temp_dir.path().join(OUTPUT_DIR_NAME);
    assert!(output_dir.join("Серия 02 - Актер 1 - (4).srt").is_file());
    assert!(output_dir.join("Серия 02 - Надписи - (1).ass").is_file());

    // Guard entry protects the first real line
    let srt = fs::read_to_string(output_dir.join("Серия 02 - Актер 1 - (4).srt"))?;
    assert!(srt.starts_with(
        "1\n00:00:00,000 --> 00:00:01,000\n(Защита от удаления первого саба REAPER'ом!)\n\n2\n"
    ));
    Ok(())
}

/// Test that disabled group distribution produces the standalone bucket
#[test]
fn test_process_file_withGroupPolicyOff_shouldWriteStandaloneGroupFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_script(&temp_dir.path().to_path_buf(), "Серия 03.ass")?;

    let mut config = Config::default();
    config.distribute_group = false;
    let controller = Controller::with_config(config)?;
    controller.process_file(&source)?;

    let output_dir = temp_dir.path().join(OUTPUT_DIR_NAME);
    assert!(output_dir.join("Серия 03 - Гуры - (1).ass").is_file());
    assert!(output_dir.join("Серия 03 - Актер 1 - (3).ass").is_file());
    Ok(())
}

/// Test that the written ASS output parses again and preserves record lines
#[test]
fn test_process_file_roundTrip_shouldReparseCleanly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_script(&temp_dir.path().to_path_buf(), "Серия 04.ass")?;

    let controller = Controller::new_for_test()?;
    controller.process_file(&source)?;

    let written = temp_dir
        .path()
        .join(OUTPUT_DIR_NAME)
        .join("Серия 04 - Актер 1 - (4).ass");
    let reparsed = rolesplit::subtitle_processor::ScriptFile::parse_file(&written)?;

    assert_eq!(reparsed.events.len(), 4);
    assert_eq!(reparsed.headers, vec!["Title: Test Episode", "ScriptType: v4.00+"]);
    assert_eq!(reparsed.events[0].text, "Первая реплика");
    Ok(())
}

/// Test that a file without dialogue lines fails the whole run
#[test]
fn test_process_file_withNoDialogue_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "empty.ass",
        "[Script Info]\nTitle: Empty\n",
    )?;

    let controller = Controller::new_for_test()?;
    assert!(controller.process_file(&source).is_err());
    assert!(!temp_dir.path().join(OUTPUT_DIR_NAME).exists());
    Ok(())
}

/// Test that a missing input path is rejected before parsing
#[test]
fn test_process_file_withMissingFile_shouldFail() -> Result<()> {
    let controller = Controller::new_for_test()?;
    assert!(controller
        .process_file(std::path::Path::new("./no_such_file.ass"))
        .is_err());
    Ok(())
}

/// Test folder processing over several scripts
#[test]
fn test_run_withFolder_shouldProcessEveryScript() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_script(&dir, "one.ass")?;
    common::create_test_script(&dir, "two.ass")?;

    let controller = Controller::new_for_test()?;
    controller.run(temp_dir.path())?;

    let output_dir = temp_dir.path().join(OUTPUT_DIR_NAME);
    assert!(output_dir.join("one - Актер 1 - (4).ass").is_file());
    assert!(output_dir.join("two - Актер 1 - (4).ass").is_file());
    Ok(())
}
