use std::fs;
use std::time::{Duration, SystemTime};

use caresight::application::ports::PromptSource;
use caresight::infrastructure::prompts::{FilePromptSource, PromptPaths};

fn write(path: &std::path::Path, content: &str) {
    fs::write(path, content).unwrap();
}

/// Pushes the file's mtime forward so the cache sees a change even when the
/// test runs faster than the filesystem's timestamp resolution.
fn bump_mtime(path: &std::path::Path) {
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(2))
        .unwrap();
}

#[test]
fn given_prompt_files_when_loaded_then_placeholders_are_substituted() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir.path().join("analyze_system_prompt.md"),
        "Evaluate against:\n{{company_values}}\nand plan:\n{{education_plan}}",
    );
    write(&dir.path().join("merge_system_prompt.md"), "Merge them.");
    write(&dir.path().join("company_values.md"), "empathy first");
    write(&dir.path().join("education_plan.md"), "open questions");

    let source = FilePromptSource::new(PromptPaths::from_dir(dir.path()));
    let prompt = source.analysis_instruction().unwrap();

    assert!(prompt.contains("empathy first"));
    assert!(prompt.contains("open questions"));
    assert!(!prompt.contains("{{company_values}}"));
    assert!(!prompt.contains("{{education_plan}}"));
}

#[test]
fn given_edited_prompt_file_when_reloaded_then_new_content_served_without_restart() {
    let dir = tempfile::tempdir().unwrap();
    let analysis_path = dir.path().join("analyze_system_prompt.md");
    write(&analysis_path, "version one");
    write(&dir.path().join("merge_system_prompt.md"), "Merge them.");

    let source = FilePromptSource::new(PromptPaths::from_dir(dir.path()));
    assert_eq!(source.analysis_instruction().unwrap(), "version one");

    write(&analysis_path, "version two");
    bump_mtime(&analysis_path);

    assert_eq!(source.analysis_instruction().unwrap(), "version two");
}

#[test]
fn given_unchanged_prompt_file_when_loaded_twice_then_content_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("analyze_system_prompt.md"), "stable");
    write(&dir.path().join("merge_system_prompt.md"), "Merge them.");

    let source = FilePromptSource::new(PromptPaths::from_dir(dir.path()));

    assert_eq!(source.analysis_instruction().unwrap(), "stable");
    assert_eq!(source.analysis_instruction().unwrap(), "stable");
}

#[test]
fn given_missing_instruction_file_when_loaded_then_unavailable_error() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("merge_system_prompt.md"), "Merge them.");

    let source = FilePromptSource::new(PromptPaths::from_dir(dir.path()));

    assert!(source.analysis_instruction().is_err());
    assert!(source.merge_instruction().is_ok());
}

#[test]
fn given_missing_placeholder_file_when_loaded_then_placeholder_becomes_empty() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir.path().join("analyze_system_prompt.md"),
        "Values: {{company_values}} end",
    );
    write(&dir.path().join("merge_system_prompt.md"), "Merge them.");

    let source = FilePromptSource::new(PromptPaths::from_dir(dir.path()));
    let prompt = source.analysis_instruction().unwrap();

    assert_eq!(prompt, "Values:  end");
}
