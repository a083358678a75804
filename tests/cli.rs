// tests/cli.rs

mod common;

use assert_cmd::prelude::*;
use common::{create_file, sential_cmd};
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_dry_run_ranks_files_by_category() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    create_file(temp.path(), "README.md", "# Demo")?;
    create_file(temp.path(), "docs/README.md", "# Docs")?;
    create_file(temp.path(), "pyproject.toml", "[project]")?;
    create_file(temp.path(), "app/main.py", "print('hi')")?;
    create_file(temp.path(), "app/models.py", "class User: pass")?;
    create_file(temp.path(), "logo.png", "not really a png")?;

    sential_cmd()
        .args(["--no-git", "--dry-run"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "--- Dry Run: Files ranked by significance ---",
        ))
        .stdout(predicate::str::contains("[context] (2)"))
        .stdout(predicate::str::contains("  1000  README.md"))
        .stdout(predicate::str::contains("   895  docs/README.md"))
        .stdout(predicate::str::contains("[manifest] (1)"))
        .stdout(predicate::str::contains("[signal] (1)"))
        .stdout(predicate::str::contains("    55  app/main.py"))
        .stdout(predicate::str::contains("[source] (1)"))
        .stdout(predicate::str::contains("1 unrelated files ignored"))
        .stdout(predicate::str::contains("context_file").not());

    Ok(())
}

#[test]
fn test_invalid_language_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    sential_cmd()
        .args(["--language", "cobol", "--dry-run"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--language"))
        .stderr(predicate::str::contains("cobol"));
    Ok(())
}

#[test]
fn test_zero_batch_size_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    sential_cmd()
        .args(["--batch-size", "0"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--batch-size"));
    Ok(())
}

#[test]
fn test_no_relevant_files_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    create_file(temp.path(), "notes.rtf", "hello")?;
    sential_cmd()
        .args(["--no-git", "--dry-run", "--language", "go"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No files relevant to 'go'"));
    Ok(())
}

#[test]
fn test_missing_tagger_keeps_context_records() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    create_file(temp.path(), "README.md", "# Demo")?;
    create_file(temp.path(), "lib/store.py", "class Store: pass")?;
    let missing = temp.path().join("no-such-ctags");

    sential_cmd()
        .args(["--no-git", "--summary", "--ctags"])
        .arg(&missing)
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""path":"README.md","type":"context_file""#))
        .stdout(predicate::str::contains("source_file").not())
        .stderr(predicate::str::contains("source symbols incomplete"));
    Ok(())
}

#[test]
fn test_strict_tagger_fails_the_run() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    create_file(temp.path(), "README.md", "# Demo")?;
    create_file(temp.path(), "lib/store.py", "class Store: pass")?;
    let missing = temp.path().join("no-such-ctags");

    sential_cmd()
        .args(["--no-git", "--strict-tagger", "--ctags"])
        .arg(&missing)
        .current_dir(temp.path())
        .assert()
        .code(2)
        .stdout(predicate::str::contains("context_file"))
        .stderr(predicate::str::contains("Failed to start tagging process"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_full_run_with_tagger_writes_all_categories() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let tools = tempdir()?;
    let ctags = common::install_fake_ctags(tools.path())?;
    create_file(temp.path(), "README.md", "# Demo")?;
    create_file(temp.path(), "requirements.txt", "flask")?;
    create_file(temp.path(), "app.py", "app = Flask(__name__)")?;
    create_file(temp.path(), "lib/store.py", "class Store: pass")?;
    let output = temp.path().join("out.jsonl");

    sential_cmd()
        .args(["--no-git", "--ctags"])
        .arg(&ctags)
        .arg("-o")
        .arg(&output)
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let text = std::fs::read_to_string(&output)?;
    let records: Vec<serde_json::Value> = text
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;
    let kinds: Vec<&str> = records.iter().filter_map(|r| r["type"].as_str()).collect();
    assert_eq!(
        kinds,
        vec!["context_file", "manifest_file", "signal_file", "source_file"]
    );
    assert_eq!(records[3]["path"], "lib/store.py");
    assert_eq!(records[3]["content"], "function entry");
    Ok(())
}

#[test]
fn test_chapter_reads_paths_in_given_order() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    create_file(temp.path(), "docs/b.md", "second chapter")?;
    create_file(temp.path(), "docs/a.md", "first chapter")?;

    sential_cmd()
        .args(["chapter", "docs/b.md", "docs/missing.md", "docs/a.md"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_match(
            r#"(?s)"path":"docs/b\.md","type":"chapter_file".*"path":"docs/a\.md","type":"chapter_file""#,
        )?);
    Ok(())
}

#[test]
fn test_chapter_conflicts_with_dry_run() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    sential_cmd()
        .args(["--dry-run", "chapter", "docs/a.md"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--dry-run"));
    Ok(())
}
