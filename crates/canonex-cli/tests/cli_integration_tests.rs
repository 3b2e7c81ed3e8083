//! CLI integration tests
//!
//! Each test runs the `canonex` binary against a fresh database in a
//! temporary directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const BATCH: &str = "schema_version: 0
examples:
  - text: hello there
    intent: greet
  - text: hi
    intent: greet
  - text: fly to paris
    intent: travel
    entities:
      - { entity: city, start: 7, end: 12 }
";

fn canonex(db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_canonex"))
        .args(args)
        .arg("--db")
        .arg(db)
        .env_remove("CANONEX_DB")
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn setup(temp_dir: &TempDir) -> PathBuf {
    let db = temp_dir.path().join("store.db");
    let batch = temp_dir.path().join("batch.yaml");
    fs::write(&batch, BATCH).unwrap();

    let output = canonex(&db, &["import", batch.to_str().unwrap()]);
    assert!(output.status.success(), "import failed: {}", stderr(&output));
    db
}

/// Ids in insertion order
fn ids(db: &Path) -> Vec<String> {
    let output = canonex(db, &["list", "--json"]);
    assert!(output.status.success());
    let examples: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    examples
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_import_seeds_first_example_per_intent() {
    // Given: A fresh database
    let temp_dir = TempDir::new().unwrap();

    // When: A batch is imported with the default seeding policy
    let db = setup(&temp_dir);

    // Then: One canonical example per intent is listed
    let output = canonex(&db, &["list", "--only-canonical", "--json"]);
    assert!(output.status.success());
    let listed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let texts: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["hello there", "fly to paris"]);
}

#[test]
fn test_import_without_seeding() {
    // Given: A fresh database and a batch file
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("store.db");
    let batch = temp_dir.path().join("batch.yaml");
    fs::write(&batch, BATCH).unwrap();

    // When: The batch is imported with --no-seed
    let output = canonex(&db, &["import", batch.to_str().unwrap(), "--no-seed"]);

    // Then: Nothing is canonical
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Imported 3 examples (0 marked canonical, 0 seeded"));
    let output = canonex(&db, &["list", "--only-canonical"]);
    assert!(stdout(&output).trim().is_empty());
}

#[test]
fn test_canonical_set_reports_displacement() {
    // Given: "hello there" is the seeded canonical example for greet
    let temp_dir = TempDir::new().unwrap();
    let db = setup(&temp_dir);
    let ids = ids(&db);

    // When: "hi" is marked canonical
    let output = canonex(&db, &["canonical", "set", &ids[1]]);

    // Then: The user is told the previous holder was unmarked
    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("The previous canonical example with the intent greet was unmarked."));
    assert!(out.contains("is canonical for intent:greet"));

    // And: The change survived the process exiting
    let output = canonex(&db, &["show", &ids[0], "--json"]);
    let shown: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(shown["example"]["canonical"], false);
    assert_eq!(shown["view"]["can_edit"], true);
}

#[test]
fn test_canonical_example_cannot_be_deleted() {
    // Given: A canonical example
    let temp_dir = TempDir::new().unwrap();
    let db = setup(&temp_dir);
    let ids = ids(&db);

    // When: Deleting it
    let output = canonex(&db, &["delete", &ids[0]]);

    // Then: The CLI fails and the example remains
    assert!(!output.status.success());
    assert!(stderr(&output).starts_with("Error:"));
    assert_eq!(self::ids(&db).len(), 3);

    // When: It is unmarked first
    let output = canonex(&db, &["canonical", "unset", &ids[0]]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("is not canonical"));

    // Then: Delete succeeds
    let output = canonex(&db, &["delete", &ids[0]]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(self::ids(&db).len(), 2);
}

#[test]
fn test_show_lists_tooltips_for_canonical_example() {
    // Given: The seeded travel example
    let temp_dir = TempDir::new().unwrap();
    let db = setup(&temp_dir);
    let ids = ids(&db);

    // When: It is shown
    let output = canonex(&db, &["show", &ids[2]]);

    // Then: The entity and every tooltip are printed
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("entity city=paris [7..12]"));
    assert!(out.contains(
        "This example is canonical for the intent travel and the entity city with value paris"
    ));
    assert!(out.contains("Cannot edit a canonical example. Unmark it first."));
    assert!(out.contains("Cannot delete a canonical example. Unmark it first."));
}

#[test]
fn test_update_rejected_on_canonical_and_allowed_on_plain() {
    // Given: A canonical and a plain example of intent greet
    let temp_dir = TempDir::new().unwrap();
    let db = setup(&temp_dir);
    let ids = ids(&db);

    // When/Then: Editing the canonical one fails
    let output = canonex(&db, &["update", &ids[0], "--text", "changed"]);
    assert!(!output.status.success());

    // When/Then: Editing the plain one succeeds
    let output = canonex(&db, &["update", &ids[1], "--intent", "smalltalk"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("smalltalk"));

    let output = canonex(&db, &["list", "--intent", "smalltalk"]);
    assert_eq!(stdout(&output).lines().count(), 1);
}

#[test]
fn test_update_without_fields_fails() {
    let temp_dir = TempDir::new().unwrap();
    let db = setup(&temp_dir);
    let ids = ids(&db);

    let output = canonex(&db, &["update", &ids[1]]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Nothing to update"));
}

#[test]
fn test_check_reports_counts() {
    // Given: An imported batch (2 intents + 1 entity key seeded)
    let temp_dir = TempDir::new().unwrap();
    let db = setup(&temp_dir);

    // When: check runs
    let output = canonex(&db, &["check"]);

    // Then: The store verifies
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "OK: 3 examples, 3 canonical keys");
}

#[test]
fn test_unknown_example_fails() {
    let temp_dir = TempDir::new().unwrap();
    let db = setup(&temp_dir);

    let output = canonex(&db, &["show", "no-such-id"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("no-such-id"));
}

#[test]
fn test_invalid_import_file_fails() {
    // Given: A file with an unsupported schema version
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("store.db");
    let batch = temp_dir.path().join("bad.json");
    fs::write(&batch, r#"{"schema_version": 7, "examples": []}"#).unwrap();

    // When: It is imported
    let output = canonex(&db, &["import", batch.to_str().unwrap()]);

    // Then: The CLI exits non-zero
    assert!(!output.status.success());
    assert!(stderr(&output).starts_with("Error:"));
}
