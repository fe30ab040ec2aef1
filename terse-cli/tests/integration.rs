use assert_cmd::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

const DOC_URI: &str = "https://example.org/people/doc.jsonld";

/// Helper to create a `terse` command that runs in an isolated temp directory.
fn terse_cmd(work_dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("terse");
    cmd.current_dir(work_dir.path());
    cmd.env("NO_COLOR", "1");
    cmd
}

fn write_doc(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

const PEOPLE: &str = r##"{
    "@context": {"ex": "http://example.org/ns#"},
    "@id": "#alice",
    "@type": "ex:Person",
    "ex:name": {"@value": "Alice", "@language": "en"},
    "ex:knows": {"@id": "#bob", "ex:name": "Bob"}
}"##;

// ============================================================================
// Happy path tests
// ============================================================================

#[test]
fn help_flag() {
    cargo_bin_cmd!("terse")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tree"))
        .stdout(predicate::str::contains("triples"))
        .stdout(predicate::str::contains("select"))
        .stdout(predicate::str::contains("context"));
}

#[test]
fn version_flag() {
    cargo_bin_cmd!("terse")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("terse"));
}

#[test]
fn triples_single_prefixed_resource() {
    let tmp = TempDir::new().unwrap();
    write_doc(
        &tmp,
        "a.jsonld",
        r#"{"@context": {"ex": "http://example.org/"}, "@id": "ex:a", "ex:name": "Alice"}"#,
    );
    terse_cmd(&tmp)
        .args(["triples", "a.jsonld"])
        .assert()
        .success()
        .stdout("http://example.org/a  http://example.org/name  {\"@value\":\"Alice\"}\n");
}

#[test]
fn tree_relative_to_document() {
    let tmp = TempDir::new().unwrap();
    write_doc(&tmp, "people.jsonld", PEOPLE);
    let output = terse_cmd(&tmp)
        .args([
            "tree",
            "people.jsonld",
            "--document-uri",
            DOC_URI,
            "--relative",
            "--no-array",
            "--raw-literals",
            "--indent",
            "0",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let tree: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tree["@id"], "#alice");
    assert_eq!(tree["http://example.org/ns#knows"]["@id"], "#bob");
    assert_eq!(tree["http://example.org/ns#knows"]["http://example.org/ns#name"], "Bob");
    assert_eq!(
        tree["http://example.org/ns#name"],
        serde_json::json!({"@value": "Alice", "@language": "en"})
    );
}

#[test]
fn tree_from_stdin_with_root() {
    let tmp = TempDir::new().unwrap();
    terse_cmd(&tmp)
        .args([
            "tree",
            "-",
            "--document-uri",
            DOC_URI,
            "--root",
            "https://example.org/people/doc.jsonld#bob",
            "--raw-literals",
        ])
        .write_stdin(PEOPLE)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"@id\": \"https://example.org/people/doc.jsonld#bob\""))
        .stdout(predicate::str::contains("@included"));
}

#[test]
fn select_literal_column() {
    let tmp = TempDir::new().unwrap();
    write_doc(&tmp, "people.jsonld", PEOPLE);
    terse_cmd(&tmp)
        .args([
            "select",
            "people.jsonld",
            "--document-uri",
            DOC_URI,
            "--literal",
            r#"{"@language": "en"}"#,
            "--column",
            "subject",
        ])
        .assert()
        .success()
        .stdout("\"https://example.org/people/doc.jsonld#alice\"\n");
}

#[test]
fn select_by_predicate_records() {
    let tmp = TempDir::new().unwrap();
    write_doc(&tmp, "people.jsonld", PEOPLE);
    terse_cmd(&tmp)
        .args([
            "select",
            "people.jsonld",
            "--document-uri",
            DOC_URI,
            "-p",
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#type",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#""object":{"@id":"http://example.org/ns#Person"}"#,
        ))
        .stdout(predicate::str::contains("\n").count(1));
}

#[test]
fn select_unknown_subject_prints_nothing() {
    let tmp = TempDir::new().unwrap();
    write_doc(&tmp, "people.jsonld", PEOPLE);
    terse_cmd(&tmp)
        .args(["select", "people.jsonld", "-s", "http://www.notfound"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn merge_two_files() {
    let tmp = TempDir::new().unwrap();
    write_doc(&tmp, "a.jsonld", r#"{"@id": "urn:a", "urn:p": 1}"#);
    write_doc(&tmp, "b.jsonld", r#"{"@id": "urn:a", "urn:p": [1, 2]}"#);
    terse_cmd(&tmp)
        .args(["triples", "a.jsonld", "b.jsonld"])
        .assert()
        .success()
        .stdout("urn:a  urn:p  {\"@value\":1}\nurn:a  urn:p  {\"@value\":2}\n");
}

#[test]
fn context_command() {
    let tmp = TempDir::new().unwrap();
    write_doc(&tmp, "people.jsonld", PEOPLE);
    let output = terse_cmd(&tmp)
        .args(["context", "people.jsonld", "--document-uri", DOC_URI])
        .output()
        .unwrap();
    assert!(output.status.success());
    let context: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        context,
        serde_json::json!({"@base": DOC_URI, "ex": "http://example.org/ns#"})
    );
}

#[test]
fn file_uri_is_default_base() {
    let tmp = TempDir::new().unwrap();
    write_doc(&tmp, "doc.jsonld", r##"{"@id": "#me", "urn:p": 1}"##);
    terse_cmd(&tmp)
        .args(["triples", "doc.jsonld"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("file:///"))
        .stdout(predicate::str::contains("doc.jsonld#me  urn:p"));
}

#[test]
fn tree_long_chain_moves_deep_nodes_to_included() {
    let tmp = TempDir::new().unwrap();
    let links: Vec<String> = (0..3000)
        .map(|i| format!(r#"{{"@id": "urn:n{i}", "urn:next": {{"@id": "urn:n{}"}}}}"#, i + 1))
        .collect();
    let output = terse_cmd(&tmp)
        .args(["tree", "-", "--nesting", "2", "--no-array", "--indent", "0"])
        .write_stdin(format!("[{}]", links.join(",")))
        .output()
        .unwrap();
    assert!(output.status.success());

    let tree: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tree["urn:next"]["urn:next"]["@id"], "urn:n2");
    assert_eq!(tree["urn:next"]["urn:next"]["urn:next"], serde_json::json!({"@id": "urn:n3"}));
    assert!(tree["@included"]
        .as_array()
        .unwrap()
        .iter()
        .any(|node| node["@id"] == "urn:n3" && node.get("urn:next").is_some()));
}

// ============================================================================
// Error tests
// ============================================================================

#[test]
fn missing_file_fails() {
    let tmp = TempDir::new().unwrap();
    terse_cmd(&tmp)
        .args(["triples", "nope.jsonld"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("nope.jsonld"));
}

#[test]
fn invalid_json_fails() {
    let tmp = TempDir::new().unwrap();
    write_doc(&tmp, "bad.jsonld", "{not json");
    terse_cmd(&tmp)
        .args(["triples", "bad.jsonld"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("JSON parse error"));
}

#[test]
fn nesting_too_deep_fails() {
    let tmp = TempDir::new().unwrap();
    write_doc(&tmp, "deep.jsonld", r#"{"urn:p": {"urn:p": {"urn:p": 1}}}"#);
    terse_cmd(&tmp)
        .args(["triples", "deep.jsonld", "--max-depth", "3"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Nested too deep"));
}

#[test]
fn unknown_root_fails() {
    let tmp = TempDir::new().unwrap();
    write_doc(&tmp, "people.jsonld", PEOPLE);
    terse_cmd(&tmp)
        .args(["tree", "people.jsonld", "--root", "urn:missing"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("urn:missing"));
}

#[test]
fn relative_without_uri_is_usage_error() {
    let tmp = TempDir::new().unwrap();
    terse_cmd(&tmp)
        .args(["tree", "-", "--relative"])
        .write_stdin(r#"{"@id": "urn:a"}"#)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--relative"));
}

#[test]
fn bad_literal_pattern_is_usage_error() {
    let tmp = TempDir::new().unwrap();
    write_doc(&tmp, "people.jsonld", PEOPLE);
    terse_cmd(&tmp)
        .args(["select", "people.jsonld", "--literal", "{oops"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn verbose_quiet_conflict() {
    cargo_bin_cmd!("terse")
        .args(["--verbose", "--quiet", "triples", "a.jsonld"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
