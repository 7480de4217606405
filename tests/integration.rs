use predicates::prelude::*;
use serde_json::Value;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_dsl2term")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn parse_stdout(assert: &assert_cmd::assert::Assert) -> Value {
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    serde_json::from_str(&stdout).expect("output should be valid JSON")
}

// -- stdin mode --

#[test]
fn stdin_mode_produces_term_bank() {
    let input = std::fs::read_to_string(fixture_path("sample.dsl")).unwrap();

    let assert = cmd().write_stdin(input).assert().success();
    let bank = parse_stdout(&assert);

    let rows = bank.as_array().expect("top level should be an array");
    assert_eq!(rows.len(), 3);
}

#[test]
fn rows_have_the_fixed_shape() {
    let input = std::fs::read_to_string(fixture_path("sample.dsl")).unwrap();

    let assert = cmd().write_stdin(input).assert().success();
    let bank = parse_stdout(&assert);

    for row in bank.as_array().unwrap() {
        let fields = row.as_array().expect("each row is an array");
        assert_eq!(fields.len(), 8);
        assert!(fields[0].is_string(), "term");
        assert!(fields[1].is_string(), "reading");
        assert!(fields[2].is_string(), "definition tags");
        assert!(fields[3].is_string(), "rules");
        assert!(fields[4].is_i64(), "score");
        assert!(fields[5].is_array(), "definitions");
        assert_eq!(fields[5][0]["type"], "structured-content");
        assert!(fields[6].is_u64(), "sequence");
        assert!(fields[7].is_string(), "term tags");
    }
}

#[test]
fn homonyms_split_into_distinct_rows() {
    let input = std::fs::read_to_string(fixture_path("sample.dsl")).unwrap();

    let assert = cmd().write_stdin(input).assert().success();
    let bank = parse_stdout(&assert);
    let rows = bank.as_array().unwrap();

    // Both замок rows: display headword carries no homonym superscript,
    // the annotation lands in the term-tags field.
    assert_eq!(rows[0][0], "замок");
    assert_eq!(rows[0][7], "1");
    assert_eq!(rows[1][0], "замок");
    assert_eq!(rows[1][7], "2");
    // Stress-marked readings differ between the homonyms.
    assert_eq!(rows[0][1], "за\u{301}мок");
    assert_eq!(rows[1][1], "замо\u{301}к");
    // Distinct sequence ids.
    assert_ne!(rows[0][6], rows[1][6]);
}

#[test]
fn escaped_brackets_stay_literal() {
    let input = std::fs::read_to_string(fixture_path("sample.dsl")).unwrap();

    let assert = cmd().write_stdin(input).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("wrench [spanner]"));
}

#[test]
fn cross_reference_becomes_query_link() {
    let input = std::fs::read_to_string(fixture_path("sample.dsl")).unwrap();

    let assert = cmd().write_stdin(input).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("?query=ключ&wildcards=off"));
}

// -- error recovery --

#[test]
fn malformed_entry_dropped_others_survive() {
    let assert = cmd()
        .arg(fixture_path("broken.dsl"))
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: dropping entry \"плохо\""))
        .stderr(predicate::str::contains("2 entries converted, 1 dropped"));

    let bank = parse_stdout(&assert);
    let rows = bank.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "хорошо");
    assert_eq!(rows[1][0], "так себе");
}

#[test]
fn empty_input_exits_with_code_two() {
    cmd()
        .write_stdin("")
        .assert()
        .code(2)
        .stdout("[]\n")
        .stderr(predicate::str::contains("0 entries converted"));
}

#[test]
fn missing_input_file_fails() {
    cmd()
        .arg("does-not-exist.dsl")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read"));
}

// -- file mode --

#[test]
fn writes_output_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("term_bank_1.json");

    cmd()
        .arg(fixture_path("sample.dsl"))
        .args(["-o", out.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("3 entries converted, 0 dropped"));

    let written = std::fs::read_to_string(&out).unwrap();
    let bank: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(bank.as_array().unwrap().len(), 3);
}

#[test]
fn unwritable_output_fails() {
    cmd()
        .arg(fixture_path("sample.dsl"))
        .args(["-o", "/nonexistent-dir/out.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to write"));
}

#[test]
fn pretty_flag_indents_output() {
    let assert = cmd()
        .arg("--pretty")
        .arg(fixture_path("sample.dsl"))
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.starts_with("[\n"));
    // Still valid JSON with the same shape.
    let bank: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(bank.as_array().unwrap().len(), 3);
}

// -- round-trip fidelity --

#[test]
fn plain_text_content_round_trips() {
    let input = "дом\n\t[m1][p]м.[/p] house, home[/m]\n";

    let assert = cmd().write_stdin(input).assert().success();
    let bank = parse_stdout(&assert);

    let content = &bank[0][5][0]["content"];
    // Root div → m1 div → [p-span "м."] + " house, home"
    let paragraph = &content["content"][0];
    assert_eq!(paragraph["content"][0]["content"][0], "м.");
    assert_eq!(paragraph["content"][1], " house, home");
}
