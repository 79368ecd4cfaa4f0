use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

const GAME_KEY: u8 = 0x69;

fn block(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 8);
    out.extend_from_slice(tag);
    out.extend_from_slice(&(payload.len() as u32 + 8).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

fn container(tag: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
    block(tag, &children.concat())
}

/// One room holding an entry script and a named object with one verb.
fn sample_archive() -> Vec<u8> {
    let object = container(
        b"OBCD",
        &[block(b"OBNA", b"rubber chicken\0"), block(b"VERB", &[0x01])],
    );
    let room = container(b"ROOM", &[block(b"ENCD", &[0x02]), object]);
    container(b"LECF", &[container(b"LFLF", &[room])])
        .into_iter()
        .map(|b| b ^ GAME_KEY)
        .collect()
}

fn write_archive(dir: &Path, bytes: &[u8]) -> PathBuf {
    let path = dir.join("monkeyk.001");
    std::fs::write(&path, bytes).expect("write archive");
    path
}

#[cfg(unix)]
fn fake_descumm(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("descumm");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write fake descumm");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("make fake descumm executable");
    path
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_scumm-strings"))
        .args(args)
        .env_remove("DESCUMM")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run scumm-strings CLI")
}

#[test]
fn unsupported_version_fails_before_touching_the_file() {
    let output = run_cli(&["6", "/nonexistent/monkeyk.001"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("only SCUMM version 5 is supported"), "{stderr}");
    assert!(!stderr.contains("No such file"), "{stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn missing_file_is_an_io_error() {
    let output = run_cli(&["5", "/nonexistent/monkeyk.001"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("IO error:"), "{stderr}");
}

#[test]
fn wrong_signature_is_a_file_error() {
    let dir = TempDir::new().unwrap();
    let path = write_archive(dir.path(), b"RIFF\0\0\0\x08");
    let output = run_cli(&["5", &path.to_string_lossy()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("SCUMM file error:"), "{stderr}");
}

#[test]
fn missing_descumm_is_reported_as_tool_error() {
    let dir = TempDir::new().unwrap();
    let path = write_archive(dir.path(), &sample_archive());
    let missing = dir.path().join("no-such-descumm");
    let output = run_cli(&[
        "5",
        &path.to_string_lossy(),
        "--descumm",
        &missing.to_string_lossy(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Error calling descumm:"), "{stderr}");
    assert!(stderr.contains("not found"), "{stderr}");
}

#[cfg(unix)]
#[test]
fn failing_descumm_reports_captured_stderr() {
    let dir = TempDir::new().unwrap();
    let path = write_archive(dir.path(), &sample_archive());
    let tool = fake_descumm(dir.path(), "echo 'script is garbage' >&2; exit 1");
    let output = run_cli(&[
        "5",
        &path.to_string_lossy(),
        "--descumm",
        &tool.to_string_lossy(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("script is garbage"), "{stderr}");
    assert!(stderr.contains("non-zero result: 1"), "{stderr}");
    assert_eq!(stderr.trim_end().lines().count(), 1, "{stderr}");
}

#[cfg(unix)]
#[test]
fn text_report_matches_expected_layout() {
    let dir = TempDir::new().unwrap();
    let path = write_archive(dir.path(), &sample_archive());
    // Fake listing keyed on the staged block's tag.
    let tool = fake_descumm(
        dir.path(),
        r#"case "$(head -c 4 "$2")" in
  ENCD) printf '%s\n' '[0000] (14) print(255,[Text("Welcome to \x4Delee")]);' ;;
  VERB) printf '%s\n' '[0000] (D8) printEgo([Text("A rubber chicken with a pulley in the middle")]);' ;;
esac"#,
    );
    let output = run_cli(&[
        "5",
        &path.to_string_lossy(),
        "--descumm",
        &tool.to_string_lossy(),
    ]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).expect("ascii report");
    let expected = "\
***** ENCD SCRIPT AT: 00000018 *****
[String]
Welcome to Melee


***** OBJECT AT: 00000021 (rubber chicken) *****
[String]
A rubber chicken with a pulley in the middle


";
    assert_eq!(stdout, expected);
}

#[cfg(unix)]
#[test]
fn json_output_can_be_written_to_a_file() {
    let dir = TempDir::new().unwrap();
    let path = write_archive(dir.path(), &sample_archive());
    let tool = fake_descumm(dir.path(), r#"echo 'Text("x")'"#);
    let out_path = dir.path().join("strings.json");
    let output = run_cli(&[
        "5",
        &path.to_string_lossy(),
        "--descumm",
        &tool.to_string_lossy(),
        "--format",
        "json",
        "--blocks",
        "--output",
        &out_path.to_string_lossy(),
    ]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(output.stdout.is_empty());

    let json: Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).expect("valid JSON");
    assert_eq!(json["xor_key"], GAME_KEY);
    assert_eq!(json["scripts"][0]["tag"], "ENCD");
    assert_eq!(json["objects"][0]["name"], "rubber chicken");
    assert_eq!(json["objects"][0]["strings"][0]["text"], "x");
    let tags: Vec<&str> = json["blocks"]
        .as_array()
        .expect("blocks requested")
        .iter()
        .map(|b| b["tag"].as_str().unwrap())
        .collect();
    assert_eq!(tags, vec!["LECF", "LFLF", "ROOM", "ENCD", "OBCD", "OBNA", "VERB"]);
}
