use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn c37118(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_c37118"))
        .args(args)
        .env("RUST_LOG", "error")
        .env_remove("C37118_IDCODE")
        .output()
        .expect("failed to run c37118")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn fixture_path(file_name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../core/tests/test_data")
        .join(file_name)
}

// Writes the concatenation of fixtures, with optional garbage in front, as hex text.
fn write_capture(name: &str, garbage: &str, files: &[&str]) -> PathBuf {
    let mut content = garbage.to_string();
    for file in files {
        content.push_str(&fs::read_to_string(fixture_path(file)).unwrap());
        content.push('\n');
    }
    let path = std::env::temp_dir().join(format!("c37118_cli_{}.hex", name));
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_crc_check_value() {
    // "123456789"
    let output = c37118(&["crc", "313233343536373839"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "0x29B1");
}

#[test]
fn test_crc_rejects_invalid_hex() {
    let output = c37118(&["crc", "XYZ"]);
    assert!(!output.status.success());
}

#[test]
fn test_command_frame() {
    let output = c37118(&["command", "start", "--idcode", "7734"]);
    assert!(output.status.success());

    let frame = hex::decode(stdout(&output)).unwrap();
    assert_eq!(frame.len(), 18);
    assert_eq!(&frame[..4], &[0xAA, 0x41, 0x00, 0x12]);
    assert_eq!(&frame[4..6], &7734u16.to_be_bytes());
    assert_eq!(&frame[14..16], &[0x00, 0x02]);
}

#[test]
fn test_command_idcode_from_env() {
    let output = Command::new(env!("CARGO_BIN_EXE_c37118"))
        .args(["command", "config2"])
        .env("RUST_LOG", "error")
        .env("C37118_IDCODE", "42")
        .output()
        .unwrap();
    assert!(output.status.success());

    let frame = hex::decode(stdout(&output)).unwrap();
    assert_eq!(&frame[4..6], &42u16.to_be_bytes());
    assert_eq!(&frame[14..16], &[0x00, 0x05]);
}

#[test]
fn test_decode_json_stream() {
    let path = write_capture(
        "json",
        "",
        &["config2_station1.bin", "data_station1.bin", "header_hello.bin"],
    );
    let output = c37118(&["decode", path.to_str().unwrap(), "--hex", "--json"]);
    assert!(output.status.success());

    let lines: Vec<serde_json::Value> = stdout(&output)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["idcode"], 1);
    assert_eq!(lines[0]["framesize"], 74);
    assert_eq!(lines[1]["fracsec"], 16_817);
    assert!(lines[1]["message"]["Data"].is_object());
    assert_eq!(lines[2]["message"]["Header"]["data"], serde_json::json!(b"hello"));

    let summary: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stderr).trim()).unwrap();
    assert_eq!(summary["frames"], 3);
    assert_eq!(summary["errors"], 0);
    fs::remove_file(path).unwrap();
}

#[test]
fn test_decode_resyncs_after_garbage() {
    let path = write_capture(
        "garbage",
        "00000000",
        &["config2_station1.bin", "data_station1.bin"],
    );
    let output = c37118(&["decode", path.to_str().unwrap(), "--hex"]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("Configuration Frame 2 idcode=1"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("frames: 2, errors: 1, skipped bytes: 4"));
    fs::remove_file(path).unwrap();
}

#[test]
fn test_decode_missing_file() {
    let output = c37118(&["decode", "/nonexistent/capture.bin"]);
    assert!(!output.status.success());
}
