//! Drives the `marlos` binary through its interactive loop.

use std::io::Write as _;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn run_chat(workdir: &Path, input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_marlos"))
        .current_dir(workdir)
        .arg("--db")
        .arg(workdir.join("marlos.db"))
        .arg("chat")
        .env_remove("MARLOS_CONFIG")
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn marlos");

    child
        .stdin
        .take()
        .expect("piped stdin")
        .write_all(input.as_bytes())
        .expect("write input");

    child.wait_with_output().expect("wait for marlos")
}

#[test]
fn unknown_export_format_keeps_chatting() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run_chat(dir.path(), "/export docx\nhola que es dns\n/quit\n");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {stderr}");
    assert!(stderr.contains("Formato desconocido: docx"), "stderr: {stderr}");
    assert!(stdout.contains("DNS (Domain Name System)"), "stdout: {stdout}");
}

#[test]
fn export_command_writes_transcript() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run_chat(dir.path(), "hdd vs ssd\n/export json\n/quit\n");
    assert!(output.status.success());

    let raw = std::fs::read_to_string(dir.path().join("chat_smr.json")).expect("exported file");
    let records: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    assert_eq!(records.as_array().map(Vec::len), Some(2));
}
