mod common;

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn dedup_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_deduplication"))
}

#[test]
fn test_cli_chunk_and_inspect() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source.bin");
    let manifest = temp.path().join("source.manifest");
    fs::write(&source, vec![0u8; 2000]).unwrap();

    // Chunk
    let output = dedup_cmd()
        .args([
            "chunk",
            source.to_str().unwrap(),
            "--average",
            "256",
            "--minimum",
            "64",
            "--maximum",
            "1024",
            "--output",
            manifest.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "hash=5f70bf18a086007016e948b04aed3b82103a36bea41755b6cddfaf10ace3c6ef offset=0 size=1024",
            "hash=116d7399ce18e417bb9d1586091987731f6b78e79edbea12349960da3b9269b2 offset=1024 size=976",
        ]
    );
    assert_eq!(fs::read(&manifest).unwrap().len(), 72);

    // Inspect
    let output = dedup_cmd()
        .args(["inspect", manifest.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let inspected = String::from_utf8(output.stdout).unwrap();
    assert!(inspected.starts_with(&stdout));
    assert!(inspected.ends_with("chunks=2 bytes=2000\n"));
}

#[test]
fn test_cli_chunk_default_sizes() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source.bin");
    fs::write(&source, common::lcg_data(1 << 20, 0xDEAD_BEEF)).unwrap();

    let output = dedup_cmd()
        .args(["chunk", source.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 14);
    assert!(stdout.lines().next().unwrap().ends_with("offset=0 size=167004"));
}

#[test]
fn test_cli_rejects_bad_parameters() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source.bin");
    fs::write(&source, b"hello").unwrap();

    let output = dedup_cmd()
        .args(["chunk", source.to_str().unwrap(), "--average", "255"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("AverageTooSmall(255)"), "{stderr}");
}

#[test]
fn test_cli_target_size() {
    let output = dedup_cmd()
        .args(["target-size", "--minimum", "64", "2000"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "1152\n");
}
