//! CLI integration tests for the MD2 commands

use assert_cmd::Command;
use predicates::prelude::*;

/// A minimal MD2 byte image: one skin, three vertices, one face, one
/// strip run, two frames
fn fixture_bytes() -> Vec<u8> {
    let frame_size: u32 = 40 + 3 * 4;
    let skin_offset: u32 = 68;
    let texcoord_offset = skin_offset + 64;
    let command_offset = texcoord_offset + 3 * 4;
    let face_offset = command_offset + 11 * 4;
    let frame_offset = face_offset + 12;
    let end_offset = frame_offset + 2 * frame_size;

    let mut buf = Vec::new();
    buf.extend_from_slice(b"IDP2");
    for word in [
        8u32,
        64,
        64,
        frame_size,
        1, // skins
        3, // vertices
        3, // texcoords
        1, // faces
        11, // command words
        2, // frames
        skin_offset,
        texcoord_offset,
        face_offset,
        frame_offset,
        command_offset,
        end_offset,
    ] {
        buf.extend_from_slice(&word.to_le_bytes());
    }

    let mut skin = [0u8; 64];
    skin[..8].copy_from_slice(b"test.pcx");
    buf.extend_from_slice(&skin);

    for (u, v) in [(0u16, 0u16), (32, 0), (0, 32)] {
        buf.extend_from_slice(&u.to_le_bytes());
        buf.extend_from_slice(&v.to_le_bytes());
    }

    let mut commands = vec![3i32];
    for i in 0..3 {
        commands.push(f32::to_bits(0.5) as i32);
        commands.push(f32::to_bits(0.5) as i32);
        commands.push(i);
    }
    commands.push(0);
    for word in commands {
        buf.extend_from_slice(&word.to_le_bytes());
    }

    for w in [0u16, 1, 2, 0, 1, 2] {
        buf.extend_from_slice(&w.to_le_bytes());
    }

    for frame in 0..2u32 {
        for s in [1.0f32, 1.0, 1.0] {
            buf.extend_from_slice(&s.to_le_bytes());
        }
        for t in [frame as f32, 0.0, 0.0] {
            buf.extend_from_slice(&t.to_le_bytes());
        }
        let mut name = [0u8; 16];
        let text = format!("frame{frame:02}");
        name[..text.len()].copy_from_slice(text.as_bytes());
        buf.extend_from_slice(&name);
        for v in [[0u8, 0, 0], [10, 0, 0], [0, 10, 0]] {
            buf.extend_from_slice(&v);
            buf.push(0);
        }
    }

    assert_eq!(buf.len(), end_offset as usize);
    buf
}

fn fixture_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("test.md2");
    std::fs::write(&path, fixture_bytes()).unwrap();
    path
}

#[test]
fn test_sequences_lists_table() {
    Command::cargo_bin("quake-rs")
        .unwrap()
        .args(["md2", "sequences"])
        .assert()
        .success()
        .stdout(predicate::str::contains("crouch_walk"))
        .stdout(predicate::str::contains("198"));
}

#[test]
fn test_info_prints_counts() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture_file(&dir);
    Command::cargo_bin("quake-rs")
        .unwrap()
        .args(["md2", "info"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Vertices per frame: 3"))
        .stdout(predicate::str::contains("test.pcx"));
}

#[test]
fn test_info_detailed_prints_frame_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture_file(&dir);
    Command::cargo_bin("quake-rs")
        .unwrap()
        .args(["md2", "info", "--detailed"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("frame01"));
}

#[test]
fn test_validate_accepts_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture_file(&dir);
    Command::cargo_bin("quake-rs")
        .unwrap()
        .args(["md2", "validate"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn test_resolve_stand_start() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture_file(&dir);
    Command::cargo_bin("quake-rs")
        .unwrap()
        .args(["md2", "resolve"])
        .arg(&path)
        .args(["--sequence", "stand", "--progress", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("start frame 0, end frame 1"));
}

#[test]
fn test_resolve_unknown_sequence_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture_file(&dir);
    Command::cargo_bin("quake-rs")
        .unwrap()
        .args(["md2", "resolve"])
        .arg(&path)
        .args(["--sequence", "moonwalk"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown sequence"));
}

#[test]
fn test_info_missing_file_fails() {
    Command::cargo_bin("quake-rs")
        .unwrap()
        .args(["md2", "info", "/nonexistent/model.md2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load"));
}

#[test]
fn test_truncated_file_reports_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cut.md2");
    let bytes = fixture_bytes();
    std::fs::write(&path, &bytes[..100]).unwrap();
    Command::cargo_bin("quake-rs")
        .unwrap()
        .args(["md2", "info"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Truncated skin name section"));
}
