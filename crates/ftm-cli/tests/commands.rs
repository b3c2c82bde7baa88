//! Command tests against a small module written to a temp file.

use std::process::ExitCode;

use ftm_cli::commands::{self, frame::FrameDump, info::InfoSummary, query::QueryResult};
use ftm_format::{Note, SequenceKind, MODULE_MAGIC, MODULE_VERSION};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn block(tag: &str, version: u32, payload: &[u8]) -> Vec<u8> {
    let mut data = vec![0u8; 16];
    data[..tag.len()].copy_from_slice(tag.as_bytes());
    data.extend_from_slice(&version.to_le_bytes());
    data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    data.extend_from_slice(payload);
    data
}

fn words(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Two channels, one 2A03 instrument with a volume and an arpeggio curve,
/// two frames of 4 rows.
fn module_bytes() -> Vec<u8> {
    let mut out = MODULE_MAGIC.to_vec();
    out.extend_from_slice(&MODULE_VERSION.to_le_bytes());
    out.extend_from_slice(&[0, 0]);

    let mut params = vec![0u8];
    params.extend(words(&[2, 0, 0, 0, 4, 16, 0x15]));
    out.extend(block("PARAMS", 6, &params));

    let mut info = vec![0u8; 96];
    info[..5].copy_from_slice(b"Intro");
    info[32..37].copy_from_slice(b"Alice");
    out.extend(block("INFO", 1, &info));

    let mut header = vec![1u8];
    header.extend_from_slice(b"Song\0");
    header.extend_from_slice(&[0, 1, 1, 0]);
    out.extend(block("HEADER", 3, &header));

    let mut instruments = words(&[1, 0]);
    instruments.push(1);
    instruments.extend(words(&[2]));
    instruments.extend_from_slice(&[1, 0, 1, 0]);
    for _ in 0..96 {
        instruments.extend_from_slice(&[0, 0, 0xFF]);
    }
    instruments.extend(words(&[4]));
    instruments.extend_from_slice(b"Lead");
    out.extend(block("INSTRUMENTS", 6, &instruments));

    let mut sequences = words(&[2]);
    sequences.extend(words(&[0, 0]));
    sequences.push(3);
    sequences.extend(0i32.to_le_bytes());
    sequences.extend_from_slice(&[15, 10, 5]);
    sequences.extend(words(&[0, 1]));
    sequences.push(2);
    sequences.extend((-1i32).to_le_bytes());
    sequences.extend_from_slice(&[0, 12]);
    sequences.extend((-1i32).to_le_bytes());
    sequences.extend(words(&[0]));
    sequences.extend((-1i32).to_le_bytes());
    sequences.extend(words(&[0]));
    out.extend(block("SEQUENCES", 6, &sequences));

    let mut frames = words(&[2, 6, 150, 4]);
    frames.extend_from_slice(&[0, 0, 1, 0]);
    out.extend(block("FRAMES", 3, &frames));

    // Channel 0 has one extra effect column, so its events are 8 bytes.
    let mut patterns = words(&[0, 0, 0, 1, 0]);
    patterns.extend_from_slice(&[1, 4, 0, 15, 0x0F, 0x06, 0, 0]);
    patterns.extend(words(&[0, 0, 1, 1, 2]));
    patterns.extend_from_slice(&[13, 0, 64, 16, 0, 0, 0, 0]);
    patterns.extend(words(&[0, 1, 0, 1, 3]));
    patterns.extend_from_slice(&[8, 3, 64, 16, 0, 0]);
    out.extend(block("PATTERNS", 4, &patterns));

    out.extend_from_slice(b"END");
    out
}

/// Exit codes only compare through their debug form.
fn code(exit: ExitCode) -> String {
    format!("{:?}", exit)
}

fn write_module(dir: &TempDir) -> String {
    let path = dir.path().join("song.ftm");
    std::fs::write(&path, module_bytes()).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_load_and_summarize() {
    let dir = TempDir::new().unwrap();
    let path = write_module(&dir);
    let module = commands::load_module(&path).unwrap();
    assert!(module.warnings.is_empty(), "{:?}", module.warnings);

    let summary = InfoSummary::from(&module);
    assert_eq!(summary.title, "Intro");
    assert_eq!(summary.author, "Alice");
    assert_eq!(summary.channels, 2);
    assert_eq!(summary.effect_columns, vec![1, 0]);
    assert_eq!(summary.frames, 2);
    assert_eq!(summary.patterns, 3);
    assert_eq!(summary.sequences, 2);
    assert_eq!(summary.instruments.len(), 1);
    assert_eq!(summary.instruments[0].name, "Lead");
}

#[test]
fn test_frame_dump() {
    let dir = TempDir::new().unwrap();
    let module = commands::load_module(&write_module(&dir)).unwrap();

    let dump = FrameDump::collect(&module, 1).unwrap();
    assert_eq!(dump.patterns, vec![1, 0]);
    assert_eq!(dump.rows.len(), 4);
    assert_eq!(dump.rows[2][0].note(), Note::Release);
    assert_eq!(dump.rows[3][1].note(), Note::Pitch(7));
    assert!(FrameDump::collect(&module, 2).is_none());
}

#[test]
fn test_query_resolves_curves() {
    let dir = TempDir::new().unwrap();
    let module = commands::load_module(&write_module(&dir)).unwrap();

    let result = QueryResult::resolve(&module, 0, 0, 0);
    assert_eq!(result.note, Note::Pitch(0));
    assert_eq!(result.display, "C-4 00 F 0F06 ... ... ...");
    let kinds: Vec<_> = result.curves.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![SequenceKind::Volume, SequenceKind::Arpeggio]);
    assert_eq!(result.curves[0].sequence.values, vec![15, 10, 5]);

    assert!(QueryResult::resolve(&module, 5, 0, 0).cell.is_empty());
}

#[test]
fn test_sequence_listing() {
    let dir = TempDir::new().unwrap();
    let module = commands::load_module(&write_module(&dir)).unwrap();

    let sequences = commands::sequences::collect(&module);
    assert_eq!(sequences.len(), 2);
    assert_eq!(sequences[0].kind, SequenceKind::Volume);
    assert_eq!(sequences[0].loop_point, Some(0));
    assert_eq!(sequences[1].values, vec![0, 12]);
}

#[test]
fn test_commands_succeed() {
    let dir = TempDir::new().unwrap();
    let path = write_module(&dir);
    for json in [false, true] {
        let success = code(ExitCode::SUCCESS);
        assert_eq!(code(commands::info::run(&path, json).unwrap()), success);
        assert_eq!(code(commands::sequences::run(&path, json).unwrap()), success);
        assert_eq!(code(commands::query::run(&path, 0, 0, 0, json).unwrap()), success);
        assert_eq!(code(commands::frame::run(&path, 0, json).unwrap()), success);
    }
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.ftm");
    let err = commands::load_module(&path.to_string_lossy()).unwrap_err();
    assert!(err.to_string().contains("Failed to read module file"));
    assert_eq!(
        code(commands::info::run(&path.to_string_lossy(), true).unwrap()),
        code(ExitCode::from(1))
    );
}

#[test]
fn test_frame_out_of_range_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_module(&dir);
    assert!(commands::frame::run(&path, 9, false).is_err());
    assert_eq!(
        code(commands::frame::run(&path, 9, true).unwrap()),
        code(ExitCode::from(1))
    );
}

#[test]
fn test_corrupt_module_reports_decode_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.ftm");
    std::fs::write(&path, b"not a module").unwrap();
    let err = commands::load_module(&path.to_string_lossy()).unwrap_err();
    assert!(err.downcast_ref::<ftm_format::DecodeError>().is_some());
}
