//! Error and warning types for module decoding.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type for decode operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Fatal decode failure.
///
/// Every variant carries the absolute byte offset at which the condition was
/// detected. A fatal error discards the whole module; there is no partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid module tag at offset {offset}: expected 'FamiTracker Module', got {found:?}")]
    InvalidMagic { offset: usize, found: String },
    #[error("unsupported module version 0x{version:04X} at offset {offset} (expected 0x{expected:04X})")]
    UnsupportedVersion {
        offset: usize,
        version: u16,
        expected: u16,
    },
    #[error("malformed {block} block at offset {offset}: {reason}")]
    MalformedBlock {
        block: &'static str,
        offset: usize,
        reason: String,
    },
    #[error("malformed instrument #{index} at offset {offset}: {reason}")]
    MalformedInstrument {
        index: usize,
        offset: usize,
        reason: String,
    },
    #[error("read of {wanted} bytes at offset {offset} runs past the end of the data ({available} available)")]
    OutOfBounds {
        offset: usize,
        wanted: usize,
        available: usize,
    },
}

impl DecodeError {
    /// Absolute byte offset where decoding stopped.
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::InvalidMagic { offset, .. }
            | DecodeError::UnsupportedVersion { offset, .. }
            | DecodeError::MalformedBlock { offset, .. }
            | DecodeError::MalformedInstrument { offset, .. }
            | DecodeError::OutOfBounds { offset, .. } => *offset,
        }
    }

    /// Stable error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            DecodeError::InvalidMagic { .. } => "FTM_E001",
            DecodeError::UnsupportedVersion { .. } => "FTM_E002",
            DecodeError::MalformedBlock { .. } => "FTM_E003",
            DecodeError::MalformedInstrument { .. } => "FTM_E004",
            DecodeError::OutOfBounds { .. } => "FTM_E005",
        }
    }

    pub(crate) fn malformed(block: &'static str, offset: usize, reason: impl Into<String>) -> Self {
        DecodeError::MalformedBlock {
            block,
            offset,
            reason: reason.into(),
        }
    }
}

/// Recoverable anomaly collected while decoding.
///
/// The offending record or field is skipped or defaulted and decoding continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum DecodeWarning {
    /// Sequence record whose kind tag is not one of the five curve kinds.
    UnknownSequenceKind { id: u32, kind: u32 },
    /// Second record for the same curve id and kind; the later one wins.
    DuplicateSequence { id: u32, kind: &'static str },
    /// Header declares more than one track; per-channel details left at defaults.
    MultiTrackUnsupported { tracks: u8 },
    /// Row event outside `[0, pattern_length)`; the row was dropped.
    RowOutOfRange {
        channel: u32,
        pattern: u32,
        row: u32,
        pattern_length: u32,
    },
    /// Pattern record for a track other than the first; decoded and discarded.
    ForeignTrackPattern {
        track: u32,
        channel: u32,
        pattern: u32,
    },
    /// Second record for the same (channel, pattern); rows were merged.
    DuplicatePattern { channel: u32, pattern: u32 },
    /// Trailing block with an unrecognised tag, skipped by its declared size.
    UnknownBlock { id: String, offset: usize },
}

impl DecodeWarning {
    /// Stable warning code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            DecodeWarning::UnknownSequenceKind { .. } => "FTM_W001",
            DecodeWarning::DuplicateSequence { .. } => "FTM_W002",
            DecodeWarning::MultiTrackUnsupported { .. } => "FTM_W003",
            DecodeWarning::RowOutOfRange { .. } => "FTM_W004",
            DecodeWarning::ForeignTrackPattern { .. } => "FTM_W005",
            DecodeWarning::DuplicatePattern { .. } => "FTM_W006",
            DecodeWarning::UnknownBlock { .. } => "FTM_W007",
        }
    }
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeWarning::UnknownSequenceKind { id, kind } => {
                write!(f, "Sequence {} has unknown kind {}; skipped", id, kind)
            }
            DecodeWarning::DuplicateSequence { id, kind } => {
                write!(f, "Sequence {} defines the {} curve twice", id, kind)
            }
            DecodeWarning::MultiTrackUnsupported { tracks } => {
                write!(
                    f,
                    "Module declares {} tracks; only single-track modules are supported",
                    tracks
                )
            }
            DecodeWarning::RowOutOfRange {
                channel,
                pattern,
                row,
                pattern_length,
            } => {
                write!(
                    f,
                    "Channel {} pattern {} row {} is outside pattern length {}; dropped",
                    channel, pattern, row, pattern_length
                )
            }
            DecodeWarning::ForeignTrackPattern {
                track,
                channel,
                pattern,
            } => {
                write!(
                    f,
                    "Pattern {} on channel {} belongs to track {}; ignored",
                    pattern, channel, track
                )
            }
            DecodeWarning::DuplicatePattern { channel, pattern } => {
                write!(
                    f,
                    "Channel {} pattern {} appears more than once; rows merged",
                    channel, pattern
                )
            }
            DecodeWarning::UnknownBlock { id, offset } => {
                write!(f, "Unknown block '{}' at offset {}; skipped", id, offset)
            }
        }
    }
}
