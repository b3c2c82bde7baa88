//! Block prologue shared by every block after the module header.

use serde::Serialize;
use tracing::debug;

use crate::cursor::{extract_string, ByteCursor};
use crate::error::{DecodeError, Result};

/// Length of the NUL-padded block identifier.
pub const BLOCK_ID_LEN: usize = 16;

/// Size of a block prologue (identifier, version, size).
pub const CHUNK_HEADER_LEN: usize = BLOCK_ID_LEN + 8;

/// Block identifiers, in file order.
pub mod tags {
    pub const PARAMS: &str = "PARAMS";
    pub const INFO: &str = "INFO";
    pub const HEADER: &str = "HEADER";
    pub const INSTRUMENTS: &str = "INSTRUMENTS";
    pub const SEQUENCES: &str = "SEQUENCES";
    pub const FRAMES: &str = "FRAMES";
    pub const PATTERNS: &str = "PATTERNS";
    pub const DPCM_SAMPLES: &str = "DPCM SAMPLES";
}

/// Decoded block prologue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkHeader {
    /// Block identifier with NUL padding removed.
    pub id: String,
    /// Block layout version.
    pub version: u32,
    /// Declared payload size in bytes.
    pub size: u32,
    /// Absolute offset of the prologue.
    pub offset: usize,
}

impl ChunkHeader {
    /// Read a prologue without validating the identifier.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let offset = cursor.position();
        let id = extract_string(cursor.read_bytes(BLOCK_ID_LEN)?);
        let version = cursor.read_u32()?;
        let size = cursor.read_u32()?;
        Ok(Self {
            id,
            version,
            size,
            offset,
        })
    }
}

/// A block prologue together with a cursor over exactly its declared payload.
pub(crate) struct Block<'a> {
    pub header: ChunkHeader,
    pub body: ByteCursor<'a>,
}

impl<'a> Block<'a> {
    /// Read the next block, whatever its identifier.
    ///
    /// The parent cursor is left at the declared end of the block.
    pub fn read(cursor: &mut ByteCursor<'a>) -> Result<Self> {
        let header = ChunkHeader::read(cursor)?;
        Self::with_body(cursor, header)
    }

    /// Read the next block and require its identifier to be `tag`.
    pub fn expect(cursor: &mut ByteCursor<'a>, tag: &'static str) -> Result<Self> {
        let header = ChunkHeader::read(cursor)?;
        if header.id != tag {
            return Err(DecodeError::malformed(
                tag,
                header.offset,
                format!("expected block '{}', found '{}'", tag, header.id),
            ));
        }
        Self::with_body(cursor, header)
    }

    fn with_body(cursor: &mut ByteCursor<'a>, header: ChunkHeader) -> Result<Self> {
        let body = cursor.split_off(header.size as usize)?;
        debug!(
            id = %header.id,
            version = header.version,
            size = header.size,
            offset = header.offset,
            "block"
        );
        Ok(Self { header, body })
    }
}
