//! Module prologue validation.

use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Result};

/// Module identifier tag (not NUL-terminated).
pub const MODULE_MAGIC: &[u8; 18] = b"FamiTracker Module";

/// The one module version this decoder supports.
pub const MODULE_VERSION: u16 = 0x0440;

/// Size of the module prologue: tag, version, reserved word.
pub const MODULE_HEADER_LEN: usize = MODULE_MAGIC.len() + 4;

/// File prologue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleHeader {
    pub version: u16,
    pub reserved: u16,
}

impl ModuleHeader {
    /// Read and validate the prologue. Any mismatch is fatal.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let offset = cursor.position();
        let available = cursor.remaining().min(MODULE_MAGIC.len());
        let tag = cursor.peek(available).unwrap_or_default();
        if tag != &MODULE_MAGIC[..] {
            return Err(DecodeError::InvalidMagic {
                offset,
                found: String::from_utf8_lossy(tag).into_owned(),
            });
        }
        cursor.skip(MODULE_MAGIC.len())?;

        let version_offset = cursor.position();
        let version = cursor.read_u16()?;
        if version != MODULE_VERSION {
            return Err(DecodeError::UnsupportedVersion {
                offset: version_offset,
                version,
                expected: MODULE_VERSION,
            });
        }
        let reserved = cursor.read_u16()?;

        Ok(Self { version, reserved })
    }

    /// Quick check that `data` starts with the module tag.
    pub fn is_module(data: &[u8]) -> bool {
        data.starts_with(MODULE_MAGIC)
    }
}
