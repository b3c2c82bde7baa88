//! Byte fixtures shared by the unit tests.

use crate::chunk::BLOCK_ID_LEN;
use crate::context::DecodeContext;

/// Encode a block: 16-byte padded tag, version, payload size, payload.
pub(crate) fn block(tag: &str, version: u32, payload: &[u8]) -> Vec<u8> {
    let mut data = vec![0u8; BLOCK_ID_LEN];
    data[..tag.len()].copy_from_slice(tag.as_bytes());
    data.extend_from_slice(&version.to_le_bytes());
    data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    data.extend_from_slice(payload);
    data
}

/// Context as it stands after PARAMS and HEADER for the given effect columns.
pub(crate) fn context_with_columns(columns: &[u8]) -> DecodeContext {
    let mut ctx = DecodeContext::new();
    ctx.set_channel_count(columns.len());
    ctx.set_effect_columns(columns.to_vec());
    ctx
}
