//! FRAMES block: the song order.

use serde::Serialize;
use tracing::trace;

use crate::chunk::{tags, Block};
use crate::context::DecodeContext;
use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Result};

/// Longest pattern accepted, in rows.
pub const MAX_PATTERN_LENGTH: u32 = 256;

/// Pattern selectors for one frame, one per channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrameRow {
    patterns: Vec<u8>,
}

impl FrameRow {
    pub fn new(patterns: Vec<u8>) -> Self {
        Self { patterns }
    }

    /// Pattern index selected for `channel`.
    pub fn pattern(&self, channel: usize) -> Option<u8> {
        self.patterns.get(channel).copied()
    }

    pub fn patterns(&self) -> &[u8] {
        &self.patterns
    }
}

/// Decoded FRAMES block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameTable {
    pub version: u32,
    pub speed: u32,
    pub tempo: u32,
    /// Rows per pattern, shared by every pattern in the module.
    pub pattern_length: u32,
    pub frames: Vec<FrameRow>,
}

impl FrameTable {
    pub(crate) fn decode(cursor: &mut ByteCursor<'_>, ctx: &mut DecodeContext) -> Result<Self> {
        let Block { header, mut body } = Block::expect(cursor, tags::FRAMES)?;
        let frame_count = body.read_u32()?;
        let speed = body.read_u32()?;
        let tempo = body.read_u32()?;

        let length_offset = body.position();
        let pattern_length = body.read_u32()?;
        if pattern_length == 0 || pattern_length > MAX_PATTERN_LENGTH {
            return Err(DecodeError::malformed(
                tags::FRAMES,
                length_offset,
                format!(
                    "pattern length {} outside 1..={}",
                    pattern_length, MAX_PATTERN_LENGTH
                ),
            ));
        }

        let channel_count = ctx.channel_count();
        let mut frames = Vec::new();
        for _ in 0..frame_count {
            let selectors = body.read_bytes(channel_count)?;
            frames.push(FrameRow::new(selectors.to_vec()));
        }

        trace!(frame_count, speed, tempo, pattern_length, "frames");
        ctx.set_pattern_length(pattern_length);

        Ok(Self {
            version: header.version,
            speed,
            tempo,
            pattern_length,
            frames,
        })
    }

    pub fn get(&self, frame: usize) -> Option<&FrameRow> {
        self.frames.get(frame)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
