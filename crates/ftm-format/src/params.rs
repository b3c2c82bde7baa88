//! PARAMS block: engine parameters and the channel count.

use bitflags::bitflags;
use serde::Serialize;

use crate::chunk::{tags, Block};
use crate::context::DecodeContext;
use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Result};

/// Largest channel count a module can declare (2A03 plus every expansion chip).
pub const MAX_CHANNELS: u32 = 28;

bitflags! {
    /// Expansion sound chips enabled for the module.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
    #[serde(transparent)]
    pub struct ExpansionChips: u8 {
        const VRC6 = 0x01;
        const VRC7 = 0x02;
        const FDS = 0x04;
        const MMC5 = 0x08;
        const N163 = 0x10;
        const S5B = 0x20;
    }
}

/// Target machine / refresh region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Machine {
    Ntsc,
    Pal,
    Other(u32),
}

impl From<u32> for Machine {
    fn from(value: u32) -> Self {
        match value {
            0 => Machine::Ntsc,
            1 => Machine::Pal,
            other => Machine::Other(other),
        }
    }
}

/// Vibrato table style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VibratoStyle {
    Old,
    New,
    Other(u32),
}

impl From<u32> for VibratoStyle {
    fn from(value: u32) -> Self {
        match value {
            0 => VibratoStyle::Old,
            1 => VibratoStyle::New,
            other => VibratoStyle::Other(other),
        }
    }
}

/// Decoded PARAMS block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Params {
    pub version: u32,
    pub expansion: ExpansionChips,
    /// Number of channels; sizes every per-channel array decoded later.
    pub channel_count: u32,
    pub machine: Machine,
    /// Engine refresh rate override (0 = machine default).
    pub engine_speed: u32,
    pub vibrato_style: VibratoStyle,
    pub first_highlight: u32,
    pub second_highlight: u32,
    /// Speed/tempo split point, present when the block is large enough to hold it.
    pub speed_split: Option<u32>,
}

impl Params {
    pub(crate) fn decode(cursor: &mut ByteCursor<'_>, ctx: &mut DecodeContext) -> Result<Self> {
        let Block { header, mut body } = Block::expect(cursor, tags::PARAMS)?;

        let expansion = ExpansionChips::from_bits_retain(body.read_u8()?);
        let channel_offset = body.position();
        let channel_count = body.read_u32()?;
        if !(1..=MAX_CHANNELS).contains(&channel_count) {
            return Err(DecodeError::malformed(
                tags::PARAMS,
                channel_offset,
                format!("channel count {} (must be 1-{})", channel_count, MAX_CHANNELS),
            ));
        }
        let machine = Machine::from(body.read_u32()?);
        let engine_speed = body.read_u32()?;
        let vibrato_style = VibratoStyle::from(body.read_u32()?);
        let first_highlight = body.read_u32()?;
        let second_highlight = body.read_u32()?;
        let speed_split = if body.remaining() >= 4 {
            Some(body.read_u32()?)
        } else {
            None
        };

        ctx.set_channel_count(channel_count as usize);

        Ok(Self {
            version: header.version,
            expansion,
            channel_count,
            machine,
            engine_speed,
            vibrato_style,
            first_highlight,
            second_highlight,
            speed_split,
        })
    }
}
