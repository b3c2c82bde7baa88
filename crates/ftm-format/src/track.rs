//! HEADER block: track name and per-channel layout.

use serde::Serialize;

use crate::chunk::{tags, Block};
use crate::context::DecodeContext;
use crate::cursor::{extract_string, ByteCursor};
use crate::error::{DecodeError, DecodeWarning, Result};

/// Most effect columns a channel can show (one base column plus three extra).
pub const MAX_EFFECT_COLUMNS: usize = 4;

/// Per-channel layout entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChannelInfo {
    /// Channel type identifier.
    pub id: u8,
    /// Effect columns beyond the first (0-3).
    pub extra_effect_columns: u8,
}

impl ChannelInfo {
    /// Total effect columns stored per row on this channel.
    pub fn effect_columns(&self) -> usize {
        1 + self.extra_effect_columns as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackHeader {
    pub version: u32,
    pub track_count: u8,
    pub name: String,
    /// One entry per channel, in channel order.
    pub channels: Vec<ChannelInfo>,
}

impl TrackHeader {
    pub(crate) fn decode(cursor: &mut ByteCursor<'_>, ctx: &mut DecodeContext) -> Result<Self> {
        let Block { header, mut body } = Block::expect(cursor, tags::HEADER)?;
        let channel_count = ctx.channel_count();

        // The name fills whatever the track count and the two channel arrays leave.
        let fixed = 1 + 2 * channel_count;
        let name_len = (header.size as usize).checked_sub(fixed).ok_or_else(|| {
            DecodeError::malformed(
                tags::HEADER,
                header.offset,
                format!(
                    "block size {} smaller than the {} fixed bytes for {} channels",
                    header.size, fixed, channel_count
                ),
            )
        })?;

        let track_count = body.read_u8()?;
        let name = extract_string(body.read_bytes(name_len)?);

        let mut channels: Vec<ChannelInfo> = (0..channel_count)
            .map(|channel| ChannelInfo {
                id: channel as u8,
                extra_effect_columns: 0,
            })
            .collect();

        if track_count > 1 {
            ctx.warn(DecodeWarning::MultiTrackUnsupported {
                tracks: track_count,
            });
        } else {
            for channel in channels.iter_mut() {
                channel.id = body.read_u8()?;
            }
            for channel in channels.iter_mut() {
                let offset = body.position();
                let extra = body.read_u8()?;
                if extra as usize >= MAX_EFFECT_COLUMNS {
                    return Err(DecodeError::malformed(
                        tags::HEADER,
                        offset,
                        format!(
                            "{} extra effect columns (maximum {})",
                            extra,
                            MAX_EFFECT_COLUMNS - 1
                        ),
                    ));
                }
                channel.extra_effect_columns = extra;
            }
        }

        ctx.set_effect_columns(channels.iter().map(|c| c.extra_effect_columns).collect());

        Ok(Self {
            version: header.version,
            track_count,
            name,
            channels,
        })
    }
}
