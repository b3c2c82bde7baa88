//! Whole-module decoding.

use serde::Serialize;
use tracing::{debug, info};

use crate::chunk::{tags, Block};
use crate::context::DecodeContext;
use crate::cursor::ByteCursor;
use crate::dpcm::DpcmSamples;
use crate::error::{DecodeWarning, Result};
use crate::frame::FrameTable;
use crate::header::ModuleHeader;
use crate::info::Info;
use crate::instrument::InstrumentTable;
use crate::params::Params;
use crate::pattern::{Cell, PatternTable};
use crate::playback::PlaybackView;
use crate::sequence::SequenceTable;
use crate::track::TrackHeader;

/// Literal that ends the block list.
pub const END_MARKER: &[u8; 3] = b"END";

/// A fully decoded module. Immutable once returned by [`decode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    pub header: ModuleHeader,
    pub params: Params,
    pub info: Info,
    pub track: TrackHeader,
    pub instruments: InstrumentTable,
    pub sequences: SequenceTable,
    pub frames: FrameTable,
    pub patterns: PatternTable,
    /// Present when the module carries a trailing DPCM SAMPLES block.
    pub dpcm: Option<DpcmSamples>,
    /// Recoverable anomalies, in decode order.
    pub warnings: Vec<DecodeWarning>,
}

/// Decode a module from `buffer`.
///
/// Blocks are decoded strictly in file order, each stage configured by the
/// ones before it. The first fatal condition aborts the decode.
pub fn decode(buffer: &[u8]) -> Result<Module> {
    let mut cursor = ByteCursor::new(buffer);
    let mut ctx = DecodeContext::new();

    let header = ModuleHeader::read(&mut cursor)?;
    let params = Params::decode(&mut cursor, &mut ctx)?;
    let info = Info::decode(&mut cursor)?;
    let track = TrackHeader::decode(&mut cursor, &mut ctx)?;
    let instruments = InstrumentTable::decode(&mut cursor)?;
    let sequences = SequenceTable::decode(&mut cursor, &mut ctx)?;
    let frames = FrameTable::decode(&mut cursor, &mut ctx)?;
    let patterns = PatternTable::decode(&mut cursor, &mut ctx)?;

    let mut dpcm = None;
    while !cursor.is_empty() {
        if cursor.peek(END_MARKER.len()) == Some(&END_MARKER[..]) {
            debug!(offset = cursor.position(), "end marker");
            break;
        }
        let block = Block::read(&mut cursor)?;
        if block.header.id == tags::DPCM_SAMPLES {
            dpcm = Some(DpcmSamples::decode(block)?);
        } else {
            ctx.warn(DecodeWarning::UnknownBlock {
                id: block.header.id,
                offset: block.header.offset,
            });
        }
    }

    let warnings = ctx.into_warnings();
    info!(
        title = %info.title,
        channels = params.channel_count,
        frames = frames.len(),
        patterns = patterns.patterns.len(),
        warnings = warnings.len(),
        "decoded module"
    );

    Ok(Module {
        header,
        params,
        info,
        track,
        instruments,
        sequences,
        frames,
        patterns,
        dpcm,
        warnings,
    })
}

impl Module {
    pub fn channel_count(&self) -> usize {
        self.params.channel_count as usize
    }

    /// Extra effect columns configured for `channel`.
    pub fn effect_columns(&self, channel: usize) -> Option<u8> {
        self.track
            .channels
            .get(channel)
            .map(|info| info.extra_effect_columns)
    }

    /// Read-only frame/row/channel view of the song.
    pub fn playback(&self) -> PlaybackView<'_> {
        PlaybackView::new(
            &self.frames,
            &self.patterns,
            &self.instruments,
            &self.sequences,
            self.channel_count(),
        )
    }

    /// Cell played on `channel` at `row` of `frame`; empty when nothing is there.
    pub fn query(&self, frame: usize, row: usize, channel: usize) -> Cell {
        self.playback().cell(frame, row, channel)
    }
}
