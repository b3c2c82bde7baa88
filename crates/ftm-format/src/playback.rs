//! Read-only frame/row/channel lookups over a decoded module.

use crate::frame::FrameTable;
use crate::instrument::InstrumentTable;
use crate::pattern::{Cell, PatternTable};
use crate::sequence::{Sequence, SequenceKind, SequenceTable};

/// Joins the song order with the unpacked pattern grids.
///
/// Lookups never fail: a frame, row or channel outside the module, or a
/// selector naming a pattern the channel never defines, yields [`Cell::EMPTY`].
#[derive(Debug, Clone, Copy)]
pub struct PlaybackView<'a> {
    frames: &'a FrameTable,
    patterns: &'a PatternTable,
    instruments: &'a InstrumentTable,
    sequences: &'a SequenceTable,
    channel_count: usize,
}

impl<'a> PlaybackView<'a> {
    pub fn new(
        frames: &'a FrameTable,
        patterns: &'a PatternTable,
        instruments: &'a InstrumentTable,
        sequences: &'a SequenceTable,
        channel_count: usize,
    ) -> Self {
        Self {
            frames,
            patterns,
            instruments,
            sequences,
            channel_count,
        }
    }

    /// Number of frames in the song order.
    pub fn frames(&self) -> usize {
        self.frames.len()
    }

    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    pub fn pattern_length(&self) -> usize {
        self.frames.pattern_length as usize
    }

    /// Cell played on `channel` at `row` of `frame`.
    pub fn cell(&self, frame: usize, row: usize, channel: usize) -> Cell {
        self.frames
            .get(frame)
            .and_then(|selectors| selectors.pattern(channel))
            .and_then(|index| self.patterns.grid(channel, index as usize))
            .and_then(|grid| grid.cell(row))
            .copied()
            .unwrap_or(Cell::EMPTY)
    }

    /// Every channel's cell at `row` of `frame`, in channel order.
    pub fn row(&self, frame: usize, row: usize) -> Vec<Cell> {
        (0..self.channel_count)
            .map(|channel| self.cell(frame, row, channel))
            .collect()
    }

    /// Curve of `kind` bound to the instrument a cell plays.
    pub fn instrument_curve(&self, cell: &Cell, kind: SequenceKind) -> Option<&'a Sequence> {
        let instrument = self.instruments.get(u32::from(cell.instrument()?))?;
        let id = instrument.binding(kind)?;
        self.sequences.get(id as usize, kind)
    }
}
