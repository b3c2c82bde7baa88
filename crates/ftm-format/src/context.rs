//! Configuration carried from earlier blocks into later ones.

use tracing::warn;

use crate::error::DecodeWarning;

/// Bytes in a row event before its effect payload: row number excluded,
/// note, octave, instrument, volume, plus the always-present first effect column.
pub const ROW_EVENT_BASE_WIDTH: usize = 6;

/// Values decoded by one block that shape the layout of a later block,
/// plus the warnings collected so far.
///
/// PARAMS sets the channel count, HEADER the per-channel effect columns,
/// FRAMES the pattern length. Each decoder receives the context explicitly.
#[derive(Debug, Clone, Default)]
pub struct DecodeContext {
    channel_count: usize,
    effect_columns: Vec<u8>,
    pattern_length: u32,
    warnings: Vec<DecodeWarning>,
}

impl DecodeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of channels declared by PARAMS.
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Extra effect columns for `channel` (0 when the channel is unknown).
    pub fn effect_columns(&self, channel: usize) -> u8 {
        self.effect_columns.get(channel).copied().unwrap_or(0)
    }

    /// On-disk width of one row event for `channel`, excluding the 4-byte row number.
    pub fn row_event_width(&self, channel: usize) -> usize {
        ROW_EVENT_BASE_WIDTH + 2 * self.effect_columns(channel) as usize
    }

    /// Rows per pattern declared by FRAMES.
    pub fn pattern_length(&self) -> u32 {
        self.pattern_length
    }

    /// Warnings collected so far, in decode order.
    pub fn warnings(&self) -> &[DecodeWarning] {
        &self.warnings
    }

    pub(crate) fn set_channel_count(&mut self, count: usize) {
        self.channel_count = count;
        self.effect_columns = vec![0; count];
    }

    pub(crate) fn set_effect_columns(&mut self, columns: Vec<u8>) {
        debug_assert_eq!(columns.len(), self.channel_count);
        self.effect_columns = columns;
    }

    pub(crate) fn set_pattern_length(&mut self, rows: u32) {
        self.pattern_length = rows;
    }

    /// Record a recoverable anomaly.
    pub fn warn(&mut self, warning: DecodeWarning) {
        warn!(code = warning.code(), "{}", warning);
        self.warnings.push(warning);
    }

    pub(crate) fn into_warnings(self) -> Vec<DecodeWarning> {
        self.warnings
    }
}
