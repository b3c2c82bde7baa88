//! PATTERNS block: sparse per-channel pattern records and their dense grids.
//!
//! The block has no record count; records run until the declared block size
//! is used up. Each row event is `6 + 2 * extra_effect_columns[channel]`
//! bytes after its 4-byte row number, so the layout depends on the HEADER
//! block. Every record is unpacked into a grid of `pattern_length` cells as
//! it is read.

use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::chunk::{tags, Block};
use crate::context::DecodeContext;
use crate::cursor::ByteCursor;
use crate::error::{DecodeError, DecodeWarning, Result};
use crate::track::MAX_EFFECT_COLUMNS;

/// Largest pattern index accepted per channel.
pub const MAX_PATTERN_INDEX: u32 = 255;

/// Instrument value meaning "no instrument".
pub const NO_INSTRUMENT: u8 = 64;

/// Volume value meaning "no volume change".
pub const NO_VOLUME: u8 = 16;

/// Decoded note column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Note {
    None,
    /// Semitone within the octave, 0 = C through 11 = B.
    Pitch(u8),
    Release,
    Halt,
    Unknown(u8),
}

impl From<u8> for Note {
    fn from(value: u8) -> Self {
        match value {
            0 => Note::None,
            1..=12 => Note::Pitch(value - 1),
            13 => Note::Release,
            14 => Note::Halt,
            other => Note::Unknown(other),
        }
    }
}

const NOTE_NAMES: [&str; 12] = [
    "C-", "C#", "D-", "D#", "E-", "F-", "F#", "G-", "G#", "A-", "A#", "B-",
];

/// One effect column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Effect {
    pub command: u8,
    pub param: u8,
}

impl Effect {
    pub fn is_empty(&self) -> bool {
        self.command == 0
    }
}

/// One row of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub note: u8,
    pub octave: u8,
    pub instrument: u8,
    pub volume: u8,
    /// Columns past the channel's configured count stay zero.
    pub effects: [Effect; MAX_EFFECT_COLUMNS],
}

impl Cell {
    /// The no-event cell.
    pub const EMPTY: Cell = Cell {
        note: 0,
        octave: 0,
        instrument: NO_INSTRUMENT,
        volume: NO_VOLUME,
        effects: [Effect {
            command: 0,
            param: 0,
        }; MAX_EFFECT_COLUMNS],
    };

    pub fn note(&self) -> Note {
        Note::from(self.note)
    }

    pub fn instrument(&self) -> Option<u8> {
        (self.instrument < NO_INSTRUMENT).then_some(self.instrument)
    }

    pub fn volume(&self) -> Option<u8> {
        (self.volume < NO_VOLUME).then_some(self.volume)
    }

    pub fn is_empty(&self) -> bool {
        *self == Cell::EMPTY
    }

    /// Read a row event body whose effect payload holds `1 + extra` columns.
    fn read(cursor: &mut ByteCursor<'_>, extra: u8) -> Result<Self> {
        let mut cell = Cell {
            note: cursor.read_u8()?,
            octave: cursor.read_u8()?,
            instrument: cursor.read_u8()?,
            volume: cursor.read_u8()?,
            ..Cell::EMPTY
        };
        for effect in cell.effects.iter_mut().take(1 + extra as usize) {
            effect.command = cursor.read_u8()?;
            effect.param = cursor.read_u8()?;
        }
        Ok(cell)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::EMPTY
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.note() {
            Note::None => write!(f, "...")?,
            Note::Pitch(n) => write!(f, "{}{}", NOTE_NAMES[n as usize], self.octave)?,
            Note::Release => write!(f, "===")?,
            Note::Halt => write!(f, "---")?,
            Note::Unknown(v) => write!(f, "?{:02X}", v)?,
        }
        match self.instrument() {
            Some(i) => write!(f, " {:02X}", i)?,
            None => write!(f, " ..")?,
        }
        match self.volume() {
            Some(v) => write!(f, " {:X}", v)?,
            None => write!(f, " .")?,
        }
        for effect in &self.effects {
            if effect.is_empty() {
                write!(f, " ...")?;
            } else {
                write!(f, " {:02X}{:02X}", effect.command, effect.param)?;
            }
        }
        Ok(())
    }
}

/// A sparse row event as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowEvent {
    pub row: u32,
    pub cell: Cell,
}

/// A sparse pattern record as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternRecord {
    pub track: u32,
    pub channel: u32,
    pub index: u32,
    pub events: Vec<RowEvent>,
}

impl PatternRecord {
    fn read(body: &mut ByteCursor<'_>, ctx: &DecodeContext) -> Result<Self> {
        let track = body.read_u32()?;
        let channel_offset = body.position();
        let channel = body.read_u32()?;
        let index_offset = body.position();
        let index = body.read_u32()?;
        let items = body.read_u32()?;

        if channel as usize >= ctx.channel_count() {
            return Err(DecodeError::malformed(
                tags::PATTERNS,
                channel_offset,
                format!(
                    "channel {} out of range ({} channels)",
                    channel,
                    ctx.channel_count()
                ),
            ));
        }
        if index > MAX_PATTERN_INDEX {
            return Err(DecodeError::malformed(
                tags::PATTERNS,
                index_offset,
                format!("pattern index {} exceeds {}", index, MAX_PATTERN_INDEX),
            ));
        }

        let extra = ctx.effect_columns(channel as usize);
        let mut events = Vec::new();
        for _ in 0..items {
            let row = body.read_u32()?;
            let cell = Cell::read(body, extra)?;
            events.push(RowEvent { row, cell });
        }

        trace!(track, channel, index, items, "pattern record");
        Ok(Self {
            track,
            channel,
            index,
            events,
        })
    }
}

/// Dense row-addressable grid for one (channel, pattern index).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnpackedPattern {
    rows: Vec<Cell>,
}

impl UnpackedPattern {
    /// Grid of `length` empty cells.
    pub fn new(length: usize) -> Self {
        Self {
            rows: vec![Cell::EMPTY; length],
        }
    }

    /// Scatter each event into its row.
    ///
    /// Events whose row falls outside the grid are not written; their row
    /// numbers are returned in record order.
    pub fn scatter(&mut self, events: &[RowEvent]) -> Vec<u32> {
        let mut dropped = Vec::new();
        for event in events {
            match self.rows.get_mut(event.row as usize) {
                Some(slot) => *slot = event.cell,
                None => dropped.push(event.row),
            }
        }
        dropped
    }

    pub fn cell(&self, row: usize) -> Option<&Cell> {
        self.rows.get(row)
    }

    pub fn rows(&self) -> &[Cell] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A pattern record together with its unpacked grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternEntry {
    pub record: PatternRecord,
    pub grid: UnpackedPattern,
}

/// Index-addressed storage: channel first, then pattern index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatternArena {
    channels: Vec<Vec<Option<PatternEntry>>>,
}

impl PatternArena {
    pub fn new(channel_count: usize) -> Self {
        Self {
            channels: vec![Vec::new(); channel_count],
        }
    }

    pub fn get(&self, channel: usize, index: usize) -> Option<&PatternEntry> {
        self.channels.get(channel)?.get(index)?.as_ref()
    }

    pub fn grid(&self, channel: usize, index: usize) -> Option<&UnpackedPattern> {
        self.get(channel, index).map(|entry| &entry.grid)
    }

    /// Slot for (channel, index), growing the channel's table as needed.
    pub(crate) fn slot_mut(&mut self, channel: usize, index: usize) -> &mut Option<PatternEntry> {
        if self.channels.len() <= channel {
            self.channels.resize_with(channel + 1, Vec::new);
        }
        let patterns = &mut self.channels[channel];
        if patterns.len() <= index {
            patterns.resize_with(index + 1, || None);
        }
        &mut patterns[index]
    }

    /// Number of channels with storage.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// All decoded entries, ordered by channel then index.
    pub fn iter(&self) -> impl Iterator<Item = &PatternEntry> {
        self.channels
            .iter()
            .flat_map(|patterns| patterns.iter().flatten())
    }

    /// Number of decoded (channel, index) pairs.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Decoded PATTERNS block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatternTable {
    pub version: u32,
    pub patterns: PatternArena,
}

impl PatternTable {
    pub(crate) fn decode(cursor: &mut ByteCursor<'_>, ctx: &mut DecodeContext) -> Result<Self> {
        let Block { header, mut body } = Block::expect(cursor, tags::PATTERNS)?;
        let pattern_length = ctx.pattern_length();
        let mut patterns = PatternArena::new(ctx.channel_count());

        while !body.is_empty() {
            let record = PatternRecord::read(&mut body, ctx)?;
            if record.track != 0 {
                ctx.warn(DecodeWarning::ForeignTrackPattern {
                    track: record.track,
                    channel: record.channel,
                    pattern: record.index,
                });
                continue;
            }
            store(&mut patterns, record, pattern_length, ctx);
        }

        Ok(Self {
            version: header.version,
            patterns,
        })
    }

    pub fn get(&self, channel: usize, index: usize) -> Option<&PatternEntry> {
        self.patterns.get(channel, index)
    }

    pub fn grid(&self, channel: usize, index: usize) -> Option<&UnpackedPattern> {
        self.patterns.grid(channel, index)
    }
}

/// Unpack `record` into its grid and file it under (channel, index).
///
/// A second record for the same pair reuses the existing grid; its events are
/// appended to the stored record.
fn store(
    patterns: &mut PatternArena,
    record: PatternRecord,
    pattern_length: u32,
    ctx: &mut DecodeContext,
) {
    let (channel, index) = (record.channel, record.index);
    let slot = patterns.slot_mut(channel as usize, index as usize);
    if slot.is_some() {
        ctx.warn(DecodeWarning::DuplicatePattern {
            channel,
            pattern: index,
        });
    }
    let entry = slot.get_or_insert_with(|| PatternEntry {
        record: PatternRecord {
            track: record.track,
            channel,
            index,
            events: Vec::new(),
        },
        grid: UnpackedPattern::new(pattern_length as usize),
    });

    let dropped = entry.grid.scatter(&record.events);
    entry.record.events.extend(record.events);
    for row in dropped {
        ctx.warn(DecodeWarning::RowOutOfRange {
            channel,
            pattern: index,
            row,
            pattern_length,
        });
    }
}
