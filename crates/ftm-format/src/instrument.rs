//! INSTRUMENTS block.

use serde::Serialize;
use tracing::trace;

use crate::chunk::{tags, Block};
use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Result};
use crate::sequence::SequenceKind;

/// Most instruments a module can hold.
pub const MAX_INSTRUMENTS: u32 = 64;

/// Longest instrument name accepted.
pub const MAX_INSTRUMENT_NAME: u32 = 256;

/// Sample map entries: 8 octaves of 12 notes.
pub const SAMPLE_MAP_LEN: usize = 96;

/// Delta counter value meaning "leave the DAC alone".
pub const DELTA_UNSET: u8 = 0xFF;

/// Sound chip an instrument targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InstrumentKind {
    Apu,
    Vrc6,
    Vrc7,
    Fds,
    N163,
    S5b,
    Unknown(u8),
}

impl From<u8> for InstrumentKind {
    fn from(tag: u8) -> Self {
        match tag {
            1 => InstrumentKind::Apu,
            2 => InstrumentKind::Vrc6,
            3 => InstrumentKind::Vrc7,
            4 => InstrumentKind::Fds,
            5 => InstrumentKind::N163,
            6 => InstrumentKind::S5b,
            other => InstrumentKind::Unknown(other),
        }
    }
}

impl InstrumentKind {
    /// Whether instruments of this kind use the curve-binding layout.
    fn has_curve_bindings(self) -> bool {
        matches!(
            self,
            InstrumentKind::Apu | InstrumentKind::Vrc6 | InstrumentKind::N163 | InstrumentKind::S5b
        )
    }
}

/// Link from an instrument to a curve of one kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CurveBinding {
    pub enabled: bool,
    pub sequence: u8,
}

/// DPCM assignment for one note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SampleMapEntry {
    /// 1-based sample index, 0 for none.
    pub sample: u8,
    pub looped: bool,
    pub pitch: u8,
    /// Initial delta counter, [`DELTA_UNSET`] for none.
    pub delta: u8,
}

impl SampleMapEntry {
    pub fn delta(&self) -> Option<u8> {
        (self.delta != DELTA_UNSET).then_some(self.delta)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instrument {
    pub id: u32,
    pub kind: InstrumentKind,
    /// Bindings in (volume, arpeggio, pitch, hi-pitch, duty) order.
    pub bindings: Vec<CurveBinding>,
    /// Empty unless the instrument is a 2A03 instrument.
    pub sample_map: Vec<SampleMapEntry>,
    pub name: String,
}

impl Instrument {
    /// Curve id bound for `kind`, if the binding is enabled.
    pub fn binding(&self, kind: SequenceKind) -> Option<u8> {
        self.bindings
            .get(kind.index())
            .filter(|binding| binding.enabled)
            .map(|binding| binding.sequence)
    }

    /// Sample map entry for a note (0-11) in an octave (0-7).
    pub fn sample_for(&self, octave: u8, note: u8) -> Option<&SampleMapEntry> {
        if note >= 12 {
            return None;
        }
        self.sample_map
            .get(octave as usize * 12 + note as usize)
            .filter(|entry| entry.sample != 0)
    }

    fn read(body: &mut ByteCursor<'_>, index: usize) -> Result<Self> {
        let malformed = |offset: usize, reason: String| DecodeError::MalformedInstrument {
            index,
            offset,
            reason,
        };

        let id = body.read_u32()?;
        let kind_offset = body.position();
        let kind = InstrumentKind::from(body.read_u8()?);
        if !kind.has_curve_bindings() {
            return Err(malformed(
                kind_offset,
                format!("unsupported instrument type {:?}", kind),
            ));
        }

        let binding_offset = body.position();
        let binding_count = body.read_u32()?;
        if binding_count as usize > SequenceKind::COUNT {
            return Err(malformed(
                binding_offset,
                format!(
                    "{} curve bindings (maximum {})",
                    binding_count,
                    SequenceKind::COUNT
                ),
            ));
        }
        let mut bindings = Vec::with_capacity(binding_count as usize);
        for _ in 0..binding_count {
            bindings.push(CurveBinding {
                enabled: body.read_u8()? != 0,
                sequence: body.read_u8()?,
            });
        }

        let mut sample_map = Vec::new();
        if kind == InstrumentKind::Apu {
            sample_map.reserve(SAMPLE_MAP_LEN);
            for _ in 0..SAMPLE_MAP_LEN {
                let sample = body.read_u8()?;
                let [looped, pitch] = body.read_bitfield([4, 4])?;
                let delta = body.read_u8()?;
                sample_map.push(SampleMapEntry {
                    sample,
                    looped: looped != 0,
                    pitch,
                    delta,
                });
            }
        }

        let name_offset = body.position();
        let name_len = body.read_u32()?;
        if name_len > MAX_INSTRUMENT_NAME {
            return Err(malformed(
                name_offset,
                format!("name length {} exceeds {}", name_len, MAX_INSTRUMENT_NAME),
            ));
        }
        let name = String::from_utf8_lossy(body.read_bytes(name_len as usize)?).into_owned();

        trace!(id, ?kind, %name, "instrument");
        Ok(Self {
            id,
            kind,
            bindings,
            sample_map,
            name,
        })
    }
}

/// Decoded INSTRUMENTS block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstrumentTable {
    pub version: u32,
    pub instruments: Vec<Instrument>,
}

impl InstrumentTable {
    pub(crate) fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let Block { header, mut body } = Block::expect(cursor, tags::INSTRUMENTS)?;
        let count_offset = body.position();
        let count = body.read_u32()?;
        if count > MAX_INSTRUMENTS {
            return Err(DecodeError::malformed(
                tags::INSTRUMENTS,
                count_offset,
                format!("{} instruments (maximum {})", count, MAX_INSTRUMENTS),
            ));
        }

        let instruments = (0..count as usize)
            .map(|index| Instrument::read(&mut body, index))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            version: header.version,
            instruments,
        })
    }

    /// Instrument with the given id.
    pub fn get(&self, id: u32) -> Option<&Instrument> {
        self.instruments.iter().find(|instrument| instrument.id == id)
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}
