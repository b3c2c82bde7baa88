//! SEQUENCES block: control curves and their assembly into an id-keyed table.
//!
//! On disk the block holds `count` curve records (13-byte prefix plus the
//! curve bytes) followed by a second run of `count` (release, settings)
//! trailers in the same order. Records are read in two explicit passes and
//! then scattered into a dense table indexed by curve id, one slot per kind.

use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::chunk::{tags, Block};
use crate::context::DecodeContext;
use crate::cursor::ByteCursor;
use crate::error::{DecodeError, DecodeWarning, Result};

/// Largest curve id accepted; bounds the id-keyed table.
pub const MAX_SEQUENCE_ID: u32 = 255;

/// Curve kind, in instrument binding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SequenceKind {
    Volume,
    Arpeggio,
    Pitch,
    HiPitch,
    Duty,
}

impl SequenceKind {
    /// Number of curve kinds.
    pub const COUNT: usize = 5;

    /// Every kind, in tag order.
    pub const ALL: [SequenceKind; Self::COUNT] = [
        SequenceKind::Volume,
        SequenceKind::Arpeggio,
        SequenceKind::Pitch,
        SequenceKind::HiPitch,
        SequenceKind::Duty,
    ];

    pub fn from_tag(tag: u32) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            SequenceKind::Volume => "volume",
            SequenceKind::Arpeggio => "arpeggio",
            SequenceKind::Pitch => "pitch",
            SequenceKind::HiPitch => "hi-pitch",
            SequenceKind::Duty => "duty",
        }
    }
}

impl fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One curve record as stored in the flat on-disk list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceRecord {
    pub id: u32,
    /// Raw kind tag; see [`SequenceKind::from_tag`].
    pub kind: u32,
    /// Loop point index, negative for none.
    pub loop_point: i32,
    pub values: Vec<i8>,
    /// Release point index, negative for none.
    pub release_point: i32,
    pub settings: u32,
}

/// First-pass part of a record; completed once the trailer run is read.
struct RecordHead {
    id: u32,
    kind: u32,
    loop_point: i32,
    values: Vec<i8>,
}

impl RecordHead {
    fn read(body: &mut ByteCursor<'_>) -> Result<Self> {
        let offset = body.position();
        let id = body.read_u32()?;
        if id > MAX_SEQUENCE_ID {
            return Err(DecodeError::malformed(
                tags::SEQUENCES,
                offset,
                format!("sequence id {} exceeds {}", id, MAX_SEQUENCE_ID),
            ));
        }
        let kind = body.read_u32()?;
        let length = body.read_u8()?;
        let loop_point = body.read_i32()?;
        let values = body
            .read_bytes(length as usize)?
            .iter()
            .map(|&b| b as i8)
            .collect();
        trace!(id, kind, length, "sequence record");
        Ok(Self {
            id,
            kind,
            loop_point,
            values,
        })
    }

    fn finish(self, release_point: i32, settings: u32) -> SequenceRecord {
        SequenceRecord {
            id: self.id,
            kind: self.kind,
            loop_point: self.loop_point,
            values: self.values,
            release_point,
            settings,
        }
    }
}

/// An assembled curve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Sequence {
    pub values: Vec<i8>,
    pub loop_point: i32,
    pub release_point: i32,
    pub settings: u32,
}

impl Sequence {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Loop point as an index into `values`, if set and in range.
    pub fn loop_point(&self) -> Option<usize> {
        usize::try_from(self.loop_point)
            .ok()
            .filter(|&i| i < self.len())
    }

    /// Release point as an index into `values`, if set and in range.
    pub fn release_point(&self) -> Option<usize> {
        usize::try_from(self.release_point)
            .ok()
            .filter(|&i| i < self.len())
    }
}

impl From<&SequenceRecord> for Sequence {
    fn from(record: &SequenceRecord) -> Self {
        Self {
            values: record.values.clone(),
            loop_point: record.loop_point,
            release_point: record.release_point,
            settings: record.settings,
        }
    }
}

/// All curves sharing one id, at most one per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SequenceGroup {
    curves: [Option<Sequence>; SequenceKind::COUNT],
}

impl SequenceGroup {
    pub fn get(&self, kind: SequenceKind) -> Option<&Sequence> {
        self.curves[kind.index()].as_ref()
    }

    /// True when no kind has a curve.
    pub fn is_empty(&self) -> bool {
        self.curves.iter().all(Option::is_none)
    }

    /// Kinds that have a curve, in tag order.
    pub fn kinds(&self) -> impl Iterator<Item = SequenceKind> + '_ {
        SequenceKind::ALL
            .into_iter()
            .filter(|kind| self.curves[kind.index()].is_some())
    }

    fn set(&mut self, kind: SequenceKind, sequence: Sequence) -> Option<Sequence> {
        self.curves[kind.index()].replace(sequence)
    }
}

/// Decoded SEQUENCES block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SequenceTable {
    pub version: u32,
    /// Records in on-disk order.
    pub records: Vec<SequenceRecord>,
    /// Dense table indexed by curve id.
    pub groups: Vec<SequenceGroup>,
}

impl SequenceTable {
    pub(crate) fn decode(cursor: &mut ByteCursor<'_>, ctx: &mut DecodeContext) -> Result<Self> {
        let Block { header, mut body } = Block::expect(cursor, tags::SEQUENCES)?;
        let count = body.read_u32()?;

        let mut heads = Vec::new();
        for _ in 0..count {
            heads.push(RecordHead::read(&mut body)?);
        }

        let mut records = Vec::with_capacity(heads.len());
        for head in heads {
            let release_point = body.read_i32()?;
            let settings = body.read_u32()?;
            records.push(head.finish(release_point, settings));
        }

        let groups = assemble(&records, ctx);
        Ok(Self {
            version: header.version,
            records,
            groups,
        })
    }

    /// Group for `id`, if the table is that large.
    pub fn group(&self, id: usize) -> Option<&SequenceGroup> {
        self.groups.get(id)
    }

    /// Curve of `kind` with `id`.
    pub fn get(&self, id: usize, kind: SequenceKind) -> Option<&Sequence> {
        self.group(id).and_then(|group| group.get(kind))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Scatter flat records into a table of `max_id + 1` groups.
///
/// Records with an unknown kind are skipped with a warning; a repeated
/// (id, kind) pair replaces the earlier curve with a warning.
pub fn assemble(records: &[SequenceRecord], ctx: &mut DecodeContext) -> Vec<SequenceGroup> {
    let size = records
        .iter()
        .map(|record| record.id as usize + 1)
        .max()
        .unwrap_or(0);
    let mut groups = vec![SequenceGroup::default(); size];

    for record in records {
        let Some(kind) = SequenceKind::from_tag(record.kind) else {
            ctx.warn(DecodeWarning::UnknownSequenceKind {
                id: record.id,
                kind: record.kind,
            });
            continue;
        };
        let group = &mut groups[record.id as usize];
        if group.set(kind, Sequence::from(record)).is_some() {
            ctx.warn(DecodeWarning::DuplicateSequence {
                id: record.id,
                kind: kind.name(),
            });
        }
    }

    groups
}
