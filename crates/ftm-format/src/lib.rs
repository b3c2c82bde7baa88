//! FamiTracker module decoding.
//!
//! Decodes a `.ftm` module held in memory into an immutable [`Module`]:
//! engine parameters, song info, the per-channel layout, instruments, the
//! id-keyed curve table, the song order and every pattern unpacked into a
//! dense grid. A [`PlaybackView`] answers "what plays on this channel at this
//! row of this frame" without any further decoding.
//!
//! # Decoding order
//!
//! Blocks are decoded strictly in file order. Each stage reads configuration
//! left by earlier ones in a [`DecodeContext`]:
//!
//! - PARAMS sets the channel count used by HEADER and FRAMES
//! - HEADER sets the per-channel effect-column count that fixes the width of
//!   every PATTERNS row event
//! - FRAMES sets the pattern length used to size the unpacked grids
//!
//! Every block is decoded from a cursor bounded by its declared size, so the
//! next block always starts where the previous one said it ends.
//!
//! # Errors
//!
//! Structural problems are fatal and reported as a [`DecodeError`] carrying
//! the absolute byte offset. Semantic anomalies are collected as
//! [`DecodeWarning`]s on the returned module.
//!
//! # Example
//!
//! ```ignore
//! let data = std::fs::read("song.ftm")?;
//! let module = ftm_format::decode(&data)?;
//! for warning in &module.warnings {
//!     eprintln!("warning: {}", warning);
//! }
//! let cell = module.query(0, 0, 0);
//! println!("{}", cell);
//! ```

pub mod chunk;
pub mod context;
pub mod cursor;
pub mod dpcm;
pub mod error;
pub mod frame;
pub mod header;
pub mod info;
pub mod instrument;
pub mod module;
pub mod params;
pub mod pattern;
pub mod playback;
pub mod sequence;
pub mod track;

#[cfg(test)]
mod test_support;

// Re-export main types
pub use chunk::{ChunkHeader, BLOCK_ID_LEN, CHUNK_HEADER_LEN};
pub use context::DecodeContext;
pub use cursor::ByteCursor;
pub use dpcm::{DpcmSample, DpcmSamples};
pub use error::{DecodeError, DecodeWarning, Result};
pub use frame::{FrameRow, FrameTable, MAX_PATTERN_LENGTH};
pub use header::{ModuleHeader, MODULE_MAGIC, MODULE_VERSION};
pub use info::Info;
pub use instrument::{
    CurveBinding, Instrument, InstrumentKind, InstrumentTable, SampleMapEntry, MAX_INSTRUMENTS,
};
pub use module::{decode, Module};
pub use params::{ExpansionChips, Machine, Params, VibratoStyle, MAX_CHANNELS};
pub use pattern::{
    Cell, Effect, Note, PatternArena, PatternEntry, PatternRecord, PatternTable, RowEvent,
    UnpackedPattern, MAX_PATTERN_INDEX, NO_INSTRUMENT, NO_VOLUME,
};
pub use playback::PlaybackView;
pub use sequence::{
    assemble, Sequence, SequenceGroup, SequenceKind, SequenceRecord, SequenceTable,
    MAX_SEQUENCE_ID,
};
pub use track::{ChannelInfo, TrackHeader, MAX_EFFECT_COLUMNS};
