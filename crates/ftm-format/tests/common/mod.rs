//! Synthetic module builder shared by the integration tests.

#![allow(dead_code)]

use ftm_format::{BLOCK_ID_LEN, MODULE_MAGIC, MODULE_VERSION};

/// Encode one block: padded tag, version, size, payload.
pub fn block(tag: &str, version: u32, payload: &[u8]) -> Vec<u8> {
    let mut data = vec![0u8; BLOCK_ID_LEN];
    data[..tag.len()].copy_from_slice(tag.as_bytes());
    data.extend_from_slice(&version.to_le_bytes());
    data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    data.extend_from_slice(payload);
    data
}

#[derive(Debug, Clone)]
pub struct Event {
    pub row: u32,
    pub note: u8,
    pub octave: u8,
    pub instrument: u8,
    pub volume: u8,
    pub effects: Vec<(u8, u8)>,
}

impl Event {
    pub fn note(row: u32, note: u8, octave: u8, instrument: u8, volume: u8) -> Self {
        Self {
            row,
            note,
            octave,
            instrument,
            volume,
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, command: u8, param: u8) -> Self {
        self.effects.push((command, param));
        self
    }
}

#[derive(Debug, Clone)]
struct PatternSpec {
    track: u32,
    channel: u32,
    index: u32,
    events: Vec<Event>,
}

/// Builds a module byte image block by block.
///
/// Defaults: NTSC, no expansion chips, one track, pattern length 64,
/// no instruments, curves, frames or patterns.
#[derive(Debug, Clone)]
pub struct ModuleBuilder {
    effect_columns: Vec<u8>,
    track_count: u8,
    title: String,
    track_name: String,
    instruments: Vec<Vec<u8>>,
    sequences: Vec<(u32, u32, Vec<i8>)>,
    frames: Vec<Vec<u8>>,
    pattern_length: u32,
    patterns: Vec<PatternSpec>,
    padding: Vec<(&'static str, usize)>,
    trailing: Vec<u8>,
    end_marker: bool,
}

impl ModuleBuilder {
    /// Module with one channel per entry of `effect_columns` (extra columns per channel).
    pub fn new(effect_columns: &[u8]) -> Self {
        Self {
            effect_columns: effect_columns.to_vec(),
            track_count: 1,
            title: "Test Song".to_string(),
            track_name: "New song".to_string(),
            instruments: Vec::new(),
            sequences: Vec::new(),
            frames: Vec::new(),
            pattern_length: 64,
            patterns: Vec::new(),
            padding: Vec::new(),
            trailing: Vec::new(),
            end_marker: true,
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn track_count(mut self, tracks: u8) -> Self {
        self.track_count = tracks;
        self
    }

    /// 2A03 instrument with the given (enabled, curve id) bindings and an empty sample map.
    pub fn instrument(mut self, id: u32, bindings: &[(u8, u8)], name: &str) -> Self {
        let mut out = id.to_le_bytes().to_vec();
        out.push(1);
        out.extend_from_slice(&(bindings.len() as u32).to_le_bytes());
        for &(enabled, sequence) in bindings {
            out.extend_from_slice(&[enabled, sequence]);
        }
        for _ in 0..96 {
            out.extend_from_slice(&[0, 0, 0xFF]);
        }
        out.extend_from_slice(&(name.len() as u32).to_le_bytes());
        out.extend_from_slice(name.as_bytes());
        self.instruments.push(out);
        self
    }

    pub fn sequence(mut self, id: u32, kind: u32, values: &[i8]) -> Self {
        self.sequences.push((id, kind, values.to_vec()));
        self
    }

    pub fn frame(mut self, selectors: &[u8]) -> Self {
        self.frames.push(selectors.to_vec());
        self
    }

    pub fn pattern_length(mut self, rows: u32) -> Self {
        self.pattern_length = rows;
        self
    }

    pub fn pattern(self, channel: u32, index: u32, events: Vec<Event>) -> Self {
        self.track_pattern(0, channel, index, events)
    }

    pub fn track_pattern(
        mut self,
        track: u32,
        channel: u32,
        index: u32,
        events: Vec<Event>,
    ) -> Self {
        self.patterns.push(PatternSpec {
            track,
            channel,
            index,
            events,
        });
        self
    }

    /// Append `bytes` unused bytes to the payload of block `tag`.
    pub fn pad(mut self, tag: &'static str, bytes: usize) -> Self {
        self.padding.push((tag, bytes));
        self
    }

    /// Raw bytes placed after PATTERNS and before the end marker.
    pub fn trailing(mut self, bytes: &[u8]) -> Self {
        self.trailing.extend_from_slice(bytes);
        self
    }

    pub fn without_end_marker(mut self) -> Self {
        self.end_marker = false;
        self
    }

    fn finish_block(&self, tag: &'static str, version: u32, mut payload: Vec<u8>) -> Vec<u8> {
        for &(padded, bytes) in &self.padding {
            if padded == tag {
                payload.extend(std::iter::repeat(0xEE).take(bytes));
            }
        }
        block(tag, version, &payload)
    }

    /// Extra effect columns the decoder will apply to `channel`.
    fn decoded_columns(&self, channel: usize) -> u8 {
        if self.track_count > 1 {
            0
        } else {
            self.effect_columns.get(channel).copied().unwrap_or(0)
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let channels = self.effect_columns.len();
        let mut out = MODULE_MAGIC.to_vec();
        out.extend_from_slice(&MODULE_VERSION.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());

        // PARAMS
        let mut params = vec![0u8];
        for value in [channels as u32, 0, 0, 0, 4, 16, 0x15] {
            params.extend_from_slice(&value.to_le_bytes());
        }
        out.extend(self.finish_block("PARAMS", 6, params));

        // INFO
        let mut info = Vec::new();
        for text in [self.title.as_str(), "Tester", "2024"] {
            let mut field = [0u8; 32];
            field[..text.len()].copy_from_slice(text.as_bytes());
            info.extend_from_slice(&field);
        }
        out.extend(self.finish_block("INFO", 1, info));

        // HEADER
        let mut header = vec![self.track_count];
        header.extend_from_slice(self.track_name.as_bytes());
        header.push(0);
        header.extend((0..channels).map(|channel| channel as u8));
        header.extend_from_slice(&self.effect_columns);
        out.extend(self.finish_block("HEADER", 3, header));

        // INSTRUMENTS
        let mut instruments = (self.instruments.len() as u32).to_le_bytes().to_vec();
        for record in &self.instruments {
            instruments.extend_from_slice(record);
        }
        out.extend(self.finish_block("INSTRUMENTS", 6, instruments));

        // SEQUENCES
        let mut sequences = (self.sequences.len() as u32).to_le_bytes().to_vec();
        for (id, kind, values) in &self.sequences {
            sequences.extend_from_slice(&id.to_le_bytes());
            sequences.extend_from_slice(&kind.to_le_bytes());
            sequences.push(values.len() as u8);
            sequences.extend_from_slice(&(-1i32).to_le_bytes());
            sequences.extend(values.iter().map(|&v| v as u8));
        }
        for _ in &self.sequences {
            sequences.extend_from_slice(&(-1i32).to_le_bytes());
            sequences.extend_from_slice(&0u32.to_le_bytes());
        }
        out.extend(self.finish_block("SEQUENCES", 6, sequences));

        // FRAMES
        let mut frames = Vec::new();
        for value in [self.frames.len() as u32, 6, 150, self.pattern_length] {
            frames.extend_from_slice(&value.to_le_bytes());
        }
        for row in &self.frames {
            frames.extend_from_slice(row);
        }
        out.extend(self.finish_block("FRAMES", 3, frames));

        // PATTERNS
        let mut patterns = Vec::new();
        for spec in &self.patterns {
            for value in [spec.track, spec.channel, spec.index, spec.events.len() as u32] {
                patterns.extend_from_slice(&value.to_le_bytes());
            }
            let extra = self.decoded_columns(spec.channel as usize);
            for event in &spec.events {
                patterns.extend_from_slice(&event.row.to_le_bytes());
                patterns.extend_from_slice(&[
                    event.note,
                    event.octave,
                    event.instrument,
                    event.volume,
                ]);
                for column in 0..=extra as usize {
                    let (command, param) = event.effects.get(column).copied().unwrap_or((0, 0));
                    patterns.extend_from_slice(&[command, param]);
                }
            }
        }
        out.extend(block("PATTERNS", 4, &patterns));

        out.extend_from_slice(&self.trailing);
        if self.end_marker {
            out.extend_from_slice(b"END");
        }
        out
    }
}

/// The smallest useful module: one channel, one instrument, one volume curve,
/// one frame and one pattern with a single row event at row 0.
pub fn minimal_module() -> ModuleBuilder {
    ModuleBuilder::new(&[0])
        .instrument(0, &[(1, 0)], "Square")
        .sequence(0, 0, &[10, 5])
        .frame(&[0])
        .pattern(0, 0, vec![Event::note(0, 10, 4, 0, 12)])
}
