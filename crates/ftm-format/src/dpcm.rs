//! DPCM SAMPLES block: raw delta-modulation sample data.

use serde::Serialize;
use tracing::trace;

use crate::chunk::{tags, Block};
use crate::error::{DecodeError, Result};

/// Longest sample name accepted.
pub const MAX_SAMPLE_NAME: u32 = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DpcmSample {
    pub index: u8,
    pub name: String,
    /// Declared data size in bytes.
    pub size: u32,
    #[serde(skip_serializing)]
    pub data: Vec<u8>,
}

/// Decoded DPCM SAMPLES block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DpcmSamples {
    pub version: u32,
    pub samples: Vec<DpcmSample>,
}

impl DpcmSamples {
    /// Decode the block body of an already-read DPCM SAMPLES block.
    pub(crate) fn decode(block: Block<'_>) -> Result<Self> {
        let Block { header, mut body } = block;
        let count = body.read_u8()?;

        let mut samples = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let index = body.read_u8()?;
            let name_offset = body.position();
            let name_len = body.read_u32()?;
            if name_len > MAX_SAMPLE_NAME {
                return Err(DecodeError::malformed(
                    tags::DPCM_SAMPLES,
                    name_offset,
                    format!("sample name length {} exceeds {}", name_len, MAX_SAMPLE_NAME),
                ));
            }
            let name = String::from_utf8_lossy(body.read_bytes(name_len as usize)?).into_owned();
            let size = body.read_u32()?;
            let data = body.read_bytes(size as usize)?.to_vec();
            trace!(index, %name, size, "dpcm sample");
            samples.push(DpcmSample {
                index,
                name,
                size,
                data,
            });
        }

        Ok(Self {
            version: header.version,
            samples,
        })
    }

    /// Sample stored under `index`.
    pub fn get(&self, index: u8) -> Option<&DpcmSample> {
        self.samples.iter().find(|sample| sample.index == index)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
