//! CLI command implementations

pub mod frame;
pub mod info;
pub mod json_output;
pub mod query;
pub mod sequences;

use std::fs;

use anyhow::{Context, Result};
use ftm_format::Module;
use tracing::debug;

/// Read and decode a module file.
pub fn load_module(path: &str) -> Result<Module> {
    let data = fs::read(path).with_context(|| format!("Failed to read module file: {}", path))?;
    debug!(path, bytes = data.len(), "read module file");
    let module =
        ftm_format::decode(&data).with_context(|| format!("Failed to decode module: {}", path))?;
    Ok(module)
}
