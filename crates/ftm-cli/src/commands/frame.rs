//! Frame command implementation
//!
//! Prints every row of one frame in tracker notation.

use std::process::ExitCode;

use anyhow::{bail, Result};
use colored::Colorize;
use ftm_format::{Cell, Module};
use serde::Serialize;

use super::json_output::{emit_failure, error_codes, CommandOutput, JsonError};
use super::load_module;

/// One frame, every channel, every row.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FrameDump {
    pub frame: usize,
    /// Pattern index selected per channel.
    pub patterns: Vec<u8>,
    /// `rows[row][channel]`
    pub rows: Vec<Vec<Cell>>,
}

impl FrameDump {
    /// Collect frame `frame`, or `None` when the module has no such frame.
    pub fn collect(module: &Module, frame: usize) -> Option<Self> {
        let selectors = module.frames.get(frame)?;
        let view = module.playback();
        let rows = (0..view.pattern_length())
            .map(|row| view.row(frame, row))
            .collect();
        Some(Self {
            frame,
            patterns: selectors.patterns().to_vec(),
            rows,
        })
    }
}

/// Run the frame command
pub fn run(path: &str, frame: usize, json: bool) -> Result<ExitCode> {
    if json {
        let module = match load_module(path) {
            Ok(module) => module,
            Err(err) => return emit_failure(&err),
        };
        return match FrameDump::collect(&module, frame) {
            Some(dump) => CommandOutput::success(dump, &module.warnings).emit(),
            None => CommandOutput::<()>::failure(JsonError::new(
                error_codes::OUT_OF_RANGE,
                out_of_range(frame, &module),
            ))
            .emit(),
        };
    }

    let module = load_module(path)?;
    let Some(dump) = FrameDump::collect(&module, frame) else {
        bail!(out_of_range(frame, &module));
    };

    let selectors = dump
        .patterns
        .iter()
        .map(|index| format!("{:02X}", index))
        .collect::<Vec<_>>()
        .join(" ");
    println!(
        "{} {:02X}  {} {}",
        "Frame".cyan().bold(),
        dump.frame,
        "patterns:".dimmed(),
        selectors
    );
    for (row, cells) in dump.rows.iter().enumerate() {
        let line = cells
            .iter()
            .map(Cell::to_string)
            .collect::<Vec<_>>()
            .join(" | ");
        println!("{} | {}", format!("{:02X}", row).dimmed(), line);
    }
    Ok(ExitCode::SUCCESS)
}

fn out_of_range(frame: usize, module: &Module) -> String {
    format!(
        "frame {} out of range (module has {} frames)",
        frame,
        module.frames.len()
    )
}
