//! Query command implementation
//!
//! Resolves one (frame, row, channel) cell through the playback view.

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use ftm_format::{Cell, Module, Note, Sequence, SequenceKind};
use serde::Serialize;

use super::json_output::{emit_failure, CommandOutput};
use super::load_module;

/// A resolved cell plus the curves its instrument binds.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QueryResult {
    pub frame: usize,
    pub row: usize,
    pub channel: usize,
    pub cell: Cell,
    pub note: Note,
    /// Tracker notation of the cell
    pub display: String,
    pub curves: Vec<BoundCurve>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BoundCurve {
    pub kind: SequenceKind,
    pub sequence: Sequence,
}

impl QueryResult {
    pub fn resolve(module: &Module, frame: usize, row: usize, channel: usize) -> Self {
        let view = module.playback();
        let cell = view.cell(frame, row, channel);
        let curves = SequenceKind::ALL
            .into_iter()
            .filter_map(|kind| {
                view.instrument_curve(&cell, kind).map(|sequence| BoundCurve {
                    kind,
                    sequence: sequence.clone(),
                })
            })
            .collect();
        Self {
            frame,
            row,
            channel,
            cell,
            note: cell.note(),
            display: cell.to_string(),
            curves,
        }
    }
}

/// Run the query command
pub fn run(path: &str, frame: usize, row: usize, channel: usize, json: bool) -> Result<ExitCode> {
    if json {
        return match load_module(path) {
            Ok(module) => {
                let result = QueryResult::resolve(&module, frame, row, channel);
                CommandOutput::success(result, &module.warnings).emit()
            }
            Err(err) => emit_failure(&err),
        };
    }

    let module = load_module(path)?;
    let result = QueryResult::resolve(&module, frame, row, channel);

    println!(
        "{} frame {:02X} row {:02X} channel {}",
        "Cell:".cyan().bold(),
        frame,
        row,
        channel
    );
    println!("  {}", result.display);
    if result.cell.is_empty() {
        println!("  {}", "(no event)".dimmed());
    }
    for curve in &result.curves {
        let values = curve
            .sequence
            .values
            .iter()
            .map(i8::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        println!("  {:<9} {}", format!("{}:", curve.kind).dimmed(), values);
    }
    Ok(ExitCode::SUCCESS)
}
