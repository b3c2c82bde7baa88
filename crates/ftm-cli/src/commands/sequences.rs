//! Sequences command implementation
//!
//! Lists the assembled curve table, one line per (id, kind).

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use ftm_format::{Module, SequenceKind};
use serde::Serialize;

use super::json_output::{emit_failure, CommandOutput};
use super::load_module;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SequenceSummary {
    pub id: usize,
    pub kind: SequenceKind,
    pub values: Vec<i8>,
    pub loop_point: Option<usize>,
    pub release_point: Option<usize>,
}

/// Every curve in the table, ordered by id then kind.
pub fn collect(module: &Module) -> Vec<SequenceSummary> {
    module
        .sequences
        .groups
        .iter()
        .enumerate()
        .flat_map(|(id, group)| {
            group.kinds().filter_map(move |kind| {
                group.get(kind).map(|sequence| SequenceSummary {
                    id,
                    kind,
                    values: sequence.values.clone(),
                    loop_point: sequence.loop_point(),
                    release_point: sequence.release_point(),
                })
            })
        })
        .collect()
}

/// Run the sequences command
pub fn run(path: &str, json: bool) -> Result<ExitCode> {
    if json {
        return match load_module(path) {
            Ok(module) => CommandOutput::success(collect(&module), &module.warnings).emit(),
            Err(err) => emit_failure(&err),
        };
    }

    let module = load_module(path)?;
    let sequences = collect(&module);
    println!("{} {}", "Sequences:".cyan().bold(), sequences.len());

    for sequence in &sequences {
        let values = sequence
            .values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let mut text = value.to_string();
                if sequence.loop_point == Some(i) {
                    text.insert(0, '|');
                }
                if sequence.release_point == Some(i) {
                    text.insert(0, '/');
                }
                text
            })
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "  {:02X} {:<9} {}",
            sequence.id,
            sequence.kind.name(),
            values
        );
    }

    super::info::print_warnings(&module);
    Ok(ExitCode::SUCCESS)
}
