//! Info command implementation
//!
//! Prints a summary of a module: song info, engine parameters and table sizes.

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use ftm_format::{ExpansionChips, InstrumentKind, Machine, Module};
use serde::Serialize;

use super::json_output::{emit_failure, CommandOutput};
use super::load_module;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InstrumentSummary {
    pub id: u32,
    pub kind: InstrumentKind,
    pub name: String,
}

/// Module overview printed by `ftm info`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InfoSummary {
    pub title: String,
    pub author: String,
    pub copyright: String,
    pub machine: Machine,
    pub expansion: ExpansionChips,
    pub channels: usize,
    pub effect_columns: Vec<u8>,
    pub speed: u32,
    pub tempo: u32,
    pub pattern_length: u32,
    pub frames: usize,
    pub patterns: usize,
    pub sequences: usize,
    pub instruments: Vec<InstrumentSummary>,
    pub dpcm_samples: usize,
}

impl From<&Module> for InfoSummary {
    fn from(module: &Module) -> Self {
        Self {
            title: module.info.title.clone(),
            author: module.info.author.clone(),
            copyright: module.info.copyright.clone(),
            machine: module.params.machine,
            expansion: module.params.expansion,
            channels: module.channel_count(),
            effect_columns: module
                .track
                .channels
                .iter()
                .map(|channel| channel.extra_effect_columns)
                .collect(),
            speed: module.frames.speed,
            tempo: module.frames.tempo,
            pattern_length: module.frames.pattern_length,
            frames: module.frames.len(),
            patterns: module.patterns.patterns.len(),
            sequences: module.sequences.records.len(),
            instruments: module
                .instruments
                .instruments
                .iter()
                .map(|instrument| InstrumentSummary {
                    id: instrument.id,
                    kind: instrument.kind,
                    name: instrument.name.clone(),
                })
                .collect(),
            dpcm_samples: module.dpcm.as_ref().map_or(0, |dpcm| dpcm.len()),
        }
    }
}

/// Run the info command
pub fn run(path: &str, json: bool) -> Result<ExitCode> {
    if json {
        return match load_module(path) {
            Ok(module) => {
                CommandOutput::success(InfoSummary::from(&module), &module.warnings).emit()
            }
            Err(err) => emit_failure(&err),
        };
    }

    let module = load_module(path)?;
    let summary = InfoSummary::from(&module);

    println!("{} {}", "Module:".cyan().bold(), path);
    println!("  {:<12} {}", "Title:".dimmed(), summary.title);
    println!("  {:<12} {}", "Author:".dimmed(), summary.author);
    println!("  {:<12} {}", "Copyright:".dimmed(), summary.copyright);
    println!("  {:<12} {:?}", "Machine:".dimmed(), summary.machine);
    if !summary.expansion.is_empty() {
        println!("  {:<12} {:?}", "Expansion:".dimmed(), summary.expansion);
    }
    println!(
        "  {:<12} {} (effect columns {:?})",
        "Channels:".dimmed(),
        summary.channels,
        summary
            .effect_columns
            .iter()
            .map(|extra| extra + 1)
            .collect::<Vec<_>>()
    );
    println!(
        "  {:<12} speed {}, tempo {}, {} rows per pattern",
        "Timing:".dimmed(),
        summary.speed,
        summary.tempo,
        summary.pattern_length
    );
    println!(
        "  {:<12} {} frames, {} patterns, {} sequences, {} DPCM samples",
        "Contents:".dimmed(),
        summary.frames,
        summary.patterns,
        summary.sequences,
        summary.dpcm_samples
    );

    if !summary.instruments.is_empty() {
        println!("\n{}", "Instruments:".cyan().bold());
        for instrument in &summary.instruments {
            println!(
                "  {:02X} {:<6} {}",
                instrument.id,
                format!("{:?}", instrument.kind),
                instrument.name
            );
        }
    }

    print_warnings(&module);
    Ok(ExitCode::SUCCESS)
}

/// Print collected decode warnings in yellow.
pub(crate) fn print_warnings(module: &Module) {
    if module.warnings.is_empty() {
        return;
    }
    println!("\n{} {}", "Warnings:".yellow().bold(), module.warnings.len());
    for warning in &module.warnings {
        println!("  {} [{}] {}", "!".yellow(), warning.code(), warning);
    }
}
