use std::fs;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use log::{LevelFilter, info};
use serde::Serialize;

use foamcut::io::ext_repr::ExtNestingInstance;

use crate::EPOCH;

pub mod cli;
pub mod output;

pub fn read_instance(path: &Path) -> Result<ExtNestingInstance> {
    let file = File::open(path).with_context(|| format!("could not open instance file: {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("could not parse instance file: {}", path.display()))
}

pub fn write_json(json: &impl Serialize, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("could not open solution file: {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, json)
        .with_context(|| format!("could not write solution file: {}", path.display()))?;

    info!("[IO] solution written to file:///{}", fs::canonicalize(path)?.display());
    Ok(())
}

pub fn write_svg(svg: &str, path: &Path) -> Result<()> {
    fs::write(path, svg).with_context(|| format!("could not write svg file: {}", path.display()))?;
    info!("[IO] svg written to file:///{}", fs::canonicalize(path)?.display());
    Ok(())
}

pub fn init_logger(level_filter: LevelFilter) -> Result<()> {
    apply_logger(level_filter, std::io::stdout())
}

/// Same format as [`init_logger`], for binaries that reserve stdout for their own output
pub fn init_stderr_logger(level_filter: LevelFilter) -> Result<()> {
    apply_logger(level_filter, std::io::stderr())
}

fn apply_logger(level_filter: LevelFilter, output: impl Into<fern::Output>) -> Result<()> {
    fern::Dispatch::new()
        // Perform allocation-free log formatting
        .format(|out, message, record| {
            let handle = std::thread::current();
            let thread_name = handle.name().unwrap_or("-");

            let duration = EPOCH.elapsed();
            let sec = duration.as_secs() % 60;
            let min = (duration.as_secs() / 60) % 60;
            let hours = (duration.as_secs() / 60) / 60;

            let prefix = format!(
                "[{}] [{:0>2}:{:0>2}:{:0>2}] <{}>",
                record.level(),
                hours,
                min,
                sec,
                thread_name,
            );

            out.finish(format_args!("{prefix:<27}{message}"))
        })
        // Add blanket level filter
        .level(level_filter)
        .chain(output)
        .apply()
        .context("could not initialize logger")?;
    info!("[MAIN] epoch: {}", jiff::Timestamp::now());
    Ok(())
}
