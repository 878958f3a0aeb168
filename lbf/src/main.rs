use std::fs;
use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::{info, warn};

use foamcut::io::export::export_solution;
use foamcut::io::import::import_instance;
use foamcut::io::svg::generate_svg;
use lbf::config::LBFConfig;
use lbf::io::cli::Cli;
use lbf::io::output::LBFOutput;
use lbf::opt::lbf_nest::LBFOptimizer;
use lbf::{EPOCH, io};

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let config = match args.config_file {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            LBFConfig::default()
        }
        Some(config_file) => {
            let file = File::open(&config_file)
                .with_context(|| format!("could not open config file: {}", config_file.display()))?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).context("incorrect config file format")?
        }
    };
    config.validate()?;

    info!("[MAIN] Successfully parsed LBFConfig: {config:?}");

    let input_stem = args
        .input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .context("input file has no valid name")?
        .to_string();

    if !args.solution_folder.exists() {
        fs::create_dir_all(&args.solution_folder).with_context(|| {
            format!("could not create solution folder: {}", args.solution_folder.display())
        })?;
    }

    let ext_instance = io::read_instance(args.input_file.as_path())?;
    let (parts, sheet_types) = import_instance(&ext_instance)?;
    info!(
        "[MAIN] instance {} contains {} parts and {} sheet types",
        ext_instance.name,
        parts.len(),
        sheet_types.len()
    );

    let result = LBFOptimizer::new(parts, sheet_types, config.clone()).solve();

    for (i, sheet) in result.placements.iter().enumerate() {
        let svg_path = args.solution_folder.join(format!("sol_{input_stem}_{i}.svg"));
        let svg = generate_svg(&sheet.parts, &format!("{} sheet {}", ext_instance.name, i));
        io::write_svg(&svg, &svg_path)?;
    }

    let output = LBFOutput {
        solution: export_solution(&ext_instance.name, &result, EPOCH.elapsed()),
        instance: ext_instance,
        config,
    };
    let solution_path = args.solution_folder.join(format!("sol_{input_stem}.json"));
    io::write_json(&output, &solution_path)?;

    Ok(())
}
