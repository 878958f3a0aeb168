use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::Parser as ClapParser;
use log::{LevelFilter, info, warn};

use foamcut_utils::svg_validation::DimensionTable;
use foamcut_utils::svg_validation::checkpoint::{
    check_folder, check_manifest, read_manifest, write_report,
};

#[derive(ClapParser, Debug)]
#[command(
    author,
    version,
    about = "Checks SVG assets against the expected dimensions of their SKU"
)]
struct Cli {
    /// Folder of `{sku}.svg` files
    #[arg(long, value_name = "FOLDER")]
    svg_folder: Option<PathBuf>,
    /// JSON list of `{sku, path}` entries, validated instead of a folder
    #[arg(long, value_name = "FILE")]
    manifest: Option<PathBuf>,
    /// Reference table replacing the embedded one
    #[arg(long, value_name = "FILE")]
    dimensions_file: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "[off, error, warn, info, debug, trace]",
        default_value = "info"
    )]
    log_level: LevelFilter,
}

fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    //stdout only carries the report
    lbf::io::init_stderr_logger(args.log_level)?;

    let table = match &args.dimensions_file {
        Some(path) => DimensionTable::from_file(path)?,
        None => {
            warn!("[MAIN] no dimensions file provided, using the embedded reference table");
            DimensionTable::embedded()?
        }
    };
    info!("[MAIN] reference table contains {} SKUs", table.len());

    let results = match (&args.manifest, &args.svg_folder) {
        (Some(manifest), _) => {
            let entries = read_manifest(manifest)?;
            let base_dir = manifest.parent().map(PathBuf::from).unwrap_or_default();
            check_manifest(&table, &entries, &base_dir)?
        }
        (None, Some(folder)) => check_folder(&table, folder)?,
        (None, None) => bail!("either --svg-folder or --manifest is required"),
    };

    write_report(&mut std::io::stdout().lock(), &results)?;

    let n_failed = results.iter().filter(|r| !r.is_valid).count();
    match n_failed {
        0 => {
            info!("[MAIN] all {} SVGs passed", results.len());
            Ok(ExitCode::SUCCESS)
        }
        n => {
            warn!("[MAIN] {n}/{} SVGs failed validation", results.len());
            Ok(ExitCode::FAILURE)
        }
    }
}
