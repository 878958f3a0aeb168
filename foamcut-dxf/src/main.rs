use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::{LevelFilter, error, info};

use foamcut_dxf::DxfConverter;

#[derive(ClapParser, Debug)]
#[command(author, version, about = "Converts SVG cutting files to DXF using the conversion service")]
struct Cli {
    /// Public URLs of the SVG files to convert
    #[arg(required = true)]
    svg_urls: Vec<String>,
    /// Base URL of the conversion service, read from DXF_SERVICE_URL when omitted
    #[arg(long, value_name = "URL")]
    service_url: Option<String>,
    #[arg(
        short,
        long,
        value_name = "[off, error, warn, info, debug, trace]",
        default_value = "info"
    )]
    log_level: LevelFilter,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    env_logger::Builder::from_default_env()
        .filter_level(args.log_level)
        .init();

    let service_url = match args.service_url {
        Some(url) => url,
        None => env::var("DXF_SERVICE_URL")
            .context("--service-url or the DXF_SERVICE_URL environment variable is required")?,
    };
    info!("[MAIN] using DXF service at {service_url}");
    let converter = DxfConverter::new(&service_url)?;

    let mut n_failed = 0;
    for svg_url in args.svg_urls.iter() {
        match converter.convert(svg_url).await {
            Ok(path) => println!("{svg_url} -> {path}"),
            Err(e) => {
                error!("[MAIN] {svg_url}: {e}");
                n_failed += 1;
            }
        }
    }

    match n_failed {
        0 => Ok(ExitCode::SUCCESS),
        n => {
            error!("[MAIN] {n}/{} conversions failed", args.svg_urls.len());
            Ok(ExitCode::FAILURE)
        }
    }
}
