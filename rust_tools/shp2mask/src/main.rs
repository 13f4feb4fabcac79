use clap::Parser;
use env_logger::Env;
use log::info;

use shp2mask::cli::Args;
use shp2mask::Result;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    info!("=== Shapefile to Mask ===");

    let description = args.description()?;
    let options = args.mask_options();

    info!("Boundary: {}", args.shapefile.display());
    let written = shp2mask::shp2mask(&args.shapefile, &description, &args.output, &options)?;

    for path in &written {
        info!("Wrote {}", path.display());
    }

    info!("=== Done! ===");
    Ok(())
}
