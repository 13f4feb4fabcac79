use crate::error::{Result, Shp2MaskError};
use crate::grid::{GridDescription, GridParams};
use crate::{ClipOptions, MaskOptions, WriteOptions, DEFAULT_MASK_PATH};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shp2mask")]
#[command(about = "Rasterize a polygon boundary into a 0/1 mask on a target grid")]
#[command(version)]
#[command(group(ArgGroup::new("grid_source").required(true).args(["like", "grid"])))]
pub struct Args {
    /// Vector boundary (shapefile or any OGR dataset)
    #[arg(short, long, value_name = "FILE")]
    pub shapefile: PathBuf,

    /// Raster whose grid and projection the mask copies
    #[arg(short, long, value_name = "RASTER")]
    pub like: Option<PathBuf>,

    /// Explicit WGS84 grid
    #[arg(
        short,
        long,
        num_args = 6,
        allow_negative_numbers = true,
        value_names = ["ORIGIN_X", "ORIGIN_Y", "PIXEL_WIDTH", "PIXEL_HEIGHT", "ROWS", "COLS"]
    )]
    pub grid: Option<Vec<f64>>,

    /// Output path; .tif or .npy selects one format, anything else writes both
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_MASK_PATH)]
    pub output: PathBuf,

    /// Only use this layer of the vector dataset
    #[arg(long, value_name = "NAME")]
    pub layer: Option<String>,

    /// Keep every pixel touched by the boundary, not only pixel centres inside it
    #[arg(long)]
    pub all_touched: bool,

    /// GeoTIFF compression (DEFLATE, LZW, ZSTD, NONE)
    #[arg(long, default_value = "NONE")]
    pub compress: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn description(&self) -> Result<GridDescription> {
        match (&self.like, &self.grid) {
            (_, Some(values)) => Ok(GridDescription::Explicit(GridParams::try_from(
                values.as_slice(),
            )?)),
            (Some(path), None) => Ok(GridDescription::Raster(path.clone())),
            (None, None) => Err(Shp2MaskError::InvalidDescription(
                "either --like or --grid is required".to_string(),
            )),
        }
    }

    pub fn mask_options(&self) -> MaskOptions {
        MaskOptions {
            clip: ClipOptions {
                layer: self.layer.clone(),
                all_touched: self.all_touched,
            },
            write: WriteOptions {
                compression: self.compress.to_ascii_uppercase(),
            },
        }
    }
}
