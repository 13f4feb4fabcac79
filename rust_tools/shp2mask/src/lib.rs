// Library exports for testing and reuse

pub mod cli;
pub mod crs;
pub mod cutline;
pub mod error;
pub mod grid;
pub mod output;

use log::info;
use std::path::{Path, PathBuf};

// Re-export commonly used types
pub use cutline::{clip_to_cutline, validate_boundary, ClipOptions};
pub use error::{Result, Shp2MaskError};
pub use grid::{build_reference_grid, grid_info, GridDescription, GridInfo, GridParams};
pub use output::{write_mask, OutputTarget, WriteOptions};

/// Output base path used when none is given
pub const DEFAULT_MASK_PATH: &str = "mask";

#[derive(Debug, Clone, Default)]
pub struct MaskOptions {
    pub clip: ClipOptions,
    pub write: WriteOptions,
}

/// Rasterize the polygons of `shapefile` onto the grid described by
/// `description` and write the mask to `mask_path`.
///
/// A `.tif`/`.tiff` path gets a GeoTIFF, a `.npy` path a boolean array, any
/// other path both, with the extensions appended. Returns the written files.
/// Outputs may be missing or partial when an error is returned.
pub fn shp2mask(
    shapefile: &Path,
    description: &GridDescription,
    mask_path: &Path,
    options: &MaskOptions,
) -> Result<Vec<PathBuf>> {
    output::validate_compression(&options.write.compression)?;
    cutline::validate_boundary(shapefile, options.clip.layer.as_deref())?;

    let reference = grid::build_reference_grid(description)?;
    let reference_info = grid::grid_info(&reference)?;
    info!(
        "Grid: {}x{} pixels, {:?} CRS",
        reference_info.width,
        reference_info.height,
        crs::describe_crs(&reference_info.projection)
    );

    let mask = cutline::clip_to_cutline(&reference, shapefile, &options.clip)?;
    drop(reference);

    let target = OutputTarget::from_path(mask_path);
    output::write_mask(&mask, &target, &options.write)
}
