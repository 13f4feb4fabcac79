use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Shp2MaskError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("Array shape error: {0}")]
    ShapeError(#[from] ndarray::ShapeError),

    #[error("String contains an interior NUL byte: {0}")]
    Nul(#[from] std::ffi::NulError),

    #[error("Cannot open input {path:?}: {source}")]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: gdal::errors::GdalError,
    },

    #[error("Layer {layer:?} not found in {path:?}: {source}")]
    LayerNotFound {
        path: PathBuf,
        layer: String,
        #[source]
        source: gdal::errors::GdalError,
    },

    #[error("Path is not valid UTF-8: {0:?}")]
    NonUtf8Path(PathBuf),

    #[error("Invalid grid description: {0}")]
    InvalidDescription(String),

    #[error("Input raster has invalid dimensions: {0}x{1}")]
    InvalidDimensions(usize, usize),

    #[error("Vector boundary {0:?} contains no features")]
    EmptyBoundary(PathBuf),

    #[error("Cutline warp failed: {0}")]
    Warp(String),

    #[error("Cannot write output {path:?}: {reason}")]
    OutputWrite { path: PathBuf, reason: String },

    #[error("Invalid compression type: {0}")]
    InvalidCompression(String),
}

pub type Result<T> = std::result::Result<T, Shp2MaskError>;
