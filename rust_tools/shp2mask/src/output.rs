use crate::error::{Result, Shp2MaskError};
use crate::grid::{self, AREA_OR_POINT};
use gdal::cpl::CslStringList;
use gdal::raster::Buffer;
use gdal::{Dataset, DriverManager, Metadata};
use log::{debug, info};
use ndarray::Array2;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Where and in which format(s) the mask is written
#[derive(Debug, Clone, PartialEq)]
pub enum OutputTarget {
    GeoTiff(PathBuf),
    Npy(PathBuf),
    Both { tif: PathBuf, npy: PathBuf },
}

impl OutputTarget {
    /// Pick formats from the extension; unknown extensions get both formats appended
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

        match extension.as_deref() {
            Some("tif") | Some("tiff") => OutputTarget::GeoTiff(path.to_path_buf()),
            Some("npy") => OutputTarget::Npy(path.to_path_buf()),
            _ => OutputTarget::Both {
                tif: append_extension(path, "tif"),
                npy: append_extension(path, "npy"),
            },
        }
    }

    pub fn paths(&self) -> Vec<&Path> {
        match self {
            OutputTarget::GeoTiff(path) | OutputTarget::Npy(path) => vec![path.as_path()],
            OutputTarget::Both { tif, npy } => vec![tif.as_path(), npy.as_path()],
        }
    }
}

fn append_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// GeoTIFF writing options
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOptions {
    pub compression: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            compression: "NONE".to_string(),
        }
    }
}

/// Validate compression type
pub fn validate_compression(compression: &str) -> Result<()> {
    let valid_types = ["DEFLATE", "LZW", "ZSTD", "NONE"];
    if !valid_types.contains(&compression) {
        return Err(Shp2MaskError::InvalidCompression(compression.to_string()));
    }
    Ok(())
}

/// GTiff creation options for the given compression
pub fn create_dataset_options(compression: &str) -> Vec<String> {
    if compression == "NONE" {
        Vec::new()
    } else {
        vec![format!("COMPRESS={}", compression)]
    }
}

/// Read band 1 of a mask dataset into a (rows, cols) array
pub fn read_mask(dataset: &Dataset) -> Result<Array2<u8>> {
    let (width, height) = dataset.raster_size();
    let band = dataset.rasterband(1)?;
    let buffer = band.read_as::<u8>((0, 0), (width, height), (width, height), None)?;
    let data: Vec<u8> = buffer.into_iter().collect();
    Ok(Array2::from_shape_vec((height, width), data)?)
}

/// Copy the mask into a GeoTIFF, overwriting any existing file
pub fn write_geotiff(mask: &Dataset, path: &Path, options: &WriteOptions) -> Result<()> {
    validate_compression(&options.compression)?;
    info!("Writing GeoTIFF mask: {}", path.display());

    let info = grid::grid_info(mask)?;
    let driver = DriverManager::get_driver_by_name("GTiff")?;

    let creation_options = create_dataset_options(&options.compression);
    let created = if creation_options.is_empty() {
        driver.create_with_band_type::<u8, _>(path, info.width, info.height, 1)
    } else {
        let mut gdal_options = CslStringList::new();
        for opt in &creation_options {
            gdal_options.add_string(opt)?;
        }
        driver.create_with_band_type_with_options::<u8, _>(
            path,
            info.width,
            info.height,
            1,
            &gdal_options,
        )
    };
    let mut dataset = created.map_err(|e| Shp2MaskError::OutputWrite {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    dataset.set_geo_transform(&info.geotransform)?;
    if !info.projection.is_empty() {
        dataset.set_projection(&info.projection)?;
    }
    if let Some(value) = &info.area_or_point {
        dataset.set_metadata_item(AREA_OR_POINT, value, "")?;
    }

    let data: Vec<u8> = read_mask(mask)?.iter().copied().collect();
    let mut buffer = Buffer::new((info.width, info.height), data);
    {
        let mut band = dataset.rasterband(1)?;
        band.write((0, 0), (info.width, info.height), &mut buffer)?;
    }

    // Closing the dataset flushes it to disk
    drop(dataset);
    debug!("Closed {}", path.display());
    Ok(())
}

/// Save the mask as a boolean .npy array, overwriting any existing file
pub fn write_npy(mask: &Dataset, path: &Path) -> Result<()> {
    info!("Writing .npy mask: {}", path.display());

    let array: Array2<bool> = read_mask(mask)?.mapv(|v| v != 0);
    ndarray_npy::write_npy(path, &array).map_err(|e| Shp2MaskError::OutputWrite {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(())
}

/// Write the mask to every format the target asks for, returning the written paths
pub fn write_mask(
    mask: &Dataset,
    target: &OutputTarget,
    options: &WriteOptions,
) -> Result<Vec<PathBuf>> {
    match target {
        OutputTarget::GeoTiff(path) => write_geotiff(mask, path, options)?,
        OutputTarget::Npy(path) => write_npy(mask, path)?,
        OutputTarget::Both { tif, npy } => {
            write_geotiff(mask, tif, options)?;
            write_npy(mask, npy)?;
        }
    }

    Ok(target.paths().into_iter().map(Path::to_path_buf).collect())
}
