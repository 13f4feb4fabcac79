use crate::crs;
use crate::error::{Result, Shp2MaskError};
use gdal::raster::Buffer;
use gdal::{Dataset, DriverManager, Metadata};
use log::{debug, info};
use std::path::PathBuf;

/// Metadata item recording whether pixel values describe areas or points
pub const AREA_OR_POINT: &str = "AREA_OR_POINT";

/// Explicit, unrotated WGS84 grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridParams {
    pub origin_x: f64,
    pub origin_y: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
    pub rows: usize,
    pub cols: usize,
}

impl GridParams {
    pub fn geo_transform(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            0.0,
            self.origin_y,
            0.0,
            self.pixel_height,
        ]
    }
}

/// Parses `(origin_x, origin_y, pixel_width, pixel_height, rows, cols)`
impl<'a> TryFrom<&'a [f64]> for GridParams {
    type Error = Shp2MaskError;

    fn try_from(values: &'a [f64]) -> Result<Self> {
        let [origin_x, origin_y, pixel_width, pixel_height, rows, cols] = values else {
            return Err(Shp2MaskError::InvalidDescription(format!(
                "expected 6 values (origin_x, origin_y, pixel_width, pixel_height, rows, cols), \
                 got {}",
                values.len()
            )));
        };

        for (name, value) in [
            ("origin_x", origin_x),
            ("origin_y", origin_y),
            ("pixel_width", pixel_width),
            ("pixel_height", pixel_height),
        ] {
            if !value.is_finite() {
                return Err(Shp2MaskError::InvalidDescription(format!(
                    "{} is not a finite number: {}",
                    name, value
                )));
            }
        }
        if *pixel_width == 0.0 || *pixel_height == 0.0 {
            return Err(Shp2MaskError::InvalidDescription(format!(
                "pixel size must be non-zero: {} x {}",
                pixel_width, pixel_height
            )));
        }

        Ok(GridParams {
            origin_x: *origin_x,
            origin_y: *origin_y,
            pixel_width: *pixel_width,
            pixel_height: *pixel_height,
            rows: positive_count("rows", *rows)?,
            cols: positive_count("cols", *cols)?,
        })
    }
}

fn positive_count(name: &str, value: f64) -> Result<usize> {
    // GDAL stores raster sizes as C ints
    if !value.is_finite() || value < 1.0 || value.fract() != 0.0 || value > i32::MAX as f64 {
        return Err(Shp2MaskError::InvalidDescription(format!(
            "{} must be a positive whole number, got {}",
            name, value
        )));
    }
    Ok(value as usize)
}

/// Where the mask grid comes from
#[derive(Debug, Clone, PartialEq)]
pub enum GridDescription {
    /// Existing raster used as a template
    Raster(PathBuf),
    Explicit(GridParams),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridInfo {
    pub width: usize,
    pub height: usize,
    pub geotransform: [f64; 6],
    pub projection: String,
    pub area_or_point: Option<String>,
}

impl GridInfo {
    fn from_params(params: &GridParams) -> Result<Self> {
        Ok(GridInfo {
            width: params.cols,
            height: params.rows,
            geotransform: params.geo_transform(),
            projection: crs::wgs84_wkt()?,
            area_or_point: Some("Point".to_string()),
        })
    }
}

/// Extract the grid definition of a dataset without reading pixels
pub fn grid_info(dataset: &Dataset) -> Result<GridInfo> {
    let (width, height) = dataset.raster_size();

    if width == 0 || height == 0 {
        return Err(Shp2MaskError::InvalidDimensions(width, height));
    }

    Ok(GridInfo {
        width,
        height,
        geotransform: dataset.geo_transform()?,
        projection: dataset.projection(),
        area_or_point: dataset.metadata_item(AREA_OR_POINT, ""),
    })
}

/// Create a zero-filled single-band Byte MEM dataset on the given grid
pub(crate) fn create_mem_grid(info: &GridInfo) -> Result<Dataset> {
    let driver = DriverManager::get_driver_by_name("MEM")?;
    let mut dataset = driver.create_with_band_type::<u8, _>("", info.width, info.height, 1)?;

    dataset.set_geo_transform(&info.geotransform)?;
    if !info.projection.is_empty() {
        dataset.set_projection(&info.projection)?;
    }
    if let Some(value) = &info.area_or_point {
        dataset.set_metadata_item(AREA_OR_POINT, value, "")?;
    }

    Ok(dataset)
}

fn fill_ones(dataset: &Dataset, width: usize, height: usize) -> Result<()> {
    let mut band = dataset.rasterband(1)?;
    let mut buffer = Buffer::new((width, height), vec![1u8; width * height]);
    band.write((0, 0), (width, height), &mut buffer)?;
    Ok(())
}

/// Build the all-ones in-memory reference raster for a grid description
pub fn build_reference_grid(description: &GridDescription) -> Result<Dataset> {
    let info = match description {
        GridDescription::Raster(path) => {
            info!("Using raster template: {}", path.display());
            let template = Dataset::open(path).map_err(|source| Shp2MaskError::InputNotFound {
                path: path.clone(),
                source,
            })?;
            grid_info(&template)?
        }
        GridDescription::Explicit(params) => {
            info!(
                "Using explicit WGS84 grid: origin=({}, {}), pixel={} x {}",
                params.origin_x, params.origin_y, params.pixel_width, params.pixel_height
            );
            GridInfo::from_params(params)?
        }
    };

    debug!(
        "Reference grid: {}x{}, geotransform={:?}",
        info.width, info.height, info.geotransform
    );

    let dataset = create_mem_grid(&info)?;
    fill_ones(&dataset, info.width, info.height)?;
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_from_six_values() {
        let values = [10.0, 50.0, 0.01, -0.01, 100.0, 200.0];
        let params = GridParams::try_from(&values[..]).unwrap();
        assert_eq!(params.rows, 100);
        assert_eq!(params.cols, 200);
        assert_eq!(params.geo_transform(), [10.0, 0.01, 0.0, 50.0, 0.0, -0.01]);
    }

    #[test]
    fn test_params_wrong_length() {
        let five = [10.0, 50.0, 0.01, -0.01, 100.0];
        let seven = [10.0, 50.0, 0.01, -0.01, 100.0, 200.0, 1.0];
        assert!(matches!(
            GridParams::try_from(&five[..]),
            Err(Shp2MaskError::InvalidDescription(_))
        ));
        assert!(matches!(
            GridParams::try_from(&seven[..]),
            Err(Shp2MaskError::InvalidDescription(_))
        ));
    }

    #[test]
    fn test_params_invalid_counts() {
        for (rows, cols) in [(0.0, 10.0), (10.0, -3.0), (2.5, 10.0), (10.0, f64::NAN)] {
            let values = [0.0, 0.0, 1.0, -1.0, rows, cols];
            assert!(
                GridParams::try_from(&values[..]).is_err(),
                "rows={} cols={} should be rejected",
                rows,
                cols
            );
        }
    }

    #[test]
    fn test_params_invalid_pixel_size() {
        let zero = [0.0, 0.0, 0.0, -1.0, 10.0, 10.0];
        let infinite = [0.0, f64::INFINITY, 1.0, -1.0, 10.0, 10.0];
        assert!(GridParams::try_from(&zero[..]).is_err());
        assert!(GridParams::try_from(&infinite[..]).is_err());
    }

    #[test]
    fn test_explicit_reference_grid() {
        let values = [0.0, 10.0, 1.0, -1.0, 4.0, 6.0];
        let params = GridParams::try_from(&values[..]).unwrap();
        let dataset = build_reference_grid(&GridDescription::Explicit(params)).unwrap();

        let info = grid_info(&dataset).unwrap();
        assert_eq!((info.width, info.height), (6, 4));
        assert_eq!(info.geotransform, [0.0, 1.0, 0.0, 10.0, 0.0, -1.0]);
        assert_eq!(info.area_or_point.as_deref(), Some("Point"));
        assert_eq!(crs::describe_crs(&info.projection), crs::CrsKind::Geographic);

        let band = dataset.rasterband(1).unwrap();
        let buffer = band.read_as::<u8>((0, 0), (6, 4), (6, 4), None).unwrap();
        assert!(buffer.data().iter().all(|&v| v == 1));
    }

    #[test]
    fn test_missing_template_raster() {
        let description = GridDescription::Raster(PathBuf::from("/nonexistent/template.tif"));
        assert!(matches!(
            build_reference_grid(&description),
            Err(Shp2MaskError::InputNotFound { .. })
        ));
    }
}
