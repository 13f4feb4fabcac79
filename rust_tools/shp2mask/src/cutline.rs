use crate::error::{Result, Shp2MaskError};
use crate::grid;
use crate::output;
use gdal::vector::LayerAccess;
use gdal::Dataset;
use gdal_sys::GDALWarpAppOptions;
use log::{debug, info, warn};
use std::ffi::{c_char, c_int, CStr, CString};
use std::path::Path;
use std::ptr::{null, null_mut};

/// How the boundary is turned into a cutline
#[derive(Debug, Clone, Default)]
pub struct ClipOptions {
    /// Restrict the cutline to one layer of the vector dataset
    pub layer: Option<String>,
    /// Keep every pixel the polygon touches instead of only those whose centre is inside
    pub all_touched: bool,
}

impl ClipOptions {
    /// gdalwarp arguments for warping onto an existing destination grid
    pub fn warp_args(&self, boundary: &Path) -> Result<Vec<String>> {
        // GDAL receives the path as a C string; it must match the file opened earlier
        let boundary = boundary
            .to_str()
            .ok_or_else(|| Shp2MaskError::NonUtf8Path(boundary.to_path_buf()))?;

        let mut args = vec!["-cutline".to_string(), boundary.to_string()];
        if let Some(layer) = &self.layer {
            args.push("-cl".to_string());
            args.push(layer.clone());
        }
        if self.all_touched {
            args.push("-wo".to_string());
            args.push("CUTLINE_ALL_TOUCHED=TRUE".to_string());
        }
        Ok(args)
    }
}

/// Owns a GDALWarpAppOptions object
struct WarpAppOptions {
    c_options: *mut GDALWarpAppOptions,
}

impl WarpAppOptions {
    fn new(args: &[String]) -> Result<Self> {
        let cstr_args = args
            .iter()
            .map(|arg| CString::new(arg.as_str()))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // The C API is not const-correct; the strings are only read
        let mut c_args = cstr_args
            .iter()
            .map(|arg| arg.as_ptr() as *mut c_char)
            .chain(std::iter::once(null_mut()))
            .collect::<Vec<_>>();

        let c_options =
            unsafe { gdal_sys::GDALWarpAppOptionsNew(c_args.as_mut_ptr(), null_mut()) };
        if c_options.is_null() {
            return Err(Shp2MaskError::Warp(last_gdal_error("GDALWarpAppOptionsNew")));
        }

        Ok(Self { c_options })
    }
}

impl Drop for WarpAppOptions {
    fn drop(&mut self) {
        unsafe {
            gdal_sys::GDALWarpAppOptionsFree(self.c_options);
        }
    }
}

fn last_gdal_error(method_name: &str) -> String {
    let msg = unsafe { CStr::from_ptr(gdal_sys::CPLGetLastErrorMsg()) }
        .to_string_lossy()
        .into_owned();
    unsafe { gdal_sys::CPLErrorReset() };

    if msg.is_empty() {
        format!("{} returned a NULL pointer", method_name)
    } else {
        format!("{}: {}", method_name, msg)
    }
}

/// Open the vector boundary and count the features usable as cutline.
///
/// Without a layer name gdalwarp only reads the first layer, so only that
/// layer is counted.
pub fn validate_boundary(boundary: &Path, layer: Option<&str>) -> Result<u64> {
    let dataset = Dataset::open(boundary).map_err(|source| Shp2MaskError::InputNotFound {
        path: boundary.to_path_buf(),
        source,
    })?;

    let feature_count = match layer {
        Some(name) => {
            let layer = dataset
                .layer_by_name(name)
                .map_err(|source| Shp2MaskError::LayerNotFound {
                    path: boundary.to_path_buf(),
                    layer: name.to_string(),
                    source,
                })?;
            layer.feature_count()
        }
        None if dataset.layer_count() == 0 => 0,
        None => dataset.layer(0)?.feature_count(),
    };

    if feature_count == 0 {
        return Err(Shp2MaskError::EmptyBoundary(boundary.to_path_buf()));
    }

    debug!(
        "Boundary {} has {} feature(s)",
        boundary.display(),
        feature_count
    );
    Ok(feature_count)
}

/// Clip the reference raster by the boundary polygon.
///
/// The result lives on exactly the reference grid. Pixels inside the cutline
/// copy the reference value, all others stay 0. A boundary that does not
/// intersect the grid therefore produces an all-zero mask.
pub fn clip_to_cutline(
    reference: &Dataset,
    boundary: &Path,
    options: &ClipOptions,
) -> Result<Dataset> {
    let info = grid::grid_info(reference)?;
    let mask = grid::create_mem_grid(&info)?;

    let args = options.warp_args(boundary)?;
    debug!("gdalwarp arguments: {:?}", args);
    let warp_options = WarpAppOptions::new(&args)?;

    let mut usage_error: c_int = 0;
    let result = unsafe {
        let mut sources = [reference.c_dataset()];
        gdal_sys::GDALWarp(
            null(),
            mask.c_dataset(),
            1,
            sources.as_mut_ptr(),
            warp_options.c_options,
            &mut usage_error,
        )
    };

    if usage_error != 0 {
        return Err(Shp2MaskError::Warp(format!(
            "invalid gdalwarp arguments {:?}",
            args
        )));
    }
    // On success GDALWarp hands back the destination handle, which `mask` already owns
    if result.is_null() {
        return Err(Shp2MaskError::Warp(last_gdal_error("GDALWarp")));
    }

    let inside = output::read_mask(&mask)?.iter().filter(|&&v| v != 0).count();
    if inside == 0 {
        warn!(
            "Boundary {} does not intersect the grid; mask is all zeros",
            boundary.display()
        );
    } else {
        info!(
            "Mask covers {} of {} pixels",
            inside,
            info.width * info.height
        );
    }

    Ok(mask)
}
