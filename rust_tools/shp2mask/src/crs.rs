use crate::error::Result;
use gdal::spatial_ref::SpatialRef;
use log::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrsKind {
    Geographic, // lat/lon in degrees
    Projected,  // planar, linear units
    Unknown,
}

/// WKT of the WGS84 geographic CRS used for explicit grid descriptions
pub fn wgs84_wkt() -> Result<String> {
    let srs = SpatialRef::from_definition("WGS84")?;
    Ok(srs.to_wkt()?)
}

/// Classify a projection WKT for logging and sanity checks
pub fn describe_crs(projection_wkt: &str) -> CrsKind {
    if projection_wkt.trim().is_empty() {
        warn!("Grid has no spatial reference; cutline is assumed to share its coordinates");
        return CrsKind::Unknown;
    }

    let spatial_ref = match SpatialRef::from_wkt(projection_wkt) {
        Ok(sr) => sr,
        Err(e) => {
            warn!("Failed to parse projection WKT: {}", e);
            return CrsKind::Unknown;
        }
    };

    if spatial_ref.is_geographic() {
        debug!("Geographic CRS detected (lat/lon)");
        return CrsKind::Geographic;
    }

    if spatial_ref.is_projected() {
        debug!(
            "Projected CRS detected (linear units={:.6})",
            spatial_ref.linear_units()
        );
        return CrsKind::Projected;
    }

    warn!("Unknown CRS type");
    CrsKind::Unknown
}
