//! Field coordinate helpers
//!
//! The gantry reports positions in its own Scanalyzer frame (metres). These are
//! mapped onto the field's UTM grid (zone 12N) with a fitted affine transform
//! and then onto WGS84 latitude/longitude.

use gdal::errors::GdalError;
use gdal::spatial_ref::{AxisMappingStrategy, CoordTransform, SpatialRef};
use serde_json::{json, Value};

use crate::stereo_pipeline::common::error::{ConversionError, Result};

/// Geographic extent of one image, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl GpsBounds {
    /// Smallest bounds containing every `(lat, lon)` point, if there is one.
    pub fn enclosing(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut points = points.into_iter();
        let (lat, lon) = points.next()?;
        let mut bounds = Self { lat_min: lat, lat_max: lat, lon_min: lon, lon_max: lon };
        for (lat, lon) in points {
            bounds.lat_min = bounds.lat_min.min(lat);
            bounds.lat_max = bounds.lat_max.max(lat);
            bounds.lon_min = bounds.lon_min.min(lon);
            bounds.lon_max = bounds.lon_max.max(lon);
        }
        Some(bounds)
    }

    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.lat_min, self.lat_max, self.lon_min, self.lon_max)
    }
}

/// Extracts `(lat_min, lat_max, lon_min, lon_max)` from a GeoJSON geometry.
///
/// Accepts a Polygon object, a JSON string holding one, or a bare ring of
/// `[lon, lat]` positions. Returns `None` when no position can be read.
pub fn geojson_to_bounds(value: &Value) -> Option<GpsBounds> {
    match value {
        Value::String(text) => {
            let parsed: Value = serde_json::from_str(text).ok()?;
            geojson_to_bounds(&parsed)
        }
        Value::Object(map) => geojson_to_bounds(map.get("coordinates")?),
        Value::Array(_) => {
            let mut points = Vec::new();
            collect_positions(value, &mut points);
            GpsBounds::enclosing(points)
        }
        _ => None,
    }
}

/// Walks nested coordinate arrays, collecting `(lat, lon)` from every position.
fn collect_positions(value: &Value, points: &mut Vec<(f64, f64)>) {
    let Value::Array(items) = value else {
        return;
    };
    match (items.first().and_then(Value::as_f64), items.get(1).and_then(Value::as_f64)) {
        (Some(lon), Some(lat)) => points.push((lat, lon)),
        _ => items.iter().for_each(|item| collect_positions(item, points)),
    }
}

/// Closed GeoJSON polygon around `bounds`, wound counter-clockwise from the south-west.
pub fn bounds_to_geojson(bounds: &GpsBounds) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": [[
            [bounds.lon_min, bounds.lat_min],
            [bounds.lon_max, bounds.lat_min],
            [bounds.lon_max, bounds.lat_max],
            [bounds.lon_min, bounds.lat_max],
            [bounds.lon_min, bounds.lat_min],
        ]]
    })
}

pub fn point_to_geojson(lat: f64, lon: f64) -> Value {
    json!({
        "type": "Point",
        "coordinates": [lon, lat]
    })
}

// Scanalyzer -> MAC UTM affine fit.
const AY: f64 = 3659974.971;
const BY: f64 = 1.0002;
const CY: f64 = 0.0078;
const AX: f64 = 409012.2032;
const BX: f64 = 0.009;
const CX: f64 = -0.9986;

// Residual offset between the fitted grid and surveyed lat/lon.
const LAT_SHIFT: f64 = 0.000015258894;
const LON_SHIFT: f64 = 0.000020308287;

/// WGS84 / UTM zone 12N, the grid the MAC field is surveyed in.
const MAC_UTM_EPSG: u32 = 32612;
const WGS84_EPSG: u32 = 4326;

/// Gantry coordinates in metres to MAC field UTM easting/northing.
pub fn scanalyzer_to_utm(scan_x: f64, scan_y: f64) -> (f64, f64) {
    let easting = AX + BX * scan_x + CX * scan_y;
    let northing = AY + BY * scan_x + CY * scan_y;
    (easting, northing)
}

fn projection_err(e: GdalError) -> ConversionError {
    ConversionError::Projection(e.to_string())
}

/// Reprojects MAC field coordinates to WGS84.
pub struct FieldProjection {
    utm_to_wgs84: CoordTransform,
}

impl FieldProjection {
    pub fn new() -> Result<Self> {
        let mut utm = SpatialRef::from_epsg(MAC_UTM_EPSG).map_err(projection_err)?;
        let mut wgs84 = SpatialRef::from_epsg(WGS84_EPSG).map_err(projection_err)?;
        // x = easting / lon, y = northing / lat on both sides.
        utm.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
        wgs84.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);

        let utm_to_wgs84 = CoordTransform::new(&utm, &wgs84).map_err(projection_err)?;
        Ok(Self { utm_to_wgs84 })
    }

    /// UTM zone 12N easting/northing to WGS84 `(lat, lon)` in degrees.
    pub fn utm_to_latlon(&self, easting: f64, northing: f64) -> Result<(f64, f64)> {
        let mut xs = [easting];
        let mut ys = [northing];
        let mut zs = [0.0_f64];
        self.utm_to_wgs84
            .transform_coords(&mut xs, &mut ys, &mut zs)
            .map_err(projection_err)?;
        Ok((ys[0], xs[0]))
    }

    /// Gantry coordinates in metres to WGS84 `(lat, lon)`.
    pub fn scanalyzer_to_latlon(&self, scan_x: f64, scan_y: f64) -> Result<(f64, f64)> {
        let (easting, northing) = scanalyzer_to_utm(scan_x, scan_y);
        let (lat, lon) = self.utm_to_latlon(easting, northing)?;
        Ok((lat + LAT_SHIFT, lon + LON_SHIFT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_bounds_from_polygon() {
        let polygon = json!({
            "type": "Polygon",
            "coordinates": [[
                [-111.97496, 33.07615],
                [-111.97495, 33.07616],
                [-111.97493, 33.07598],
                [-111.97494, 33.07597],
                [-111.97496, 33.07615]
            ]]
        });

        let bounds = geojson_to_bounds(&polygon).unwrap();
        assert_eq!(bounds.as_tuple(), (33.07597, 33.07616, -111.97496, -111.97493));
    }

    #[test]
    fn test_bounds_from_string_and_ring() {
        let ring = json!([[1.0, 2.0], [3.0, 4.0]]);
        let text = Value::String(
            json!({"type": "Polygon", "coordinates": [[[1.0, 2.0], [3.0, 4.0]]]}).to_string(),
        );

        let expected = GpsBounds { lat_min: 2.0, lat_max: 4.0, lon_min: 1.0, lon_max: 3.0 };
        assert_eq!(geojson_to_bounds(&ring), Some(expected));
        assert_eq!(geojson_to_bounds(&text), Some(expected));
    }

    #[test]
    fn test_bounds_rejects_non_geometry() {
        assert_eq!(geojson_to_bounds(&json!(null)), None);
        assert_eq!(geojson_to_bounds(&json!({"type": "Polygon"})), None);
        assert_eq!(geojson_to_bounds(&json!([])), None);
        assert_eq!(geojson_to_bounds(&Value::String("not json".into())), None);
    }

    #[test]
    fn test_geojson_roundtrip_of_bounds() {
        let bounds = GpsBounds { lat_min: 33.0, lat_max: 33.1, lon_min: -112.0, lon_max: -111.9 };
        assert_eq!(geojson_to_bounds(&bounds_to_geojson(&bounds)), Some(bounds));
    }

    #[test]
    fn test_utm_central_meridian_on_equator() {
        let projection = FieldProjection::new().unwrap();

        let (lat, lon) = projection.utm_to_latlon(500000.0, 0.0).unwrap();
        assert!(approx(lat, 0.0, 1e-9));
        assert!(approx(lon, -111.0, 1e-9));
    }

    #[test]
    fn test_utm_to_latlon_at_field() {
        let projection = FieldProjection::new().unwrap();

        let (lat, lon) = projection.utm_to_latlon(409012.2032, 3659974.971).unwrap();
        assert!(approx(lat, 33.0745, 0.001), "lat {lat}");
        assert!(approx(lon, -111.9748, 0.001), "lon {lon}");
    }

    #[test]
    fn test_scanalyzer_origin_near_field_corner() {
        let projection = FieldProjection::new().unwrap();

        let (lat, lon) = projection.scanalyzer_to_latlon(0.0, 0.0).unwrap();
        assert!(approx(lat, 33.0745, 0.01), "lat {lat}");
        assert!(approx(lon, -111.9748, 0.01), "lon {lon}");
    }

    #[test]
    fn test_scanalyzer_axes() {
        let projection = FieldProjection::new().unwrap();

        let (lat0, lon0) = projection.scanalyzer_to_latlon(0.0, 0.0).unwrap();
        // Gantry x runs north along the field, gantry y runs west.
        let (lat_x, _) = projection.scanalyzer_to_latlon(100.0, 0.0).unwrap();
        let (_, lon_y) = projection.scanalyzer_to_latlon(0.0, 10.0).unwrap();
        assert!(lat_x > lat0);
        assert!(lon_y < lon0);
    }
}
