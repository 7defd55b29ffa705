//! Prepares the town boundary layer for the web map.
//!
//! The source layer is the MOI town boundary set converted to WGS84
//! `GeoJSON`. Each feature is trimmed to its code and name properties,
//! given an `admin_key` (county + town), and its polygons are simplified
//! in Web Mercator metres so the tolerance means the same thing at every
//! latitude.

use std::f64::consts::FRAC_PI_4;

use geo::{MapCoords, MultiPolygon, SimplifyVwPreserve};
use geojson::{Feature, FeatureCollection, JsonObject};

use crate::{REGION_FIELD, SUB_REGION_FIELD, region_name, sub_region_name, to_multi_polygon};

/// Property holding the MOI town code.
pub const TOWN_CODE_FIELD: &str = "TOWNCODE";

/// Property holding the county + town key added to each feature.
pub const ADMIN_KEY_FIELD: &str = "admin_key";

/// Default simplification tolerance, in metres.
pub const DEFAULT_TOLERANCE_M: f64 = 300.0;

const EARTH_RADIUS_M: f64 = 6_378_137.0;

fn to_mercator(coord: geo::Coord<f64>) -> geo::Coord<f64> {
    let lat = coord.y.to_radians();
    geo::Coord {
        x: EARTH_RADIUS_M * coord.x.to_radians(),
        y: EARTH_RADIUS_M * (FRAC_PI_4 + lat / 2.0).tan().ln(),
    }
}

fn from_mercator(coord: geo::Coord<f64>) -> geo::Coord<f64> {
    geo::Coord {
        x: (coord.x / EARTH_RADIUS_M).to_degrees(),
        y: (2.0 * (coord.y / EARTH_RADIUS_M).exp().atan() - 2.0 * FRAC_PI_4).to_degrees(),
    }
}

/// Simplifies lon/lat polygons with a tolerance given in metres.
///
/// Uses topology-preserving Visvalingam-Whyatt simplification, so rings
/// never self-intersect or collapse. A vertex is removed when the
/// triangle it forms with its neighbours is smaller than
/// `tolerance_m * tolerance_m` square metres.
#[must_use]
pub fn simplify_polygons(polygons: &MultiPolygon<f64>, tolerance_m: f64) -> MultiPolygon<f64> {
    polygons
        .map_coords(to_mercator)
        .simplify_vw_preserve(tolerance_m * tolerance_m)
        .map_coords(from_mercator)
}

/// Trims and simplifies every feature of the town layer.
///
/// Output features keep only `TOWNCODE` (when present), `COUNTYNAME`,
/// `TOWNNAME` and the added `admin_key`. Features with non-polygonal
/// geometry are skipped.
#[must_use]
pub fn simplify_layer(collection: &FeatureCollection, tolerance_m: f64) -> FeatureCollection {
    let mut vertices_in = 0;
    let mut vertices_out = 0;

    let features: Vec<Feature> = collection
        .features
        .iter()
        .enumerate()
        .filter_map(|(i, feature)| {
            let Some(polygons) = to_multi_polygon(feature) else {
                log::warn!("Skipping feature {i}: geometry is not polygonal");
                return None;
            };
            let simplified = simplify_polygons(&polygons, tolerance_m);
            vertices_in += vertex_count(&polygons);
            vertices_out += vertex_count(&simplified);

            Some(Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(&simplified))),
                id: None,
                properties: Some(trimmed_properties(feature)),
                foreign_members: None,
            })
        })
        .collect();

    log::info!(
        "Simplified {} features ({vertices_in} -> {vertices_out} vertices, tolerance {tolerance_m} m)",
        features.len()
    );

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn trimmed_properties(feature: &Feature) -> JsonObject {
    let county = region_name(feature).unwrap_or_default();
    let town = sub_region_name(feature).unwrap_or_default();

    let mut properties = JsonObject::new();
    if let Some(code) = feature.property(TOWN_CODE_FIELD) {
        properties.insert(TOWN_CODE_FIELD.to_string(), code.clone());
    }
    properties.insert(REGION_FIELD.to_string(), county.into());
    properties.insert(SUB_REGION_FIELD.to_string(), town.into());
    properties.insert(ADMIN_KEY_FIELD.to_string(), format!("{county}{town}").into());
    properties
}

fn vertex_count(polygons: &MultiPolygon<f64>) -> usize {
    polygons
        .iter()
        .map(|p| p.exterior().0.len() + p.interiors().iter().map(|r| r.0.len()).sum::<usize>())
        .sum()
}

#[cfg(test)]
mod tests {
    use geo::{Area, LineString, Polygon};

    use super::*;

    /// A 0.1 degree square whose bottom edge is a saw of 10 m teeth.
    fn jagged_square() -> MultiPolygon<f64> {
        let mut ring = vec![(121.0, 25.0)];
        for i in 1..200 {
            let x = 0.1f64.mul_add(f64::from(i) / 200.0, 121.0);
            let y = if i % 2 == 0 { 25.0 } else { 25.0001 };
            ring.push((x, y));
        }
        ring.extend([(121.1, 25.0), (121.1, 25.1), (121.0, 25.1), (121.0, 25.0)]);
        MultiPolygon::new(vec![Polygon::new(LineString::from(ring), vec![])])
    }

    #[test]
    fn removes_small_teeth_and_keeps_the_shape() {
        let jagged = jagged_square();
        let simplified = simplify_polygons(&jagged, DEFAULT_TOLERANCE_M);

        let before = vertex_count(&jagged);
        let after = vertex_count(&simplified);
        assert!(after < before / 10, "{before} -> {after}");
        assert!(after >= 4);

        let drift = (simplified.unsigned_area() - jagged.unsigned_area()).abs();
        assert!(drift / jagged.unsigned_area() < 0.01);
    }

    #[test]
    fn mercator_round_trip_is_stable() {
        let coord = geo::Coord { x: 121.5654, y: 25.033 };
        let back = from_mercator(to_mercator(coord));
        assert!((back.x - coord.x).abs() < 1e-9);
        assert!((back.y - coord.y).abs() < 1e-9);
    }

    #[test]
    fn layer_keeps_names_and_adds_admin_key() {
        let mut properties = JsonObject::new();
        properties.insert("TOWNCODE".to_string(), "63000020".into());
        properties.insert("COUNTYNAME".to_string(), "臺北市".into());
        properties.insert("TOWNNAME".to_string(), "大安區".into());
        properties.insert("TOWNENG".to_string(), "Da'an District".into());

        let collection = FeatureCollection {
            bbox: None,
            features: vec![
                Feature {
                    bbox: None,
                    geometry: Some(geojson::Geometry::new(geojson::Value::from(&jagged_square()))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                },
                Feature {
                    bbox: None,
                    geometry: Some(geojson::Geometry::new(geojson::Value::Point(vec![
                        121.0, 25.0,
                    ]))),
                    id: None,
                    properties: None,
                    foreign_members: None,
                },
            ],
            foreign_members: None,
        };

        let simplified = simplify_layer(&collection, DEFAULT_TOLERANCE_M);
        assert_eq!(simplified.features.len(), 1);

        let props = simplified.features[0].properties.as_ref().unwrap();
        assert_eq!(props.len(), 4);
        assert_eq!(props["admin_key"], "臺北市大安區");
        assert_eq!(props["TOWNCODE"], "63000020");
        assert!(!props.contains_key("TOWNENG"));
    }
}
