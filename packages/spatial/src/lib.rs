#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `GeoJSON` helpers for the administrative boundary layers.
//!
//! Town features carry `COUNTYNAME` and `TOWNNAME` properties, county
//! features only `COUNTYNAME`. Geometry is opaque to the classification
//! core; this crate only reads the name properties to derive entity keys,
//! filters features by county, computes map bounds, simplifies the raw
//! town layer, and dissolves town polygons into county polygons for the
//! county layer.

pub mod dissolve;
pub mod simplify;

use std::path::Path;

use geo::{BoundingRect, MultiPolygon};
use geojson::{Feature, FeatureCollection, GeoJson};
use price_map_stats_models::EntityKey;
use serde::Serialize;
use thiserror::Error;

/// Property holding the county (region) name.
pub const REGION_FIELD: &str = "COUNTYNAME";

/// Property holding the town (sub-region) name.
pub const SUB_REGION_FIELD: &str = "TOWNNAME";

/// Errors that can occur while reading or writing boundary layers.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// Reading or writing a local file failed.
    #[error("I/O error for {location}: {source}")]
    Io {
        /// Path that failed.
        location: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The text is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Serializing the output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid `GeoJSON`, but not a `FeatureCollection`.
    #[error("Expected a GeoJSON FeatureCollection")]
    NotFeatureCollection,
}

/// Parses a `FeatureCollection` from text.
///
/// # Errors
///
/// * [`SpatialError::GeoJson`] if the text is not valid `GeoJSON`
/// * [`SpatialError::NotFeatureCollection`] for a bare geometry or feature
pub fn parse_feature_collection(text: &str) -> Result<FeatureCollection, SpatialError> {
    match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) | GeoJson::Geometry(_) => Err(SpatialError::NotFeatureCollection),
    }
}

/// Reads a `FeatureCollection` from a local file.
///
/// # Errors
///
/// Returns [`SpatialError::Io`] if the file cannot be read, or any error
/// from [`parse_feature_collection`].
pub fn read_feature_collection(path: &Path) -> Result<FeatureCollection, SpatialError> {
    let text = std::fs::read_to_string(path).map_err(|source| SpatialError::Io {
        location: path.display().to_string(),
        source,
    })?;
    parse_feature_collection(&text)
}

/// Writes a `FeatureCollection` to a local file.
///
/// # Errors
///
/// Returns [`SpatialError::Json`] if serialization fails or
/// [`SpatialError::Io`] if the file cannot be written.
pub fn write_feature_collection(
    path: &Path,
    collection: &FeatureCollection,
) -> Result<(), SpatialError> {
    let text = serde_json::to_string(collection)?;
    std::fs::write(path, text).map_err(|source| SpatialError::Io {
        location: path.display().to_string(),
        source,
    })
}

fn string_property<'a>(feature: &'a Feature, field: &str) -> Option<&'a str> {
    feature
        .property(field)
        .and_then(serde_json::Value::as_str)
}

/// The feature's county name, if present.
#[must_use]
pub fn region_name(feature: &Feature) -> Option<&str> {
    string_property(feature, REGION_FIELD)
}

/// The feature's town name, if present.
#[must_use]
pub fn sub_region_name(feature: &Feature) -> Option<&str> {
    string_property(feature, SUB_REGION_FIELD)
}

/// Entity key of a feature; missing names count as empty strings.
#[must_use]
pub fn feature_key(feature: &Feature) -> EntityKey {
    price_map_stats::entity_key(
        region_name(feature).unwrap_or_default(),
        sub_region_name(feature).unwrap_or_default(),
    )
}

/// Features whose county name equals `region` exactly.
#[must_use]
pub fn features_in_region<'a>(collection: &'a FeatureCollection, region: &str) -> Vec<&'a Feature> {
    collection
        .features
        .iter()
        .filter(|feature| region_name(feature).unwrap_or_default() == region)
        .collect()
}

/// Distinct county names in collection order.
#[must_use]
pub fn region_names(collection: &FeatureCollection) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in collection.features.iter().filter_map(region_name) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Converts a feature's geometry to a [`MultiPolygon`].
///
/// Handles both `Polygon` and `MultiPolygon` geometry types; anything else
/// gives `None`.
#[must_use]
pub fn to_multi_polygon(feature: &Feature) -> Option<MultiPolygon<f64>> {
    let geometry = feature.geometry.clone()?;
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

/// Longitude/latitude bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    /// Minimum longitude.
    pub west: f64,
    /// Minimum latitude.
    pub south: f64,
    /// Maximum longitude.
    pub east: f64,
    /// Maximum latitude.
    pub north: f64,
}

impl Bounds {
    /// Grows the box on every side by `ratio` of its width/height.
    #[must_use]
    pub fn pad(self, ratio: f64) -> Self {
        let width = (self.east - self.west).abs() * ratio;
        let height = (self.north - self.south).abs() * ratio;
        Self {
            west: self.west - width,
            south: self.south - height,
            east: self.east + width,
            north: self.north + height,
        }
    }

    fn union(self, other: Self) -> Self {
        Self {
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            north: self.north.max(other.north),
        }
    }
}

/// Bounding box of all polygonal features, or `None` if there are none.
#[must_use]
pub fn bounds_of(features: &[&Feature]) -> Option<Bounds> {
    features
        .iter()
        .filter_map(|feature| to_multi_polygon(feature))
        .filter_map(|mp| mp.bounding_rect())
        .map(|rect| Bounds {
            west: rect.min().x,
            south: rect.min().y,
            east: rect.max().x,
            north: rect.max().y,
        })
        .reduce(Bounds::union)
}
