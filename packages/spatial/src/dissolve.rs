//! Dissolves town polygons into one polygon per county.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use geo::{BooleanOps, MultiPolygon};
use geojson::{Feature, FeatureCollection, JsonObject};

use crate::{REGION_FIELD, region_name, to_multi_polygon};

/// Groups features by county and unions their geometry.
///
/// The output features carry only the `COUNTYNAME` property and are
/// ordered by county name. Features with a blank county name or
/// non-polygonal geometry are skipped.
#[must_use]
pub fn dissolve_by_region(collection: &FeatureCollection) -> FeatureCollection {
    let mut groups: BTreeMap<String, MultiPolygon<f64>> = BTreeMap::new();

    for (i, feature) in collection.features.iter().enumerate() {
        let Some(name) = region_name(feature).map(str::trim).filter(|s| !s.is_empty()) else {
            log::warn!("Skipping feature {i}: no {REGION_FIELD}");
            continue;
        };
        let Some(polygons) = to_multi_polygon(feature) else {
            log::warn!("Skipping feature {i} ({name}): geometry is not polygonal");
            continue;
        };

        match groups.entry(name.to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(polygons);
            }
            Entry::Occupied(mut entry) => {
                let merged = entry.get().union(&polygons);
                entry.insert(merged);
            }
        }
    }

    log::info!(
        "Dissolved {} features into {} regions",
        collection.features.len(),
        groups.len()
    );

    let features = groups
        .into_iter()
        .map(|(name, polygons)| {
            let mut properties = JsonObject::new();
            properties.insert(REGION_FIELD.to_string(), serde_json::Value::String(name));
            Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(&polygons))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
