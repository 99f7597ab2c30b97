use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Geometry, GeometryKind, Segment, Style};
use crate::domain::soil::SoilType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperties {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub soil_type: SoilType,
    /// Meters, derived from the soil type
    pub depth: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<Segment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_square_meters: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
}

/// GeoJSON feature (`"type": "Feature"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

impl Feature {
    pub fn kind(&self) -> GeometryKind {
        self.geometry.kind()
    }
}

/// GeoJSON feature collection in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStatistics {
    pub point_count: usize,
    pub line_count: usize,
    pub polygon_count: usize,
    /// Sum of LineString lengths in meters (polygon perimeters excluded)
    pub total_line_length: f64,
    pub soil_counts: BTreeMap<SoilType, usize>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn statistics(&self) -> FeatureStatistics {
        let mut stats = FeatureStatistics::default();
        for feature in &self.features {
            match feature.kind() {
                GeometryKind::Point => stats.point_count += 1,
                GeometryKind::LineString => {
                    stats.line_count += 1;
                    stats.total_line_length += feature.properties.total_distance.unwrap_or(0.0);
                }
                GeometryKind::Polygon => stats.polygon_count += 1,
            }
            *stats
                .soil_counts
                .entry(feature.properties.soil_type.clone())
                .or_insert(0) += 1;
        }
        stats
    }
}

/// Counts of elements skipped while converting one KML document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KmlDiagnostics {
    pub placemarks_seen: usize,
    pub features_emitted: usize,
    /// Placemarks with no geometry or too few valid points
    pub placemarks_dropped: usize,
    /// Coordinate tuples that did not parse as two finite numbers
    pub coordinates_dropped: usize,
    pub unresolved_styles: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::kml::Coordinate;

    fn feature(geometry: Geometry, soil: SoilType, total: Option<f64>) -> Feature {
        Feature {
            geometry,
            properties: FeatureProperties {
                id: "f".to_string(),
                name: None,
                description: None,
                soil_type: soil,
                depth: 2.0,
                segments: None,
                total_distance: total,
                area_square_meters: None,
                style: None,
                metadata: None,
            },
        }
    }

    #[test]
    fn test_statistics_counts_kinds_and_soils() {
        let a = Coordinate::new(106.0, -6.0).unwrap();
        let b = Coordinate::new(106.1, -6.0).unwrap();
        let collection = FeatureCollection::new(vec![
            feature(Geometry::Point(a), SoilType::pasir(), None),
            feature(Geometry::LineString(vec![a, b]), SoilType::pasir(), Some(100.0)),
            feature(Geometry::LineString(vec![b, a]), SoilType::batuan(), Some(50.0)),
            feature(Geometry::Polygon(vec![vec![a, b, a]]), SoilType::batuan(), Some(9.0)),
        ]);

        let stats = collection.statistics();
        assert_eq!(stats.point_count, 1);
        assert_eq!(stats.line_count, 2);
        assert_eq!(stats.polygon_count, 1);
        assert_eq!(stats.total_line_length, 150.0);
        assert_eq!(stats.soil_counts[&SoilType::pasir()], 2);
        assert_eq!(stats.soil_counts[&SoilType::batuan()], 2);
    }

    #[test]
    fn test_collection_json_shape() {
        let a = Coordinate::new(106.0, -6.0).unwrap();
        let collection =
            FeatureCollection::new(vec![feature(Geometry::Point(a), SoilType::pasir(), None)]);
        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["type"], "Feature");
        assert_eq!(json["features"][0]["geometry"]["type"], "Point");
        assert_eq!(json["features"][0]["properties"]["soilType"], "Pasir");
        assert!(json["features"][0]["properties"].get("segments").is_none());
    }
}
