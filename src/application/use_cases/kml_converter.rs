// ============================================================
// KML CONVERTER USE CASE
// ============================================================
// Orchestrate geometry extraction, style resolution and soil
// classification over every Placemark of a KML document

use std::collections::BTreeMap;

use roxmltree::{Document, Node, ParsingOptions};

use super::kml_geometry::GeometryExtractor;
use super::kml_style::{child, child_text, parse_style, StyleTable};
use super::soil_classifier::SoilClassifier;
use crate::domain::error::{AppError, Result};
use crate::domain::kml::{
    Coordinate, Feature, FeatureCollection, FeatureProperties, Geometry, KmlConfig,
    KmlDiagnostics, Segment, Style,
};
use crate::domain::soil::SoilConfig;

/// Geometry accepted from one Placemark
enum PlacemarkShape {
    Point(Coordinate),
    Line {
        points: Vec<Coordinate>,
        segments: Vec<Segment>,
        total_distance: f64,
    },
    Polygon {
        rings: Vec<Vec<Coordinate>>,
        segments: Vec<Segment>,
        perimeter: f64,
        area: f64,
    },
}

/// KML -> FeatureCollection conversion use case
pub struct KmlConverter {
    config: KmlConfig,
    geometry: GeometryExtractor,
    classifier: SoilClassifier,
}

impl KmlConverter {
    pub fn new(config: KmlConfig, soil: SoilConfig) -> Self {
        let geometry = GeometryExtractor::new(config.earth_radius_m);
        Self {
            config,
            geometry,
            classifier: SoilClassifier::new(soil),
        }
    }

    /// Convert a KML document. Fails only when the XML itself is malformed.
    pub fn convert(&self, text: &str) -> Result<FeatureCollection> {
        self.convert_with_diagnostics(text).map(|(collection, _)| collection)
    }

    pub fn convert_with_diagnostics(
        &self,
        text: &str,
    ) -> Result<(FeatureCollection, KmlDiagnostics)> {
        let text = text.trim_start_matches('\u{feff}');
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(text, options).map_err(|e| {
            tracing::warn!(error = %e, "KML document is not well-formed XML");
            AppError::ParseError(format!("Invalid KML document: {}", e))
        })?;

        let styles = StyleTable::from_document(&doc);
        let mut diagnostics = KmlDiagnostics::default();
        let mut features = Vec::new();

        for placemark in doc
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "Placemark")
        {
            diagnostics.placemarks_seen += 1;
            let ordinal = diagnostics.placemarks_seen;

            match self.convert_placemark(placemark, ordinal, &styles, &mut diagnostics) {
                Some(feature) => features.push(feature),
                None => {
                    diagnostics.placemarks_dropped += 1;
                    tracing::debug!(ordinal, "Dropped placemark without usable geometry");
                }
            }
        }

        diagnostics.features_emitted = features.len();
        tracing::info!(
            placemarks = diagnostics.placemarks_seen,
            features = diagnostics.features_emitted,
            dropped = diagnostics.placemarks_dropped,
            bad_coordinates = diagnostics.coordinates_dropped,
            unresolved_styles = diagnostics.unresolved_styles,
            "KML conversion complete"
        );

        Ok((FeatureCollection::new(features), diagnostics))
    }

    fn convert_placemark(
        &self,
        placemark: Node,
        ordinal: usize,
        styles: &StyleTable,
        diagnostics: &mut KmlDiagnostics,
    ) -> Option<Feature> {
        let shape = self.extract_shape(placemark, diagnostics)?;

        let name = child_text(placemark, "name");
        let description = child_text(placemark, "description");
        let style = self.effective_style(placemark, styles, diagnostics);
        let color = style.as_ref().and_then(Style::classification_color);
        let soil = self
            .classifier
            .classify(name.as_deref(), description.as_deref(), color);

        let id = placemark
            .attribute("id")
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("feature-{}", ordinal));

        let mut properties = FeatureProperties {
            id,
            name,
            description,
            soil_type: soil.soil_type,
            depth: soil.depth_m,
            segments: None,
            total_distance: None,
            area_square_meters: None,
            style,
            metadata: extended_data(placemark),
        };

        let geometry = match shape {
            PlacemarkShape::Point(point) => Geometry::Point(point),
            PlacemarkShape::Line {
                points,
                segments,
                total_distance,
            } => {
                properties.segments = Some(segments);
                properties.total_distance = Some(total_distance);
                Geometry::LineString(points)
            }
            PlacemarkShape::Polygon {
                rings,
                segments,
                perimeter,
                area,
            } => {
                properties.segments = Some(segments);
                properties.total_distance = Some(perimeter);
                properties.area_square_meters = Some(area);
                Geometry::Polygon(rings)
            }
        };

        Some(Feature {
            geometry,
            properties,
        })
    }

    /// First geometry child that yields a usable shape
    fn extract_shape(
        &self,
        node: Node,
        diagnostics: &mut KmlDiagnostics,
    ) -> Option<PlacemarkShape> {
        node.children()
            .filter(Node::is_element)
            .find_map(|child_node| match child_node.tag_name().name() {
                "Point" => self.point_shape(child_node, diagnostics),
                "LineString" => self.line_shape(child_node, diagnostics),
                "Polygon" if self.config.emit_polygons => {
                    self.polygon_shape(child_node, diagnostics)
                }
                "MultiGeometry" => self.extract_shape(child_node, diagnostics),
                _ => None,
            })
    }

    fn coordinates(&self, node: Node, diagnostics: &mut KmlDiagnostics) -> Vec<Coordinate> {
        let text = child(node, "coordinates")
            .and_then(|n| n.text())
            .unwrap_or_default();
        let parsed = self.geometry.parse_coordinates(text);
        diagnostics.coordinates_dropped += parsed.dropped;
        parsed.points
    }

    fn point_shape(&self, node: Node, diagnostics: &mut KmlDiagnostics) -> Option<PlacemarkShape> {
        self.coordinates(node, diagnostics)
            .first()
            .copied()
            .map(PlacemarkShape::Point)
    }

    fn line_shape(&self, node: Node, diagnostics: &mut KmlDiagnostics) -> Option<PlacemarkShape> {
        let points = self.coordinates(node, diagnostics);
        let line = self.geometry.measure_line(&points)?;
        Some(PlacemarkShape::Line {
            points,
            segments: line.segments,
            total_distance: line.total_distance,
        })
    }

    fn polygon_shape(
        &self,
        node: Node,
        diagnostics: &mut KmlDiagnostics,
    ) -> Option<PlacemarkShape> {
        let ring_of = |boundary: Node, diagnostics: &mut KmlDiagnostics| {
            child(boundary, "LinearRing")
                .map(|ring| self.coordinates(ring, diagnostics))
                .and_then(|points| self.geometry.close_ring(&points))
        };

        let outer = child(node, "outerBoundaryIs").and_then(|b| ring_of(b, diagnostics))?;
        let mut rings = vec![outer];
        for boundary in node
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "innerBoundaryIs")
        {
            if let Some(inner) = ring_of(boundary, diagnostics) {
                rings.push(inner);
            }
        }

        let perimeter = self.geometry.measure_line(&rings[0])?;
        let area = self.geometry.polygon_area(&rings);
        Some(PlacemarkShape::Polygon {
            rings,
            segments: perimeter.segments,
            perimeter: perimeter.total_distance,
            area,
        })
    }

    /// `styleUrl` through the table, else an inline `<Style>`
    fn effective_style(
        &self,
        placemark: Node,
        styles: &StyleTable,
        diagnostics: &mut KmlDiagnostics,
    ) -> Option<Style> {
        let shared = child_text(placemark, "styleUrl").and_then(|url| {
            let resolved = styles.resolve(&url).cloned();
            if resolved.is_none() {
                diagnostics.unresolved_styles += 1;
                tracing::debug!(style_url = %url, "Unresolved style reference");
            }
            resolved
        });

        shared
            .or_else(|| child(placemark, "Style").map(parse_style))
            .filter(|style| !style.is_empty())
    }
}

impl Default for KmlConverter {
    fn default() -> Self {
        Self::new(KmlConfig::default(), SoilConfig::default())
    }
}

/// `<Data name><value>` and `<SimpleData name>` pairs
fn extended_data(placemark: Node) -> Option<BTreeMap<String, String>> {
    let extended = child(placemark, "ExtendedData")?;
    let mut metadata = BTreeMap::new();

    for node in extended.descendants().filter(Node::is_element) {
        let Some(key) = node.attribute("name") else {
            continue;
        };
        let value = match node.tag_name().name() {
            "Data" => child_text(node, "value"),
            "SimpleData" => node.text().map(|t| t.trim().to_string()),
            _ => None,
        };
        if let Some(value) = value {
            metadata.insert(key.to_string(), value);
        }
    }

    if metadata.is_empty() {
        None
    } else {
        Some(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::kml::GeometryKind;
    use crate::domain::soil::SoilType;

    const SURVEY: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>Survey Jalur Pipa</name>
    <Style id="yellow">
      <LineStyle><color>ff32c8e6</color><width>2</width></LineStyle>
    </Style>
    <StyleMap id="yellow-map">
      <Pair><key>normal</key><styleUrl>#yellow</styleUrl></Pair>
      <Pair><key>highlight</key><styleUrl>#other</styleUrl></Pair>
    </StyleMap>
    <Folder>
      <name>Jalur</name>
      <Placemark id="jalur-1">
        <name>Pasir Putih</name>
        <LineString>
          <coordinates>
            106.8000,-6.2000,0 106.8010,-6.2010,0 bad,tuple 106.8030,-6.2010,0
          </coordinates>
        </LineString>
      </Placemark>
      <Placemark>
        <name>Segmen B</name>
        <styleUrl>#yellow-map</styleUrl>
        <ExtendedData>
          <Data name="surveyor"><value>Budi</value></Data>
          <SchemaData schemaUrl="#s"><SimpleData name="kedalaman">2</SimpleData></SchemaData>
        </ExtendedData>
        <LineString><coordinates>106.81,-6.21 106.82,-6.22</coordinates></LineString>
      </Placemark>
      <Placemark>
        <name>Titik tanpa koordinat</name>
        <Point><coordinates>  </coordinates></Point>
      </Placemark>
      <Placemark>
        <name>Garis pendek</name>
        <LineString><coordinates>106.81,-6.21</coordinates></LineString>
      </Placemark>
      <Placemark>
        <name>Label saja</name>
      </Placemark>
    </Folder>
    <Placemark>
      <name>Area Batuan Keras</name>
      <styleUrl>#missing</styleUrl>
      <Point><coordinates>106.85,-6.25,12</coordinates></Point>
    </Placemark>
    <Placemark>
      <name>Blok</name>
      <description><![CDATA[<b>lapisan clay</b>]]></description>
      <Polygon>
        <outerBoundaryIs><LinearRing><coordinates>
          106.80,-6.20 106.81,-6.20 106.81,-6.21 106.80,-6.21 106.80,-6.20
        </coordinates></LinearRing></outerBoundaryIs>
      </Polygon>
    </Placemark>
    <Placemark>
      <name>Multi</name>
      <MultiGeometry>
        <LineString><coordinates>1,1</coordinates></LineString>
        <Point><coordinates>106.9,-6.3</coordinates></Point>
      </MultiGeometry>
    </Placemark>
  </Document>
</kml>"##;

    #[test]
    fn test_convert_survey_document() {
        let converter = KmlConverter::default();
        let (collection, diagnostics) = converter.convert_with_diagnostics(SURVEY).unwrap();

        let ids: Vec<&str> = collection
            .features
            .iter()
            .map(|f| f.properties.id.as_str())
            .collect();
        assert_eq!(ids, vec!["jalur-1", "feature-2", "feature-6", "feature-7", "feature-8"]);

        assert_eq!(diagnostics.placemarks_seen, 8);
        assert_eq!(diagnostics.features_emitted, 5);
        assert_eq!(diagnostics.placemarks_dropped, 3);
        assert_eq!(diagnostics.coordinates_dropped, 1);
        assert_eq!(diagnostics.unresolved_styles, 1);
    }

    #[test]
    fn test_line_feature_properties() {
        let collection = KmlConverter::default().convert(SURVEY).unwrap();
        let line = &collection.features[0];

        assert_eq!(line.kind(), GeometryKind::LineString);
        assert_eq!(line.properties.soil_type, SoilType::pasir());
        assert_eq!(line.properties.depth, 1.5);

        let segments = line.properties.segments.as_ref().unwrap();
        assert_eq!(segments.len(), 2);
        let sum: f64 = segments.iter().map(|s| s.distance).sum();
        assert!((sum - line.properties.total_distance.unwrap()).abs() < 1e-9);
        assert!(line.properties.style.is_none());
    }

    #[test]
    fn test_style_map_and_color_classification() {
        let collection = KmlConverter::default().convert(SURVEY).unwrap();
        let segmen_b = &collection.features[1];

        let style = segmen_b.properties.style.as_ref().unwrap();
        assert_eq!(style.line_color.as_deref(), Some("#e6c832"));
        assert_eq!(style.line_width, Some(2.0));

        // "Segmen B" has no keyword; sandy yellow line decides
        assert_eq!(segmen_b.properties.soil_type, SoilType::pasir());

        let metadata = segmen_b.properties.metadata.as_ref().unwrap();
        assert_eq!(metadata["surveyor"], "Budi");
        assert_eq!(metadata["kedalaman"], "2");
    }

    #[test]
    fn test_point_polygon_and_multigeometry() {
        let collection = KmlConverter::default().convert(SURVEY).unwrap();

        let rock = &collection.features[2];
        assert_eq!(rock.kind(), GeometryKind::Point);
        assert_eq!(rock.properties.soil_type, SoilType::batuan());
        assert!(rock.properties.segments.is_none());
        assert!(rock.properties.total_distance.is_none());

        let block = &collection.features[3];
        assert_eq!(block.kind(), GeometryKind::Polygon);
        assert_eq!(block.properties.soil_type, SoilType::tanah_liat());
        assert_eq!(block.properties.segments.as_ref().unwrap().len(), 4);
        assert!(block.properties.area_square_meters.unwrap() > 1_000_000.0);

        let multi = &collection.features[4];
        assert_eq!(multi.kind(), GeometryKind::Point);

        let stats = collection.statistics();
        assert_eq!(stats.polygon_count, 1);
        assert_eq!(stats.line_count, 2);
        assert_eq!(stats.point_count, 2);
    }

    const INLINE_STYLES: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <StyleMap id="rock-map">
      <Pair>
        <key>normal</key>
        <Style><LineStyle><color>ff646464</color></LineStyle></Style>
      </Pair>
    </StyleMap>
    <Placemark>
      <name>Segmen C</name>
      <styleUrl>#gone</styleUrl>
      <Style><LineStyle><color>ff32c8e6</color><width>4</width></LineStyle></Style>
      <LineString><coordinates>106.81,-6.21 106.82,-6.22</coordinates></LineString>
    </Placemark>
    <Placemark>
      <name>Segmen D</name>
      <styleUrl>#rock-map</styleUrl>
      <LineString><coordinates>106.82,-6.22 106.83,-6.23</coordinates></LineString>
    </Placemark>
  </Document>
</kml>"##;

    #[test]
    fn test_inline_style_when_style_url_is_unresolved() {
        let (collection, diagnostics) = KmlConverter::default()
            .convert_with_diagnostics(INLINE_STYLES)
            .unwrap();
        assert_eq!(diagnostics.unresolved_styles, 1);

        let segmen_c = &collection.features[0];
        let style = segmen_c.properties.style.as_ref().unwrap();
        assert_eq!(style.line_color.as_deref(), Some("#e6c832"));
        assert_eq!(style.line_width, Some(4.0));
        assert_eq!(segmen_c.properties.soil_type, SoilType::pasir());
    }

    #[test]
    fn test_style_map_inline_pair_drives_classification() {
        let collection = KmlConverter::default().convert(INLINE_STYLES).unwrap();
        let segmen_d = &collection.features[1];

        let style = segmen_d.properties.style.as_ref().unwrap();
        assert_eq!(style.line_color.as_deref(), Some("#646464"));
        assert_eq!(segmen_d.properties.soil_type, SoilType::batuan());
        assert_eq!(segmen_d.properties.depth, 2.5);
    }

    #[test]
    fn test_polygons_can_be_disabled() {
        let config = KmlConfig {
            emit_polygons: false,
            ..KmlConfig::default()
        };
        let converter = KmlConverter::new(config, SoilConfig::default());
        let collection = converter.convert(SURVEY).unwrap();
        assert_eq!(collection.len(), 4);
        assert_eq!(collection.statistics().polygon_count, 0);
    }

    #[test]
    fn test_malformed_xml_is_fatal() {
        let err = KmlConverter::default()
            .convert("<kml><Document><Placemark></Document></kml>")
            .unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)));
    }

    #[test]
    fn test_empty_document_yields_empty_collection() {
        let collection = KmlConverter::default()
            .convert(r#"<kml xmlns="http://www.opengis.net/kml/2.2"><Document/></kml>"#)
            .unwrap();
        assert!(collection.is_empty());
    }
}
