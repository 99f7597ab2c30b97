// ============================================================
// COORDINATES & GEOMETRY
// ============================================================
// Positions, segments and the GeoJSON-shaped geometry enum

use serde::{Deserialize, Serialize};

/// A WGS84 position. Serialized as a GeoJSON `[lon, lat]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 2]", try_from = "[f64; 2]")]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    /// Returns `None` unless both components are finite.
    pub fn new(lon: f64, lat: f64) -> Option<Self> {
        if lon.is_finite() && lat.is_finite() {
            Some(Self { lon, lat })
        } else {
            None
        }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lon, c.lat]
    }
}

impl TryFrom<[f64; 2]> for Coordinate {
    type Error = String;

    fn try_from(value: [f64; 2]) -> Result<Self, Self::Error> {
        Coordinate::new(value[0], value[1])
            .ok_or_else(|| format!("non-finite coordinate {:?}", value))
    }
}

/// One leg between two consecutive positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Coordinate,
    pub end: Coordinate,
    /// Great-circle length in meters
    pub distance: f64,
    /// Initial bearing in degrees, [0, 360)
    pub bearing: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Coordinate),
    LineString(Vec<Coordinate>),
    /// Outer ring first, then inner rings. Rings are closed.
    Polygon(Vec<Vec<Coordinate>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
        }
    }
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryKind::Point => write!(f, "Point"),
            GeometryKind::LineString => write!(f, "LineString"),
            GeometryKind::Polygon => write!(f, "Polygon"),
        }
    }
}
