//! Coordinate parsing and great-circle measurements for KML geometry.
//!
//! Every measurement returns a finite value: invalid input measures as `0.0`.
//! A `0.0` distance therefore does not prove the inputs were valid.

use crate::domain::kml::{Coordinate, Segment};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Result of parsing one `<coordinates>` text block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCoordinates {
    pub points: Vec<Coordinate>,
    /// Tuples that were not two finite numbers
    pub dropped: usize,
}

/// Length and legs of a polyline
#[derive(Debug, Clone, PartialEq)]
pub struct LineMeasurement {
    pub segments: Vec<Segment>,
    pub total_distance: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct GeometryExtractor {
    earth_radius_m: f64,
}

impl Default for GeometryExtractor {
    fn default() -> Self {
        Self::new(EARTH_RADIUS_M)
    }
}

impl GeometryExtractor {
    pub fn new(earth_radius_m: f64) -> Self {
        Self { earth_radius_m }
    }

    /// Parse `"lon,lat[,alt] lon,lat ..."`. Bad tuples are skipped.
    pub fn parse_coordinates(&self, text: &str) -> ParsedCoordinates {
        let mut parsed = ParsedCoordinates::default();

        for token in text.split_whitespace() {
            let mut parts = token.split(',');
            let lon = parts.next().and_then(|p| p.trim().parse::<f64>().ok());
            let lat = parts.next().and_then(|p| p.trim().parse::<f64>().ok());

            match (lon, lat) {
                (Some(lon), Some(lat)) => match Coordinate::new(lon, lat) {
                    Some(c) => parsed.points.push(c),
                    None => parsed.dropped += 1,
                },
                _ => parsed.dropped += 1,
            }
        }

        parsed
    }

    /// Haversine distance in meters
    pub fn distance(&self, a: &Coordinate, b: &Coordinate) -> f64 {
        let (phi1, phi2) = (a.lat.to_radians(), b.lat.to_radians());
        let d_phi = (b.lat - a.lat).to_radians();
        let d_lambda = (b.lon - a.lon).to_radians();

        let h = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        // rounding can push h just outside [0, 1]
        let h = h.clamp(0.0, 1.0);
        let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

        finite_or_zero(self.earth_radius_m * c)
    }

    /// Initial bearing (forward azimuth) in degrees, [0, 360)
    pub fn bearing(&self, a: &Coordinate, b: &Coordinate) -> f64 {
        let (phi1, phi2) = (a.lat.to_radians(), b.lat.to_radians());
        let d_lambda = (b.lon - a.lon).to_radians();

        let y = d_lambda.sin() * phi2.cos();
        let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
        let degrees = finite_or_zero(y.atan2(x).to_degrees()).rem_euclid(360.0);

        if degrees >= 360.0 {
            0.0
        } else {
            degrees
        }
    }

    /// One segment per consecutive pair
    pub fn segments(&self, points: &[Coordinate]) -> Vec<Segment> {
        points
            .windows(2)
            .map(|pair| Segment {
                start: pair[0],
                end: pair[1],
                distance: self.distance(&pair[0], &pair[1]),
                bearing: self.bearing(&pair[0], &pair[1]),
            })
            .collect()
    }

    /// `None` when fewer than two points are available
    pub fn measure_line(&self, points: &[Coordinate]) -> Option<LineMeasurement> {
        if points.len() < 2 {
            return None;
        }
        let segments = self.segments(points);
        let total_distance = segments.iter().map(|s| s.distance).sum();
        Some(LineMeasurement {
            segments,
            total_distance,
        })
    }

    /// Closes a ring by repeating its first point. Needs 3 distinct points.
    pub fn close_ring(&self, points: &[Coordinate]) -> Option<Vec<Coordinate>> {
        let mut ring: Vec<Coordinate> = Vec::with_capacity(points.len() + 1);
        for p in points {
            if ring.last() != Some(p) {
                ring.push(*p);
            }
        }
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }

        let mut distinct: Vec<&Coordinate> = Vec::new();
        for p in &ring {
            if !distinct.contains(&p) {
                distinct.push(p);
            }
        }
        if distinct.len() < 3 {
            return None;
        }

        ring.push(ring[0]);
        Some(ring)
    }

    /// Unsigned spherical area of a closed ring in square meters
    pub fn ring_area(&self, ring: &[Coordinate]) -> f64 {
        if ring.len() < 4 {
            return 0.0;
        }
        let sum: f64 = ring
            .windows(2)
            .map(|pair| {
                let (p1, p2) = (pair[0], pair[1]);
                (p2.lon - p1.lon).to_radians()
                    * (2.0 + p1.lat.to_radians().sin() + p2.lat.to_radians().sin())
            })
            .sum();
        finite_or_zero((sum * self.earth_radius_m * self.earth_radius_m / 2.0).abs())
    }

    /// Outer ring area minus holes, never negative
    pub fn polygon_area(&self, rings: &[Vec<Coordinate>]) -> f64 {
        let Some((outer, holes)) = rings.split_first() else {
            return 0.0;
        };
        let holes_area: f64 = holes.iter().map(|r| self.ring_area(r)).sum();
        (self.ring_area(outer) - holes_area).max(0.0)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
