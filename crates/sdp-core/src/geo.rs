//! Planar points, polylines and the fractional trimming used by every
//! maneuver builder.
//!
//! Coordinates are `f64` longitude (`x`) / latitude (`y`).  Trimming and
//! orientation work in the planar coordinate space the vendor ships; only
//! [`Polyline::geodesic_length_m`] interprets them as WGS-84 degrees.

use geo_types::{Coord, Geometry, LineString};
use wkt::{ToWkt, TryFromWkt};

use crate::error::{CoreError, CoreResult};

/// Two points closer than this (in coordinate units) are the same vertex.
pub const COINCIDENCE_TOLERANCE: f64 = 1e-9;

// ── Point ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// `true` when both coordinates agree within [`COINCIDENCE_TOLERANCE`].
    #[inline]
    pub fn coincides(self, other: Point) -> bool {
        (self.x - other.x).abs() <= COINCIDENCE_TOLERANCE
            && (self.y - other.y).abs() <= COINCIDENCE_TOLERANCE
    }

    #[inline]
    pub fn planar_distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Haversine great-circle distance in metres, treating `x`/`y` as
    /// longitude/latitude degrees.
    pub fn distance_m(self, other: Point) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.y - self.y).to_radians();
        let d_lon = (other.x - self.x).to_radians();

        let lat1 = self.y.to_radians();
        let lat2 = other.y.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.7}, {:.7})", self.x, self.y)
    }
}

// ── Polyline ──────────────────────────────────────────────────────────────────

/// An ordered, non-empty vertex sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    points: Vec<Point>,
}

impl Polyline {
    /// Build from raw vertices.  Fails on an empty sequence.
    pub fn from_points(points: Vec<Point>) -> CoreResult<Self> {
        if points.is_empty() {
            return Err(CoreError::Geometry("polyline has no vertices".into()));
        }
        Ok(Self { points })
    }

    /// Parse `LINESTRING` or `MULTILINESTRING` WKT.  Multi-part lines are
    /// concatenated in part order, collapsing coincident part joins.
    pub fn from_wkt(text: &str) -> CoreResult<Self> {
        let geom = Geometry::<f64>::try_from_wkt_str(text)
            .map_err(|e| CoreError::Geometry(format!("invalid WKT {text:?}: {e}")))?;

        let parts: Vec<LineString<f64>> = match geom {
            Geometry::LineString(ls) => vec![ls],
            Geometry::MultiLineString(mls) => mls.0,
            other => {
                return Err(CoreError::Geometry(format!(
                    "expected a line geometry, found {other:?}"
                )));
            }
        };

        let mut points = Vec::new();
        for part in parts {
            for c in part.coords() {
                push_collapsed(&mut points, Point::new(c.x, c.y));
            }
        }
        Self::from_points(points)
    }

    /// Render as a `LINESTRING` WKT string.
    pub fn to_wkt_string(&self) -> String {
        let ls: LineString<f64> = self
            .points
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect();
        ls.to_wkt().to_string()
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn first(&self) -> Point {
        self.points[0]
    }

    #[inline]
    pub fn last(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    pub fn planar_length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].planar_distance(w[1])).sum()
    }

    pub fn geodesic_length_m(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance_m(w[1])).sum()
    }

    pub fn reversed(&self) -> Polyline {
        let mut points = self.points.clone();
        points.reverse();
        Polyline { points }
    }

    /// The sub-line between two fractions of the planar length (clamped to
    /// `0..=1`, swapped if given out of order).  A zero-length line yields
    /// its first vertex alone.
    pub fn segment_along(&self, from: f64, to: f64) -> Polyline {
        let (mut from, mut to) = (from.clamp(0.0, 1.0), to.clamp(0.0, 1.0));
        if from > to {
            std::mem::swap(&mut from, &mut to);
        }

        let cumulative = self.cumulative_lengths();
        let total = cumulative[cumulative.len() - 1];
        if total <= 0.0 {
            return Polyline { points: vec![self.first()] };
        }

        let (d0, d1) = (from * total, to * total);
        let mut points = Vec::with_capacity(self.points.len());
        points.push(self.point_at(&cumulative, d0));
        for (i, &d) in cumulative.iter().enumerate() {
            if d > d0 && d < d1 {
                push_collapsed(&mut points, self.points[i]);
            }
        }
        let end = self.point_at(&cumulative, d1);
        if points.len() == 1 || !points[points.len() - 1].coincides(end) {
            points.push(end);
        }
        Polyline { points }
    }

    /// Append `next`, skipping its first vertex when it coincides with the
    /// current last vertex.
    pub fn extend_joined(&mut self, next: &Polyline) {
        for &p in &next.points {
            push_collapsed(&mut self.points, p);
        }
    }

    fn cumulative_lengths(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.points.len());
        let mut acc = 0.0;
        out.push(0.0);
        for w in self.points.windows(2) {
            acc += w[0].planar_distance(w[1]);
            out.push(acc);
        }
        out
    }

    fn point_at(&self, cumulative: &[f64], d: f64) -> Point {
        for i in 1..cumulative.len() {
            if d <= cumulative[i] {
                let seg = cumulative[i] - cumulative[i - 1];
                if seg <= 0.0 {
                    return self.points[i];
                }
                let t = (d - cumulative[i - 1]) / seg;
                return self.points[i - 1].lerp(self.points[i], t);
            }
        }
        self.last()
    }
}

fn push_collapsed(points: &mut Vec<Point>, p: Point) {
    match points.last() {
        Some(&prev) if prev.coincides(p) => {}
        _ => points.push(p),
    }
}
