//! Planar geometry for shapes: points, outlines and containment.
//!
//! Canvas coordinates grow right (x) and down (y), matching the pointer
//! events the registry is fed with.

use std::ops::{Add, Sub};

use crate::error::RegistryError;

/// A 2-D canvas coordinate.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Reject NaN and infinite coordinates.
    pub fn ensure_finite(self) -> Result<Self, RegistryError> {
        if self.is_finite() {
            Ok(self)
        } else {
            Err(RegistryError::NonFinite { x: self.x, y: self.y })
        }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned bounding box, inclusive on all edges.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn translated(&self, by: Point) -> Bounds {
        Bounds { min: self.min + by, max: self.max + by }
    }
}

/// Closed simple polygon, vertices relative to the owning shape's position.
///
/// Always holds at least three finite vertices; the closing edge from the last
/// vertex back to the first is implicit.
#[derive(Clone, Debug, PartialEq)]
pub struct Outline {
    points: Vec<Point>,
    bounds: Bounds,
}

impl Outline {
    pub const MIN_POINTS: usize = 3;

    pub fn new(points: Vec<Point>) -> Result<Self, RegistryError> {
        if points.len() < Self::MIN_POINTS {
            return Err(RegistryError::DegenerateOutline(points.len()));
        }
        for p in &points {
            p.ensure_finite()?;
        }
        let bounds = bounds_of(&points);
        Ok(Self { points, bounds })
    }

    /// Build from compile-time vertices that are known to be valid.
    pub(crate) fn from_preset(vertices: &[(f32, f32)]) -> Self {
        debug_assert!(vertices.len() >= Self::MIN_POINTS);
        let points: Vec<Point> = vertices.iter().copied().map(Point::from).collect();
        let bounds = bounds_of(&points);
        Self { points, bounds }
    }

    /// Vertices in drawing order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Bounding box in outline-local coordinates.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Vertices translated to an absolute position.
    pub fn placed_at(&self, position: Point) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().map(move |p| *p + position)
    }

    /// Even-odd containment of an outline-local point.
    ///
    /// Ray casting towards +x: a horizontal edge never toggles, so a point on
    /// the top/right edges falls outside and one on the bottom/left inside.
    pub fn contains(&self, local: Point) -> bool {
        if !self.bounds.contains(local) {
            return false;
        }
        let pts = &self.points;
        let mut inside = false;
        let mut j = pts.len() - 1;
        for i in 0..pts.len() {
            let (a, b) = (pts[i], pts[j]);
            if (a.y > local.y) != (b.y > local.y) {
                let cross_x = (b.x - a.x) * (local.y - a.y) / (b.y - a.y) + a.x;
                if local.x < cross_x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

impl TryFrom<Vec<(f32, f32)>> for Outline {
    type Error = RegistryError;

    fn try_from(points: Vec<(f32, f32)>) -> Result<Self, Self::Error> {
        Outline::new(points.into_iter().map(Point::from).collect())
    }
}

fn bounds_of(points: &[Point]) -> Bounds {
    let mut min = Point::new(f32::INFINITY, f32::INFINITY);
    let mut max = Point::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Bounds { min, max }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Outline {
        Outline::try_from(vec![(0.0, 0.0), (60.0, 0.0), (60.0, 60.0), (0.0, 60.0)]).unwrap()
    }

    #[test]
    fn rejects_short_outlines() {
        let err = Outline::try_from(vec![(0.0, 0.0), (1.0, 1.0)]).unwrap_err();
        assert!(matches!(err, RegistryError::DegenerateOutline(2)));
        assert!(matches!(
            Outline::new(Vec::new()),
            Err(RegistryError::DegenerateOutline(0))
        ));
    }

    #[test]
    fn rejects_non_finite_vertices() {
        let err = Outline::try_from(vec![(0.0, 0.0), (f32::NAN, 1.0), (1.0, 0.0)]).unwrap_err();
        assert!(matches!(err, RegistryError::NonFinite { .. }));
    }

    #[test]
    fn square_containment() {
        let sq = square();
        assert!(sq.contains(Point::new(30.0, 30.0)));
        assert!(sq.contains(Point::new(0.5, 59.5)));
        assert!(!sq.contains(Point::new(-1.0, 30.0)));
        assert!(!sq.contains(Point::new(30.0, 61.0)));
    }

    #[test]
    fn triangle_excludes_corners_of_its_box() {
        // Apex at the origin, base 60 px below.
        let tri = Outline::try_from(vec![(0.0, 0.0), (30.0, 60.0), (-30.0, 60.0)]).unwrap();
        assert!(tri.contains(Point::new(0.0, 40.0)));
        assert!(!tri.contains(Point::new(-25.0, 5.0)));
        assert!(!tri.contains(Point::new(25.0, 5.0)));
    }

    #[test]
    fn concave_notch_is_outside() {
        // U shape: notch between x=20..40 from y=0..40
        let u = Outline::try_from(vec![
            (0.0, 0.0),
            (20.0, 0.0),
            (20.0, 40.0),
            (40.0, 40.0),
            (40.0, 0.0),
            (60.0, 0.0),
            (60.0, 60.0),
            (0.0, 60.0),
        ])
        .unwrap();
        assert!(!u.contains(Point::new(30.0, 20.0)));
        assert!(u.contains(Point::new(10.0, 20.0)));
        assert!(u.contains(Point::new(30.0, 50.0)));
    }

    #[test]
    fn placed_vertices_are_offset() {
        let placed: Vec<_> = square().placed_at(Point::new(100.0, 200.0)).collect();
        assert_eq!(placed[0], Point::new(100.0, 200.0));
        assert_eq!(placed[2], Point::new(160.0, 260.0));
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let b = Outline::try_from(vec![(0.0, 0.0), (30.0, 45.0), (0.0, 90.0), (-30.0, 45.0)])
            .unwrap()
            .bounds();
        assert_eq!(b.min, Point::new(-30.0, 0.0));
        assert_eq!(b.max, Point::new(30.0, 90.0));
    }
}
