//! Quadric error metric.
//!
//! A quadric accumulates the squared distance to a set of planes as
//! `p^T A p + 2 b^T p + c`.

use nalgebra::{Matrix3, Point3, Vector3};

// Below this determinant the quadric has no unique minimum
const SINGULAR_DET: f64 = 1e-12;

/// Sum of squared plane distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Quadric {
    a: Matrix3<f64>,
    b: Vector3<f64>,
    c: f64,
}

impl Default for Quadric {
    fn default() -> Self {
        Self {
            a: Matrix3::zeros(),
            b: Vector3::zeros(),
            c: 0.0,
        }
    }
}

impl Quadric {
    /// Quadric of the plane through `point` with unit `normal`, scaled by `weight`.
    pub(crate) fn from_plane(normal: &Vector3<f64>, point: &Point3<f64>, weight: f64) -> Self {
        let d = -normal.dot(&point.coords);
        Self {
            a: normal * normal.transpose() * weight,
            b: normal * (d * weight),
            c: d * d * weight,
        }
    }

    /// Quadric of a triangle's supporting plane, weighted by its area.
    /// `None` for a zero-area triangle.
    pub(crate) fn from_triangle(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Option<Self> {
        let cross = (p1 - p0).cross(&(p2 - p0));
        let twice_area = cross.norm();
        if twice_area <= f64::EPSILON {
            return None;
        }
        Some(Self::from_plane(&(cross / twice_area), p0, twice_area / 2.0))
    }

    /// Adds another quadric to this one.
    pub(crate) fn add(&mut self, other: &Self) {
        self.a += other.a;
        self.b += other.b;
        self.c += other.c;
    }

    /// Error of placing a vertex at `p`.
    pub(crate) fn evaluate(&self, p: &Point3<f64>) -> f64 {
        let v = &p.coords;
        (v.dot(&(self.a * v)) + 2.0 * self.b.dot(v) + self.c).max(0.0)
    }

    /// Point of minimum error, or `None` if it is not unique.
    pub(crate) fn optimal_point(&self) -> Option<Point3<f64>> {
        if self.a.determinant().abs() < SINGULAR_DET {
            return None;
        }
        self.a.try_inverse().map(|inv| Point3::from(-(inv * self.b)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_quadric() {
        let q = Quadric::default();
        assert_relative_eq!(q.evaluate(&Point3::new(1.0, 2.0, 3.0)), 0.0);
        assert!(q.optimal_point().is_none());
    }

    #[test]
    fn test_plane_distance() {
        let q = Quadric::from_plane(&Vector3::z(), &Point3::new(0.0, 0.0, 1.0), 1.0);
        assert_relative_eq!(q.evaluate(&Point3::new(5.0, -2.0, 1.0)), 0.0, epsilon = 1e-12);
        assert_relative_eq!(q.evaluate(&Point3::new(0.0, 0.0, 3.0)), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_triangle_weight() {
        let q = Quadric::from_triangle(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(2.0, 0.0, 0.0),
            &Point3::new(0.0, 2.0, 0.0),
        )
        .unwrap();
        // Area 2, one unit above the plane
        assert_relative_eq!(q.evaluate(&Point3::new(0.3, 0.3, 1.0)), 2.0, epsilon = 1e-12);
        let flat = Quadric::from_triangle(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(2.0, 0.0, 0.0),
        );
        assert!(flat.is_none());
    }

    #[test]
    fn test_corner_optimum() {
        let mut q = Quadric::from_plane(&Vector3::x(), &Point3::new(1.0, 0.0, 0.0), 1.0);
        q.add(&Quadric::from_plane(&Vector3::y(), &Point3::new(0.0, 2.0, 0.0), 1.0));
        assert!(q.optimal_point().is_none());
        q.add(&Quadric::from_plane(&Vector3::z(), &Point3::new(0.0, 0.0, 3.0), 1.0));
        let p = q.optimal_point().unwrap();
        assert_relative_eq!(p, Point3::new(1.0, 2.0, 3.0), epsilon = 1e-9);
    }
}
