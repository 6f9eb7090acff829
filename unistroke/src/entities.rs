use super::{Error, Point, Result};

// Axis-aligned bounding rectangle; y grows downward like screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Rect {
    pub fn around(points: &[Point]) -> Rect {
        let mut res = Rect {
            top: f64::MAX,
            bottom: f64::MIN,
            left: f64::MAX,
            right: f64::MIN,
        };
        for pt in points {
            res.left = res.left.min(pt.x);
            res.right = res.right.max(pt.x);
            res.top = res.top.min(pt.y);
            res.bottom = res.bottom.max(pt.y);
        }
        // No points: collapse to the origin rather than report an inverted box
        if points.is_empty() {
            res = Rect {
                top: 0.0,
                bottom: 0.0,
                left: 0.0,
                right: 0.0,
            };
        }
        res
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

// A stroke after resampling, rotation to the indicative angle and scaling into
// the reference square. Canonical paths built with the same configuration can be
// compared index by index.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalPath {
    points: Vec<Point>,
}

impl CanonicalPath {
    // Checks the normalization postcondition: every coordinate finite
    pub(crate) fn from_points(points: Vec<Point>) -> Result<CanonicalPath> {
        if let Some(index) = points.iter().position(|pt| !pt.is_finite()) {
            return Err(Error::NonFiniteInput { index });
        }
        Ok(CanonicalPath { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Mean distance between same-index points of two canonical paths.
    ///
    /// Paths of different lengths never match: the distance is infinite.
    pub fn path_distance(&self, other: &CanonicalPath) -> f64 {
        self.distance_at_angle(other, 0.0)
    }

    /// Mean point-wise distance after rotating `self` by `theta` radians about the origin.
    pub fn distance_at_angle(&self, other: &CanonicalPath, theta: f64) -> f64 {
        if self.points.len() != other.points.len() || self.points.is_empty() {
            return f64::INFINITY;
        }
        let (sin, cos) = theta.sin_cos();
        let mut sum = 0.0;
        for (a, b) in self.points.iter().zip(other.points.iter()) {
            let rotated = Point::new(a.x * cos - a.y * sin, a.x * sin + a.y * cos);
            sum += rotated.distance_to(*b);
        }
        sum / self.points.len() as f64
    }
}

// One registered drawing variant of a gesture class
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub name: String,
    pub path: CanonicalPath,
}

pub(crate) fn path_length(points: &[Point]) -> f64 {
    points.windows(2).map(|seg| seg[0].distance_to(seg[1])).sum()
}

pub(crate) fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::new(0.0, 0.0);
    }
    let mut x = 0.0;
    let mut y = 0.0;
    for pt in points {
        x += pt.x;
        y += pt.y;
    }
    let n = points.len() as f64;
    Point::new(x / n, y / n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(raw: &[(f64, f64)]) -> CanonicalPath {
        CanonicalPath::from_points(raw.iter().map(|&p| Point::from(p)).collect()).unwrap()
    }

    #[test]
    fn test_single_point_has_zero_length() {
        assert_eq!(path_length(&[Point::new(4.0, 2.0)]), 0.0);
        assert_eq!(path_length(&[]), 0.0);
    }

    #[test]
    fn test_degenerate_rect() {
        let rect = Rect::around(&[Point::new(5.0, 1.0), Point::new(5.0, 9.0)]);
        assert_eq!(rect.width(), 0.0);
        assert_eq!(rect.height(), 8.0);
    }

    #[test]
    fn test_rejects_non_finite() {
        let res = CanonicalPath::from_points(vec![Point::new(0.0, 0.0), Point::new(f64::INFINITY, 0.0)]);
        assert!(matches!(res, Err(Error::NonFiniteInput { index: 1 })));
    }

    #[test]
    fn test_distance_at_angle() {
        let a = path(&[(1.0, 0.0), (-1.0, 0.0)]);
        let b = path(&[(0.0, 1.0), (0.0, -1.0)]);
        assert!((a.path_distance(&b) - 2f64.sqrt()).abs() < 1e-12);
        let quarter = std::f64::consts::FRAC_PI_2;
        assert!(a.distance_at_angle(&b, quarter) < 1e-12);
    }

    #[test]
    fn test_mismatched_lengths() {
        let a = path(&[(1.0, 0.0), (-1.0, 0.0)]);
        let b = path(&[(1.0, 0.0), (-1.0, 0.0), (0.0, 0.0)]);
        assert_eq!(a.path_distance(&b), f64::INFINITY);
    }
}
