use tracing::trace;

use super::config::RecognizerConfig;
use super::entities::{centroid, path_length, CanonicalPath, Rect};
use super::{Point, Result, Stroke};

// Maps raw strokes to canonical paths. Holds only configuration, so one instance
// can normalize any number of strokes, from any number of threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalizer {
    num_points: usize,
    square_size: f64,
    min_extent: f64,
}

impl Normalizer {
    pub fn new(config: &RecognizerConfig) -> Normalizer {
        Normalizer {
            num_points: config.num_points,
            square_size: config.square_size,
            min_extent: config.min_extent,
        }
    }

    /// Resample, rotate to the indicative angle, scale into the reference square
    /// and center on the origin.
    pub fn normalize(&self, stroke: &Stroke) -> Result<CanonicalPath> {
        let points = resample(stroke.points(), self.num_points);
        let angle = indicative_angle(&points);
        let points = rotate_by(&points, -angle);
        let points = scale_to_square(&points, self.square_size, self.min_extent);
        let points = translate_to_origin(&points);
        CanonicalPath::from_points(points)
    }
}

/// Emits exactly `n` points spaced at equal distances along the path.
pub fn resample(points: &[Point], n: usize) -> Vec<Point> {
    let first = match points.first() {
        Some(first) => *first,
        None => return Vec::new(),
    };
    let last = points[points.len() - 1];
    let total = path_length(points);
    // Zero-length path: every resampled point coincides
    if n < 2 || !(total > 0.0) || !total.is_finite() {
        return vec![first; n];
    }

    let increment = total / (n - 1) as f64;
    let mut res: Vec<Point> = Vec::with_capacity(n);
    res.push(first);
    let mut accumulated = 0.0;
    for seg in points.windows(2) {
        // The segment keeps shrinking from the front as points are emitted on it
        let mut start = seg[0];
        let end = seg[1];
        let mut d = start.distance_to(end);
        while d > 0.0 && accumulated + d >= increment && res.len() < n {
            let t = (increment - accumulated) / d;
            let q = Point::new(start.x + t * (end.x - start.x), start.y + t * (end.y - start.y));
            res.push(q);
            start = q;
            d = start.distance_to(end);
            accumulated = 0.0;
        }
        accumulated += d;
    }
    // Rounding can leave us one short (or more, for very long paths)
    while res.len() < n {
        res.push(last);
    }
    res
}

/// Angle from the centroid to the first point, in radians.
pub fn indicative_angle(points: &[Point]) -> f64 {
    match points.first() {
        Some(first) => {
            let c = centroid(points);
            (first.y - c.y).atan2(first.x - c.x)
        }
        None => 0.0,
    }
}

/// Rotates every point about the centroid.
pub fn rotate_by(points: &[Point], theta: f64) -> Vec<Point> {
    let c = centroid(points);
    let (sin, cos) = theta.sin_cos();
    points
        .iter()
        .map(|pt| {
            let dx = pt.x - c.x;
            let dy = pt.y - c.y;
            Point::new(dx * cos - dy * sin + c.x, dx * sin + dy * cos + c.y)
        })
        .collect()
}

/// Scales x and y independently so the bounding box maps onto `[0, size]²`.
pub fn scale_to_square(points: &[Point], size: f64, min_extent: f64) -> Vec<Point> {
    let rect = Rect::around(points);
    let width = substitute_extent(rect.width(), min_extent);
    let height = substitute_extent(rect.height(), min_extent);
    points
        .iter()
        .map(|pt| Point::new((pt.x - rect.left) * size / width, (pt.y - rect.top) * size / height))
        .collect()
}

// Straight horizontal or vertical strokes have no extent along one axis
fn substitute_extent(extent: f64, min_extent: f64) -> f64 {
    if extent < min_extent {
        trace!(extent, min_extent, "Degenerate bounding box, substituting minimum extent");
        min_extent
    } else {
        extent
    }
}

/// Moves the centroid to the origin.
pub fn translate_to_origin(points: &[Point]) -> Vec<Point> {
    let c = centroid(points);
    points.iter().map(|pt| Point::new(pt.x - c.x, pt.y - c.y)).collect()
}
