//! # Unistroke
//!
//! Recognizes single-stroke gestures drawn freehand by a user. A raw stroke is
//! resampled to a fixed number of equidistant points, rotated so that its first
//! point sits on the positive x-axis from its centroid, and scaled/translated into
//! a reference square. The canonical query is then compared against every
//! registered template with a golden-section search over a bounded rotation
//! range, and the best `(name, score)` pair is reported.
//!
//! ```
//! use unistroke::{Point, Recognizer, RecognizerConfig};
//!
//! let mut recognizer = Recognizer::new(RecognizerConfig::default()).unwrap();
//! let square: Vec<Point> = [(0.0, 0.0), (0.0, 100.0), (100.0, 100.0), (100.0, 0.0), (0.0, 0.0)]
//!     .iter()
//!     .map(|&p| Point::from(p))
//!     .collect();
//! recognizer.add_template("square", &square).unwrap();
//!
//! let result = recognizer.recognize(&square);
//! assert_eq!(result.name, "square");
//! assert!(result.score > 0.99);
//! ```
//!
//! Acceptance thresholds are the caller's business: the recognizer always
//! reports its best candidate, and [`Match::accept`] applies a cutoff.

mod builtin;
mod config;
mod entities;
mod golden_section;
mod match_collector;
mod matcher;
mod normalizer;
mod shared;

use serde_derive::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

pub use builtin::{load_templates, RawTemplate};
pub use config::RecognizerConfig;
pub use entities::{CanonicalPath, Rect, Template};
pub use golden_section::GoldenSectionSearch;
pub use match_collector::MatchCollector;
pub use matcher::Recognizer;
pub use normalizer::Normalizer;
pub use shared::SharedRecognizer;

/// Name reported when nothing could be matched.
pub const NO_MATCH: &str = "no match";

/// Result type alias for the recognizer
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the recognizer
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed input: {points} points given, at least {required} required")]
    MalformedInput { points: usize, required: usize },

    #[error("Malformed input: non-finite coordinate at point {index}")]
    NonFiniteInput { index: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Template library decode error: {0}")]
    Decode(#[from] bincode::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Point {
        Point { x, y }
    }
}

/// One continuous stroke, in drawing order.
///
/// Holds at least two finite points; the points cannot be changed after
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    /// Fewest points a stroke may have.
    pub const MIN_POINTS: usize = 2;

    pub fn new(points: Vec<Point>) -> Result<Stroke> {
        if points.len() < Stroke::MIN_POINTS {
            return Err(Error::MalformedInput {
                points: points.len(),
                required: Stroke::MIN_POINTS,
            });
        }
        if let Some(index) = points.iter().position(|pt| !pt.is_finite()) {
            return Err(Error::NonFiniteInput { index });
        }
        Ok(Stroke { points })
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

    /// Sum of the Euclidean lengths of all segments
    pub fn length(&self) -> f64 {
        entities::path_length(&self.points)
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::around(&self.points)
    }

    pub fn centroid(&self) -> Point {
        entities::centroid(&self.points)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Match {
    pub name: String,
    pub score: f64,
}

impl Match {
    /// The sentinel reported for rejected input or an empty template store.
    pub fn no_match() -> Match {
        Match {
            name: NO_MATCH.to_string(),
            score: 0.0,
        }
    }

    pub fn is_match(&self) -> bool {
        self.name != NO_MATCH
    }

    /// Applies a caller's acceptance threshold.
    pub fn accept(&self, threshold: f64) -> Option<&str> {
        if self.is_match() && self.score >= threshold {
            Some(&self.name)
        } else {
            None
        }
    }
}

thread_local!(static RECOGNIZER: Option<Recognizer> = load_default_recognizer());

fn load_default_recognizer() -> Option<Recognizer> {
    match Recognizer::with_builtin_templates(RecognizerConfig::default()) {
        Ok(recognizer) => Some(recognizer),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load built-in templates");
            None
        }
    }
}

/// Ranks a stroke against the built-in templates.
#[wasm_bindgen]
#[allow(deprecated)]
pub fn lookup(input: &JsValue, limit: usize) -> String {
    // Input is a vector of [x, y] pairs - how a stroke's points are represented in JS
    let input: Vec<Vec<f64>> = match input.into_serde() {
        Ok(input) => input,
        Err(e) => {
            tracing::warn!(error = %e, "Lookup input is not a list of points");
            return "[]".to_string();
        }
    };
    let points: Vec<Point> = input
        .iter()
        .filter(|pt| pt.len() >= 2)
        .map(|pt| Point::new(pt[0], pt[1]))
        .collect();
    let lookup_res = match_typed(&points, limit);
    serde_json::to_string(&lookup_res).unwrap_or_else(|_| "[]".to_string())
}

/// Best `limit` distinct matches for one stroke against the built-in templates.
pub fn match_typed(points: &[Point], limit: usize) -> Vec<Match> {
    RECOGNIZER.with(|recognizer| match recognizer {
        Some(recognizer) => recognizer.recognize_ranked(points, limit),
        None => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|&p| Point::from(p)).collect()
    }

    #[test]
    fn test_stroke_rejects_single_point() {
        let res = Stroke::new(pts(&[(1.0, 1.0)]));
        assert!(matches!(res, Err(Error::MalformedInput { points: 1, required: 2 })));
    }

    #[test]
    fn test_stroke_rejects_non_finite() {
        let res = Stroke::new(pts(&[(1.0, 1.0), (f64::NAN, 2.0), (3.0, 3.0)]));
        assert!(matches!(res, Err(Error::NonFiniteInput { index: 1 })));
    }

    #[test]
    fn test_stroke_geometry() {
        let stroke = Stroke::new(pts(&[(0.0, 0.0), (3.0, 4.0), (3.0, 10.0)])).unwrap();
        assert_eq!(stroke.len(), 3);
        assert!((stroke.length() - 11.0).abs() < 1e-12);
        let bb = stroke.bounding_box();
        assert_eq!((bb.left, bb.right, bb.top, bb.bottom), (0.0, 3.0, 0.0, 10.0));
        let c = stroke.centroid();
        assert!((c.x - 2.0).abs() < 1e-12);
        assert!((c.y - 14.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_match_accept() {
        let mc = Match {
            name: "circle".to_string(),
            score: 0.75,
        };
        assert_eq!(mc.accept(0.7), Some("circle"));
        assert_eq!(mc.accept(0.8), None);
        assert_eq!(Match::no_match().accept(0.0), None);
        assert!(!Match::no_match().is_match());
    }

    #[test]
    fn test_match_typed_uses_builtin_templates() {
        let templates = load_templates().unwrap();
        let circle = templates.iter().find(|t| t.name == "circle").unwrap();
        let matches = match_typed(&circle.to_points(), 3);
        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].name, "circle");
        assert!(matches[0].score > 0.999);
        assert!(matches[1].score <= matches[0].score);
    }
}
