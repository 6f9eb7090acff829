use std::collections::HashMap;

use tracing::{debug, trace, warn};

use super::builtin::load_templates;
use super::config::RecognizerConfig;
use super::entities::{CanonicalPath, Template};
use super::golden_section::GoldenSectionSearch;
use super::match_collector::MatchCollector;
use super::normalizer::Normalizer;
use super::{Error, Match, Point, Result, Stroke};

/// Template store and matcher.
///
/// Templates are normalized once on registration and never change afterwards.
/// `recognize` only reads, so a fully registered recognizer can be shared
/// between threads without locking.
#[derive(Debug, Clone)]
pub struct Recognizer {
    config: RecognizerConfig,
    normalizer: Normalizer,
    search: GoldenSectionSearch,
    // All templates in registration order; ties go to the earlier one
    templates: Vec<Template>,
    // Class name -> indexes into `templates`
    by_name: HashMap<String, Vec<usize>>,
    // Distinct names in first-registration order
    names: Vec<String>,
}

impl Recognizer {
    pub fn new(config: RecognizerConfig) -> Result<Recognizer> {
        config.validate()?;
        let normalizer = Normalizer::new(&config);
        let search = GoldenSectionSearch::new(
            config.angle_precision_deg.to_radians(),
            config.max_search_iterations,
        );
        Ok(Recognizer {
            config,
            normalizer,
            search,
            templates: Vec::new(),
            by_name: HashMap::new(),
            names: Vec::new(),
        })
    }

    /// A recognizer preloaded with the templates compiled into the crate.
    pub fn with_builtin_templates(config: RecognizerConfig) -> Result<Recognizer> {
        let mut recognizer = Recognizer::new(config)?;
        for raw in load_templates()? {
            recognizer.add_template(&raw.name, &raw.to_points())?;
        }
        Ok(recognizer)
    }

    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    /// Normalizes `points` and stores the result under `name`.
    ///
    /// Several templates may share a name; each is matched on its own.
    pub fn add_template(&mut self, name: &str, points: &[Point]) -> Result<()> {
        let stroke = Stroke::new(points.to_vec()).map_err(|e| {
            warn!(template = name, error = %e, "Rejected template");
            e
        })?;
        self.add_stroke(name, &stroke)
    }

    pub fn add_stroke(&mut self, name: &str, stroke: &Stroke) -> Result<()> {
        let path = self.normalizer.normalize(stroke)?;
        let ix = self.templates.len();
        self.templates.push(Template {
            name: name.to_string(),
            path,
        });
        match self.by_name.get_mut(name) {
            Some(indexes) => indexes.push(ix),
            None => {
                self.by_name.insert(name.to_string(), vec![ix]);
                self.names.push(name.to_string());
            }
        }
        debug!(template = name, raw_points = stroke.len(), templates = self.templates.len(), "Registered template");
        Ok(())
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Canonical paths registered under `name`, in registration order.
    pub fn templates(&self, name: &str) -> Vec<&CanonicalPath> {
        match self.by_name.get(name) {
            Some(indexes) => indexes.iter().map(|&ix| &self.templates[ix].path).collect(),
            None => Vec::new(),
        }
    }

    /// Best match for a stroke; fails on strokes below the configured minimum.
    pub fn try_recognize(&self, points: &[Point]) -> Result<Match> {
        let query = self.canonical_query(points)?;
        let mut best: Option<Match> = None;
        for template in &self.templates {
            let score = self.score(&query, template);
            // Strictly greater: the first-registered template wins ties
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(Match {
                    name: template.name.clone(),
                    score,
                });
            }
        }
        Ok(best.unwrap_or_else(Match::no_match))
    }

    /// Best match for a stroke, or the "no match" sentinel for rejected input.
    pub fn recognize(&self, points: &[Point]) -> Match {
        self.try_recognize(points).unwrap_or_else(|_| Match::no_match())
    }

    /// The best `limit` distinct names, by descending score.
    pub fn recognize_ranked(&self, points: &[Point], limit: usize) -> Vec<Match> {
        let mut res: Vec<Match> = Vec::with_capacity(limit);
        if limit == 0 {
            return res;
        }
        let query = match self.canonical_query(points) {
            Ok(query) => query,
            Err(_) => return res,
        };
        let mut collector = MatchCollector::new(&mut res, limit);
        for template in &self.templates {
            let score = self.score(&query, template);
            collector.file_match(Match {
                name: template.name.clone(),
                score,
            });
        }
        res
    }

    fn canonical_query(&self, points: &[Point]) -> Result<CanonicalPath> {
        if points.len() < self.config.min_points {
            warn!(points = points.len(), required = self.config.min_points, "Stroke too short to recognize");
            return Err(Error::MalformedInput {
                points: points.len(),
                required: self.config.min_points,
            });
        }
        let stroke = Stroke::new(points.to_vec())?;
        self.normalizer.normalize(&stroke)
    }

    fn score(&self, query: &CanonicalPath, template: &Template) -> f64 {
        let d = self.distance_at_best_angle(query, &template.path);
        let score = (1.0 - d / self.config.half_diagonal()).clamp(0.0, 1.0);
        trace!(template = %template.name, distance = d, score, "Scored template");
        score
    }

    /// Smallest mean point distance over rotations within the configured range.
    ///
    /// The unrotated distance competes with the search result, so identical
    /// canonical paths always come out at distance 0.
    pub fn distance_at_best_angle(&self, query: &CanonicalPath, template: &CanonicalPath) -> f64 {
        let range = self.config.angle_range_deg.to_radians();
        let at_zero = query.path_distance(template);
        let (_, searched) = self
            .search
            .minimize(-range, range, |theta| query.distance_at_angle(template, theta));
        // NaN never wins a comparison, so `min` keeps the finite value
        at_zero.min(searched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|&p| Point::from(p)).collect()
    }

    fn triangle() -> Vec<Point> {
        pts(&[(137.0, 139.0), (68.0, 240.0), (206.0, 240.0), (137.0, 139.0)])
    }

    fn zigzag() -> Vec<Point> {
        pts(&[(0.0, 0.0), (20.0, 60.0), (40.0, 0.0), (60.0, 60.0), (80.0, 0.0)])
    }

    fn recognizer() -> Recognizer {
        let mut recognizer = Recognizer::new(RecognizerConfig::default()).unwrap();
        recognizer.add_template("triangle", &triangle()).unwrap();
        recognizer.add_template("zigzag", &zigzag()).unwrap();
        recognizer
    }

    #[test]
    fn test_invalid_config() {
        let res = Recognizer::new(RecognizerConfig::default().with_min_points(0));
        assert!(matches!(res, Err(Error::Config(_))));
    }

    #[test]
    fn test_add_template_rejects_single_point() {
        let mut recognizer = recognizer();
        let res = recognizer.add_template("dot", &pts(&[(1.0, 1.0)]));
        assert!(matches!(res, Err(Error::MalformedInput { points: 1, required: 2 })));
        assert_eq!(recognizer.template_count(), 2);
    }

    #[test]
    fn test_self_match() {
        let recognizer = recognizer();
        let res = recognizer.recognize(&triangle());
        assert_eq!(res.name, "triangle");
        assert_eq!(res.score, 1.0);
        let res = recognizer.recognize(&zigzag());
        assert_eq!(res.name, "zigzag");
        assert_eq!(res.score, 1.0);
    }

    #[test]
    fn test_empty_store_gives_sentinel() {
        let recognizer = Recognizer::new(RecognizerConfig::default()).unwrap();
        assert_eq!(recognizer.recognize(&triangle()), Match::no_match());
        assert!(recognizer.recognize_ranked(&triangle(), 5).is_empty());
    }

    #[test]
    fn test_min_points_policy() {
        let mut recognizer = Recognizer::new(RecognizerConfig::default().with_min_points(10)).unwrap();
        recognizer.add_template("triangle", &triangle()).unwrap();
        // Registration only needs two points
        assert_eq!(recognizer.template_count(), 1);
        let res = recognizer.try_recognize(&triangle());
        assert!(matches!(res, Err(Error::MalformedInput { points: 4, required: 10 })));
        assert_eq!(recognizer.recognize(&triangle()), Match::no_match());
    }

    #[test]
    fn test_non_finite_query_gives_sentinel() {
        let recognizer = recognizer();
        let res = recognizer.recognize(&pts(&[(0.0, 0.0), (f64::INFINITY, 1.0), (3.0, 3.0)]));
        assert_eq!(res, Match::no_match());
    }

    #[test]
    fn test_shared_names() {
        let mut recognizer = recognizer();
        let wide = pts(&[(0.0, 0.0), (20.0, 60.0), (40.0, 0.0), (60.0, 60.0), (80.0, 0.0), (100.0, 60.0)]);
        recognizer.add_template("zigzag", &wide).unwrap();
        assert_eq!(recognizer.template_count(), 3);
        assert_eq!(recognizer.names(), ["triangle".to_string(), "zigzag".to_string()]);
        assert_eq!(recognizer.templates("zigzag").len(), 2);
        assert!(recognizer.templates("circle").is_empty());
        let res = recognizer.recognize(&wide);
        assert_eq!(res.name, "zigzag");
        assert_eq!(res.score, 1.0);
        // Variants of one name collapse into one ranked entry
        let ranked = recognizer.recognize_ranked(&wide, 5);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0], res);
    }

    #[test]
    fn test_ties_go_to_first_registered() {
        let mut recognizer = Recognizer::new(RecognizerConfig::default()).unwrap();
        recognizer.add_template("first", &triangle()).unwrap();
        recognizer.add_template("second", &triangle()).unwrap();
        assert_eq!(recognizer.recognize(&triangle()).name, "first");
        let ranked = recognizer.recognize_ranked(&triangle(), 2);
        assert_eq!(ranked[0].name, "first");
        assert_eq!(ranked[1].name, "second");
    }

    #[test]
    fn test_search_recovers_small_rotation() {
        let recognizer = recognizer();
        let template = recognizer.templates("zigzag")[0].clone();
        let (sin, cos) = 0.3f64.sin_cos();
        let rotated: Vec<Point> = template
            .points()
            .iter()
            .map(|p| Point::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos))
            .collect();
        let rotated = CanonicalPath::from_points(rotated).unwrap();
        let unrotated = rotated.path_distance(&template);
        let best = recognizer.distance_at_best_angle(&rotated, &template);
        assert!(unrotated > 10.0);
        assert!(best < unrotated / 5.0, "best {} unrotated {}", best, unrotated);
    }

    #[test]
    fn test_scores_in_unit_range() {
        let recognizer = recognizer();
        let line = pts(&[(0.0, 0.0), (0.0, 50.0), (0.0, 100.0)]);
        for mc in recognizer.recognize_ranked(&line, 2) {
            assert!((0.0..=1.0).contains(&mc.score));
        }
    }
}
