use std::sync::Arc;

use parking_lot::RwLock;

use super::matcher::Recognizer;
use super::{Match, Point, Result};

/// A recognizer that keeps accepting templates while others recognize.
///
/// Readers take an immutable snapshot at the start of each call; registration
/// publishes a new snapshot under the write lock. A snapshot never changes once
/// taken.
pub struct SharedRecognizer {
    current: RwLock<Arc<Recognizer>>,
}

impl SharedRecognizer {
    pub fn new(recognizer: Recognizer) -> SharedRecognizer {
        SharedRecognizer {
            current: RwLock::new(Arc::new(recognizer)),
        }
    }

    pub fn snapshot(&self) -> Arc<Recognizer> {
        Arc::clone(&self.current.read())
    }

    pub fn add_template(&self, name: &str, points: &[Point]) -> Result<()> {
        let mut current = self.current.write();
        // Copies the template set only if some reader still holds the old snapshot
        Arc::make_mut(&mut current).add_template(name, points)
    }

    pub fn recognize(&self, points: &[Point]) -> Match {
        self.snapshot().recognize(points)
    }

    pub fn recognize_ranked(&self, points: &[Point], limit: usize) -> Vec<Match> {
        self.snapshot().recognize_ranked(points, limit)
    }
}
