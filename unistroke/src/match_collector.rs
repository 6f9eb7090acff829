use super::Match;

// Keeps the best `max` matches, sorted by descending score, one per class name
pub struct MatchCollector<'a> {
    max: usize,
    matches: &'a mut Vec<Match>,
}

impl<'a> MatchCollector<'a> {
    pub fn new(matches: &'a mut Vec<Match>, max: usize) -> MatchCollector<'a> {
        assert!(max > 0, "Expected a positive number for the maximum number of matches.");
        assert!(matches.is_empty(), "The pre-existing matches vector must be empty.");
        MatchCollector { max, matches }
    }

    fn remove_existing_lower(&mut self, mc: &Match) -> bool {
        let ix = match self.matches.iter().position(|x| x.name == mc.name) {
            Some(ix) => ix,
            // Not there yet: we're good, match doesn't need to be skipped
            None => return false,
        };
        // New score is not better: skip new match
        if mc.score <= self.matches[ix].score {
            return true;
        }
        // Remove existing match; don't skip new. Means shifting array left.
        self.matches.remove(ix);
        false
    }

    pub fn file_match(&mut self, mc: Match) {
        // Already at limit: don't bother if new match's score is not above the current minimum
        if self.matches.len() == self.max {
            if let Some(lowest) = self.matches.last() {
                if mc.score <= lowest.score {
                    return;
                }
            }
        }
        // Remove if we already have this name with a lower score
        // If we get "true", we should skip new match (already there with higher score)
        if self.remove_existing_lower(&mc) {
            return;
        }
        // Largest score is always at start of vector; equal scores keep filing order
        let ix = self.matches.iter().position(|x| x.score < mc.score);
        match ix {
            Some(ix) => self.matches.insert(ix, mc),
            None => self.matches.push(mc),
        }
        // Beyond limit? Drop last item.
        if self.matches.len() > self.max {
            self.matches.pop();
        }
    }
}
