// Golden ratio conjugate; interior points sit this far into the bracket from either end
const PHI: f64 = 0.618_033_988_749_894_8;

/// Derivative-free minimizer for a function unimodal on a bracket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoldenSectionSearch {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl GoldenSectionSearch {
    pub fn new(tolerance: f64, max_iterations: usize) -> GoldenSectionSearch {
        GoldenSectionSearch {
            tolerance: tolerance,
            max_iterations: max_iterations,
        }
    }

    /// Narrows `[a, b]` until it is narrower than the tolerance or the iteration
    /// cap is hit. Returns the better interior point and its value.
    pub fn minimize<F>(&self, mut a: f64, mut b: f64, mut f: F) -> (f64, f64)
    where
        F: FnMut(f64) -> f64,
    {
        let mut x1 = PHI * a + (1.0 - PHI) * b;
        let mut f1 = f(x1);
        let mut x2 = (1.0 - PHI) * a + PHI * b;
        let mut f2 = f(x2);

        let mut iterations = 0;
        while (b - a).abs() > self.tolerance && iterations < self.max_iterations {
            if f1 < f2 {
                // Minimum is left of x2
                b = x2;
                x2 = x1;
                f2 = f1;
                x1 = PHI * a + (1.0 - PHI) * b;
                f1 = f(x1);
            } else {
                // Minimum is right of x1
                a = x1;
                x1 = x2;
                f1 = f2;
                x2 = (1.0 - PHI) * a + PHI * b;
                f2 = f(x2);
            }
            iterations += 1;
        }

        if f1 <= f2 { (x1, f1) } else { (x2, f2) }
    }
}
