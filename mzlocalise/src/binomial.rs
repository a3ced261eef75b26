//! Binomial tail probabilities in natural log space, so that very small probabilities do not
//! underflow.

/// Computes `ln P(X >= k)` for `X ~ Binomial(n, p)`, caching the log factorials between calls.
#[derive(Clone, Debug, Default)]
pub struct BinomialTail {
    ln_factorials: Vec<f64>,
}

impl BinomialTail {
    /// Create a new engine with an empty cache
    pub const fn new() -> Self {
        Self {
            ln_factorials: Vec::new(),
        }
    }

    fn ln_factorial(&mut self, n: usize) -> f64 {
        if self.ln_factorials.is_empty() {
            self.ln_factorials.push(0.0);
        }
        while self.ln_factorials.len() <= n {
            let i = self.ln_factorials.len();
            let previous = self.ln_factorials[i - 1];
            self.ln_factorials.push(previous + (i as f64).ln());
        }
        self.ln_factorials[n]
    }

    /// `ln (n choose k)`
    pub fn ln_choose(&mut self, n: usize, k: usize) -> f64 {
        if k > n {
            return f64::NEG_INFINITY;
        }
        self.ln_factorial(n) - self.ln_factorial(k) - self.ln_factorial(n - k)
    }

    /// `ln P(X >= k)` for `X ~ Binomial(n, p)`. When `k` is zero the probability is exactly one.
    /// The success probability is clamped into `0..=1`.
    pub fn ln_tail(&mut self, n: usize, k: usize, p: f64) -> f64 {
        if k == 0 {
            return 0.0;
        }
        let p = p.clamp(0.0, 1.0);
        if k > n || p <= 0.0 {
            return f64::NEG_INFINITY;
        }
        if p >= 1.0 {
            return 0.0;
        }
        let ln_p = p.ln();
        let ln_q = (-p).ln_1p();
        let terms = (k..=n)
            .map(|i| {
                ((n - i) as f64).mul_add(ln_q, (i as f64).mul_add(ln_p, self.ln_choose(n, i)))
            })
            .collect::<Vec<_>>();
        log_sum_exp(terms)
    }

    /// `P(X >= k)` for `X ~ Binomial(n, p)`, this underflows to zero for very small probabilities.
    pub fn tail(&mut self, n: usize, k: usize, p: f64) -> f64 {
        self.ln_tail(n, k, p).exp()
    }
}

/// `ln sum exp(x)` computed without overflow or underflow. Returns negative infinity for an empty input.
pub fn log_sum_exp(values: impl IntoIterator<Item = f64>) -> f64 {
    let values = values.into_iter().collect::<Vec<_>>();
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    max + values.iter().map(|v| (v - max).exp()).sum::<f64>().ln()
}

/// The probability that a random peak lands within `tolerance` of a given m/z, when `peaks` peaks
/// are spread over `width` Thomson. Capped at one, and one when the width is zero.
pub fn random_match_probability(tolerance: f64, peaks: usize, width: f64) -> f64 {
    if width <= 0.0 {
        1.0
    } else {
        (tolerance * peaks as f64 / width).min(1.0)
    }
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use probability::distribution::{Binomial, Discrete};

    use super::*;

    #[test]
    fn no_matches_is_certain() {
        let mut binomial = BinomialTail::new();
        assert!(binomial.ln_tail(10, 0, 0.3).abs() < f64::EPSILON);
        assert!(binomial.ln_tail(0, 0, 0.0).abs() < f64::EPSILON);
        assert!(binomial.ln_tail(10, 3, 1.0).abs() < f64::EPSILON);
        assert!(binomial.ln_tail(10, 11, 0.3).is_infinite());
    }

    #[test]
    fn monotone_in_k() {
        let mut binomial = BinomialTail::new();
        for n in [1, 5, 20, 60] {
            for p in [0.001, 0.05, 0.3, 0.9] {
                let tails = (0..=n).map(|k| binomial.ln_tail(n, k, p)).collect::<Vec<_>>();
                assert!(
                    tails.windows(2).all(|w| w[1] <= w[0] + 1e-12),
                    "n: {n} p: {p} {tails:?}"
                );
            }
        }
    }

    #[test]
    fn agrees_with_probability_crate() {
        let mut binomial = BinomialTail::new();
        for (n, p) in [(10, 0.1), (25, 0.04), (7, 0.9)] {
            let reference = Binomial::new(n, p);
            for k in 1..=n {
                let expected = (k..=n).map(|i| reference.mass(i)).sum::<f64>();
                assert!(
                    (binomial.tail(n, k, p) - expected).abs() < 1e-9,
                    "n: {n} k: {k} p: {p}"
                );
            }
        }
    }

    #[test]
    fn closed_forms() {
        let mut binomial = BinomialTail::new();
        for n in [1, 10, 40, 100] {
            for p in [0.01, 0.3, 0.5, 0.9] {
                let at_least_one = 1.0 - (1.0 - p).powf(n as f64);
                assert!(
                    (binomial.tail(n, 1, p) - at_least_one).abs() < 1e-12,
                    "n: {n} p: {p}"
                );
                assert!(
                    (binomial.ln_tail(n, n, p) - n as f64 * p.ln()).abs() < 1e-9,
                    "n: {n} p: {p}"
                );
            }
            // A fair coin is symmetric: P(X >= k) = 1 - P(X >= n - k + 1)
            for k in 1..=n {
                assert!(
                    (binomial.tail(n, k, 0.5) + binomial.tail(n, n - k + 1, 0.5) - 1.0).abs()
                        < 1e-12,
                    "n: {n} k: {k}"
                );
            }
        }
    }

    #[test]
    fn no_underflow() {
        let mut binomial = BinomialTail::new();
        let ln_p = binomial.ln_tail(400, 400, 0.01);
        assert!(ln_p.is_finite());
        assert!((ln_p - 400.0 * 0.01_f64.ln()).abs() < 1e-6);
        assert!(binomial.tail(400, 400, 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn log_sum() {
        assert!((log_sum_exp([0.0, 0.0]) - 2_f64.ln()).abs() < 1e-12);
        assert!((log_sum_exp([-1000.0, -1000.0]) - (2_f64.ln() - 1000.0)).abs() < 1e-9);
        assert!(log_sum_exp(Vec::new()).is_infinite());
    }

    #[test]
    fn random_match() {
        assert!((random_match_probability(0.5, 10, 100.0) - 0.05).abs() < 1e-12);
        assert!((random_match_probability(0.5, 1000, 100.0) - 1.0).abs() < f64::EPSILON);
        assert!((random_match_probability(0.5, 10, 0.0) - 1.0).abs() < f64::EPSILON);
    }
}
