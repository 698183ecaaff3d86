/// Continuous-time exponential smoother.
///
/// `decay = exp(-dt/tau)` is the only transcendental call on the hot path;
/// using `f64::exp` keeps the reduction order identical across platforms.
#[derive(Debug, Clone, Copy)]
pub struct Ewma {
    tau: f64,
    power: u8,
    y: f64,
    t_prev: Option<f64>,
}

impl Ewma {
    pub fn new(tau: f64, power: u8) -> Self {
        Self {
            tau,
            power,
            y: 0.0,
            t_prev: None,
        }
    }

    pub fn with_initial(tau: f64, power: u8, initial: f64) -> Self {
        let mut e = Self::new(tau, power);
        e.y = initial;
        e
    }

    /// Updates the smoother with `(t, x)`. The first call after
    /// construction or `reset` only seeds `t_prev` and returns the current
    /// (possibly zero- or caller-seeded) `y` without decaying it.
    pub fn update(&mut self, t: f64, x: f64) -> f64 {
        let value = if self.power == 2 { x * x } else { x };
        match self.t_prev {
            None => {
                self.t_prev = Some(t);
            }
            Some(prev) => {
                let dt = (t - prev).max(1e-9);
                let decay = (-dt / self.tau).exp();
                self.y = decay * self.y + (1.0 - decay) * value;
                self.t_prev = Some(t);
            }
        }
        self.y
    }

    pub fn current(&self) -> f64 {
        self.y
    }

    /// Overrides the current smoothed value without touching `t_prev`.
    /// Used by callers that need to seed `y` lazily from the first
    /// observed input rather than at construction time.
    pub fn seed(&mut self, y: f64) {
        self.y = y;
    }

    pub fn reset(&mut self) {
        self.y = 0.0;
        self.t_prev = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_update_seeds_without_decay() {
        let mut e = Ewma::new(10.0, 1);
        let y = e.update(0.0, 5.0);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn constant_input_is_a_fixed_point() {
        let mut e = Ewma::with_initial(10.0, 1, 1.0);
        e.update(0.0, 1.0);
        let y = e.update(10.0, 1.0);
        assert!((y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn converges_toward_constant_input() {
        let mut e = Ewma::new(5.0, 1);
        e.update(0.0, 2.0);
        let mut y = 0.0;
        for i in 1..50 {
            y = e.update(i as f64, 2.0);
        }
        assert!((y - 2.0).abs() < 1e-6, "y={y}");
    }

    #[test]
    fn power_two_smooths_squared_input() {
        let mut e = Ewma::new(10.0, 2);
        e.update(0.0, 3.0);
        let y = e.update(1.0, 3.0);
        // decay * 0 + (1-decay) * 9
        let decay = (-1.0f64 / 10.0).exp();
        let expected = (1.0 - decay) * 9.0;
        assert!((y - expected).abs() < 1e-9);
    }

    proptest::proptest! {
        #[test]
        fn monotone_convergence_bound(c in -100.0f64..100.0, y0 in -100.0f64..100.0) {
            let mut e = Ewma::with_initial(7.0, 1, y0);
            e.update(0.0, c);
            let mut t = 0.0;
            let mut prev_diff = (y0 - c).abs();
            for i in 1..20 {
                t = i as f64;
                let y = e.update(t, c);
                let diff = (y - c).abs();
                // must not increase beyond the starting gap (monotone decay bound)
                proptest::prop_assert!(diff <= prev_diff + 1e-9);
                prev_diff = diff;
            }
            let _ = t;
        }
    }
}
