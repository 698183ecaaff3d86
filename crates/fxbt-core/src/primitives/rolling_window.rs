/// A time-weighted rolling window over `[now - lookback, now]`.
///
/// Backed by a circular buffer of `(ts, dt, x)` entries that grows by
/// doubling on overflow and is never shrunk. Three running sums (weight,
/// weighted x, weighted x^2) are adjusted incrementally on both append and
/// trim so `stats()` stays O(1) regardless of how many samples the window
/// currently holds.
#[derive(Debug, Clone)]
pub struct TimeWeightedWindow {
    lookback: f64,
    buf: Vec<Entry>,
    head: usize,
    len: usize,
    sum_w: f64,
    sum_wx: f64,
    sum_wx2: f64,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    ts: f64,
    dt: f64,
    x: f64,
}

const EPS: f64 = 1e-12;

impl TimeWeightedWindow {
    pub fn new(lookback_seconds: f64) -> Self {
        Self {
            lookback: lookback_seconds,
            buf: vec![
                Entry {
                    ts: 0.0,
                    dt: 0.0,
                    x: 0.0
                };
                16
            ],
            head: 0,
            len: 0,
            sum_w: 0.0,
            sum_wx: 0.0,
            sum_wx2: 0.0,
        }
    }

    /// Appends a sample observed at `now` carrying weight `dt` (time served
    /// in the window so far), then trims entries that have aged out.
    /// Non-finite `x` or `dt` are skipped silently.
    pub fn update(&mut self, now: f64, dt: f64, x: f64) {
        if !x.is_finite() || !dt.is_finite() || dt < 0.0 {
            return;
        }
        self.push(Entry { ts: now, dt, x });
        self.trim(now);
    }

    fn push(&mut self, e: Entry) {
        if self.len == self.buf.len() {
            self.grow();
        }
        let idx = (self.head + self.len) % self.buf.len();
        self.buf[idx] = e;
        self.len += 1;
        self.sum_w += e.dt;
        self.sum_wx += e.dt * e.x;
        self.sum_wx2 += e.dt * e.x * e.x;
    }

    fn grow(&mut self) {
        let old_cap = self.buf.len();
        let new_cap = old_cap * 2;
        let mut new_buf = vec![
            Entry {
                ts: 0.0,
                dt: 0.0,
                x: 0.0
            };
            new_cap
        ];
        for i in 0..self.len {
            new_buf[i] = self.buf[(self.head + i) % old_cap];
        }
        self.buf = new_buf;
        self.head = 0;
    }

    /// Pops entries whose `ts + dt <= cutoff - EPS`, and partially trims the
    /// straddling entry by advancing its `ts` to `cutoff` and shortening its
    /// `dt` accordingly.
    fn trim(&mut self, now: f64) {
        let cutoff = now - self.lookback;
        while self.len > 0 {
            let e = self.buf[self.head];
            let end = e.ts + e.dt;
            if end <= cutoff - EPS {
                self.sum_w -= e.dt;
                self.sum_wx -= e.dt * e.x;
                self.sum_wx2 -= e.dt * e.x * e.x;
                self.head = (self.head + 1) % self.buf.len();
                self.len -= 1;
            } else if e.ts < cutoff {
                let new_dt = end - cutoff;
                let removed_dt = e.dt - new_dt;
                self.sum_w -= removed_dt * 1.0;
                self.sum_wx -= removed_dt * e.x;
                self.sum_wx2 -= removed_dt * e.x * e.x;
                self.buf[self.head].ts = cutoff;
                self.buf[self.head].dt = new_dt;
                break;
            } else {
                break;
            }
        }
        if self.sum_w.abs() < EPS {
            self.sum_w = 0.0;
        }
    }

    /// Returns `(mean, std)`, or `(NaN, NaN)` if the accumulated weight is
    /// effectively zero.
    pub fn stats(&self) -> (f64, f64) {
        if self.sum_w <= EPS {
            return (f64::NAN, f64::NAN);
        }
        let mean = self.sum_wx / self.sum_w;
        let var = (self.sum_wx2 / self.sum_w - mean * mean).max(0.0);
        (mean, var.sqrt())
    }

    pub fn total_weight(&self) -> f64 {
        self.sum_w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_is_nan() {
        let w = TimeWeightedWindow::new(10.0);
        let (mean, std) = w.stats();
        assert!(mean.is_nan() && std.is_nan());
    }

    #[test]
    fn constant_series_has_zero_std_once_aged() {
        let mut w = TimeWeightedWindow::new(10.0);
        let mut t = 0.0;
        let mut prev_t = 0.0;
        for i in 0..20 {
            t = i as f64;
            let dt = t - prev_t;
            w.update(t, dt, 5.0);
            prev_t = t;
        }
        let (mean, std) = w.stats();
        assert!((mean - 5.0).abs() < 1e-9, "mean={mean}");
        assert!(std.abs() < 1e-9, "std={std}");
        let _ = t;
    }

    #[test]
    fn non_finite_samples_are_skipped() {
        let mut w = TimeWeightedWindow::new(10.0);
        w.update(1.0, 1.0, f64::NAN);
        w.update(2.0, 1.0, f64::INFINITY);
        assert!(w.stats().0.is_nan());
        w.update(3.0, 1.0, 1.0);
        assert!((w.stats().0 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn trim_evicts_aged_out_entries() {
        let mut w = TimeWeightedWindow::new(5.0);
        w.update(0.0, 1.0, 100.0);
        w.update(10.0, 1.0, 1.0);
        let (mean, _) = w.stats();
        assert!((mean - 1.0).abs() < 1e-6);
    }

    #[test]
    fn grows_past_initial_capacity() {
        let mut w = TimeWeightedWindow::new(1_000_000.0);
        for i in 0..1000 {
            w.update(i as f64, 1.0, i as f64);
        }
        assert!(w.total_weight() > 0.0);
    }

    proptest::proptest! {
        #[test]
        fn mean_matches_constant_input(c in -1000.0f64..1000.0) {
            let mut w = TimeWeightedWindow::new(1000.0);
            let mut prev = 0.0;
            for i in 1..30 {
                let t = i as f64;
                w.update(t, t - prev, c);
                prev = t;
            }
            let (mean, std) = w.stats();
            proptest::prop_assert!((mean - c).abs() < 1e-6);
            proptest::prop_assert!(std.abs() < 1e-6);
        }
    }
}
