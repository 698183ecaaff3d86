/// A time-weighted histogram over fixed, strictly-increasing bin edges.
///
/// Each event contributes a duration-weighted share of whichever bin its
/// value fell in; `percentile_rank` reports the linearly-interpolated
/// cumulative share of total weight below a value.
#[derive(Debug, Clone)]
pub struct TimeWeightedHistogram {
    edges: Vec<f64>,
    horizon: f64,
    bin_weights: Vec<f64>,
    buf: Vec<Event>,
    head: usize,
    len: usize,
    total: f64,
}

#[derive(Debug, Clone, Copy)]
struct Event {
    start: f64,
    end: f64,
    bin: usize,
    weight: f64,
}

impl TimeWeightedHistogram {
    /// `edges` must be strictly increasing and partition the value axis
    /// into `edges.len() - 1` bins; callers validate this at construction.
    pub fn new(edges: Vec<f64>, horizon_seconds: f64) -> Self {
        let n_bins = edges.len().saturating_sub(1).max(1);
        Self {
            edges,
            horizon: horizon_seconds,
            bin_weights: vec![0.0; n_bins],
            buf: vec![
                Event {
                    start: 0.0,
                    end: 0.0,
                    bin: 0,
                    weight: 0.0
                };
                16
            ],
            head: 0,
            len: 0,
            total: 0.0,
        }
    }

    fn bin_of(&self, x: f64) -> usize {
        // Binary search for the first edge strictly greater than x, clamped
        // at both ends so out-of-range values land in the boundary bins.
        let n_bins = self.bin_weights.len();
        if x <= self.edges[0] {
            return 0;
        }
        if x >= *self.edges.last().unwrap() {
            return n_bins - 1;
        }
        match self
            .edges
            .binary_search_by(|e| e.partial_cmp(&x).unwrap())
        {
            Ok(i) => i.min(n_bins - 1),
            Err(i) => (i - 1).min(n_bins - 1),
        }
    }

    /// Assigns `end - start` (must be positive) to `bin(value)` and records
    /// the event for later trimming.
    pub fn add(&mut self, start: f64, end: f64, value: f64) {
        let weight = end - start;
        if weight <= 0.0 || !value.is_finite() {
            return;
        }
        let bin = self.bin_of(value);
        self.bin_weights[bin] += weight;
        self.total += weight;
        self.push(Event {
            start,
            end,
            bin,
            weight,
        });
    }

    fn push(&mut self, e: Event) {
        if self.len == self.buf.len() {
            self.grow();
        }
        let idx = (self.head + self.len) % self.buf.len();
        self.buf[idx] = e;
        self.len += 1;
    }

    fn grow(&mut self) {
        let old_cap = self.buf.len();
        let new_cap = old_cap * 2;
        let mut new_buf = vec![
            Event {
                start: 0.0,
                end: 0.0,
                bin: 0,
                weight: 0.0
            };
            new_cap
        ];
        for i in 0..self.len {
            new_buf[i] = self.buf[(self.head + i) % old_cap];
        }
        self.buf = new_buf;
        self.head = 0;
    }

    /// Evicts events whose `end <= now - horizon`, partially decaying the
    /// straddling event by shrinking its weight and advancing `start`.
    pub fn trim(&mut self, now: f64) {
        let cutoff = now - self.horizon;
        while self.len > 0 {
            let e = self.buf[self.head];
            if e.end <= cutoff {
                self.bin_weights[e.bin] -= e.weight;
                self.total -= e.weight;
                self.head = (self.head + 1) % self.buf.len();
                self.len -= 1;
            } else if e.start < cutoff {
                let removed = cutoff - e.start;
                self.bin_weights[e.bin] -= removed;
                self.total -= removed;
                self.buf[self.head].weight -= removed;
                self.buf[self.head].start = cutoff;
                break;
            } else {
                break;
            }
        }
    }

    /// Linearly interpolated cumulative share of total weight at `x`, or
    /// `NaN` when `total <= 0`.
    pub fn percentile_rank(&self, x: f64) -> f64 {
        if self.total <= 0.0 {
            return f64::NAN;
        }
        let bin = self.bin_of(x);
        let below: f64 = self.bin_weights[..bin].iter().sum();
        let edge_lo = self.edges[bin];
        let edge_hi = self.edges[bin + 1];
        let frac = if edge_hi > edge_lo {
            ((x - edge_lo) / (edge_hi - edge_lo)).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let in_bin = self.bin_weights[bin] * frac;
        (below + in_bin) / self.total
    }
}
