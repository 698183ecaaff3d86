use std::collections::VecDeque;

/// Which extremum a `MonotonicQueue` tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Max,
    Min,
}

/// A monotonic deque of `(t, price)` tracking the running max or min over
/// a trailing window, plus a reverse scan for "local extremum old enough
/// to act on" candidates used by the threshold-reversion metric.
#[derive(Debug, Clone)]
pub struct MonotonicQueue {
    kind: Extremum,
    entries: VecDeque<(f64, f64)>,
}

impl MonotonicQueue {
    pub fn new(kind: Extremum) -> Self {
        Self {
            kind,
            entries: VecDeque::new(),
        }
    }

    /// Pops tail entries dominated by `p` (for `Max`, price <= p; for `Min`,
    /// price >= p) before appending `(t, p)`.
    pub fn append(&mut self, t: f64, p: f64) {
        match self.kind {
            Extremum::Max => {
                while matches!(self.entries.back(), Some(&(_, bp)) if bp <= p) {
                    self.entries.pop_back();
                }
            }
            Extremum::Min => {
                while matches!(self.entries.back(), Some(&(_, bp)) if bp >= p) {
                    self.entries.pop_back();
                }
            }
        }
        self.entries.push_back((t, p));
    }

    /// Pops head entries older than `cutoff`.
    pub fn trim(&mut self, cutoff: f64) {
        while matches!(self.entries.front(), Some(&(t, _)) if t < cutoff) {
            self.entries.pop_front();
        }
    }

    pub fn extremum(&self) -> Option<(f64, f64)> {
        self.entries.front().copied()
    }

    /// Scans from the entry before the tail backwards for the first price
    /// satisfying both the magnitude requirement
    /// (`|current_price - p| >= threshold`, signed by `is_low`) and the
    /// recency requirement (`now - t >= min_age`).
    pub fn find_candidate(
        &self,
        current_price: f64,
        threshold: f64,
        is_low: bool,
        now: f64,
        min_age: f64,
    ) -> Option<(f64, f64)> {
        if self.entries.len() < 2 {
            return None;
        }
        for i in (0..self.entries.len() - 1).rev() {
            let (t, p) = self.entries[i];
            let magnitude_ok = if is_low {
                current_price - p >= threshold
            } else {
                p - current_price >= threshold
            };
            if magnitude_ok && now - t >= min_age {
                return Some((t, p));
            }
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn max_queue_front_is_running_max() {
        let mut q = MonotonicQueue::new(Extremum::Max);
        for (t, p) in [(0.0, 1.0), (1.0, 3.0), (2.0, 2.0), (3.0, 5.0)] {
            q.append(t, p);
        }
        assert_eq!(q.extremum(), Some((3.0, 5.0)));
    }

    #[test]
    fn min_queue_front_is_running_min() {
        let mut q = MonotonicQueue::new(Extremum::Min);
        for (t, p) in [(0.0, 5.0), (1.0, 3.0), (2.0, 4.0), (3.0, 1.0)] {
            q.append(t, p);
        }
        assert_eq!(q.extremum(), Some((3.0, 1.0)));
    }

    #[test]
    fn trim_drops_expired_head() {
        let mut q = MonotonicQueue::new(Extremum::Max);
        q.append(0.0, 1.0);
        q.append(5.0, 1.0);
        q.trim(3.0);
        assert!(q.extremum().unwrap().0 >= 3.0);
    }

    #[test]
    fn find_candidate_respects_magnitude_and_recency() {
        let mut q = MonotonicQueue::new(Extremum::Min);
        // descend to a low, then rebound, leaving multiple ascending entries
        q.append(0.0, 1.1000);
        q.append(1.0, 1.0995);
        q.append(2.0, 1.0990);
        q.append(3.0, 1.0995);
        q.append(4.0, 1.1000);
        // current price has reverted back up; look for a low at least 5
        // pips below current and at least 3s old
        let candidate = q.find_candidate(1.1000, 0.0005, true, 10.0, 3.0);
        assert!(candidate.is_some());
        let (t, p) = candidate.unwrap();
        assert!(1.1000 - p >= 0.0005 - 1e-9);
        assert!(10.0 - t >= 3.0 - 1e-9);
    }

    #[test]
    fn find_candidate_none_when_too_recent() {
        let mut q = MonotonicQueue::new(Extremum::Min);
        q.append(0.0, 1.1000);
        q.append(5.0, 1.0990);
        q.append(9.0, 1.0995);
        let candidate = q.find_candidate(1.1000, 0.0005, true, 10.0, 8.0);
        assert!(candidate.is_none());
    }

    // Invariant 6 (spec §8): the queue's head always holds the true
    // extremum among entries within [cutoff, now], for either kind.
    proptest! {
        #[test]
        fn head_is_the_true_extremum_in_window(
            points in prop::collection::vec((0.0f64..100.0, -1.0f64..1.0), 1..60),
            cutoff in 0.0f64..100.0,
        ) {
            let mut sorted = points.clone();
            sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

            for kind in [Extremum::Max, Extremum::Min] {
                let mut q = MonotonicQueue::new(kind);
                for &(t, p) in &sorted {
                    q.append(t, p);
                }
                q.trim(cutoff);

                let expected = sorted
                    .iter()
                    .filter(|&&(t, _)| t >= cutoff)
                    .cloned()
                    .reduce(|acc, cur| match kind {
                        Extremum::Max => if cur.1 >= acc.1 { cur } else { acc },
                        Extremum::Min => if cur.1 <= acc.1 { cur } else { acc },
                    });

                match expected {
                    None => prop_assert!(q.is_empty()),
                    Some((_, expected_p)) => {
                        let (_, head_p) = q.extremum().unwrap();
                        prop_assert!((head_p - expected_p).abs() < 1e-9);
                    }
                }
            }
        }
    }
}
