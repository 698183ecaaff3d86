use std::collections::HashMap;

use crate::error::ConfigError;
use crate::indicators::metric_trait::{qualify, Metric, SnapshotValue};
use crate::primitives::{Extremum, MonotonicQueue};
use crate::tick::Tick;

/// The reversion-candidate metric underlying the threshold-reversion entry
/// engine: tracks a drifting reference extremum and the direction a
/// mean-reversion trade off that reference would currently take.
pub struct ThresholdReversion {
    name: String,
    pip_size: f64,
    threshold: f64,
    tp_distance: f64,
    sl_distance: f64,
    min_recency_seconds: f64,
    lookback_seconds: f64,

    max_queue: MonotonicQueue,
    min_queue: MonotonicQueue,
    p_ref: Option<f64>,
    t_ref: Option<f64>,
    position: i8,
    tp_price: f64,
    sl_price: f64,
    position_open_time: f64,
    last_tick_time: f64,
}

impl ThresholdReversion {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        pip_size: f64,
        threshold_pips: f64,
        tp_pips: f64,
        sl_pips: f64,
        min_recency_seconds: f64,
        lookback_seconds: f64,
    ) -> Result<Self, ConfigError> {
        if pip_size <= 0.0 {
            return Err(ConfigError::NotPositive {
                param: "pip_size",
                value: pip_size,
            });
        }
        if lookback_seconds <= 0.0 {
            return Err(ConfigError::NotPositive {
                param: "lookback_seconds",
                value: lookback_seconds,
            });
        }
        Ok(Self {
            name: name.into(),
            pip_size,
            threshold: threshold_pips * pip_size,
            tp_distance: tp_pips * pip_size,
            sl_distance: sl_pips * pip_size,
            min_recency_seconds,
            lookback_seconds,
            max_queue: MonotonicQueue::new(Extremum::Max),
            min_queue: MonotonicQueue::new(Extremum::Min),
            p_ref: None,
            t_ref: None,
            position: 0,
            tp_price: f64::NAN,
            sl_price: f64::NAN,
            position_open_time: f64::NAN,
            last_tick_time: f64::NAN,
        })
    }

    fn flatten(&mut self) {
        self.position = 0;
        self.tp_price = f64::NAN;
        self.sl_price = f64::NAN;
        self.position_open_time = f64::NAN;
    }

    pub fn direction(&self) -> i8 {
        self.position
    }
}

impl Metric for ThresholdReversion {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, tick: &Tick) {
        let t = tick.timestamp;
        let mid = tick.mid;
        let cutoff = t - self.lookback_seconds;
        self.last_tick_time = t;

        self.min_queue.append(t, mid);
        self.min_queue.trim(cutoff);
        self.max_queue.append(t, mid);
        self.max_queue.trim(cutoff);

        let low_candidate =
            self.min_queue
                .find_candidate(mid, self.threshold, true, t, self.min_recency_seconds);
        let high_candidate =
            self.max_queue
                .find_candidate(mid, self.threshold, false, t, self.min_recency_seconds);

        // the newer of the two candidates wins
        let candidate = match (low_candidate, high_candidate) {
            (Some(l), Some(h)) => Some(if l.0 >= h.0 { l } else { h }),
            (Some(l), None) => Some(l),
            (None, Some(h)) => Some(h),
            (None, None) => None,
        };

        // step 3: reversion completed — flatten, then retry the candidate
        // search outcome already computed above (the source permits a
        // flatten immediately followed by a reopen within the same tick).
        if self.position != 0 {
            if let Some(p_ref) = self.p_ref {
                if (mid - p_ref).abs() <= self.pip_size {
                    self.flatten();
                }
            }
        }

        match candidate {
            None => {
                self.flatten();
                self.p_ref = None;
                self.t_ref = None;
            }
            Some((ct, cp)) => {
                if let Some(old) = self.p_ref {
                    if (cp - old).abs() > self.pip_size / 10.0 {
                        self.flatten();
                    }
                }
                self.p_ref = Some(cp);
                self.t_ref = Some(ct);
            }
        }

        if self.position == 0 {
            if let Some(p_ref) = self.p_ref {
                if mid - p_ref >= self.threshold {
                    self.position = -1;
                    self.tp_price = mid - self.tp_distance;
                    self.sl_price = mid + self.sl_distance;
                    self.position_open_time = t;
                } else if p_ref - mid >= self.threshold {
                    self.position = 1;
                    self.tp_price = mid + self.tp_distance;
                    self.sl_price = mid - self.sl_distance;
                    self.position_open_time = t;
                }
            }
        }
    }

    fn snapshot(&self, out: &mut HashMap<String, SnapshotValue>) {
        out.insert(
            qualify(&self.name, "direction"),
            SnapshotValue::Number(self.position as f64),
        );
        out.insert(
            qualify(&self.name, "reference_price"),
            SnapshotValue::Number(self.p_ref.unwrap_or(f64::NAN)),
        );
        out.insert(
            qualify(&self.name, "tp_price"),
            SnapshotValue::Number(self.tp_price),
        );
        out.insert(
            qualify(&self.name, "sl_price"),
            SnapshotValue::Number(self.sl_price),
        );
        // time elapsed since the reference was last set, as of the most
        // recently processed tick — not tied to position_open_time, which
        // is NaN while flat and would otherwise mask this as always 0.
        let age = match self.t_ref {
            Some(t_ref) => self.last_tick_time - t_ref,
            None => f64::NAN,
        };
        out.insert(
            qualify(&self.name, "reference_age_seconds"),
            SnapshotValue::Number(age),
        );
    }
}
