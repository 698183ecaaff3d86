use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// A single quote observation: bid/ask pair at a point in time.
///
/// `timestamp` is seconds since the Unix epoch, as an `f64` so that
/// sub-second gaps between ticks (the `dt` the EWMA and rolling-window
/// primitives need) survive without a separate nanosecond field. `mid`,
/// `hour` and `minute` are derived once at construction rather than
/// recomputed by every metric that reads them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub symbol_id: u32,
    pub timestamp: f64,
    pub bid: f64,
    pub ask: f64,
    pub mid: f64,
    pub hour: u8,
    pub minute: u8,
}

impl Tick {
    /// Builds a tick, deriving `mid`, `hour` and `minute` from `timestamp`.
    ///
    /// Does not validate `bid <= ask` or finiteness; the producer boundary
    /// is responsible for filtering anomalous ticks before they reach the
    /// core (see `io::TickProducer`).
    pub fn new(symbol_id: u32, timestamp: f64, bid: f64, ask: f64) -> Self {
        let mid = (bid + ask) / 2.0;
        let (hour, minute) = wall_clock_components(timestamp);
        Self {
            symbol_id,
            timestamp,
            bid,
            ask,
            mid,
            hour,
            minute,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.bid.is_finite() && self.ask.is_finite() && self.bid <= self.ask
    }
}

/// Derives the UTC wall-clock hour/minute of a seconds-since-epoch timestamp.
fn wall_clock_components(timestamp_secs: f64) -> (u8, u8) {
    let whole_secs = timestamp_secs.floor() as i64;
    let dt: DateTime<Utc> =
        DateTime::from_timestamp(whole_secs, 0).unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap());
    (dt.hour() as u8, dt.minute() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mid_is_average_of_bid_ask() {
        let tick = Tick::new(0, 0.0, 1.1000, 1.1002);
        assert!((tick.mid - 1.1001).abs() < 1e-12);
    }

    #[test]
    fn hour_minute_derived_from_timestamp() {
        // 2024-01-01T14:30:00Z
        let ts = 1704119400.0;
        let tick = Tick::new(0, ts, 1.1, 1.1);
        assert_eq!(tick.hour, 14);
        assert_eq!(tick.minute, 30);
    }

    #[test]
    fn validity_checks_finiteness_and_ordering() {
        assert!(Tick::new(0, 0.0, 1.0, 1.1).is_valid());
        assert!(!Tick::new(0, 0.0, 1.2, 1.1).is_valid());
        assert!(!Tick::new(0, 0.0, f64::NAN, 1.1).is_valid());
    }
}
