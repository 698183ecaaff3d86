use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use csv::Reader;
use fxbt_core::io::{ProducerError, TickProducer};
use fxbt_core::Tick;
use serde::Deserialize;
use tracing::warn;

use crate::error::ImportError;

#[derive(Debug, Deserialize)]
struct CsvRow {
    symbol: String,
    timestamp: String,
    bid: f64,
    ask: f64,
}

fn parse_timestamp_seconds(s: &str) -> Result<f64, ImportError> {
    if let Ok(millis) = s.parse::<i64>() {
        return Ok(millis as f64 / 1000.0);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc).timestamp_millis() as f64 / 1000.0)
        .map_err(|e| ImportError::ParseError(format!("unparseable timestamp {s:?}: {e}")))
}

/// Reads ticks for one symbol from a CSV file (`symbol,timestamp,bid,ask`
/// header), in the teacher's row-at-a-time streaming style rather than
/// batch-loading the whole file. `timestamp` accepts either epoch
/// milliseconds or RFC3339.
pub struct CsvTickProducer {
    reader: Reader<File>,
    symbol_id: u32,
    expected_symbol: String,
    last_timestamp: Option<f64>,
    line: usize,
}

impl CsvTickProducer {
    pub fn open(
        path: impl AsRef<Path>,
        symbol_id: u32,
        expected_symbol: impl Into<String>,
    ) -> Result<Self, ImportError> {
        let reader = Reader::from_path(path)?;
        Ok(Self {
            reader,
            symbol_id,
            expected_symbol: expected_symbol.into(),
            last_timestamp: None,
            line: 1,
        })
    }
}

impl TickProducer for CsvTickProducer {
    fn next_tick(&mut self) -> Result<Option<Tick>, ProducerError> {
        let mut record = csv::StringRecord::new();
        let read = self
            .reader
            .read_record(&mut record)
            .map_err(|e| ProducerError::Io(e.to_string()))?;
        if !read {
            return Ok(None);
        }
        self.line += 1;

        let row: CsvRow = record
            .deserialize(self.reader.headers().ok())
            .map_err(|e| {
                ProducerError::Malformed(format!("line {}: {e}", self.line))
            })?;

        if row.symbol != self.expected_symbol {
            return Err(ProducerError::Malformed(format!(
                "line {}: expected symbol {}, got {}",
                self.line, self.expected_symbol, row.symbol
            )));
        }

        let timestamp = parse_timestamp_seconds(&row.timestamp)
            .map_err(|e| ProducerError::Malformed(format!("line {}: {e}", self.line)))?;

        if let Some(prev) = self.last_timestamp {
            if timestamp < prev {
                return Err(ProducerError::Malformed(format!(
                    "line {}: timestamp {timestamp} before previous {prev}",
                    self.line
                )));
            }
        }
        self.last_timestamp = Some(timestamp);

        if !row.bid.is_finite() || !row.ask.is_finite() || row.bid > row.ask {
            warn!(line = self.line, bid = row.bid, ask = row.ask, "dropping anomalous tick");
            return self.next_tick();
        }

        Ok(Some(Tick::new(self.symbol_id, timestamp, row.bid, row.ask)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{contents}").unwrap();
        f
    }

    #[test]
    fn reads_ticks_in_order() {
        let f = write_csv(
            "symbol,timestamp,bid,ask\nEURUSD,0,1.1000,1.1001\nEURUSD,1,1.1001,1.1002\n",
        );
        let mut p = CsvTickProducer::open(f.path(), 1, "EURUSD").unwrap();
        let t1 = p.next_tick().unwrap().unwrap();
        assert_eq!(t1.timestamp, 0.0);
        let t2 = p.next_tick().unwrap().unwrap();
        assert_eq!(t2.timestamp, 1.0);
        assert!(p.next_tick().unwrap().is_none());
    }

    #[test]
    fn rejects_out_of_order_timestamps() {
        let f = write_csv(
            "symbol,timestamp,bid,ask\nEURUSD,5,1.1000,1.1001\nEURUSD,1,1.1001,1.1002\n",
        );
        let mut p = CsvTickProducer::open(f.path(), 1, "EURUSD").unwrap();
        p.next_tick().unwrap();
        assert!(p.next_tick().is_err());
    }

    #[test]
    fn skips_anomalous_rows_and_continues() {
        let f = write_csv(
            "symbol,timestamp,bid,ask\nEURUSD,0,1.1002,1.1000\nEURUSD,1,1.1001,1.1002\n",
        );
        let mut p = CsvTickProducer::open(f.path(), 1, "EURUSD").unwrap();
        let t = p.next_tick().unwrap().unwrap();
        assert_eq!(t.timestamp, 1.0);
    }
}
