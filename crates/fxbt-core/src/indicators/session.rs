use std::collections::HashMap;
use std::sync::OnceLock;

use crate::indicators::metric_trait::{qualify, Metric, SnapshotValue};
use crate::tick::Tick;

/// The trading-session label for a UTC wall-clock minute-of-day.
///
/// Boundaries (minutes since UTC midnight):
/// `22:00–06:59 Asia; 07:00–11:59 London; 12:00–15:59 Overlap;`
/// `16:00–20:59 New_York; 21:00–21:59 Other`.
fn session_label_for(minute_of_day: u16) -> &'static str {
    static TABLE: OnceLock<[&'static str; 1440]> = OnceLock::new();
    let table = TABLE.get_or_init(build_table);
    table[minute_of_day as usize % 1440]
}

fn build_table() -> [&'static str; 1440] {
    let mut table = ["Other"; 1440];
    for (m, slot) in table.iter_mut().enumerate() {
        let h = m / 60;
        *slot = if (22..24).contains(&h) || h < 7 {
            "Asia"
        } else if (7..12).contains(&h) {
            "London"
        } else if (12..16).contains(&h) {
            "London_New_York_Overlap"
        } else if (16..21).contains(&h) {
            "New_York"
        } else {
            "Other"
        };
    }
    table
}

/// Categorical session-of-day label derived from the tick's UTC hour/minute.
pub struct Session {
    name: String,
    label: &'static str,
}

impl Session {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: "Other",
        }
    }
}

impl Metric for Session {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, tick: &Tick) {
        let minute_of_day = tick.hour as u16 * 60 + tick.minute as u16;
        self.label = session_label_for(minute_of_day);
    }

    fn snapshot(&self, out: &mut HashMap<String, SnapshotValue>) {
        out.insert(
            qualify(&self.name, "session_label"),
            SnapshotValue::Label(self.label),
        );
    }
}
