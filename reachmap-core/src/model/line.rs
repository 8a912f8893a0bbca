use super::RawLine;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// a transit line with its departure intervals, keyed by `"{weekday}-{start}"`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Line {
    pub line_id: String,
    pub name: String,
    pub intervals: HashMap<String, u32>,
}

impl Line {
    pub fn interval_key(weekday: u32, start: u32) -> String {
        format!("{weekday}-{start}")
    }

    /// seconds between departures for the schedule key, if the line runs then.
    pub fn interval(&self, interval_key: &str) -> Option<u32> {
        self.intervals.get(interval_key).copied()
    }

    /// builds a line from its raw schedule records. a line without any
    /// schedule records never runs and is not represented.
    pub fn from_raw(raw: &RawLine) -> Option<Line> {
        if raw.line_times.is_empty() {
            return None;
        }
        let intervals = raw
            .line_times
            .iter()
            .map(|t| (Line::interval_key(t.weekday, t.start), t.interval))
            .collect();
        Some(Line {
            line_id: raw.line_id.clone(),
            name: raw.name.clone(),
            intervals,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::RawLineTime;

    #[test]
    fn test_from_raw_keys_by_weekday_and_start() {
        let raw = RawLine {
            line_id: String::from("U2"),
            name: String::from("U2 Pankow"),
            line_times: vec![
                RawLineTime {
                    interval: 300,
                    start: 6,
                    stop: 9,
                    weekday: 1,
                },
                RawLineTime {
                    interval: 600,
                    start: 9,
                    stop: 16,
                    weekday: 1,
                },
            ],
        };
        let line = Line::from_raw(&raw).expect("line has schedule records");
        assert_eq!(line.interval("1-6"), Some(300));
        assert_eq!(line.interval("1-9"), Some(600));
        assert_eq!(line.interval("7-6"), None);
    }

    #[test]
    fn test_from_raw_without_schedule_is_skipped() {
        let raw = RawLine {
            line_id: String::from("X"),
            ..Default::default()
        };
        assert!(Line::from_raw(&raw).is_none());
    }
}
