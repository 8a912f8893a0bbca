use super::TaskId;
use crate::position::PositionId;
use crate::search::{DebugMap, StationTimes};
use serde::{Deserialize, Serialize};

/// messages sent from a background search to the orchestrator. a task
/// sends any number of `Working` messages with a non-decreasing counter,
/// then exactly one `Done` or `Error`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WorkerMessage {
    Working {
        at: u64,
    },
    #[serde(rename_all = "camelCase")]
    Done {
        #[serde(deserialize_with = "station_keys::deserialize")]
        station_map: StationTimes,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "station_keys::deserialize_option"
        )]
        debug_map: Option<DebugMap>,
        count: u64,
    },
    Error {
        message: String,
    },
}

impl WorkerMessage {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkerMessage::Working { .. })
    }
}

/// json object keys are strings. the tagged enum buffers its fields, so
/// station ids have to be parsed from the key text explicitly.
mod station_keys {
    use reachmap_core::model::StationId;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use std::collections::HashMap;

    pub fn deserialize<'de, D, V>(deserializer: D) -> Result<HashMap<StationId, V>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        let raw = HashMap::<String, V>::deserialize(deserializer)?;
        parse_keys::<D, V>(raw)
    }

    pub fn deserialize_option<'de, D, V>(
        deserializer: D,
    ) -> Result<Option<HashMap<StationId, V>>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        Option::<HashMap<String, V>>::deserialize(deserializer)?
            .map(parse_keys::<D, V>)
            .transpose()
    }

    fn parse_keys<'de, D, V>(raw: HashMap<String, V>) -> Result<HashMap<StationId, V>, D::Error>
    where
        D: Deserializer<'de>,
    {
        raw.into_iter()
            .map(|(key, value)| {
                key.parse::<StationId>()
                    .map(|id| (id, value))
                    .map_err(|e| D::Error::custom(format!("invalid station id '{key}': {e}")))
            })
            .collect()
    }
}

/// a worker message tagged with the position and task that produced it.
#[derive(Debug, Clone)]
pub struct TaskEnvelope {
    pub position: PositionId,
    pub task: TaskId,
    pub message: WorkerMessage,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wire_format() {
        let working = serde_json::to_value(WorkerMessage::Working { at: 5000 })
            .expect("message serializes");
        assert_eq!(working, serde_json::json!({"status": "working", "at": 5000}));

        let done: WorkerMessage =
            serde_json::from_str(r#"{"status": "done", "stationMap": {"3": 120}, "count": 7}"#)
                .expect("done message deserializes");
        assert!(done.is_terminal());
        assert!(matches!(
            done,
            WorkerMessage::Done { ref station_map, debug_map: None, count: 7 }
                if station_map.get(&3) == Some(&120)
        ));
        assert!(!WorkerMessage::Working { at: 1 }.is_terminal());
    }

    #[test]
    fn test_done_with_debug_map_reads_back() {
        let json = r#"{
            "status": "done",
            "stationMap": {"0": 0, "4": 630},
            "debugMap": {"4": [
                {"from": null, "to": 0, "line": null, "time": 0, "stay": 0, "waitTime": 0, "walkTime": 0},
                {"from": 0, "to": 4, "line": "L1", "time": 630, "stay": 30, "waitTime": 300, "walkTime": 0}
            ]},
            "count": 12
        }"#;
        let done: WorkerMessage = serde_json::from_str(json).expect("done message deserializes");
        let WorkerMessage::Done {
            station_map,
            debug_map: Some(debug_map),
            count,
        } = &done
        else {
            panic!("expected a done message with a debug map, found {done:?}");
        };
        assert_eq!(*count, 12);
        assert_eq!(station_map.get(&4), Some(&630));
        let path = debug_map.get(&4).expect("path to station 4");
        assert_eq!(path.len(), 2);
        assert_eq!(path[1].from, Some(0));
        assert_eq!(path[1].line.as_deref(), Some("L1"));

        // what we write we can read
        let text = serde_json::to_string(&done).expect("message serializes");
        let again: WorkerMessage = serde_json::from_str(&text).expect("message reads back");
        assert_eq!(again, done);
    }

    #[test]
    fn test_done_rejects_non_numeric_station_id() {
        let result: Result<WorkerMessage, _> =
            serde_json::from_str(r#"{"status": "done", "stationMap": {"a": 1}, "count": 1}"#);
        assert!(result.is_err());
    }
}
