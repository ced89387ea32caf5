//! Raw session telemetry as produced by the ingestion service.
//!
//! Every nested lookup is an explicit optional field. Absent collections
//! default to empty, absent flags to `false`, absent scalars to `None`.
//! Keys the extractor does not consume (tap positions, timestamps) are ignored.

mod loader;

pub use loader::{session_files, SessionSource};

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub session: SessionInfo,
    #[serde(default)]
    pub tap_durations_ms: Vec<f64>,
    #[serde(default)]
    pub tap_events: Vec<TapEvent>,
    #[serde(default)]
    pub swipe_events: Vec<SwipeEvent>,
    /// Screen name → seconds spent
    #[serde(default)]
    pub screen_durations: BTreeMap<String, f64>,
    #[serde(default)]
    pub session_input: SessionInput,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionInfo {
    pub duration_seconds: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TapEvent {
    #[serde(default, deserialize_with = "lenient_string")]
    pub screen: Option<String>,
    /// `<vertical>_<horizontal>` grid label, e.g. `top_left`
    #[serde(default, deserialize_with = "lenient_string")]
    pub zone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwipeEvent {
    #[serde(default, deserialize_with = "lenient_string")]
    pub screen: Option<String>,
    pub speed_px_per_ms: Option<f64>,
    pub distance_px: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionInput {
    #[serde(default)]
    pub fd_broken: bool,
    #[serde(default)]
    pub loan_taken: bool,
    pub time_from_login_to_fd: Option<f64>,
    pub time_from_login_to_loan: Option<f64>,
    pub time_from_login_to_transaction: Option<f64>,
}

/// Non-string labels (numbers, objects, null) read as absent instead of failing the record.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

impl SessionRecord {
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_parses_to_defaults() {
        let r = SessionRecord::from_json("{}").unwrap();
        assert!(r.session.duration_seconds.is_none());
        assert!(r.tap_events.is_empty());
        assert!(!r.session_input.fd_broken);
        assert!(r.session_input.time_from_login_to_loan.is_none());
    }

    #[test]
    fn unconsumed_keys_are_ignored() {
        let r = SessionRecord::from_json(
            r#"{
                "session": {"duration_seconds": 12.5, "user": "u1"},
                "tap_events": [{"screen": "home", "zone": "top_left",
                                "position": {"x": 10, "y": 20}, "timestamp": "2025-07-20T18:21:45"}]
            }"#,
        )
        .unwrap();
        assert_eq!(r.session.duration_seconds, Some(12.5));
        assert_eq!(r.tap_events[0].zone.as_deref(), Some("top_left"));
    }

    #[test]
    fn non_string_zone_and_screen_read_as_absent() {
        let r = SessionRecord::from_json(
            r#"{"tap_events": [{"zone": 7, "screen": {"id": 1}}, {"zone": null}],
                "swipe_events": [{"screen": 3, "speed_px_per_ms": 1.0}]}"#,
        )
        .unwrap();
        assert!(r.tap_events[0].zone.is_none());
        assert!(r.tap_events[0].screen.is_none());
        assert!(r.tap_events[1].zone.is_none());
        assert!(r.swipe_events[0].screen.is_none());
    }

    #[test]
    fn wrong_type_is_an_error() {
        assert!(SessionRecord::from_json(r#"{"tap_events": "oops"}"#).is_err());
    }
}
