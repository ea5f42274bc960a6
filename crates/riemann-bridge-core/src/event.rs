//! Event reshaping for line-oriented sources.
//!
//! Implements tolerant reader pattern: blank lines skipped, malformed JSON
//! reported to the caller, a `time` field injected when missing.

use chrono::{Local, SecondsFormat};
use serde_json::{Map, Value};

/// One serialized JSON event. Opaque once past the source adapter.
pub type Event = Vec<u8>;

/// Name of the field stamped with the receive time when absent.
pub const TIME_FIELD: &str = "time";

/// Reshape a single line of newline-delimited JSON into an [`Event`].
///
/// Returns `Ok(None)` for whitespace-only lines and an error for anything
/// that is not a JSON object.
pub fn reshape_line(line: &[u8]) -> serde_json::Result<Option<Event>> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return Ok(None);
    }

    let mut object: Map<String, Value> = serde_json::from_slice(line)?;
    stamp_time(&mut object);

    Ok(Some(serde_json::to_vec(&object)?))
}

/// Insert the current wall-clock time if `time` is absent or null.
pub fn stamp_time(object: &mut Map<String, Value>) {
    if object.get(TIME_FIELD).is_none_or(Value::is_null) {
        object.insert(TIME_FIELD.to_string(), Value::String(now_rfc3339()));
    }
}

fn now_rfc3339() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn decode(event: &[u8]) -> Map<String, Value> {
        serde_json::from_slice(event).unwrap()
    }

    #[test]
    fn whitespace_line_is_skipped() {
        assert!(reshape_line(b"").unwrap().is_none());
        assert!(reshape_line(b"   \t \n").unwrap().is_none());
    }

    #[test]
    fn missing_time_is_injected() {
        let event = reshape_line(br#"{"service":"a"}"#).unwrap().unwrap();
        let object = decode(&event);
        assert_eq!(object["service"], "a");
        let time = object[TIME_FIELD].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(time).is_ok());
    }

    #[test]
    fn null_time_is_replaced() {
        let event = reshape_line(br#"{"service":"a","time":null}"#)
            .unwrap()
            .unwrap();
        assert!(decode(&event)[TIME_FIELD].is_string());
    }

    #[test]
    fn existing_time_is_kept() {
        let event = reshape_line(b"{\"service\":\"b\",\"time\":5}\r\n").unwrap().unwrap();
        assert_eq!(event, br#"{"service":"b","time":5}"#);
    }

    #[test]
    fn field_presence_survives_round_trip() {
        let event = reshape_line(br#"{"state":"ok","metric":1.5,"tags":["x"],"time":1}"#)
            .unwrap()
            .unwrap();
        let object = decode(&event);
        assert_eq!(object.len(), 4);
        assert_eq!(object["tags"][0], "x");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(reshape_line(b"{not json").unwrap_err().is_syntax());
    }

    #[test]
    fn non_object_is_an_error() {
        assert!(reshape_line(b"[1,2,3]").unwrap_err().is_data());
        assert!(reshape_line(b"42").unwrap_err().is_data());
    }
}
