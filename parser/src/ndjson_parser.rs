use crate::base_parser::{read_text, Parser, RecordOutcome};
use crate::normalize::{normalize_severity_value, normalize_timestamp};
use crate::{LogFormat, NormalizedEvent, ParseError, ParseOutput};
use serde_json::{Map, Value};
use std::io::Read;

/// NDJSON parser - one alert object per line, Wazuh-style field layout
pub struct NdjsonParser;

impl NdjsonParser {
    fn parse_line(line: &str) -> RecordOutcome {
        let line = line.trim();
        if line.is_empty() {
            return RecordOutcome::Blank;
        }

        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(obj)) => RecordOutcome::Parsed(map_alert(&obj)),
            Ok(other) => RecordOutcome::Invalid(format!("expected a JSON object, got {}", kind(&other))),
            Err(e) => RecordOutcome::Invalid(e.to_string()),
        }
    }
}

fn map_alert(obj: &Map<String, Value>) -> NormalizedEvent {
    let host = nested_text(obj, "agent", "name")
        .or_else(|| nested_text(obj, "manager", "name"))
        .unwrap_or_default();

    let process = nested_text(obj, "predecoder", "program_name")
        .or_else(|| nested_text(obj, "decoder", "name"))
        .unwrap_or_else(|| "unknown".to_string());

    let severity = obj
        .get("rule")
        .and_then(Value::as_object)
        .and_then(|rule| rule.get("level"))
        .map(normalize_severity_value)
        .unwrap_or(0);

    NormalizedEvent {
        timestamp: normalize_timestamp(&obj.get("timestamp").and_then(text).unwrap_or_default()),
        host,
        process,
        message: obj.get("full_log").and_then(text).unwrap_or_default(),
        severity,
        source_format: None,
    }
}

/// `obj[outer][inner]` as text; `None` when any level is missing or null
fn nested_text(obj: &Map<String, Value>, outer: &str, inner: &str) -> Option<String> {
    obj.get(outer)?.as_object()?.get(inner).and_then(text)
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Parser for NdjsonParser {
    fn format(&self) -> LogFormat {
        LogFormat::Json
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json", "ndjson", "jsonl"]
    }

    fn parse_reader(&self, reader: Box<dyn Read>) -> Result<ParseOutput, ParseError> {
        let text = read_text(reader)?;
        let outcomes = text.lines().map(Self::parse_line);
        Ok(ParseOutput::from_outcomes(LogFormat::Json, outcomes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(data: &str) -> ParseOutput {
        NdjsonParser
            .parse_reader(Box::new(Cursor::new(data.to_string())))
            .unwrap()
    }

    #[test]
    fn test_ndjson_parse_wazuh_alert() {
        let data = r#"{"timestamp":"2024-05-01T10:00:00.000+0000","rule":{"level":5,"description":"sshd: authentication success."},"agent":{"id":"001","name":"web01"},"manager":{"name":"wazuh-manager"},"predecoder":{"program_name":"sshd","hostname":"web01"},"decoder":{"name":"sshd"},"full_log":"May  1 10:00:00 web01 sshd[811]: Accepted publickey for root"}"#;

        let output = parse(data);

        assert_eq!(output.events.len(), 1);
        let event = &output.events[0];
        assert_eq!(event.timestamp, "2024-05-01T10:00:00+00:00");
        assert_eq!(event.host, "web01");
        assert_eq!(event.process, "sshd");
        assert_eq!(event.severity, 5);
        assert!(event.message.starts_with("May  1 10:00:00 web01"));
    }

    #[test]
    fn test_fallback_fields() {
        let data = r#"{"manager":{"name":"mgr"},"decoder":{"name":"json"},"rule":{"level":"14"}}
{"agent":{"id":"002"},"predecoder":{}}"#;

        let output = parse(data);

        assert_eq!(output.events.len(), 2);
        assert_eq!(output.events[0].host, "mgr");
        assert_eq!(output.events[0].process, "json");
        assert_eq!(output.events[0].severity, 10);

        let bare = &output.events[1];
        assert_eq!(bare.host, "");
        assert_eq!(bare.process, "unknown");
        assert_eq!(bare.message, "");
        assert_eq!(bare.timestamp, "");
        assert_eq!(bare.severity, 0);
    }

    #[test]
    fn test_blank_lines_are_not_invalid() {
        let data = "\n{\"full_log\":\"a\"}\n   \n{not json}\n[1,2]\n{\"full_log\":\"b\"}\n";

        let output = parse(data);

        assert_eq!(output.events.len(), 2);
        assert_eq!(output.summary.valid, 2);
        assert_eq!(output.summary.invalid, 2);
    }

    #[test]
    fn test_unparseable_timestamp_kept() {
        let output = parse(r#"{"timestamp":"last tuesday"}"#);
        assert_eq!(output.events[0].timestamp, "last tuesday");
    }

    #[test]
    fn test_empty_input() {
        let output = parse("");
        assert!(output.events.is_empty());
        assert_eq!(output.summary.total(), 0);
    }
}
