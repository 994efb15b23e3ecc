//! Ingestion step: dispatch a staged file to its parser, stamp the events with
//! their source format and append them to the caller's collection.

use crate::registry_parser::ParserRegistry;
use crate::{LogFormat, NormalizedEvent};
use std::path::Path;
use tracing::{error, info, warn};

/// Parse `staged` as `format` and append the stamped events to `events`.
///
/// Returns how many events were appended. Parser failures are logged and
/// count as zero events; earlier entries in `events` are never touched.
pub fn ingest_file(
    registry: &ParserRegistry,
    format: LogFormat,
    staged: &Path,
    events: &mut Vec<NormalizedEvent>,
) -> usize {
    if !format.is_available() {
        warn!("{} support is not available, skipping {}", format.label(), staged.display());
        warn!("No events were loaded from this file");
        return 0;
    }

    let parsed = match registry.parse(format, staged) {
        Ok(output) => output.events,
        Err(e) => {
            error!("Failed to parse {} as {}: {}", staged.display(), format, e);
            Vec::new()
        }
    };

    let added = append_stamped(format, parsed, events);
    if added == 0 {
        warn!("No events were loaded from this file");
    } else {
        info!("Total events loaded so far: {}", events.len());
    }
    added
}

/// Stamp every event with `format` and append them in order.
pub fn append_stamped(
    format: LogFormat,
    parsed: Vec<NormalizedEvent>,
    events: &mut Vec<NormalizedEvent>,
) -> usize {
    let added = parsed.len();
    events.extend(parsed.into_iter().map(|mut event| {
        event.source_format = Some(format);
        event
    }));
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base_parser::{Parser, RecordOutcome};
    use crate::{ParseError, ParseOutput};
    use std::io::Read;

    /// Yields two fixed events no matter what it is given
    struct TwoEventParser;

    impl Parser for TwoEventParser {
        fn format(&self) -> LogFormat {
            LogFormat::Syslog
        }

        fn extensions(&self) -> &'static [&'static str] {
            &["log"]
        }

        fn parse_reader(&self, _reader: Box<dyn Read>) -> Result<ParseOutput, ParseError> {
            unreachable!("ingest goes through parse()")
        }

        fn parse(&self, _path: &Path) -> Result<ParseOutput, ParseError> {
            let outcomes = ["first", "second"].map(|message| {
                RecordOutcome::Parsed(NormalizedEvent {
                    timestamp: String::new(),
                    host: "h".into(),
                    process: "p".into(),
                    message: message.into(),
                    severity: 1,
                    source_format: None,
                })
            });
            Ok(ParseOutput::from_outcomes(LogFormat::Syslog, outcomes))
        }
    }

    struct FailingParser;

    impl Parser for FailingParser {
        fn format(&self) -> LogFormat {
            LogFormat::Json
        }

        fn extensions(&self) -> &'static [&'static str] {
            &["json"]
        }

        fn parse_reader(&self, _reader: Box<dyn Read>) -> Result<ParseOutput, ParseError> {
            Err("disk on fire".into())
        }

        fn parse(&self, _path: &Path) -> Result<ParseOutput, ParseError> {
            Err("disk on fire".into())
        }
    }

    fn earlier_event() -> NormalizedEvent {
        NormalizedEvent {
            timestamp: "2024-01-01T00:00:00".into(),
            host: "old".into(),
            process: "old".into(),
            message: "already here".into(),
            severity: 3,
            source_format: Some(LogFormat::CsvLinux),
        }
    }

    #[test]
    fn test_events_are_stamped_and_appended_in_order() {
        let registry = ParserRegistry::with_parsers(vec![Box::new(TwoEventParser)]);
        let mut events = vec![earlier_event()];

        let added = ingest_file(&registry, LogFormat::Syslog, Path::new("auth.log"), &mut events);

        assert_eq!(added, 2);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], earlier_event());
        assert_eq!(events[1].message, "first");
        assert_eq!(events[2].message, "second");
        assert!(events[1..]
            .iter()
            .all(|e| e.source_format == Some(LogFormat::Syslog)));
    }

    #[test]
    fn test_parser_error_loads_nothing() {
        let registry = ParserRegistry::with_parsers(vec![Box::new(FailingParser)]);
        let mut events = vec![earlier_event()];

        let added = ingest_file(&registry, LogFormat::Json, Path::new("alerts.json"), &mut events);

        assert_eq!(added, 0);
        assert_eq!(events, vec![earlier_event()]);
    }

    #[test]
    fn test_unregistered_format_loads_nothing() {
        let registry = ParserRegistry::with_parsers(vec![]);
        let mut events = Vec::new();

        let added = ingest_file(&registry, LogFormat::CsvLinux, Path::new("x.csv"), &mut events);

        assert_eq!(added, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_append_stamped_overwrites_nothing_else() {
        let mut events = Vec::new();
        let parsed = vec![earlier_event()];

        append_stamped(LogFormat::EvtxWindows, parsed, &mut events);

        assert_eq!(events[0].source_format, Some(LogFormat::EvtxWindows));
        assert_eq!(events[0].message, "already here");
    }
}
