//! Windows binary event log (`.evtx`) parser.
//!
//! Each record in the container is rendered to its XML form and mapped by
//! element local name, so the `http://schemas.microsoft.com/win/2004/08/events/event`
//! default namespace does not get in the way. Container support comes from the
//! `evtx` cargo feature; without it the parser reports that and loads nothing.

use crate::base_parser::{warn_on_extension_mismatch, Parser, RecordOutcome};
use crate::normalize::{normalize_severity, normalize_timestamp};
use crate::{LogFormat, NormalizedEvent, ParseError, ParseOutput};
use roxmltree::{Document, Node};
use std::io::Read;
use std::path::Path;
use tracing::{error, warn};

/// Whether this build can read `.evtx` containers.
pub fn evtx_support_available() -> bool {
    cfg!(feature = "evtx")
}

/// EVTX parser - one event per container record
pub struct EvtxParser;

impl EvtxParser {
    fn unavailable() -> ParseOutput {
        warn!("EVTX support is not available in this build; rebuild with the `evtx` feature");
        ParseOutput::default()
    }
}

impl Parser for EvtxParser {
    fn format(&self) -> LogFormat {
        LogFormat::EvtxWindows
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["evtx"]
    }

    fn parse(&self, path: &Path) -> Result<ParseOutput, ParseError> {
        if !evtx_support_available() {
            return Ok(Self::unavailable());
        }
        warn_on_extension_mismatch(path, self.extensions());

        match std::fs::read(path) {
            Ok(bytes) => Ok(parse_container(bytes)),
            Err(e) => {
                error!("Error reading EVTX {}: {}", path.display(), e);
                Ok(ParseOutput::default())
            }
        }
    }

    fn parse_reader(&self, mut reader: Box<dyn Read>) -> Result<ParseOutput, ParseError> {
        if !evtx_support_available() {
            return Ok(Self::unavailable());
        }

        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Ok(parse_container(buffer))
    }
}

/// Records that fail to decode count as invalid; a container that cannot be
/// opened at all is reported and yields nothing.
#[cfg(feature = "evtx")]
fn parse_container(bytes: Vec<u8>) -> ParseOutput {
    let mut container = match evtx::EvtxParser::from_buffer(bytes) {
        Ok(container) => container,
        Err(e) => {
            error!("Error reading EVTX: {}", e);
            return ParseOutput::default();
        }
    };

    let mut output = ParseOutput::default();
    for record in container.records() {
        output.record(match record {
            Ok(record) => record_outcome(&record.data),
            Err(e) => RecordOutcome::Invalid(e.to_string()),
        });
    }
    output.log_summary(LogFormat::EvtxWindows);
    output
}

#[cfg(not(feature = "evtx"))]
fn parse_container(_bytes: Vec<u8>) -> ParseOutput {
    EvtxParser::unavailable()
}

#[cfg_attr(not(feature = "evtx"), allow(dead_code))]
fn record_outcome(xml: &str) -> RecordOutcome {
    match event_from_xml(xml) {
        Ok(event) => RecordOutcome::Parsed(event),
        Err(e) => RecordOutcome::Invalid(e.to_string()),
    }
}

/// Map one rendered `<Event>` fragment to a normalized event.
pub fn event_from_xml(xml: &str) -> Result<NormalizedEvent, ParseError> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    if root.tag_name().name() != "Event" {
        return Err(format!("expected an <Event> element, found <{}>", root.tag_name().name()).into());
    }

    let time_created = find(root, "TimeCreated").and_then(|n| n.attribute("SystemTime"));
    let provider = find(root, "Provider")
        .and_then(|n| n.attribute("Name"))
        .filter(|name| !name.is_empty());

    Ok(NormalizedEvent {
        timestamp: normalize_timestamp(time_created.unwrap_or("")),
        host: find_text(root, "Computer").unwrap_or("").to_string(),
        process: provider.unwrap_or("unknown").to_string(),
        message: find_text(root, "Message").unwrap_or("").to_string(),
        severity: find_text(root, "Level").map(normalize_severity).unwrap_or(0),
        source_format: None,
    })
}

fn find<'a, 'input>(root: Node<'a, 'input>, local_name: &str) -> Option<Node<'a, 'input>> {
    root.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == local_name)
}

fn find_text<'a>(root: Node<'a, '_>, local_name: &str) -> Option<&'a str> {
    find(root, local_name).and_then(|n| n.text())
}
