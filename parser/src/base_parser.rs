use crate::{LogFormat, NormalizedEvent, ParseError, ParseOutput, ParseSummary};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// Base trait that all parsers must implement
/// Uses Box<dyn Read> to be object-safe (dyn compatible)
pub trait Parser: Send + Sync {
    /// The format this parser handles; also the tag stamped on its events
    fn format(&self) -> LogFormat;

    /// File extensions this format usually arrives with (e.g., ["csv"])
    fn extensions(&self) -> &'static [&'static str];

    /// Parse every record the reader yields
    fn parse_reader(&self, reader: Box<dyn Read>) -> Result<ParseOutput, ParseError>;

    /// Parse a staged file. The extension check only warns.
    fn parse(&self, path: &Path) -> Result<ParseOutput, ParseError> {
        warn_on_extension_mismatch(path, self.extensions());
        let file = File::open(path)?;
        self.parse_reader(Box::new(BufReader::new(file)))
    }
}

/// What became of a single source record
#[derive(Debug)]
pub enum RecordOutcome {
    Parsed(NormalizedEvent),
    /// Not a record at all (e.g. an empty line); not counted
    Blank,
    Invalid(String),
}

impl ParseOutput {
    /// Fold per-record outcomes into events plus counts, then log the summary line.
    pub fn from_outcomes(
        format: LogFormat,
        outcomes: impl IntoIterator<Item = RecordOutcome>,
    ) -> Self {
        let mut output = ParseOutput::default();
        for outcome in outcomes {
            output.record(outcome);
        }
        output.log_summary(format);
        output
    }

    pub fn record(&mut self, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Parsed(event) => {
                self.events.push(event);
                self.summary.valid += 1;
            }
            RecordOutcome::Blank => {}
            RecordOutcome::Invalid(reason) => {
                debug!("Skipping invalid record: {}", reason);
                self.summary.invalid += 1;
            }
        }
    }

    pub fn log_summary(&self, format: LogFormat) {
        info!(
            format = format.tag(),
            valid = self.summary.valid,
            invalid = self.summary.invalid,
            "{} loaded with {} normalized events, {} invalid records",
            format.label(),
            self.summary.valid,
            self.summary.invalid
        );
    }
}

impl ParseSummary {
    pub fn total(&self) -> usize {
        self.valid + self.invalid
    }
}

/// Read the whole stream as text, dropping byte sequences that are not UTF-8
/// and a leading byte-order mark.
pub fn read_text(mut reader: Box<dyn Read>) -> Result<String, ParseError> {
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    Ok(decode_text(&buffer))
}

pub fn decode_text(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }

    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

/// Advisory only: a mismatching extension never stops parsing
pub fn warn_on_extension_mismatch(path: &Path, expected: &[&str]) -> bool {
    let matches = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| expected.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false);

    if !matches {
        warn!(
            "File {} does not have a .{} extension, parsing anyway",
            path.display(),
            expected.join(" / .")
        );
    }

    matches
}
