use crate::base_parser::{read_text, Parser, RecordOutcome};
use crate::normalize::normalize_timestamp;
use crate::{LogFormat, NormalizedEvent, ParseError, ParseOutput};
use regex::Regex;
use std::io::Read;
use std::sync::LazyLock;

// Mmm dd HH:MM:SS HOSTNAME PROCESS: MESSAGE
// PROCESS runs up to the first colon, so a PID suffix like sshd[811] stays in it.
static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+\s+\d+\s+\d+:\d+:\d+)\s+(\S+)\s+([^:]+):\s+(.*)$").unwrap()
});

/// Syslog parser - BSD-style text lines without a priority prefix
pub struct SyslogParser;

impl SyslogParser {
    fn parse_line(line: &str) -> RecordOutcome {
        let line = line.trim();
        let Some(caps) = LINE_RE.captures(line) else {
            return RecordOutcome::Invalid(format!("line does not match syslog layout: {line:?}"));
        };

        RecordOutcome::Parsed(NormalizedEvent {
            timestamp: normalize_timestamp(&caps[1]),
            host: caps[2].to_string(),
            process: caps[3].trim().to_string(),
            message: caps[4].to_string(),
            severity: 0,
            source_format: None,
        })
    }
}

impl Parser for SyslogParser {
    fn format(&self) -> LogFormat {
        LogFormat::Syslog
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["log"]
    }

    fn parse_reader(&self, reader: Box<dyn Read>) -> Result<ParseOutput, ParseError> {
        let text = read_text(reader)?;
        let outcomes = text.lines().map(Self::parse_line);
        Ok(ParseOutput::from_outcomes(LogFormat::Syslog, outcomes))
    }
}
