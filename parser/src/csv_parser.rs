use crate::base_parser::{read_text, Parser, RecordOutcome};
use crate::normalize::{normalize_severity, normalize_timestamp};
use crate::{LogFormat, NormalizedEvent, ParseError, ParseOutput};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::io::Read;

/// Header names feeding each canonical field
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap {
    pub timestamp: &'static str,
    pub host: &'static str,
    pub process: &'static str,
    pub message: &'static str,
    pub severity: &'static str,
    /// Used when the process column is missing from the row
    pub process_default: &'static str,
}

/// Generic export with lowercase canonical headers
pub const LINUX_COLUMNS: ColumnMap = ColumnMap {
    timestamp: "timestamp",
    host: "host",
    process: "process",
    message: "message",
    severity: "severity",
    process_default: "",
};

/// `Get-WinEvent | Export-Csv` headers
pub const WINDOWS_COLUMNS: ColumnMap = ColumnMap {
    timestamp: "TimeCreated",
    host: "Computer",
    process: "ProviderName",
    message: "Message",
    severity: "Level",
    process_default: "unknown",
};

/// CSV parser - header-driven rows mapped through a [`ColumnMap`]
pub struct CsvParser {
    format: LogFormat,
    columns: ColumnMap,
}

impl CsvParser {
    pub fn linux() -> Self {
        Self {
            format: LogFormat::CsvLinux,
            columns: LINUX_COLUMNS,
        }
    }

    pub fn windows() -> Self {
        Self {
            format: LogFormat::CsvWindows,
            columns: WINDOWS_COLUMNS,
        }
    }

    fn map_row(&self, headers: &HeaderIndex, row: &StringRecord) -> NormalizedEvent {
        let cell = |name: &str| headers.get(name).and_then(|&idx| row.get(idx));

        NormalizedEvent {
            timestamp: normalize_timestamp(cell(self.columns.timestamp).unwrap_or("")),
            host: cell(self.columns.host).unwrap_or("").to_string(),
            process: cell(self.columns.process)
                .unwrap_or(self.columns.process_default)
                .to_string(),
            message: cell(self.columns.message).unwrap_or("").to_string(),
            severity: cell(self.columns.severity).map(normalize_severity).unwrap_or(0),
            source_format: None,
        }
    }
}

type HeaderIndex<'a> = HashMap<&'a str, usize>;

impl Parser for CsvParser {
    fn format(&self) -> LogFormat {
        self.format
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["csv"]
    }

    fn parse_reader(&self, reader: Box<dyn Read>) -> Result<ParseOutput, ParseError> {
        let text = read_text(reader)?;
        let body = skip_type_banner(&text);

        let mut csv_reader = ReaderBuilder::new()
            .flexible(true)
            .from_reader(body.as_bytes());

        let header_record = csv_reader.headers()?.clone();
        // Duplicate headers: the last one wins
        let headers: HeaderIndex = header_record
            .iter()
            .enumerate()
            .map(|(idx, name)| (name, idx))
            .collect();

        let outcomes = csv_reader.records().map(|record_result| match record_result {
            Ok(row) => RecordOutcome::Parsed(self.map_row(&headers, &row)),
            Err(e) => RecordOutcome::Invalid(e.to_string()),
        });

        Ok(ParseOutput::from_outcomes(self.format, outcomes))
    }
}

/// PowerShell's `Export-Csv` may prepend a `#TYPE ...` line before the header
fn skip_type_banner(text: &str) -> &str {
    if text.starts_with("#TYPE") {
        text.split_once('\n').map(|(_, rest)| rest).unwrap_or("")
    } else {
        text
    }
}
