use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical event every parser normalizes its records into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    pub timestamp: String,
    pub host: String,
    pub process: String,
    pub message: String,
    pub severity: u8,
    /// Stamped by the ingestion step, never by a parser.
    #[serde(default)]
    pub source_format: Option<LogFormat>,
}

/// The five supported source formats, one per parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogFormat {
    #[serde(rename = "CSV_Linux")]
    CsvLinux,
    #[serde(rename = "CSV_Windows")]
    CsvWindows,
    #[serde(rename = "JSON")]
    Json,
    #[serde(rename = "SYSLOG")]
    Syslog,
    #[serde(rename = "EVTX_Windows")]
    EvtxWindows,
}

impl LogFormat {
    pub const ALL: [LogFormat; 5] = [
        LogFormat::CsvLinux,
        LogFormat::Json,
        LogFormat::Syslog,
        LogFormat::CsvWindows,
        LogFormat::EvtxWindows,
    ];

    /// Tag stamped on every event loaded with this format.
    pub fn tag(&self) -> &'static str {
        match self {
            LogFormat::CsvLinux => "CSV_Linux",
            LogFormat::CsvWindows => "CSV_Windows",
            LogFormat::Json => "JSON",
            LogFormat::Syslog => "SYSLOG",
            LogFormat::EvtxWindows => "EVTX_Windows",
        }
    }

    /// Human-readable label used in summary lines.
    pub fn label(&self) -> &'static str {
        match self {
            LogFormat::CsvLinux => "CSV",
            LogFormat::CsvWindows => "Windows CSV",
            LogFormat::Json => "JSON/NDJSON",
            LogFormat::Syslog => "SYSLOG",
            LogFormat::EvtxWindows => "EVTX",
        }
    }

    /// Whether the parser for this format can run in this build.
    pub fn is_available(&self) -> bool {
        match self {
            LogFormat::EvtxWindows => crate::evtx_parser::evtx_support_available(),
            _ => true,
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for LogFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "csv" | "csv-linux" => Ok(LogFormat::CsvLinux),
            "csv-windows" | "wincsv" => Ok(LogFormat::CsvWindows),
            "json" | "ndjson" | "jsonl" => Ok(LogFormat::Json),
            "syslog" => Ok(LogFormat::Syslog),
            "evtx" | "evtx-windows" => Ok(LogFormat::EvtxWindows),
            other => Err(ParseError::UnknownFormat(other.to_string())),
        }
    }
}

/// Valid vs. skipped record counts for one parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseSummary {
    pub valid: usize,
    pub invalid: usize,
}

/// Events produced by one parser invocation along with its record counts.
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    pub events: Vec<NormalizedEvent>,
    pub summary: ParseSummary,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("unknown log format: {0}")]
    UnknownFormat(String),
    #[error("{0}")]
    Custom(String),
}

impl From<String> for ParseError {
    fn from(msg: String) -> Self {
        ParseError::Custom(msg)
    }
}

impl From<&str> for ParseError {
    fn from(msg: &str) -> Self {
        ParseError::Custom(msg.to_string())
    }
}
