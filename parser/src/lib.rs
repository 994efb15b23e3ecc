// Parser crate for security log ingestion
// Every format normalizes into the same NormalizedEvent shape

pub mod types;
pub mod normalize;
pub mod base_parser;
pub mod parsers;
pub mod registry_parser;
pub mod ingest;

// Individual parser implementations
pub mod csv_parser;
pub mod ndjson_parser;
pub mod syslog_parser;
pub mod evtx_parser;

// Re-export main types
pub use types::*;
pub use base_parser::{Parser, RecordOutcome};
pub use normalize::{normalize_severity, normalize_severity_value, normalize_timestamp};
pub use registry_parser::ParserRegistry;
pub use ingest::ingest_file;

// Re-export parsers
pub use csv_parser::CsvParser;
pub use ndjson_parser::NdjsonParser;
pub use syslog_parser::SyslogParser;
pub use evtx_parser::{evtx_support_available, EvtxParser};
