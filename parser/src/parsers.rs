//! Central parser registration module
//!
//! Every format has exactly one parser here. When adding a new format:
//! 1. Add a variant to `LogFormat` in types.rs
//! 2. Create the parser file (e.g., cef_parser.rs) and export it in lib.rs
//! 3. Add it to `all_parsers()` below

use crate::base_parser::Parser;
use crate::{CsvParser, EvtxParser, NdjsonParser, SyslogParser};
use tracing::info;

/// Box a list of parsers as trait objects
///
/// Usage:
/// ```rust,ignore
/// register_parsers![
///     CsvParser::linux(),
///     SyslogParser,
/// ]
/// ```
#[macro_export]
macro_rules! register_parsers {
    ($($parser:expr),* $(,)?) => {
        vec![
            $(Box::new($parser) as Box<dyn $crate::base_parser::Parser>),*
        ]
    };
}

/// Returns one parser per supported format.
pub fn all_parsers() -> Vec<Box<dyn Parser>> {
    info!("Initializing parser collection");

    register_parsers![
        CsvParser::linux(),
        NdjsonParser,
        SyslogParser,
        CsvParser::windows(),
        EvtxParser,
    ]
}
