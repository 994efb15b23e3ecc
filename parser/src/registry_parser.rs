use crate::base_parser::Parser;
use crate::parsers::all_parsers;
use crate::{LogFormat, ParseError, ParseOutput};
use std::path::Path;
use tracing::{debug, info, warn};

/// ParserRegistry - holds one parser per format and dispatches by format tag
///
/// ## Adding a New Parser
///
/// Give the format a `LogFormat` variant in `types.rs`, then list its parser in
/// `all_parsers()` in `parsers.rs`. The registry itself needs no changes.
pub struct ParserRegistry {
    parsers: Vec<Box<dyn Parser>>,
}

impl ParserRegistry {
    /// Create a new registry with all parsers from the central registry
    pub fn new() -> Self {
        info!("Initializing ParserRegistry");
        Self::with_parsers(all_parsers())
    }

    /// Build a registry from an explicit parser list
    pub fn with_parsers(parsers: Vec<Box<dyn Parser>>) -> Self {
        info!(
            "Registered {} parsers: {}",
            parsers.len(),
            parsers
                .iter()
                .map(|p| p.format().tag())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Self { parsers }
    }

    /// Register a parser, replacing any existing parser for the same format
    pub fn register(&mut self, parser: Box<dyn Parser>) {
        let format = parser.format();
        info!("Registering parser for format: {}", format);
        debug!("Parser supports extensions: {:?}", parser.extensions());

        match self.parsers.iter().position(|p| p.format() == format) {
            Some(idx) => self.parsers[idx] = parser,
            None => self.parsers.push(parser),
        }
    }

    /// Get parser by format
    pub fn get_parser(&self, format: LogFormat) -> Option<&dyn Parser> {
        debug!("Looking up parser for format: {}", format);
        let result = self
            .parsers
            .iter()
            .find(|p| p.format() == format)
            .map(|p| p.as_ref());

        if result.is_none() {
            warn!("Parser not found: {}", format);
        }

        result
    }

    /// Get parser by file extension
    pub fn get_parser_by_extension(&self, extension: &str) -> Option<&dyn Parser> {
        debug!("Looking up parser by extension: {}", extension);
        let result = self
            .parsers
            .iter()
            .find(|p| p.extensions().iter().any(|e| e.eq_ignore_ascii_case(extension)))
            .map(|p| p.as_ref());

        if let Some(parser) = result {
            info!("Selected parser '{}' for extension '.{}'", parser.format(), extension);
        } else {
            warn!("No parser found for extension '.{}'", extension);
        }

        result
    }

    /// Formats with a registered parser, in registration order
    pub fn formats(&self) -> Vec<LogFormat> {
        self.parsers.iter().map(|p| p.format()).collect()
    }

    /// Parse a staged file with the parser registered for `format`
    pub fn parse(&self, format: LogFormat, path: &Path) -> Result<ParseOutput, ParseError> {
        let parser = self
            .get_parser(format)
            .ok_or_else(|| ParseError::Custom(format!("no parser registered for {format}")))?;

        info!("Parsing {} as {}", path.display(), format);
        parser.parse(path)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NdjsonParser, SyslogParser};

    #[test]
    fn test_registry_has_every_format() {
        let registry = ParserRegistry::new();

        for format in LogFormat::ALL {
            let parser = registry.get_parser(format).unwrap();
            assert_eq!(parser.format(), format);
        }
    }

    #[test]
    fn test_lookup_by_extension() {
        let registry = ParserRegistry::new();

        assert_eq!(registry.get_parser_by_extension("jsonl").unwrap().format(), LogFormat::Json);
        assert_eq!(registry.get_parser_by_extension("LOG").unwrap().format(), LogFormat::Syslog);
        assert_eq!(registry.get_parser_by_extension("evtx").unwrap().format(), LogFormat::EvtxWindows);
        assert!(registry.get_parser_by_extension("pcap").is_none());
    }

    #[test]
    fn test_register_replaces_same_format() {
        let mut registry = ParserRegistry::with_parsers(vec![Box::new(SyslogParser)]);
        registry.register(Box::new(SyslogParser));
        registry.register(Box::new(NdjsonParser));

        assert_eq!(registry.formats(), vec![LogFormat::Syslog, LogFormat::Json]);
    }

    #[test]
    fn test_missing_parser_is_an_error() {
        let registry = ParserRegistry::with_parsers(vec![]);

        let result = registry.parse(LogFormat::Syslog, Path::new("/tmp/auth.log"));

        assert!(matches!(result, Err(ParseError::Custom(_))));
    }
}
