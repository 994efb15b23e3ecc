//! Interactive menu shell over a [`Session`].

use crate::report::{render_preview, render_summary};
use crate::session::Session;
use soc_parser::LogFormat;
use std::io::{self, BufRead, Write};

/// Ingest submenu entries, in menu order
const INGEST_CHOICES: [(&str, LogFormat, &str); 5] = [
    ("1", LogFormat::CsvLinux, "CSV (Linux/other)"),
    ("2", LogFormat::Json, "JSON / NDJSON"),
    ("3", LogFormat::Syslog, "SYSLOG (.log)"),
    ("4", LogFormat::CsvWindows, "CSV Windows"),
    ("5", LogFormat::EvtxWindows, "EVTX Windows"),
];

pub struct Menu<R, W> {
    input: R,
    output: W,
    preview_count: usize,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W, preview_count: usize) -> Self {
        Self {
            input,
            output,
            preview_count,
        }
    }

    /// Main menu loop; returns on "exit" or end of input
    pub fn run(&mut self, session: &mut Session) -> io::Result<()> {
        loop {
            writeln!(self.output, "\n=== SOC Automation Toolkit ===")?;
            writeln!(self.output, "1. Ingest logs")?;
            writeln!(self.output, "2. Show first {} loaded events", self.preview_count)?;
            writeln!(self.output, "3. Summary of loaded events")?;
            writeln!(self.output, "4. Exit")?;

            let Some(choice) = self.prompt("Select an option: ")? else {
                return Ok(());
            };

            match choice.as_str() {
                "1" => {
                    if !self.ingest_menu(session)? {
                        return Ok(());
                    }
                }
                "2" => write!(self.output, "{}", render_preview(session.events(), self.preview_count))?,
                "3" => write!(self.output, "{}", render_summary(session.events()))?,
                "4" => {
                    writeln!(self.output, "Exiting...")?;
                    return Ok(());
                }
                _ => writeln!(self.output, "Invalid option.")?,
            }
        }
    }

    /// Returns false when input ran out
    fn ingest_menu(&mut self, session: &mut Session) -> io::Result<bool> {
        loop {
            writeln!(self.output, "\n--- Log ingestion ---")?;
            for (key, format, label) in INGEST_CHOICES {
                let note = if format.is_available() { "" } else { " (unavailable)" };
                writeln!(self.output, "{key}. {label}{note}")?;
            }
            writeln!(self.output, "6. Back to main menu")?;

            let Some(choice) = self.prompt("Select an option: ")? else {
                return Ok(false);
            };
            if choice == "6" {
                return Ok(true);
            }

            let Some(&(_, format, _)) = INGEST_CHOICES.iter().find(|(key, _, _)| *key == choice) else {
                writeln!(self.output, "Invalid option.")?;
                continue;
            };

            let Some(path) = self.prompt("Enter the absolute path of the file: ")? else {
                return Ok(false);
            };

            match session.load(format, &path) {
                Ok(0) => writeln!(self.output, "No events were loaded from this file.")?,
                Ok(_) => writeln!(
                    self.output,
                    "Total events loaded so far: {}",
                    session.events().len()
                )?,
                Err(e) => writeln!(self.output, "Error: {e}")?,
            }
        }
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
