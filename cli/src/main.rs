mod menu;
mod report;
mod session;
mod staging;

use clap::Parser;
use menu::Menu;
use session::Session;
use soc_parser::{LogFormat, ParserRegistry};
use staging::StagingArea;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Normalize security logs (CSV, NDJSON, syslog, EVTX) into one event shape.
///
/// Without --input the interactive menu starts.
#[derive(Debug, Parser)]
#[command(name = "soc-ingest", version)]
struct Cli {
    /// Log file to ingest as FORMAT=PATH (csv, csv-windows, json, syslog, evtx); repeatable
    #[arg(short, long = "input", value_name = "FORMAT=PATH", value_parser = parse_input)]
    inputs: Vec<InputSpec>,

    /// Number of events shown in the preview
    #[arg(long, default_value_t = 3)]
    show: usize,

    /// Also print every event to stdout in this format
    #[arg(long, value_enum)]
    emit: Option<Emit>,

    /// Base directory for the staging copy (defaults to the system temp dir)
    #[arg(long, value_name = "DIR")]
    staging_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Emit {
    /// One JSON object per line
    Json,
}

#[derive(Debug, Clone)]
struct InputSpec {
    format: LogFormat,
    path: PathBuf,
}

fn parse_input(raw: &str) -> Result<InputSpec, String> {
    let (format, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FORMAT=PATH, got '{raw}'"))?;
    let format = format.parse::<LogFormat>().map_err(|e| e.to_string())?;
    if path.is_empty() {
        return Err("missing path after '='".to_string());
    }
    Ok(InputSpec {
        format,
        path: PathBuf::from(path),
    })
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soc_ingest=info,soc_parser=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let staging = match &cli.staging_dir {
        Some(dir) => StagingArea::new(dir)?,
        None => StagingArea::in_temp_dir()?,
    };
    let mut session = Session::new(ParserRegistry::new(), staging);

    if cli.inputs.is_empty() {
        let stdin = io::stdin();
        let mut menu = Menu::new(stdin.lock(), io::stdout(), cli.show);
        menu.run(&mut session)?;
        return Ok(());
    }

    for input in &cli.inputs {
        info!("Ingesting {} as {}", input.path.display(), input.format);
        // A bad input is reported and the rest still load
        if let Err(e) = session.load(input.format, &input.path) {
            error!("{}", e);
        }
    }

    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", report::render_preview(session.events(), cli.show))?;
    write!(stdout, "{}", report::render_summary(session.events()))?;

    if let Some(Emit::Json) = cli.emit {
        for event in session.events() {
            writeln!(stdout, "{}", serde_json::to_string(event)?)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_pair() {
        let input = parse_input("syslog=/var/log/auth.log").unwrap();
        assert_eq!(input.format, LogFormat::Syslog);
        assert_eq!(input.path, PathBuf::from("/var/log/auth.log"));

        let input = parse_input("CSV_Windows=C:/logs/a=b.csv").unwrap();
        assert_eq!(input.format, LogFormat::CsvWindows);
        assert_eq!(input.path, PathBuf::from("C:/logs/a=b.csv"));
    }

    #[test]
    fn test_parse_input_rejects_bad_specs() {
        assert!(parse_input("/var/log/auth.log").is_err());
        assert!(parse_input("pcap=/tmp/x.pcap").is_err());
        assert!(parse_input("json=").is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
