//! Plain-text preview and summary of the loaded events.

use soc_parser::{LogFormat, NormalizedEvent};

const MESSAGE_PREVIEW_CHARS: usize = 80;

pub const NO_EVENTS: &str = "No events loaded.";

/// First `count` events, one line each
pub fn render_preview(events: &[NormalizedEvent], count: usize) -> String {
    if events.is_empty() {
        return format!("{NO_EVENTS}\n");
    }

    let mut out = format!("\n=== First {} normalized events ===\n", count.min(events.len()));
    for event in events.iter().take(count) {
        out.push_str(&format!(
            "timestamp: {}, host: {}, process: {}, severity: {}, message: {}\n",
            event.timestamp,
            event.host,
            event.process,
            event.severity,
            truncate_message(&event.message)
        ));
    }
    out
}

/// Total count plus per-format counts in first-seen order
pub fn render_summary(events: &[NormalizedEvent]) -> String {
    if events.is_empty() {
        return format!("{NO_EVENTS}\n");
    }

    let mut out = String::from("\n=== Loaded events summary ===\n");
    out.push_str(&format!("Total events: {}\n", events.len()));
    for (format, count) in count_by_format(events) {
        let tag = format.map(|f| f.tag()).unwrap_or("Unknown");
        out.push_str(&format!("{tag}: {count} events\n"));
    }
    out
}

pub fn count_by_format(events: &[NormalizedEvent]) -> Vec<(Option<LogFormat>, usize)> {
    let mut counts: Vec<(Option<LogFormat>, usize)> = Vec::new();
    for event in events {
        match counts.iter_mut().find(|(f, _)| *f == event.source_format) {
            Some((_, n)) => *n += 1,
            None => counts.push((event.source_format, 1)),
        }
    }
    counts
}

fn truncate_message(message: &str) -> String {
    match message.char_indices().nth(MESSAGE_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &message[..cut]),
        None => message.to_string(),
    }
}
