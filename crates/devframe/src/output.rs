use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use devframe_alarm::{format_days, AlarmEntry};
use devframe_codec::Frame;
use devframe_registry::ParsedResponse;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ResponseOutput<'a> {
    service: &'a str,
    command: &'a str,
    class: &'a str,
    rendered: &'a str,
    frame: String,
}

/// Print a parsed device response.
///
/// Raw format emits the response frame's hex image alone, which pipes
/// straight back into `send --frame` or `alarm insert --trigger`.
pub fn print_response(
    service: &str,
    command: &str,
    parsed: &ParsedResponse,
    response: &Frame,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => {
            let out = ResponseOutput {
                service,
                command,
                class: parsed.class.as_str(),
                rendered: &parsed.rendered,
                frame: response.to_hex(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["COMMAND", "CLASS", "RESPONSE"])
                .add_row(vec![
                    format!("{service}/{command}"),
                    parsed.class.as_str().to_string(),
                    parsed.rendered.clone(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{service}/{command} -> {}: {}",
                parsed.class.as_str(),
                parsed.rendered
            );
        }
        OutputFormat::Raw => {
            println!("{}", response.to_hex());
        }
    }
}

#[derive(Serialize)]
struct AlarmRow {
    index: u8,
    time: String,
    days: String,
}

/// Print a decoded alarm schedule.
pub fn print_alarm_list(entries: &[AlarmEntry], format: OutputFormat) {
    let rows: Vec<AlarmRow> = entries
        .iter()
        .map(|entry| AlarmRow {
            index: entry.index,
            time: entry.time.describe(),
            days: format_days(entry.days),
        })
        .collect();

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["INDEX", "TIME", "DAYS"]);
            for row in &rows {
                table.add_row(vec![row.index.to_string(), row.time.clone(), row.days.clone()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            if rows.is_empty() {
                println!("no alarms scheduled");
            }
            for row in &rows {
                println!("alarm #{} triggers at {} on {}", row.index, row.time, row.days);
            }
        }
    }
}

#[derive(Serialize)]
struct BuiltFrame<'a> {
    service: &'a str,
    command: &'a str,
    frame: String,
}

/// Print a built request frame without sending it (`--dry-run`).
pub fn print_built_frame(service: &str, command: &str, frame: &Frame, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = BuiltFrame {
                service,
                command,
                frame: frame.to_hex(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("{service}/{command}: {}", frame.to_hex());
        }
        OutputFormat::Raw => {
            println!("{}", frame.to_hex());
        }
    }
}
