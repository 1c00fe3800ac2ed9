mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "devframe", version, about = "Fixed-frame device protocol CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        env = "DEVFRAME_LOG",
        default_value = "info",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_send_subcommand() {
        let cli = Cli::try_parse_from([
            "devframe",
            "send",
            "127.0.0.1:4242",
            "--frame",
            "00",
            "--io-timeout",
            "2s",
        ])
        .expect("send args should parse");

        assert!(matches!(cli.command, Command::Send(_)));
    }

    #[test]
    fn parses_alarm_insert_with_trailing_dry_run() {
        let cli = Cli::try_parse_from([
            "devframe",
            "alarm",
            "127.0.0.1:4242",
            "insert",
            "--at",
            "07:30:00",
            "--days",
            "weekdays",
            "--trigger",
            "00",
            "--dry-run",
        ])
        .expect("alarm insert args should parse");

        match cli.command {
            Command::Alarm(args) => {
                assert!(args.dry_run);
                assert!(matches!(args.command, cmd::AlarmCommand::Insert { .. }));
            }
            other => panic!("expected alarm command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_alarm_insert_without_time() {
        let err = Cli::try_parse_from([
            "devframe",
            "alarm",
            "127.0.0.1:4242",
            "insert",
            "--days",
            "everyday",
            "--trigger",
            "00",
        ])
        .expect_err("missing --at should fail");

        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn log_level_defaults_to_info() {
        let cli = Cli::try_parse_from(["devframe", "version"]).expect("version args should parse");
        assert!(matches!(cli.log_level, LogLevel::Info));
    }

    #[test]
    fn parses_probe_subcommand() {
        let cli =
            Cli::try_parse_from(["devframe", "probe", "127.0.0.1:4242", "--timeout", "3s"])
                .expect("probe args should parse");
        assert!(matches!(cli.command, Command::Probe(_)));
    }
}
