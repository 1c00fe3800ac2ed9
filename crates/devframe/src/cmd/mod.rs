use std::time::Duration;

use clap::{Args, Subcommand};
use devframe_client::{ClientConfig, TransactionClient};

use crate::exit::{client_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod alarm;
pub mod probe;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a prebuilt frame and print the response.
    Send(SendArgs),
    /// Drive the device's alarm service.
    Alarm(AlarmArgs),
    /// Connect to a device and report liveness.
    Probe(ProbeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Send(args) => send::run(args, format),
        Command::Alarm(args) => alarm::run(args, format),
        Command::Probe(args) => probe::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Device address (host:port).
    pub addr: String,
    /// Request frame as a 256-digit hex image.
    #[arg(long, value_name = "HEX")]
    pub frame: String,
    /// Connect timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "10s")]
    pub connect_timeout: String,
    /// Read/write timeout for the exchange (e.g. 5s, 500ms).
    #[arg(long, default_value = "10s")]
    pub io_timeout: String,
}

#[derive(Args, Debug)]
pub struct AlarmArgs {
    /// Device address (host:port).
    pub addr: String,
    /// Connect timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "10s", global = true)]
    pub connect_timeout: String,
    /// Read/write timeout for the exchange (e.g. 5s, 500ms).
    #[arg(long, default_value = "10s", global = true)]
    pub io_timeout: String,
    /// Print the built request frame without connecting.
    #[arg(long, global = true)]
    pub dry_run: bool,
    #[command(subcommand)]
    pub command: AlarmCommand,
}

#[derive(Subcommand, Debug)]
pub enum AlarmCommand {
    /// Schedule a trigger frame at a time of day.
    Insert {
        /// Trigger time: hh:mm:ss, "sunrise", or "sunset".
        #[arg(long, value_name = "TIME")]
        at: String,
        /// Days: comma-separated names, weekdays|weekends|everyday, or a numeric mask.
        #[arg(long, value_name = "SPEC")]
        days: String,
        /// Frame to execute when the alarm fires, as a hex image.
        #[arg(long, value_name = "HEX")]
        trigger: String,
    },
    /// Remove an alarm by index.
    Remove {
        #[arg(long)]
        index: i64,
    },
    /// List scheduled alarms.
    List,
    /// Show an alarm's stored trigger frame.
    Inspect {
        #[arg(long)]
        index: i64,
    },
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Device address (host:port).
    pub addr: String,
    /// Connect timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Open a connected client with the given timeout arguments.
pub fn connect_client(
    addr: &str,
    connect_timeout: &str,
    io_timeout: &str,
) -> CliResult<TransactionClient> {
    let io_timeout = parse_duration(io_timeout)?;
    let config = ClientConfig {
        connect_timeout: parse_duration(connect_timeout)?,
        read_timeout: Some(io_timeout),
        write_timeout: Some(io_timeout),
    };
    let mut client = TransactionClient::with_config(addr, config);
    client
        .connect()
        .map_err(|err| client_error("connect failed", err))?;
    Ok(client)
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn test_parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }
}
