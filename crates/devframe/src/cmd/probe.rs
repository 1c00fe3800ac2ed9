use serde::Serialize;

use crate::cmd::{connect_client, ProbeArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Serialize)]
struct ProbeOutput<'a> {
    addr: &'a str,
    connected: bool,
    alive: bool,
}

/// Connect to a device and report whether the connection is usable.
pub fn run(args: ProbeArgs, format: OutputFormat) -> CliResult<i32> {
    let mut client = connect_client(&args.addr, &args.timeout, &args.timeout)?;
    let alive = client.is_alive();
    client.disconnect();

    let out = ProbeOutput {
        addr: &args.addr,
        connected: true,
        alive,
    };
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("Device probe:");
            println!("  Address:   {}", out.addr);
            println!("  Connected: {}", out.connected);
            println!("  Alive:     {}", out.alive);
        }
        OutputFormat::Raw => {
            println!("{}", if out.alive { "alive" } else { "closed" });
        }
    }
    Ok(SUCCESS)
}
