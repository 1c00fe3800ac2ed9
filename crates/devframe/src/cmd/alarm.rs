use devframe_alarm::{days, list_entries, TRIGGER_SUNRISE, TRIGGER_SUNSET};
use devframe_codec::Frame;
use devframe_registry::{ArgValue, ResponseClass};

use crate::cmd::{connect_client, AlarmArgs, AlarmCommand};
use crate::exit::{
    client_error, frame_error, registry_error, CliError, CliResult, FAILURE, SUCCESS, USAGE,
};
use crate::output::{print_alarm_list, print_built_frame, print_response, OutputFormat};

/// Drive one alarm command through the registry: build, transact, parse.
pub fn run(args: AlarmArgs, format: OutputFormat) -> CliResult<i32> {
    let registry = devframe::default_registry().map_err(|err| registry_error("registry", err))?;
    let (command, values) = resolve(&args.command)?;

    let request = registry
        .build("alarm", command, &values)
        .map_err(|err| registry_error("build failed", err))?;

    if args.dry_run {
        print_built_frame("alarm", command, &request, format);
        return Ok(SUCCESS);
    }

    let mut client = connect_client(&args.addr, &args.connect_timeout, &args.io_timeout)?;
    let response = client
        .transact(&request)
        .map_err(|err| client_error("transaction failed", err))?;
    client.disconnect();

    let parsed = registry
        .parse("alarm", command, &response)
        .map_err(|err| registry_error("parse failed", err))?;

    if command == "list" && parsed.class == ResponseClass::Result {
        let entries =
            list_entries(&response).map_err(|err| registry_error("parse failed", err))?;
        print_alarm_list(&entries, format);
    } else {
        print_response("alarm", command, &parsed, &response, format);
    }

    Ok(match parsed.class {
        ResponseClass::Result => SUCCESS,
        ResponseClass::Error => FAILURE,
    })
}

/// Map a CLI verb to its registry command name and argument values.
fn resolve(command: &AlarmCommand) -> CliResult<(&'static str, Vec<ArgValue>)> {
    match command {
        AlarmCommand::Insert { at, days, trigger } => {
            let timepart = parse_at(at)?;
            let mask = parse_days(days)?;
            let trigger = Frame::from_hex(trigger).map_err(|err| frame_error("--trigger", err))?;
            // The insert builder sums hour/minute/second into the wire
            // dword; carrying the whole timepart in the seconds field keeps
            // the sentinels expressible through the same path.
            Ok((
                "insert",
                vec![
                    ArgValue::Int(0),
                    ArgValue::Int(0),
                    ArgValue::Int(i64::from(timepart)),
                    ArgValue::Int(i64::from(mask)),
                    ArgValue::Frame(trigger),
                ],
            ))
        }
        AlarmCommand::Remove { index } => Ok(("remove", vec![ArgValue::Int(*index)])),
        AlarmCommand::List => Ok(("list", Vec::new())),
        AlarmCommand::Inspect { index } => Ok(("inspect", vec![ArgValue::Int(*index)])),
    }
}

/// Parse `--at`: `hh:mm:ss`, `sunrise`, or `sunset`.
fn parse_at(input: &str) -> CliResult<u32> {
    match input.trim().to_ascii_lowercase().as_str() {
        "sunrise" => return Ok(TRIGGER_SUNRISE),
        "sunset" => return Ok(TRIGGER_SUNSET),
        _ => {}
    }

    let fields: Vec<&str> = input.trim().split(':').collect();
    if fields.len() != 3 {
        return Err(CliError::new(
            USAGE,
            format!("--at must be hh:mm:ss, sunrise, or sunset, got {input:?}"),
        ));
    }
    let mut parts = [0u32; 3];
    for (slot, field) in parts.iter_mut().zip(&fields) {
        *slot = field
            .parse()
            .map_err(|_| CliError::new(USAGE, format!("invalid time field {field:?} in {input:?}")))?;
    }
    let [hour, minute, second] = parts;
    devframe_alarm::timepart(hour, minute, second).map_err(|err| registry_error("--at", err))
}

/// Parse `--days`: comma-separated day names and keywords, or a numeric mask
/// (decimal, `0x..`, or `0b..`).
fn parse_days(spec: &str) -> CliResult<u8> {
    let spec = spec.trim();
    if let Some(mask) = parse_numeric_mask(spec)? {
        return Ok(mask);
    }

    let mut mask = 0u8;
    for token in spec.split(',') {
        mask |= match token.trim().to_ascii_lowercase().as_str() {
            "sunday" => days::SUNDAY,
            "monday" => days::MONDAY,
            "tuesday" => days::TUESDAY,
            "wednesday" => days::WEDNESDAY,
            "thursday" => days::THURSDAY,
            "friday" => days::FRIDAY,
            "saturday" => days::SATURDAY,
            "weekdays" => days::WEEKDAYS,
            "weekends" => days::WEEKENDS,
            "everyday" => days::EVERYDAY,
            other => {
                return Err(CliError::new(
                    USAGE,
                    format!("unknown day {other:?} in --days {spec:?}"),
                ))
            }
        };
    }
    Ok(mask)
}

fn parse_numeric_mask(spec: &str) -> CliResult<Option<u8>> {
    let (digits, radix) = if let Some(hex) = spec.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(bin) = spec.strip_prefix("0b") {
        (bin, 2)
    } else if spec.chars().all(|c| c.is_ascii_digit()) && !spec.is_empty() {
        (spec, 10)
    } else {
        return Ok(None);
    };
    u8::from_str_radix(digits, radix)
        .map(Some)
        .map_err(|_| CliError::new(USAGE, format!("--days mask {spec:?} does not fit 0..=255")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_at_clock_time() {
        assert_eq!(parse_at("07:30:00").unwrap(), 27_000);
        assert_eq!(parse_at("00:00:00").unwrap(), 0);
        assert_eq!(parse_at("23:59:59").unwrap(), 86_399);
    }

    #[test]
    fn test_parse_at_sentinels() {
        assert_eq!(parse_at("sunrise").unwrap(), TRIGGER_SUNRISE);
        assert_eq!(parse_at("Sunset").unwrap(), TRIGGER_SUNSET);
    }

    #[test]
    fn test_parse_at_rejects_garbage() {
        for bad in ["7:30", "1:2:3:4", "aa:bb:cc", "noon"] {
            assert_eq!(parse_at(bad).unwrap_err().code, USAGE, "{bad}");
        }
    }

    #[test]
    fn test_parse_days_names_and_keywords() {
        assert_eq!(parse_days("sunday,tuesday").unwrap(), 0b000_0101);
        assert_eq!(parse_days("weekdays").unwrap(), days::WEEKDAYS);
        assert_eq!(parse_days("everyday").unwrap(), days::EVERYDAY);
        assert_eq!(
            parse_days("weekends,monday").unwrap(),
            days::WEEKENDS | days::MONDAY
        );
    }

    #[test]
    fn test_parse_days_numeric_masks() {
        assert_eq!(parse_days("62").unwrap(), 62);
        assert_eq!(parse_days("0x3e").unwrap(), 0x3E);
        assert_eq!(parse_days("0b0111110").unwrap(), 0b011_1110);
        assert_eq!(parse_days("256").unwrap_err().code, USAGE);
    }

    #[test]
    fn test_parse_days_rejects_unknown_names() {
        assert_eq!(parse_days("caturday").unwrap_err().code, USAGE);
    }

    #[test]
    fn test_resolve_insert_builds_expected_body() {
        let command = AlarmCommand::Insert {
            at: "07:30:00".into(),
            days: "weekdays".into(),
            trigger: Frame::new().to_hex(),
        };
        let (name, values) = resolve(&command).unwrap();
        let registry = devframe::default_registry().unwrap();
        let frame = registry.build("alarm", name, &values).unwrap();
        assert_eq!(&frame.body()[..5], &[0x00, 0x00, 0x69, 0x78, 0x3E]);
    }

    #[test]
    fn test_resolve_remove_out_of_range_index_is_usage() {
        let (name, values) = resolve(&AlarmCommand::Remove { index: 256 }).unwrap();
        let registry = devframe::default_registry().unwrap();
        let err = registry.build("alarm", name, &values).unwrap_err();
        assert_eq!(registry_error("build failed", err).code, USAGE);
    }
}
