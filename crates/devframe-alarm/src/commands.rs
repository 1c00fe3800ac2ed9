//! Alarm service commands.
//!
//! Request bodies:
//! - INSERT (SET, identity 1): timepart dword at 0, day mask at 4, the
//!   trigger frame's image embedded from 5 (truncated to 119 bytes).
//! - REMOVE (SET, identity 2): alarm index byte at 0.
//! - LIST (GET, identity 3): empty; the response carries a count byte and
//!   6-byte records of index, timepart dword, day mask.
//! - INSPECT (GET, identity 4): alarm index byte at 0; the response body
//!   holds the stored trigger frame's image, truncated to fit.

use devframe_codec::{Frame, OpCode, BODY_LEN, FRAME_LEN};
use devframe_registry::{
    arg, as_u8, ArgKind, ArgSpec, ArgValue, CommandSpec, Direction, RegistryError, Result,
    ServiceDescriptor,
};

use crate::days::format_days;
use crate::time::{self, TriggerTime};

/// Destination byte routing frames to the alarm service.
pub const DESTINATION: u8 = 2;

/// Header identity of the insert command.
pub const INSERT: u8 = 1;
/// Header identity of the remove command.
pub const REMOVE: u8 = 2;
/// Header identity of the list command.
pub const LIST: u8 = 3;
/// Header identity of the inspect command.
pub const INSPECT: u8 = 4;

/// Body offset where insert embeds the trigger frame.
pub const TRIGGER_OFFSET: usize = 5;

/// Bytes of an embedded trigger frame that survive insertion.
pub const TRIGGER_CAPACITY: usize = BODY_LEN - TRIGGER_OFFSET;

const RECORD_LEN: usize = 6;

/// One row of a LIST response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmEntry {
    pub index: u8,
    pub time: TriggerTime,
    pub days: u8,
}

/// Build an INSERT request scheduling `trigger` at `time` on the days in
/// `days`.
///
/// The trigger frame's image lands at body offset 5; only its first 119
/// bytes fit, the rest are silently dropped.
pub fn insert(time: TriggerTime, days: u8, trigger: &Frame) -> Result<Frame> {
    let mut frame = Frame::new();
    frame.set_destination(DESTINATION);
    frame.set_header(OpCode::Set, INSERT)?;
    frame.write_body_u32(0, time.to_timepart())?;
    frame.write_body_u8(4, days)?;
    frame.embed_frame(TRIGGER_OFFSET, trigger);
    Ok(frame)
}

/// Build a REMOVE request for the alarm at `index`.
pub fn remove(index: u8) -> Result<Frame> {
    indexed_request(OpCode::Set, REMOVE, index)
}

/// Build a LIST request.
pub fn list() -> Result<Frame> {
    let mut frame = Frame::new();
    frame.set_destination(DESTINATION);
    frame.set_header(OpCode::Get, LIST)?;
    Ok(frame)
}

/// Build an INSPECT request for the alarm at `index`.
pub fn inspect(index: u8) -> Result<Frame> {
    indexed_request(OpCode::Get, INSPECT, index)
}

fn indexed_request(op: OpCode, identity: u8, index: u8) -> Result<Frame> {
    let mut frame = Frame::new();
    frame.set_destination(DESTINATION);
    frame.set_header(op, identity)?;
    frame.write_body_u8(0, index)?;
    Ok(frame)
}

/// Decode a LIST response body into typed entries.
pub fn list_entries(response: &Frame) -> Result<Vec<AlarmEntry>> {
    let count = response.body_u8(0)? as usize;
    let needed = 1 + count * RECORD_LEN;
    if needed > BODY_LEN {
        return Err(RegistryError::MalformedResponse {
            reason: format!("alarm count {count} overruns the body ({needed} > {BODY_LEN} bytes)"),
        });
    }
    let mut entries = Vec::with_capacity(count);
    let mut offset = 1;
    for _ in 0..count {
        entries.push(AlarmEntry {
            index: response.body_u8(offset)?,
            time: TriggerTime::from_timepart(response.body_u32(offset + 1)?),
            days: response.body_u8(offset + 5)?,
        });
        offset += RECORD_LEN;
    }
    Ok(entries)
}

/// Registered RES parser for LIST: one line per alarm.
pub fn parse_list(response: &Frame) -> Result<String> {
    let entries = list_entries(response)?;
    if entries.is_empty() {
        return Ok("no alarms scheduled".to_string());
    }
    let lines: Vec<String> = entries
        .iter()
        .map(|entry| {
            format!(
                "alarm #{} triggers at {} on {}",
                entry.index,
                entry.time.describe(),
                format_days(entry.days)
            )
        })
        .collect();
    Ok(lines.join("\n"))
}

/// Reconstruct the stored trigger frame from an INSPECT response.
///
/// The response body carries the leading bytes of the stored image; the
/// tail the body cannot carry reads as zero.
pub fn inspect_trigger(response: &Frame) -> Frame {
    let mut image = [0u8; FRAME_LEN];
    image[..BODY_LEN].copy_from_slice(response.body());
    Frame::from_array(image)
}

/// Registered RES parser for INSPECT: the stored trigger frame as hex.
pub fn parse_inspect(response: &Frame) -> Result<String> {
    Ok(format!(
        "trigger frame (hex): {}",
        inspect_trigger(response).to_hex()
    ))
}

fn build_insert(args: &[ArgValue]) -> Result<Frame> {
    let hour = time_field(arg(args, 0, "hour")?.as_int("hour")?, "hour")?;
    let minute = time_field(arg(args, 1, "minute")?.as_int("minute")?, "minute")?;
    let second = time_field(arg(args, 2, "second")?.as_int("second")?, "second")?;
    let days = as_u8(arg(args, 3, "days")?.as_int("days")?, "days")?;
    let trigger = arg(args, 4, "trigger")?.as_frame("trigger")?;
    let timepart = time::timepart(hour, minute, second)?;
    insert(TriggerTime::from_timepart(timepart), days, trigger)
}

fn build_remove(args: &[ArgValue]) -> Result<Frame> {
    remove(as_u8(arg(args, 0, "index")?.as_int("index")?, "index")?)
}

fn build_list(_args: &[ArgValue]) -> Result<Frame> {
    list()
}

fn build_inspect(args: &[ArgValue]) -> Result<Frame> {
    inspect(as_u8(arg(args, 0, "index")?.as_int("index")?, "index")?)
}

fn time_field(value: i64, name: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| RegistryError::InvalidArgument {
        reason: format!("argument {name}: {value} does not fit a 32-bit time field"),
    })
}

static COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "insert",
        identity: INSERT,
        direction: Direction::Set,
        summary: "Schedule a trigger frame at a time of day on given days",
        args: &[
            ArgSpec::new("hour", ArgKind::Int),
            ArgSpec::new("minute", ArgKind::Int),
            ArgSpec::new("second", ArgKind::Int),
            ArgSpec::new("days", ArgKind::Int),
            ArgSpec::new("trigger", ArgKind::Frame),
        ],
        build: build_insert,
        parse_res: None,
        parse_err: None,
    },
    CommandSpec {
        name: "remove",
        identity: REMOVE,
        direction: Direction::Set,
        summary: "Remove an alarm by index",
        args: &[ArgSpec::new("index", ArgKind::Int)],
        build: build_remove,
        parse_res: None,
        parse_err: None,
    },
    CommandSpec {
        name: "list",
        identity: LIST,
        direction: Direction::Get,
        summary: "List scheduled alarms",
        args: &[],
        build: build_list,
        parse_res: Some(parse_list),
        parse_err: None,
    },
    CommandSpec {
        name: "inspect",
        identity: INSPECT,
        direction: Direction::Get,
        summary: "Show an alarm's stored trigger frame",
        args: &[ArgSpec::new("index", ArgKind::Int)],
        build: build_inspect,
        parse_res: Some(parse_inspect),
        parse_err: None,
    },
];

static SERVICE: ServiceDescriptor = ServiceDescriptor {
    name: "alarm",
    destination: DESTINATION,
    commands: COMMANDS,
};

/// The alarm service's registration table.
pub fn descriptor() -> &'static ServiceDescriptor {
    &SERVICE
}
