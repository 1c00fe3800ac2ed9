//! Alarm service command set.
//!
//! The alarm service schedules command frames for the device to replay at
//! a time of day: insert stores a trigger frame with its schedule, remove
//! deletes by index, list walks the stored schedule, inspect returns one
//! stored trigger frame. Sunrise and sunset triggers are reserved dwords
//! in the time field; the device resolves them to concrete times itself.

pub mod commands;
pub mod days;
pub mod time;

pub use commands::{
    descriptor, insert, inspect, inspect_trigger, list, list_entries, parse_inspect, parse_list,
    remove, AlarmEntry, DESTINATION, INSERT, INSPECT, LIST, REMOVE, TRIGGER_CAPACITY,
    TRIGGER_OFFSET,
};
pub use days::{day_names, format_days, EVERYDAY, WEEKDAYS, WEEKENDS};
pub use time::{
    format_timepart, timepart, Timepart, TriggerTime, TRIGGER_SUNRISE, TRIGGER_SUNSET,
};
