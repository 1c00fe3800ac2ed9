//! Trigger time encoding.
//!
//! An alarm fires at a time of day carried as a 32-bit seconds-since-
//! midnight dword. Two reserved dwords at the top of the range select
//! astronomical triggers the device resolves itself. The sentinel
//! comparison always happens on this 32-bit field, never on narrower
//! bytes that could never hold the sentinels.

use devframe_registry::{RegistryError, Result};

/// Seconds since midnight, as carried in alarm bodies.
pub type Timepart = u32;

/// Sentinel timepart selecting the device-computed sunrise.
pub const TRIGGER_SUNRISE: Timepart = u32::MAX;

/// Sentinel timepart selecting the device-computed sunset.
pub const TRIGGER_SUNSET: Timepart = u32::MAX - 1;

/// When an alarm fires: a fixed time of day, or an astronomical event the
/// device resolves to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerTime {
    At(Timepart),
    Sunrise,
    Sunset,
}

impl TriggerTime {
    /// The wire dword for this trigger.
    pub fn to_timepart(self) -> Timepart {
        match self {
            TriggerTime::At(timepart) => timepart,
            TriggerTime::Sunrise => TRIGGER_SUNRISE,
            TriggerTime::Sunset => TRIGGER_SUNSET,
        }
    }

    /// Classify a wire dword.
    pub fn from_timepart(timepart: Timepart) -> Self {
        match timepart {
            TRIGGER_SUNRISE => TriggerTime::Sunrise,
            TRIGGER_SUNSET => TriggerTime::Sunset,
            other => TriggerTime::At(other),
        }
    }

    /// `Sunrise`, `Sunset`, or the `hh:mm:ss` rendering.
    pub fn describe(self) -> String {
        match self {
            TriggerTime::Sunrise => "Sunrise".to_string(),
            TriggerTime::Sunset => "Sunset".to_string(),
            TriggerTime::At(timepart) => format_timepart(timepart),
        }
    }
}

/// Compute a timepart from hour/minute/second fields.
///
/// The fields are not validated individually: the device treats the whole
/// dword as opaque, and the sentinels stay expressible as oversized hour
/// counts. Only a result too wide for the wire field is rejected.
pub fn timepart(hour: u32, minute: u32, second: u32) -> Result<Timepart> {
    let total = u64::from(hour) * 3600 + u64::from(minute) * 60 + u64::from(second);
    Timepart::try_from(total).map_err(|_| RegistryError::InvalidArgument {
        reason: format!("time {hour}h {minute}m {second}s does not fit a 32-bit timepart"),
    })
}

/// Render a timepart as zero-padded `hh:mm:ss`.
pub fn format_timepart(timepart: Timepart) -> String {
    let hours = timepart / 3600;
    let minutes = (timepart % 3600) / 60;
    let seconds = timepart % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
