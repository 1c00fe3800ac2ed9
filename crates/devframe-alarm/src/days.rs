//! Day-of-week bitmask for alarm schedules.
//!
//! Bit 0 is Sunday through bit 6 Saturday; bit 7 is ignored by the device.

pub const SUNDAY: u8 = 0b000_0001;
pub const MONDAY: u8 = 0b000_0010;
pub const TUESDAY: u8 = 0b000_0100;
pub const WEDNESDAY: u8 = 0b000_1000;
pub const THURSDAY: u8 = 0b001_0000;
pub const FRIDAY: u8 = 0b010_0000;
pub const SATURDAY: u8 = 0b100_0000;

/// Monday through Friday.
pub const WEEKDAYS: u8 = 0b011_1110;
/// Saturday and Sunday.
pub const WEEKENDS: u8 = 0b100_0001;
pub const EVERYDAY: u8 = 0b111_1111;

const NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Names of the set days, Sunday first.
pub fn day_names(mask: u8) -> Vec<&'static str> {
    NAMES
        .iter()
        .enumerate()
        .filter(|(bit, _)| mask & (1 << bit) != 0)
        .map(|(_, name)| *name)
        .collect()
}

/// Comma-joined day names, or `none` for an empty mask.
pub fn format_days(mask: u8) -> String {
    let names = day_names(mask);
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_day_bits() {
        assert_eq!(day_names(SUNDAY), vec!["Sunday"]);
        assert_eq!(day_names(MONDAY), vec!["Monday"]);
        assert_eq!(day_names(SATURDAY), vec!["Saturday"]);
    }

    #[test]
    fn test_combined_masks_render_sunday_first() {
        assert_eq!(day_names(SUNDAY | TUESDAY), vec!["Sunday", "Tuesday"]);
        assert_eq!(SUNDAY | TUESDAY, 0b000_0101);
        assert_eq!(
            day_names(EVERYDAY),
            vec![
                "Sunday",
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday"
            ]
        );
    }

    #[test]
    fn test_convenience_masks() {
        assert_eq!(WEEKDAYS, MONDAY | TUESDAY | WEDNESDAY | THURSDAY | FRIDAY);
        assert_eq!(WEEKENDS, SATURDAY | SUNDAY);
        assert_eq!(EVERYDAY, WEEKDAYS | WEEKENDS);
        assert_eq!(
            format_days(WEEKENDS),
            "Sunday, Saturday",
            "weekend mask renders in bit order"
        );
    }

    #[test]
    fn test_empty_and_unused_bit() {
        assert_eq!(format_days(0), "none");
        // Bit 7 selects no day.
        assert_eq!(format_days(0b1000_0000), "none");
    }

    #[test]
    fn test_format_joins_with_commas() {
        assert_eq!(format_days(WEEKDAYS), "Monday, Tuesday, Wednesday, Thursday, Friday");
    }
}
