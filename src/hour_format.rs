//! 12/24-hour conversion for the hours register.
//!
//! Both conversions rewrite the register while preserving the wall-clock
//! instant. The noon/midnight boundary carries the edge cases: 00:xx in
//! 24-hour form is 12:xx AM, and 12:xx stays 12:xx PM.

use crate::bcd;
use crate::registers::{HourMode, Hours};

/// Result of an hour-format change request.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FormatOutcome {
    /// The hours register was rewritten in the requested format
    Updated,
    /// The register was already in the requested format; nothing was written
    AlreadySet,
}

/// Rewrites a 24-hour register value in 12-hour form.
///
/// Returns `None` when the register is already in 12-hour mode, in which
/// case nothing should be written back.
#[must_use]
pub fn to_12h(hours: Hours) -> Option<Hours> {
    if hours.hour_mode() == HourMode::TwelveHour {
        return None;
    }
    let hour = bcd::decode(u8::from(hours) & 0x3F);
    let (hour12, pm) = match hour {
        0 => (12, false), // 00:xx = 12:xx AM
        1..=11 => (hour, false),
        12 => (12, true), // noon keeps its value, PM
        _ => (hour - 12, true),
    };
    let mut value = Hours(bcd::encode(hour12));
    value.set_hour_mode(HourMode::TwelveHour);
    value.set_pm_or_twenty_hours(u8::from(pm));
    Some(value)
}

/// Rewrites a 12-hour register value in 24-hour form.
///
/// Returns `None` when the register is already in 24-hour mode, in which
/// case nothing should be written back.
#[must_use]
pub fn to_24h(hours: Hours) -> Option<Hours> {
    if hours.hour_mode() == HourMode::TwentyFourHour {
        return None;
    }
    let pm = hours.pm_or_twenty_hours() != 0;
    let hour = bcd::decode(u8::from(hours) & 0x1F);
    let hour24 = match (hour, pm) {
        (12, false) => 0, // 12:xx AM = 00:xx
        (12, true) => 12, // 12:xx PM = 12:xx
        (h, false) => h,
        (h, true) => h + 12,
    };
    Some(Hours(bcd::encode(hour24)))
}
