//! Register sanity checks for the DS1307.
//!
//! Each check inspects one raw register byte for BCD validity and field
//! range, masking flag bits first. A failing register is a data fault in
//! the chip contents (battery loss, first power-up, bus corruption), not
//! a usage error, so it is reported as a structured verdict rather than
//! an `Err`. Day-of-month is not cross-checked against month or leap
//! year.

use crate::bcd;
use crate::registers::{HourMode, Hours, CONTROL_RESERVED_MASK};

/// Validation verdict for the time/control register bank.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Validation {
    /// Every register holds a self-consistent value
    Pass,
    /// A register failed validation; checking stopped there
    Fail(DataFault),
}

/// A register whose contents failed validation, with the raw byte read.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataFault {
    /// Seconds register is not BCD or exceeds 59 (halt flag excluded)
    Seconds(u8),
    /// Minutes register is not BCD or exceeds 59
    Minutes(u8),
    /// Hours register is not BCD or out of range for its hour mode
    Hours(u8),
    /// Day register is outside 1-7
    Day(u8),
    /// Date register is outside 1-31
    Date(u8),
    /// Month register is outside 1-12
    Month(u8),
    /// Year register is not BCD
    Year(u8),
    /// Control register has reserved bits set
    Control(u8),
}

pub(crate) fn check_seconds(raw: u8) -> Result<(), DataFault> {
    // The halt flag is not part of the count
    let masked = raw & 0x7F;
    if bcd::is_valid(masked) && bcd::decode(masked) <= 59 {
        Ok(())
    } else {
        Err(DataFault::Seconds(raw))
    }
}

pub(crate) fn check_minutes(raw: u8) -> Result<(), DataFault> {
    if bcd::is_valid(raw) && bcd::decode(raw) <= 59 {
        Ok(())
    } else {
        Err(DataFault::Minutes(raw))
    }
}

pub(crate) fn check_hours(raw: u8) -> Result<(), DataFault> {
    let ok = match Hours(raw).hour_mode() {
        HourMode::TwelveHour => {
            // Mode and PM flags are not part of the count
            let masked = raw & 0x1F;
            bcd::is_valid(masked) && (1..=12).contains(&bcd::decode(masked))
        }
        HourMode::TwentyFourHour => {
            let masked = raw & 0x3F;
            bcd::is_valid(masked) && bcd::decode(masked) <= 23
        }
    };
    if ok {
        Ok(())
    } else {
        Err(DataFault::Hours(raw))
    }
}

pub(crate) fn check_day(raw: u8) -> Result<(), DataFault> {
    if bcd::is_valid(raw) && (1..=7).contains(&bcd::decode(raw)) {
        Ok(())
    } else {
        Err(DataFault::Day(raw))
    }
}

pub(crate) fn check_date(raw: u8) -> Result<(), DataFault> {
    if bcd::is_valid(raw) && (1..=31).contains(&bcd::decode(raw)) {
        Ok(())
    } else {
        Err(DataFault::Date(raw))
    }
}

pub(crate) fn check_month(raw: u8) -> Result<(), DataFault> {
    if bcd::is_valid(raw) && (1..=12).contains(&bcd::decode(raw)) {
        Ok(())
    } else {
        Err(DataFault::Month(raw))
    }
}

pub(crate) fn check_year(raw: u8) -> Result<(), DataFault> {
    // Any two-digit BCD year is acceptable
    if bcd::is_valid(raw) {
        Ok(())
    } else {
        Err(DataFault::Year(raw))
    }
}

pub(crate) fn check_control(raw: u8) -> Result<(), DataFault> {
    if raw & CONTROL_RESERVED_MASK == 0 {
        Ok(())
    } else {
        Err(DataFault::Control(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_on_reset_image_passes() {
        // POR loads 01/01/00 01 00:00:00 with control cleared
        assert_eq!(check_seconds(0x00), Ok(()));
        assert_eq!(check_minutes(0x00), Ok(()));
        assert_eq!(check_hours(0x00), Ok(()));
        assert_eq!(check_day(0x01), Ok(()));
        assert_eq!(check_date(0x01), Ok(()));
        assert_eq!(check_month(0x01), Ok(()));
        assert_eq!(check_year(0x00), Ok(()));
        assert_eq!(check_control(0x00), Ok(()));
    }

    #[test]
    fn test_seconds_ignores_halt_flag() {
        assert_eq!(check_seconds(0x80), Ok(())); // halted at 0 seconds
        assert_eq!(check_seconds(0xD9), Ok(())); // halted at 59 seconds
    }

    #[test]
    fn test_seconds_faults() {
        assert_eq!(check_seconds(0x1A), Err(DataFault::Seconds(0x1A))); // bad nibble
        assert_eq!(check_seconds(0x60), Err(DataFault::Seconds(0x60))); // 60 > 59
    }

    #[test]
    fn test_minutes_faults() {
        assert_eq!(check_minutes(0x59), Ok(()));
        assert_eq!(check_minutes(0x60), Err(DataFault::Minutes(0x60)));
        assert_eq!(check_minutes(0x0F), Err(DataFault::Minutes(0x0F)));
    }

    #[test]
    fn test_hours_24h_range() {
        assert_eq!(check_hours(0x00), Ok(()));
        assert_eq!(check_hours(0x23), Ok(()));
        assert_eq!(check_hours(0x24), Err(DataFault::Hours(0x24)));
        assert_eq!(check_hours(0x1B), Err(DataFault::Hours(0x1B)));
    }

    #[test]
    fn test_hours_12h_range() {
        // 12-hour mode: zero is invalid, 1-12 valid, PM flag ignored
        assert_eq!(check_hours(0x41), Ok(())); // 1 AM
        assert_eq!(check_hours(0x72), Ok(())); // 12 PM
        assert_eq!(check_hours(0x40), Err(DataFault::Hours(0x40))); // hour 0
        assert_eq!(check_hours(0x53), Err(DataFault::Hours(0x53))); // hour 13
    }

    #[test]
    fn test_day_range() {
        assert_eq!(check_day(0x01), Ok(()));
        assert_eq!(check_day(0x07), Ok(()));
        assert_eq!(check_day(0x00), Err(DataFault::Day(0x00)));
        assert_eq!(check_day(0x08), Err(DataFault::Day(0x08)));
    }

    #[test]
    fn test_date_range() {
        assert_eq!(check_date(0x01), Ok(()));
        assert_eq!(check_date(0x31), Ok(()));
        assert_eq!(check_date(0x00), Err(DataFault::Date(0x00)));
        assert_eq!(check_date(0x32), Err(DataFault::Date(0x32)));
    }

    #[test]
    fn test_month_range() {
        assert_eq!(check_month(0x01), Ok(()));
        assert_eq!(check_month(0x12), Ok(()));
        assert_eq!(check_month(0x00), Err(DataFault::Month(0x00)));
        assert_eq!(check_month(0x13), Err(DataFault::Month(0x13)));
    }

    #[test]
    fn test_year_accepts_any_bcd() {
        assert_eq!(check_year(0x00), Ok(()));
        assert_eq!(check_year(0x99), Ok(()));
        assert_eq!(check_year(0x9A), Err(DataFault::Year(0x9A)));
    }

    #[test]
    fn test_control_reserved_bits() {
        assert_eq!(check_control(0x00), Ok(()));
        assert_eq!(check_control(0x80), Ok(())); // OUT
        assert_eq!(check_control(0x13), Ok(())); // SQWE + RS1 + RS0
        assert_eq!(check_control(0x93), Ok(())); // all defined bits
        assert_eq!(check_control(0x04), Err(DataFault::Control(0x04)));
        assert_eq!(check_control(0x20), Err(DataFault::Control(0x20)));
    }
}
