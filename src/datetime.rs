//! `DateTime` conversion and register utilities for the DS1307 RTC.
//!
//! This module provides the internal representation and conversion logic for
//! the DS1307's date and time registers. It enables safe, validated
//! conversion between the DS1307's BCD-encoded registers and chrono's
//! `NaiveDateTime`.
//!
//! # Register Model
//!
//! The DS1307 stores date and time in 7 consecutive registers:
//! - Seconds, Minutes, Hours, Day, Date, Month, Year
//!
//! A register image is never cached by the driver; it is rebuilt from the
//! chip on every read, because the clock keeps ticking underneath us.
//!
//! # Error Handling
//!
//! Conversion errors are reported via [`DS1307DateTimeError`].

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use log::{debug, error};

use crate::{Date, Day, HourMode, Hours, Minutes, Month, Seconds, Weekday, Year};

/// Internal representation of the DS1307 RTC date and time.
///
/// This struct models the 7 date/time registers of the DS1307, using
/// strongly-typed bitfield wrappers for each field. It is used for
/// register-level I/O and conversion to/from chrono's `NaiveDateTime`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct DS1307DateTime {
    pub(crate) seconds: Seconds,
    pub(crate) minutes: Minutes,
    pub(crate) hours: Hours,
    pub(crate) day: Day,
    pub(crate) date: Date,
    pub(crate) month: Month,
    pub(crate) year: Year,
}

impl DS1307DateTime {
    /// Helper function to convert a number to BCD digits with validation
    pub(crate) fn make_bcd(value: u32, max_value: u32) -> Result<(u8, u8), DS1307DateTimeError> {
        if value > max_value {
            return Err(DS1307DateTimeError::InvalidDateTime);
        }
        let ones = u8::try_from(value % 10).map_err(|_| DS1307DateTimeError::InvalidDateTime)?;
        let tens = u8::try_from(value / 10).map_err(|_| DS1307DateTimeError::InvalidDateTime)?;
        Ok((ones, tens))
    }

    fn convert_seconds(seconds: u32) -> Result<Seconds, DS1307DateTimeError> {
        let (ones, tens) = Self::make_bcd(seconds, 59)?;
        let mut value = Seconds::default();
        value.set_seconds(ones);
        value.set_ten_seconds(tens);
        Ok(value)
    }

    fn convert_minutes(minutes: u32) -> Result<Minutes, DS1307DateTimeError> {
        let (ones, tens) = Self::make_bcd(minutes, 59)?;
        let mut value = Minutes::default();
        value.set_minutes(ones);
        value.set_ten_minutes(tens);
        Ok(value)
    }

    /// Encodes an hour in 24-hour form.
    ///
    /// Register images are always built in 24-hour form; the driver converts
    /// the hours register afterwards when the chip runs in 12-hour mode, so
    /// a raw hour write is never ambiguous about its format.
    pub(crate) fn convert_hours(hour: u32) -> Result<Hours, DS1307DateTimeError> {
        if hour > 23 {
            return Err(DS1307DateTimeError::InvalidDateTime);
        }
        let ones = u8::try_from(hour % 10).map_err(|_| DS1307DateTimeError::InvalidDateTime)?;
        let ten_hours = u8::from((10..20).contains(&hour));
        let twenty_hours = u8::from(hour >= 20);
        let mut value = Hours::default();
        value.set_hour_mode(HourMode::TwentyFourHour);
        value.set_hours(ones);
        value.set_ten_hours(ten_hours);
        value.set_pm_or_twenty_hours(twenty_hours);
        Ok(value)
    }

    fn convert_day(weekday: chrono::Weekday) -> Day {
        let mut value = Day::default();
        value.set_weekday(u8::from(Weekday::from(weekday)));
        value
    }

    fn convert_date(date: u32) -> Result<Date, DS1307DateTimeError> {
        let (ones, tens) = Self::make_bcd(date, 31)?;
        let mut value = Date::default();
        value.set_date(ones);
        value.set_ten_date(tens);
        Ok(value)
    }

    fn convert_month(month: u32) -> Result<Month, DS1307DateTimeError> {
        let (ones, tens) = Self::make_bcd(month, 12)?;
        let mut value = Month::default();
        value.set_month(ones);
        value.set_ten_month(tens);
        Ok(value)
    }

    fn convert_year(year: i32) -> Result<Year, DS1307DateTimeError> {
        if year > 2099 {
            error!("Year {} is too late! must be before 2100", year);
            return Err(DS1307DateTimeError::YearNotBefore2100);
        }
        if year < 2000 {
            error!("Year {} is too early! must be greater than 1999", year);
            return Err(DS1307DateTimeError::YearNotAfter1999);
        }

        let year_offset =
            u8::try_from(year - 2000).map_err(|_| DS1307DateTimeError::InvalidDateTime)?;
        let ones = year_offset % 10;
        let tens = year_offset / 10;

        let mut value = Year::default();
        value.set_year(ones);
        value.set_ten_year(tens);
        Ok(value)
    }

    pub(crate) fn from_datetime(datetime: &NaiveDateTime) -> Result<Self, DS1307DateTimeError> {
        let seconds = Self::convert_seconds(datetime.second())?;
        let minutes = Self::convert_minutes(datetime.minute())?;
        let hours = Self::convert_hours(datetime.hour())?;
        // The weekday is derived from the calendar date, never supplied
        // independently, so it cannot disagree with year/month/date.
        let day = Self::convert_day(datetime.weekday());
        let date = Self::convert_date(datetime.day())?;
        let month = Self::convert_month(datetime.month())?;
        let year = Self::convert_year(datetime.year())?;

        let raw = DS1307DateTime {
            seconds,
            minutes,
            hours,
            day,
            date,
            month,
            year,
        };

        debug!("raw={:?}", raw);

        Ok(raw)
    }

    pub(crate) fn into_datetime(self) -> Result<NaiveDateTime, DS1307DateTimeError> {
        // Bitfield getters exclude the halt and mode flags, so the flag
        // bits never leak into the decoded digits.
        let seconds: u32 =
            10 * u32::from(self.seconds.ten_seconds()) + u32::from(self.seconds.seconds());
        let minutes =
            10 * u32::from(self.minutes.ten_minutes()) + u32::from(self.minutes.minutes());
        let hours = 10 * u32::from(self.hours.ten_hours()) + u32::from(self.hours.hours());
        let hours = match self.hours.hour_mode() {
            HourMode::TwentyFourHour => hours + 20 * u32::from(self.hours.pm_or_twenty_hours()),
            HourMode::TwelveHour => {
                let is_pm = self.hours.pm_or_twenty_hours() != 0;
                match (hours, is_pm) {
                    (12, false) => 0,    // 12 AM = 0:xx
                    (12, true) => 12,    // 12 PM = 12:xx
                    (h, false) => h,     // 1-11 AM = 1-11:xx
                    (h, true) => h + 12, // 1-11 PM = 13-23:xx
                }
            }
        };
        debug!(
            "raw_hour={:?} h={} m={} s={}",
            self.hours, hours, minutes, seconds
        );

        let year = 2000_i32
            + i32::try_from(10 * u32::from(self.year.ten_year()) + u32::from(self.year.year()))
                .map_err(|_| DS1307DateTimeError::InvalidDateTime)?;
        let month = 10 * u32::from(self.month.ten_month()) + u32::from(self.month.month());
        let date = 10 * u32::from(self.date.ten_date()) + u32::from(self.date.date());

        // Validate the date components before creating NaiveDateTime
        NaiveDate::from_ymd_opt(year, month, date)
            .and_then(|d| d.and_hms_opt(hours, minutes, seconds))
            .ok_or(DS1307DateTimeError::InvalidDateTime)
    }
}

impl From<[u8; 7]> for DS1307DateTime {
    fn from(data: [u8; 7]) -> Self {
        DS1307DateTime {
            seconds: Seconds(data[0]),
            minutes: Minutes(data[1]),
            hours: Hours(data[2]),
            day: Day(data[3]),
            date: Date(data[4]),
            month: Month(data[5]),
            year: Year(data[6]),
        }
    }
}

impl From<&DS1307DateTime> for [u8; 7] {
    fn from(dt: &DS1307DateTime) -> [u8; 7] {
        [
            dt.seconds.0,
            dt.minutes.0,
            dt.hours.0,
            dt.day.0,
            dt.date.0,
            dt.month.0,
            dt.year.0,
        ]
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
/// Errors that can occur during DS1307 date/time conversion or validation.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DS1307DateTimeError {
    /// The provided or decoded date/time is invalid (e.g., out of range, not representable)
    InvalidDateTime,
    /// The year is not before 2100 (the two-digit year register covers 2000-2099)
    YearNotBefore2100,
    /// The year is not after 1999 (the two-digit year register covers 2000-2099)
    YearNotAfter1999,
}
