//! Register definitions and bitfield structures for the DS1307 RTC.
//!
//! This module contains all register addresses, bitfield definitions, and
//! related types for interacting with the DS1307 Real-Time Clock registers.

use bitfield::bitfield;

/// Register addresses for the DS1307 RTC.
#[allow(unused)]
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegAddr {
    /// Seconds register (0-59), with the clock-halt flag in bit 7
    Seconds = 0x00,
    /// Minutes register (0-59)
    Minutes = 0x01,
    /// Hours register (1-12 + AM/PM or 0-23)
    Hours = 0x02,
    /// Day of week register (1-7)
    Day = 0x03,
    /// Date register (1-31)
    Date = 0x04,
    /// Month register (1-12)
    Month = 0x05,
    /// Year register (0-99)
    Year = 0x06,
    /// Control register (square-wave output)
    Control = 0x07,
    /// First byte of the battery-backed NVRAM
    Ram = 0x08,
}

/// Size of the battery-backed NVRAM window at 0x08-0x3F, in bytes.
pub const RAM_SIZE: usize = 56;

/// Control register bits with no defined function. They must read zero on
/// a healthy part.
pub(crate) const CONTROL_RESERVED_MASK: u8 = 0b0110_1100;

/// Hour format for the DS1307 hours register.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HourMode {
    /// 24-hour format (0-23)
    TwentyFourHour = 0,
    /// 12-hour format (1-12 + AM/PM)
    TwelveHour = 1,
}
impl From<u8> for HourMode {
    /// Creates an `HourMode` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => HourMode::TwentyFourHour,
            1 => HourMode::TwelveHour,
            _ => panic!("Invalid value for HourMode: {}", v),
        }
    }
}
impl From<HourMode> for u8 {
    /// Converts an `HourMode` to its raw register value.
    fn from(v: HourMode) -> Self {
        v as u8
    }
}

/// Day-of-week encoding used by this driver.
///
/// The DS1307 treats the day register as a free-running 1-7 counter with a
/// caller-defined mapping. This driver follows the chip's power-on-reset
/// convention: reset loads 01/01/00 01 00:00:00, which is a Saturday, so
/// Saturday is day 1.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Weekday {
    /// Saturday (chip power-on-reset default)
    Saturday = 1,
    /// Sunday
    Sunday = 2,
    /// Monday
    Monday = 3,
    /// Tuesday
    Tuesday = 4,
    /// Wednesday
    Wednesday = 5,
    /// Thursday
    Thursday = 6,
    /// Friday
    Friday = 7,
}
impl From<u8> for Weekday {
    /// Creates a `Weekday` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not in 1-7.
    fn from(v: u8) -> Self {
        match v {
            1 => Weekday::Saturday,
            2 => Weekday::Sunday,
            3 => Weekday::Monday,
            4 => Weekday::Tuesday,
            5 => Weekday::Wednesday,
            6 => Weekday::Thursday,
            7 => Weekday::Friday,
            _ => panic!("Invalid value for Weekday: {}", v),
        }
    }
}
impl From<Weekday> for u8 {
    /// Converts a `Weekday` to its raw register value.
    fn from(v: Weekday) -> Self {
        v as u8
    }
}
impl From<chrono::Weekday> for Weekday {
    fn from(v: chrono::Weekday) -> Self {
        match v {
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
        }
    }
}

/// Square-wave output selection.
///
/// While the SQWE bit is set the pin toggles at one of four fixed rates;
/// while it is clear the pin is a constant level driven by the OUT bit.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SquareWave {
    /// Output held low (OUT = 0, SQWE = 0)
    Low,
    /// Output held high (OUT = 1, SQWE = 0)
    High,
    /// 1 Hz square wave
    Hz1,
    /// 4.096 kHz square wave
    Hz4096,
    /// 8.192 kHz square wave
    Hz8192,
    /// 32.768 kHz square wave
    Hz32768,
}
impl From<SquareWave> for u8 {
    /// Converts a `SquareWave` selection to a full control register value.
    fn from(v: SquareWave) -> Self {
        match v {
            SquareWave::Low => 0x00,
            SquareWave::High => 0x80,
            SquareWave::Hz1 => 0x10,
            SquareWave::Hz4096 => 0x11,
            SquareWave::Hz8192 => 0x12,
            SquareWave::Hz32768 => 0x13,
        }
    }
}
impl TryFrom<u8> for SquareWave {
    type Error = u8;

    /// Decodes a raw control register value.
    ///
    /// The SQWE bit is inspected first; while it is clear the result depends
    /// only on the OUT bit. Fails with the offending byte when any reserved
    /// control bit is set.
    fn try_from(v: u8) -> Result<Self, u8> {
        if v & CONTROL_RESERVED_MASK != 0 {
            return Err(v);
        }
        let control = Control(v);
        let selection = if control.square_wave_enable() {
            match control.rate_select() {
                0b00 => SquareWave::Hz1,
                0b01 => SquareWave::Hz4096,
                0b10 => SquareWave::Hz8192,
                _ => SquareWave::Hz32768,
            }
        } else if control.out() {
            SquareWave::High
        } else {
            SquareWave::Low
        };
        Ok(selection)
    }
}

// This macro generates the From<u8> and Into<u8> implementations for the
// register type
macro_rules! from_register_u8 {
    ($typ:ty) => {
        impl From<u8> for $typ {
            fn from(v: u8) -> Self {
                paste::paste!([< $typ >](v))
            }
        }
        impl From<$typ> for u8 {
            fn from(v: $typ) -> Self {
                v.0
            }
        }
    };
}

bitfield! {
    /// Seconds register (0-59) with BCD encoding and the clock-halt flag.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Seconds(u8);
    impl Debug;
    /// Clock halt (CH) flag; the oscillator is stopped while set
    pub halt, set_halt: 7;
    /// Tens place of seconds (0-5)
    pub ten_seconds, set_ten_seconds: 6, 4;
    /// Ones place of seconds (0-9)
    pub seconds, set_seconds: 3, 0;
}
from_register_u8!(Seconds);

#[cfg(feature = "defmt")]
impl defmt::Format for Seconds {
    fn format(&self, f: defmt::Formatter) {
        let seconds = 10 * self.ten_seconds() + self.seconds();
        if self.halt() {
            defmt::write!(f, "Seconds({}s, halted)", seconds);
        } else {
            defmt::write!(f, "Seconds({}s)", seconds);
        }
    }
}

bitfield! {
    /// Minutes register (0-59) with BCD encoding.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Minutes(u8);
    impl Debug;
    /// Tens place of minutes (0-5)
    pub ten_minutes, set_ten_minutes: 6, 4;
    /// Ones place of minutes (0-9)
    pub minutes, set_minutes: 3, 0;
}
from_register_u8!(Minutes);

#[cfg(feature = "defmt")]
impl defmt::Format for Minutes {
    fn format(&self, f: defmt::Formatter) {
        let minutes = 10 * self.ten_minutes() + self.minutes();
        defmt::write!(f, "Minutes({}m)", minutes);
    }
}

bitfield! {
    /// Hours register with format selection and BCD encoding.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Hours(u8);
    impl Debug;
    /// Hour format (12/24 hour)
    pub from into HourMode, hour_mode, set_hour_mode: 6, 6;
    /// PM flag (12-hour) or 20-hour bit (24-hour)
    pub pm_or_twenty_hours, set_pm_or_twenty_hours: 5, 5;
    /// Tens place of hours
    pub ten_hours, set_ten_hours: 4, 4;
    /// Ones place of hours
    pub hours, set_hours: 3, 0;
}
from_register_u8!(Hours);

#[cfg(feature = "defmt")]
impl defmt::Format for Hours {
    fn format(&self, f: defmt::Formatter) {
        let hours = 10 * self.ten_hours() + self.hours();
        match self.hour_mode() {
            HourMode::TwentyFourHour => {
                let hours = hours + 20 * self.pm_or_twenty_hours();
                defmt::write!(f, "Hours({}h 24h)", hours);
            }
            HourMode::TwelveHour => {
                let is_pm = self.pm_or_twenty_hours() != 0;
                defmt::write!(f, "Hours({}h {})", hours, if is_pm { "PM" } else { "AM" });
            }
        }
    }
}

bitfield! {
    /// Day of week register (1-7).
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Day(u8);
    impl Debug;
    /// Day of week (1-7, 1 = Saturday by this driver's convention)
    pub weekday, set_weekday: 2, 0;
}
from_register_u8!(Day);

#[cfg(feature = "defmt")]
impl defmt::Format for Day {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Day({})", self.weekday());
    }
}

bitfield! {
    /// Date register (1-31) with BCD encoding.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Date(u8);
    impl Debug;
    /// Tens place of date (0-3)
    pub ten_date, set_ten_date: 5, 4;
    /// Ones place of date (0-9)
    pub date, set_date: 3, 0;
}
from_register_u8!(Date);

#[cfg(feature = "defmt")]
impl defmt::Format for Date {
    fn format(&self, f: defmt::Formatter) {
        let date = 10 * self.ten_date() + self.date();
        defmt::write!(f, "Date({})", date);
    }
}

bitfield! {
    /// Month register (1-12) with BCD encoding.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Month(u8);
    impl Debug;
    /// Tens place of month (0-1)
    pub ten_month, set_ten_month: 4, 4;
    /// Ones place of month (0-9)
    pub month, set_month: 3, 0;
}
from_register_u8!(Month);

#[cfg(feature = "defmt")]
impl defmt::Format for Month {
    fn format(&self, f: defmt::Formatter) {
        let month = 10 * self.ten_month() + self.month();
        defmt::write!(f, "Month({})", month);
    }
}

bitfield! {
    /// Year register (0-99) with BCD encoding.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Year(u8);
    impl Debug;
    /// Tens place of year (0-9)
    pub ten_year, set_ten_year: 7, 4;
    /// Ones place of year (0-9)
    pub year, set_year: 3, 0;
}
from_register_u8!(Year);

#[cfg(feature = "defmt")]
impl defmt::Format for Year {
    fn format(&self, f: defmt::Formatter) {
        let year = 10 * self.ten_year() + self.year();
        defmt::write!(f, "Year({})", year);
    }
}

bitfield! {
    /// Control register for the square-wave output pin.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Control(u8);
    impl Debug;
    /// Output level while the square wave is disabled
    pub out, set_out: 7;
    /// Square-wave enable (SQWE)
    pub square_wave_enable, set_square_wave_enable: 4;
    /// Rate select (RS1/RS0)
    pub rate_select, set_rate_select: 1, 0;
}
from_register_u8!(Control);

#[cfg(feature = "defmt")]
impl defmt::Format for Control {
    fn format(&self, f: defmt::Formatter) {
        match SquareWave::try_from(self.0) {
            Ok(selection) => defmt::write!(f, "Control({})", selection),
            Err(raw) => defmt::write!(f, "Control(reserved bits set: {=u8:#04x})", raw),
        }
    }
}
