//! Platform-agnostic driver for the DS1307 battery-backed real-time clock.
//!
//! The DS1307 exposes its time and configuration as eight byte-wide
//! registers behind an I2C interface, plus 56 bytes of battery-backed
//! NVRAM. This crate models those registers as typed bitfield structures,
//! decodes them once at the bus boundary, and provides:
//!
//! - date/time access as chrono [`NaiveDateTime`] values
//! - time synchronization that preserves the chip's halt flag and hour
//!   format across the update
//! - 12/24-hour format switching with correct noon/midnight handling
//! - register sanity validation (BCD digits and field ranges)
//! - square-wave output control
//! - NVRAM access
//!
//! The driver never caches chip state: the clock keeps counting (or a
//! battery may have run down) behind our back, so every operation re-reads
//! the registers it needs.
//!
//! # Example
//!
//! ```rust,ignore
//! use ds1307::{DS1307, DEVICE_ADDRESS, HourMode, Validation};
//!
//! let mut rtc = DS1307::new(i2c, DEVICE_ADDRESS);
//!
//! match rtc.validate()? {
//!     Validation::Pass => {
//!         let now = rtc.datetime()?;
//!         rtc.set_hour_mode(HourMode::TwelveHour)?;
//!     }
//!     Validation::Fail(fault) => log::warn!("register fault: {:?}", fault),
//! }
//! ```
//!
//! # Features
//!
//! - `async` - async driver twin in [`asynch`], using `embedded-hal-async`
//! - `defmt` - `defmt::Format` implementations on public types
#![cfg_attr(not(test), no_std)]

pub mod bcd;
mod datetime;
pub mod hour_format;
mod registers;
mod validate;

#[cfg(feature = "async")]
pub mod asynch;

pub use datetime::DS1307DateTimeError;
pub use hour_format::FormatOutcome;
pub use registers::*;
pub use validate::{DataFault, Validation};

use chrono::NaiveDateTime;
use embedded_hal::i2c::I2c;
use log::debug;

use datetime::DS1307DateTime;

/// Factory-fixed I2C address of the DS1307 (7-bit).
pub const DEVICE_ADDRESS: u8 = 0x68;

/// One-shot device configuration applied by [`DS1307::configure`].
pub struct Config {
    /// Hour format for the hours register
    pub hour_mode: HourMode,
    /// Square-wave pin selection
    pub square_wave: SquareWave,
}

/// Errors returned by the DS1307 driver.
#[derive(Debug)]
pub enum DS1307Error<I2CE> {
    /// Underlying I2C transaction failed; propagated verbatim
    I2c(I2CE),
    /// Register contents do not form a representable date/time
    DateTime(DS1307DateTimeError),
    /// Control register value with reserved bits set
    InvalidControl(u8),
    /// NVRAM access outside the 56-byte window
    RamOutOfRange,
}

impl<I2CE> From<I2CE> for DS1307Error<I2CE> {
    fn from(e: I2CE) -> Self {
        DS1307Error::I2c(e)
    }
}

// This macro generates a getter and setter pair for each register
macro_rules! set_and_get_register {
    ($(($name:ident, $regaddr:expr, $typ:ty)),+) => {
        $(
            paste::paste! {
                #[doc = "Writes the " $name " register."]
                pub fn [< set_ $name >](&mut self, value: $typ) -> Result<(), DS1307Error<I2C::Error>> {
                    self.i2c.write(
                        self.address,
                        &[$regaddr as u8, value.into()],
                        )?;
                    Ok(())
                }
                #[doc = "Reads the " $name " register."]
                pub fn $name(&mut self) -> Result<$typ, DS1307Error<I2C::Error>> {
                    let mut data = [0];
                    self.i2c
                        .write_read(self.address, &[$regaddr as u8], &mut data)?;
                    Ok([< $typ >](data[0]))
                }
            }
        )+
    }
}

/// DS1307 Real-Time Clock driver (blocking).
pub struct DS1307<I2C: I2c> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> DS1307<I2C> {
    /// Creates a new DS1307 driver instance.
    ///
    /// # Arguments
    /// * `i2c` - The I2C bus implementation
    /// * `address` - The I2C address of the device (typically [`DEVICE_ADDRESS`])
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Applies a device configuration: square-wave selection and hour format.
    pub fn configure(&mut self, config: &Config) -> Result<(), DS1307Error<I2C::Error>> {
        debug!("square wave: {:?}", config.square_wave);
        self.set_square_wave(config.square_wave)?;
        debug!("hour mode: {:?}", config.hour_mode);
        self.set_hour_mode(config.hour_mode)?;
        Ok(())
    }

    fn read_register(&mut self, reg: RegAddr) -> Result<u8, DS1307Error<I2C::Error>> {
        let mut data = [0];
        self.i2c.write_read(self.address, &[reg as u8], &mut data)?;
        Ok(data[0])
    }

    /// Checks every time/control register for self-consistency.
    ///
    /// Registers are read one at a time and checking stops at the first
    /// fault. A fault is reported in the returned [`Validation`], not as an
    /// error, so the caller can report it and carry on; only transport
    /// failures are `Err`. Day-of-month is not cross-checked against month
    /// or leap year.
    pub fn validate(&mut self) -> Result<Validation, DS1307Error<I2C::Error>> {
        let checks: [(RegAddr, fn(u8) -> Result<(), DataFault>); 8] = [
            (RegAddr::Seconds, validate::check_seconds),
            (RegAddr::Minutes, validate::check_minutes),
            (RegAddr::Hours, validate::check_hours),
            (RegAddr::Day, validate::check_day),
            (RegAddr::Date, validate::check_date),
            (RegAddr::Month, validate::check_month),
            (RegAddr::Year, validate::check_year),
            (RegAddr::Control, validate::check_control),
        ];
        for (reg, check) in checks {
            let raw = self.read_register(reg)?;
            if let Err(fault) = check(raw) {
                debug!("validation fault: {:?}", fault);
                return Ok(Validation::Fail(fault));
            }
        }
        Ok(Validation::Pass)
    }

    /// Returns true while the clock-halt flag is set.
    pub fn is_halted(&mut self) -> Result<bool, DS1307Error<I2C::Error>> {
        Ok(self.seconds()?.halt())
    }

    /// Sets or clears the clock-halt flag, preserving the seconds count.
    pub fn set_halt(&mut self, halt: bool) -> Result<(), DS1307Error<I2C::Error>> {
        let mut seconds = self.seconds()?;
        seconds.set_halt(halt);
        self.set_seconds(seconds)
    }

    /// Reads the current date and time.
    ///
    /// Decodes either hour format; the halt flag does not affect the result.
    pub fn datetime(&mut self) -> Result<NaiveDateTime, DS1307Error<I2C::Error>> {
        let mut data = [0; 7];
        self.i2c
            .write_read(self.address, &[RegAddr::Seconds as u8], &mut data)?;
        DS1307DateTime::from(data)
            .into_datetime()
            .map_err(DS1307Error::DateTime)
    }

    /// Synchronizes the chip to a host-supplied timestamp.
    ///
    /// The chip's halt flag and hour format are read before anything is
    /// written and both survive the update: the clock is held halted while
    /// the time counters change, hours are written in 24-hour form and
    /// converted afterwards when the chip was in 12-hour mode, and the halt
    /// flag is cleared again last if the clock was running.
    ///
    /// The weekday register is computed from the calendar date.
    pub fn set_datetime(&mut self, datetime: &NaiveDateTime) -> Result<(), DS1307Error<I2C::Error>> {
        let was_halted = self.seconds()?.halt();
        let hour_mode = self.hours()?.hour_mode();
        let raw = DS1307DateTime::from_datetime(datetime).map_err(DS1307Error::DateTime)?;
        debug!("halted={} mode={:?}", was_halted, hour_mode);

        self.set_year(raw.year)?;
        self.set_month(raw.month)?;
        self.set_date(raw.date)?;
        self.set_day(raw.day)?;

        // Hold the clock while the time counters change
        let mut seconds = raw.seconds;
        seconds.set_halt(true);
        self.set_seconds(seconds)?;
        self.set_minutes(raw.minutes)?;
        self.set_hours(raw.hours)?;
        if hour_mode == HourMode::TwelveHour {
            self.set_hour_mode(HourMode::TwelveHour)?;
        }
        if !was_halted {
            seconds.set_halt(false);
            self.set_seconds(seconds)?;
        }
        Ok(())
    }

    /// Switches the hours register between 12- and 24-hour format.
    ///
    /// Returns [`FormatOutcome::AlreadySet`] without writing when the
    /// register is already in the requested format.
    pub fn set_hour_mode(
        &mut self,
        mode: HourMode,
    ) -> Result<FormatOutcome, DS1307Error<I2C::Error>> {
        let hours = self.hours()?;
        let converted = match mode {
            HourMode::TwelveHour => hour_format::to_12h(hours),
            HourMode::TwentyFourHour => hour_format::to_24h(hours),
        };
        match converted {
            Some(value) => {
                self.set_hours(value)?;
                Ok(FormatOutcome::Updated)
            }
            None => Ok(FormatOutcome::AlreadySet),
        }
    }

    /// Reads the square-wave output selection from the control register.
    ///
    /// Fails with [`DS1307Error::InvalidControl`] when reserved control
    /// bits are set.
    pub fn square_wave(&mut self) -> Result<SquareWave, DS1307Error<I2C::Error>> {
        let control = self.control()?;
        SquareWave::try_from(u8::from(control)).map_err(DS1307Error::InvalidControl)
    }

    /// Writes the square-wave output selection to the control register.
    pub fn set_square_wave(
        &mut self,
        selection: SquareWave,
    ) -> Result<(), DS1307Error<I2C::Error>> {
        self.set_control(Control(selection.into()))
    }

    /// Reads from the battery-backed NVRAM.
    ///
    /// `offset` is relative to the start of the 56-byte NVRAM window.
    pub fn read_ram(
        &mut self,
        offset: u8,
        buffer: &mut [u8],
    ) -> Result<(), DS1307Error<I2C::Error>> {
        if offset as usize + buffer.len() > RAM_SIZE {
            return Err(DS1307Error::RamOutOfRange);
        }
        if buffer.is_empty() {
            return Ok(());
        }
        self.i2c
            .write_read(self.address, &[RegAddr::Ram as u8 + offset], buffer)?;
        Ok(())
    }

    /// Writes to the battery-backed NVRAM, one byte per transaction.
    ///
    /// `offset` is relative to the start of the 56-byte NVRAM window.
    pub fn write_ram(&mut self, offset: u8, data: &[u8]) -> Result<(), DS1307Error<I2C::Error>> {
        if offset as usize + data.len() > RAM_SIZE {
            return Err(DS1307Error::RamOutOfRange);
        }
        for (i, byte) in data.iter().enumerate() {
            let reg = RegAddr::Ram as u8 + offset + i as u8;
            self.i2c.write(self.address, &[reg, *byte])?;
        }
        Ok(())
    }

    set_and_get_register!(
        (seconds, RegAddr::Seconds, Seconds),
        (minutes, RegAddr::Minutes, Minutes),
        (hours, RegAddr::Hours, Hours),
        (day, RegAddr::Day, Day),
        (date, RegAddr::Date, Date),
        (month, RegAddr::Month, Month),
        (year, RegAddr::Year, Year),
        (control, RegAddr::Control, Control)
    );
}
