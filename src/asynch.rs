//! Async implementation of the DS1307 driver.
//!
//! This module mirrors the blocking driver using `embedded-hal-async`
//! traits. It is only available when the `async` feature is enabled.
//!
//! # Example
//!
//! ```rust,ignore
//! use ds1307::asynch::DS1307;
//! use ds1307::DEVICE_ADDRESS;
//!
//! let mut rtc = DS1307::new(i2c, DEVICE_ADDRESS);
//! let datetime = rtc.datetime().await?;
//! ```

use chrono::NaiveDateTime;
use embedded_hal_async::i2c::I2c;
use log::debug;

use crate::datetime::DS1307DateTime;
use crate::hour_format;
use crate::registers::{
    Control, Date, Day, HourMode, Hours, Minutes, Month, RegAddr, Seconds, SquareWave, Year,
    RAM_SIZE,
};
use crate::validate::{self, DataFault, Validation};
use crate::{Config, DS1307Error, FormatOutcome};

macro_rules! set_and_get_register {
    ($(($name:ident, $regaddr:expr, $typ:ty)),+) => {
        $(
            paste::paste! {
                #[doc = "Writes the " $name " register."]
                pub async fn [< set_ $name >](&mut self, value: $typ) -> Result<(), DS1307Error<I2C::Error>> {
                    self.i2c.write(
                        self.address,
                        &[$regaddr as u8, value.into()],
                        ).await?;
                    Ok(())
                }
                #[doc = "Reads the " $name " register."]
                pub async fn $name(&mut self) -> Result<$typ, DS1307Error<I2C::Error>> {
                    let mut data = [0];
                    self.i2c
                        .write_read(self.address, &[$regaddr as u8], &mut data).await?;
                    Ok([< $typ >](data[0]))
                }
            }
        )+
    }
}

/// DS1307 Real-Time Clock driver (async).
pub struct DS1307<I2C: I2c> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> DS1307<I2C> {
    /// Creates a new DS1307 driver instance.
    ///
    /// # Arguments
    /// * `i2c` - The async I2C bus implementation
    /// * `address` - The I2C address of the device (typically [`crate::DEVICE_ADDRESS`])
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Applies a device configuration: square-wave selection and hour format.
    pub async fn configure(&mut self, config: &Config) -> Result<(), DS1307Error<I2C::Error>> {
        debug!("square wave: {:?}", config.square_wave);
        self.set_square_wave(config.square_wave).await?;
        debug!("hour mode: {:?}", config.hour_mode);
        self.set_hour_mode(config.hour_mode).await?;
        Ok(())
    }

    async fn read_register(&mut self, reg: RegAddr) -> Result<u8, DS1307Error<I2C::Error>> {
        let mut data = [0];
        self.i2c
            .write_read(self.address, &[reg as u8], &mut data)
            .await?;
        Ok(data[0])
    }

    /// Checks every time/control register for self-consistency.
    ///
    /// Registers are read one at a time and checking stops at the first
    /// fault. A fault is reported in the returned [`Validation`], not as an
    /// error, so the caller can report it and carry on; only transport
    /// failures are `Err`. Day-of-month is not cross-checked against month
    /// or leap year.
    pub async fn validate(&mut self) -> Result<Validation, DS1307Error<I2C::Error>> {
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
            let raw = self.read_register(reg).await?;
            if let Err(fault) = check(raw) {
                debug!("validation fault: {:?}", fault);
                return Ok(Validation::Fail(fault));
            }
        }
        Ok(Validation::Pass)
    }

    /// Returns true while the clock-halt flag is set.
    pub async fn is_halted(&mut self) -> Result<bool, DS1307Error<I2C::Error>> {
        Ok(self.seconds().await?.halt())
    }

    /// Sets or clears the clock-halt flag, preserving the seconds count.
    pub async fn set_halt(&mut self, halt: bool) -> Result<(), DS1307Error<I2C::Error>> {
        let mut seconds = self.seconds().await?;
        seconds.set_halt(halt);
        self.set_seconds(seconds).await
    }

    /// Reads the current date and time.
    ///
    /// Decodes either hour format; the halt flag does not affect the result.
    pub async fn datetime(&mut self) -> Result<NaiveDateTime, DS1307Error<I2C::Error>> {
        let mut data = [0; 7];
        self.i2c
            .write_read(self.address, &[RegAddr::Seconds as u8], &mut data)
            .await?;
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
    pub async fn set_datetime(
        &mut self,
        datetime: &NaiveDateTime,
    ) -> Result<(), DS1307Error<I2C::Error>> {
        let was_halted = self.seconds().await?.halt();
        let hour_mode = self.hours().await?.hour_mode();
        let raw = DS1307DateTime::from_datetime(datetime).map_err(DS1307Error::DateTime)?;
        debug!("halted={} mode={:?}", was_halted, hour_mode);

        self.set_year(raw.year).await?;
        self.set_month(raw.month).await?;
        self.set_date(raw.date).await?;
        self.set_day(raw.day).await?;

        // Hold the clock while the time counters change
        let mut seconds = raw.seconds;
        seconds.set_halt(true);
        self.set_seconds(seconds).await?;
        self.set_minutes(raw.minutes).await?;
        self.set_hours(raw.hours).await?;
        if hour_mode == HourMode::TwelveHour {
            self.set_hour_mode(HourMode::TwelveHour).await?;
        }
        if !was_halted {
            seconds.set_halt(false);
            self.set_seconds(seconds).await?;
        }
        Ok(())
    }

    /// Switches the hours register between 12- and 24-hour format.
    ///
    /// Returns [`FormatOutcome::AlreadySet`] without writing when the
    /// register is already in the requested format.
    pub async fn set_hour_mode(
        &mut self,
        mode: HourMode,
    ) -> Result<FormatOutcome, DS1307Error<I2C::Error>> {
        let hours = self.hours().await?;
        let converted = match mode {
            HourMode::TwelveHour => hour_format::to_12h(hours),
            HourMode::TwentyFourHour => hour_format::to_24h(hours),
        };
        match converted {
            Some(value) => {
                self.set_hours(value).await?;
                Ok(FormatOutcome::Updated)
            }
            None => Ok(FormatOutcome::AlreadySet),
        }
    }

    /// Reads the square-wave output selection from the control register.
    ///
    /// Fails with [`DS1307Error::InvalidControl`] when reserved control
    /// bits are set.
    pub async fn square_wave(&mut self) -> Result<SquareWave, DS1307Error<I2C::Error>> {
        let control = self.control().await?;
        SquareWave::try_from(u8::from(control)).map_err(DS1307Error::InvalidControl)
    }

    /// Writes the square-wave output selection to the control register.
    pub async fn set_square_wave(
        &mut self,
        selection: SquareWave,
    ) -> Result<(), DS1307Error<I2C::Error>> {
        self.set_control(Control(selection.into())).await
    }

    /// Reads from the battery-backed NVRAM.
    ///
    /// `offset` is relative to the start of the 56-byte NVRAM window.
    pub async fn read_ram(
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
            .write_read(self.address, &[RegAddr::Ram as u8 + offset], buffer)
            .await?;
        Ok(())
    }

    /// Writes to the battery-backed NVRAM, one byte per transaction.
    ///
    /// `offset` is relative to the start of the 56-byte NVRAM window.
    pub async fn write_ram(
        &mut self,
        offset: u8,
        data: &[u8],
    ) -> Result<(), DS1307Error<I2C::Error>> {
        if offset as usize + data.len() > RAM_SIZE {
            return Err(DS1307Error::RamOutOfRange);
        }
        for (i, byte) in data.iter().enumerate() {
            let reg = RegAddr::Ram as u8 + offset + i as u8;
            self.i2c.write(self.address, &[reg, *byte]).await?;
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
