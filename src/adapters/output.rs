//! GPIO output adapter: bridges an `embedded-hal` output pin to
//! [`OutputPort`].
//!
//! Owns exactly one pin.  On the device this wraps an
//! `esp_idf_hal::gpio::PinDriver`; in tests any `OutputPin` works.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{OutputLevel, OutputPort};
use crate::error::ActuatorError;

pub struct PinOutput<P> {
    pin: P,
    gpio: i32,
}

impl<P: OutputPin> PinOutput<P> {
    /// `gpio` is the number callers address this pin by.
    pub fn new(pin: P, gpio: i32) -> Self {
        Self { pin, gpio }
    }
}

impl<P: OutputPin> OutputPort for PinOutput<P> {
    fn set_level(&mut self, pin: i32, level: OutputLevel) -> Result<(), ActuatorError> {
        if pin != self.gpio {
            return Err(ActuatorError::UnknownPin(pin));
        }
        let res = match level {
            OutputLevel::On => self.pin.set_high(),
            OutputLevel::Off => self.pin.set_low(),
        };
        res.map_err(|_| ActuatorError::GpioWriteFailed)
    }
}
