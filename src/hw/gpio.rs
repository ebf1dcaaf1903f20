// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! GPIO lines implementing the `embedded-hal` 1.0 digital traits.
//!
//! Pins are put in their initial mode by [`crate::hw::pins::BoardPins`] through the HAL, then
//! handed to the puppet as these register-level lines. Each line owns exactly one pin bit, so
//! the BSRR writes and MODER updates below never touch another line's pin.
//!
//! | Line | Port | Use |
//! | ---- | ---- | --- |
//! | [`SensorLine`] | GPIOC | Motor signal from the fish's own controller |
//! | [`RelayLine`] | GPIOD | Audio relay coil |
//! | [`ActuatorLine`] | GPIOD | Motor output, GPIO or TIM4 PWM |

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;
use stm32f7xx_hal::pac;

use crate::drivers::ActuatorOutput;
use crate::hw::pwm::PwmChannel;

const MODE_OUTPUT: u32 = 0b01;
const MODE_ALTERNATE: u32 = 0b10;

fn write_level_d(pin: u8, high: bool) {
    let bit = if high { 1 << pin } else { 1 << (pin + 16) };
    // SAFETY: BSRR writes are atomic and only affect the bits set.
    unsafe { (*pac::GPIOD::ptr()).bsrr.write(|w| w.bits(bit)) };
}

fn set_mode_d(pin: u8, mode: u32) {
    let shift = 2 * u32::from(pin);
    critical_section::with(|_| {
        // SAFETY: read-modify-write inside a critical section; only this pin's field changes.
        unsafe {
            (*pac::GPIOD::ptr())
                .moder
                .modify(|r, w| w.bits((r.bits() & !(0b11 << shift)) | (mode << shift)))
        };
    });
}

/// Input line on GPIOC.
pub struct SensorLine {
    pin: u8,
}

impl SensorLine {
    pub(crate) fn new(pin: u8) -> Self {
        Self { pin }
    }
}

impl ErrorType for SensorLine {
    type Error = Infallible;
}

impl InputPin for SensorLine {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        // SAFETY: read-only access to IDR.
        let idr = unsafe { (*pac::GPIOC::ptr()).idr.read().bits() };
        Ok(idr & (1 << self.pin) != 0)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

/// Push-pull output line on GPIOD.
pub struct RelayLine {
    pin: u8,
}

impl RelayLine {
    pub(crate) fn new(pin: u8) -> Self {
        Self { pin }
    }
}

impl ErrorType for RelayLine {
    type Error = Infallible;
}

impl OutputPin for RelayLine {
    fn set_low(&mut self) -> Result<(), Infallible> {
        write_level_d(self.pin, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        write_level_d(self.pin, true);
        Ok(())
    }
}

/// Motor output on PD12..PD14, muxed between GPIO and TIM4 CH1..CH3.
///
/// The alternate function number is programmed once at boot; switching only rewrites MODER.
pub struct ActuatorLine {
    pin: u8,
}

impl ActuatorLine {
    /// Take over `pin` (12, 13 or 14) as a GPIO output.
    pub(crate) fn new(pin: u8) -> Self {
        set_mode_d(pin, MODE_OUTPUT);
        Self { pin }
    }

    /// TIM4 channel routed to this pin.
    #[inline]
    fn channel(&self) -> u8 {
        self.pin - 11
    }
}

impl ErrorType for ActuatorLine {
    type Error = Infallible;
}

impl OutputPin for ActuatorLine {
    fn set_low(&mut self) -> Result<(), Infallible> {
        write_level_d(self.pin, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        write_level_d(self.pin, true);
        Ok(())
    }
}

impl ActuatorOutput for ActuatorLine {
    type Pwm = PwmChannel;

    fn into_pwm(self) -> PwmChannel {
        let mut channel = PwmChannel::new(self.channel());
        // CCR may still hold a duty from an earlier session; clear it before the pin follows TIM4.
        let _ = channel.set_duty_cycle_fully_off();
        set_mode_d(self.pin, MODE_ALTERNATE);
        channel
    }

    fn from_pwm(pwm: PwmChannel) -> Self {
        ActuatorLine::new(pwm.channel() + 11)
    }
}
