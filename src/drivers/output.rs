// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Actuator output lines that switch between GPIO mirroring and PWM drive.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

/// An actuator output pin that can be handed over to a PWM channel and back.
///
/// The pin value is consumed by the conversion, so a line is driven either as plain GPIO or
/// as PWM, never both.
pub trait ActuatorOutput: OutputPin + Sized {
    type Pwm: SetDutyCycle;

    /// Route the line to its PWM channel.
    fn into_pwm(self) -> Self::Pwm;

    /// Return the line to push-pull GPIO output.
    fn from_pwm(pwm: Self::Pwm) -> Self;
}
