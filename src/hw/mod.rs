// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Board Support
//!
//! MCU-level wrappers for the STM32F777 that expose the `embedded-hal` 1.0 pin and PWM traits the
//! puppet logic is written against.
//!
//! ## Modules
//!
//! - [`clock`] - SysTick millisecond clock.
//! - [`exti`] - Both-edge interrupts on the sensor inputs.
//! - [`gpio`] - Sensor, relay and actuator lines.
//! - [`i2c_target`] - I2C1 in target mode.
//! - [`pins`] - Board pin map.
//! - [`pwm`] - TIM4 PWM channels for the actuators.
//! - [`usart`] - Diagnostic console.

pub mod clock;
pub mod exti;
pub mod gpio;
pub mod i2c_target;
pub mod pins;
pub mod pwm;
pub mod usart;

pub use gpio::{ActuatorLine, RelayLine, SensorLine};
pub use i2c_target::{I2cTarget, TargetEvent};
pub use pins::BoardPins;
pub use pwm::PwmChannel;
pub use usart::Usart;
