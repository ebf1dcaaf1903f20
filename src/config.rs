// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Board configuration constants.
//!
//! Motion timings were measured on the stock puppet and are not calibrated at runtime.

use crate::mechanism::Mechanisms;

/// 7-bit I²C address the firmware answers on.
pub const BUS_ADDRESS: u8 = 0x08;

/// PWM carrier frequency for the actuator outputs.
pub const PWM_FREQUENCY_HZ: u32 = 5_000;

/// PWM resolution. Full duty is `2^bits - 1`.
pub const PWM_RESOLUTION_BITS: u8 = 8;

/// Diagnostic console baud rate.
pub const CONSOLE_BAUD: u32 = 115_200;

/// Milliseconds an actuator must hold a requested state before the motion counts as complete.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MotionTiming {
    /// Time for the motor to reach its end stop after being powered.
    pub startup_ms: u32,
    /// Time for the return spring to bring the mechanism back once power is cut.
    pub spring_ms: u32,
}

impl MotionTiming {
    pub const fn new(startup_ms: u32, spring_ms: u32) -> Self {
        Self {
            startup_ms,
            spring_ms,
        }
    }
}

pub const HEAD_TIMING: MotionTiming = MotionTiming::new(600, 1500);
pub const TAIL_TIMING: MotionTiming = MotionTiming::new(250, 125);
pub const MOUTH_TIMING: MotionTiming = MotionTiming::new(250, 200);

/// Host-side polling behaviour for [`crate::client::PuppetClient`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Delay between status reads while waiting for a state.
    pub poll_interval_ms: u32,
    /// Number of status reads before a wait gives up.
    pub max_polls: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            max_polls: 100,
        }
    }
}

/// Complete firmware configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub bus_address: u8,
    pub timing: Mechanisms<MotionTiming>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bus_address: BUS_ADDRESS,
            timing: Mechanisms::new(HEAD_TIMING, TAIL_TIMING, MOUTH_TIMING),
        }
    }
}
