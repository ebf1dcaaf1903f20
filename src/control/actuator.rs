// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Timed state machine for one puppet mechanism.
//!
//! A mechanism is a DC motor pulling against a return spring. Raising powers the motor at full
//! duty and lowering cuts power; neither has position feedback, so each motion is considered
//! complete once a fixed settle delay has elapsed.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! head.request(ActuatorCommand::Raise, now_ms)?;
//!
//! loop {
//!     head.poll(clock.now_ms());
//! }
//! ```

use embedded_hal::pwm::SetDutyCycle;

use crate::config::MotionTiming;
use crate::error::{Error, Result};
use crate::protocol::messages::{
    MOTOR_DOWN, MOTOR_DOWN_REQUESTED, MOTOR_IDLE, MOTOR_UP, MOTOR_UP_REQUESTED,
};

/// Motion state of a mechanism.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActuatorState {
    Idle,
    UpRequested,
    Up,
    DownRequested,
    /// Transient; the next poll returns to `Idle`.
    Down,
}

impl ActuatorState {
    /// Status byte reported on the bus.
    pub fn status(self) -> u8 {
        match self {
            ActuatorState::Idle => MOTOR_IDLE,
            ActuatorState::UpRequested => MOTOR_UP_REQUESTED,
            ActuatorState::Up => MOTOR_UP,
            ActuatorState::DownRequested => MOTOR_DOWN_REQUESTED,
            ActuatorState::Down => MOTOR_DOWN,
        }
    }

    /// Decode a status byte. Unknown values yield `None`.
    pub fn from_status(byte: u8) -> Option<Self> {
        match byte {
            MOTOR_IDLE => Some(ActuatorState::Idle),
            MOTOR_UP_REQUESTED => Some(ActuatorState::UpRequested),
            MOTOR_UP => Some(ActuatorState::Up),
            MOTOR_DOWN_REQUESTED => Some(ActuatorState::DownRequested),
            MOTOR_DOWN => Some(ActuatorState::Down),
            _ => None,
        }
    }

    /// Whether the motor is powered in this state.
    #[inline]
    pub fn is_powered(self) -> bool {
        matches!(self, ActuatorState::UpRequested | ActuatorState::Up)
    }
}

/// Motion request carried by an actuator register write.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActuatorCommand {
    Raise,
    Lower,
}

impl ActuatorCommand {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            MOTOR_UP_REQUESTED => Some(ActuatorCommand::Raise),
            MOTOR_DOWN_REQUESTED => Some(ActuatorCommand::Lower),
            _ => None,
        }
    }

    pub fn byte(self) -> u8 {
        match self {
            ActuatorCommand::Raise => MOTOR_UP_REQUESTED,
            ActuatorCommand::Lower => MOTOR_DOWN_REQUESTED,
        }
    }
}

/// State machine and PWM channel for one mechanism.
///
/// The PWM channel is only present while the puppet is under external control. Without it the
/// state machine still runs; only the duty writes are skipped.
pub struct ActuatorController<P> {
    state: ActuatorState,
    /// Millisecond timestamp at which the current requested state began
    started_at: u32,
    timing: MotionTiming,
    pwm: Option<P>,
}

impl<P: SetDutyCycle> ActuatorController<P> {
    pub fn new(timing: MotionTiming) -> Self {
        Self {
            state: ActuatorState::Idle,
            started_at: 0,
            timing,
            pwm: None,
        }
    }

    #[inline]
    pub fn state(&self) -> ActuatorState {
        self.state
    }

    /// Status byte as read from the bus.
    #[inline]
    pub fn status(&self) -> u8 {
        self.state.status()
    }

    #[inline]
    pub fn started_at(&self) -> u32 {
        self.started_at
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.pwm.is_some()
    }

    /// Apply a raise or lower request.
    ///
    /// Raise is only accepted from `Idle` and lower only from `Up`. Any other request is ignored
    /// and leaves state and timestamp untouched. `Ok` does not tell the two cases apart; an
    /// error means the request was accepted but the duty write failed.
    pub fn request(&mut self, command: ActuatorCommand, now_ms: u32) -> Result<()> {
        let next = match (command, self.state) {
            (ActuatorCommand::Raise, ActuatorState::Idle) => ActuatorState::UpRequested,
            (ActuatorCommand::Lower, ActuatorState::Up) => ActuatorState::DownRequested,
            _ => return Ok(()),
        };
        self.state = next;
        self.started_at = now_ms;
        self.drive()
    }

    /// Run one poll cycle. Returns the new state if a transition happened.
    pub fn poll(&mut self, now_ms: u32) -> Option<ActuatorState> {
        let elapsed = now_ms.wrapping_sub(self.started_at);
        let next = match self.state {
            ActuatorState::Idle | ActuatorState::Up => return None,
            ActuatorState::UpRequested if elapsed >= self.timing.startup_ms => ActuatorState::Up,
            ActuatorState::DownRequested if elapsed >= self.timing.spring_ms => {
                ActuatorState::Down
            }
            ActuatorState::UpRequested | ActuatorState::DownRequested => return None,
            ActuatorState::Down => ActuatorState::Idle,
        };
        self.state = next;
        Some(next)
    }

    /// Take over a PWM channel and drive it to match the current state.
    pub fn attach(&mut self, pwm: P) -> Result<()> {
        self.pwm = Some(pwm);
        self.drive()
    }

    /// Give the PWM channel back, parked at zero duty.
    ///
    /// The channel is returned even if the duty write fails, together with the error.
    pub fn detach(&mut self) -> Option<(P, Result<()>)> {
        let mut pwm = self.pwm.take()?;
        let parked = pwm.set_duty_cycle_fully_off().map_err(Error::pwm);
        Some((pwm, parked))
    }

    /// Full duty while powered, zero otherwise.
    fn drive(&mut self) -> Result<()> {
        let Some(pwm) = self.pwm.as_mut() else {
            return Ok(());
        };
        if self.state.is_powered() {
            pwm.set_duty_cycle_fully_on().map_err(Error::pwm)
        } else {
            pwm.set_duty_cycle_fully_off().map_err(Error::pwm)
        }
    }
}
