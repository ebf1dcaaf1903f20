// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! The puppet: every piece of mutable firmware state in one record.
//!
//! The edge interrupt, the bus callback and the main poll loop all reach the state through a
//! single `Puppet`. On the board it is kept in a `critical_section::Mutex<RefCell<_>>`, so each
//! context sees whole updates of a controller (state, timestamp and PWM duty together).

use core::cell::RefCell;
use core::fmt::Write;

use critical_section::Mutex;

use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::MotionTiming;
use crate::control::{ActuatorCommand, ActuatorController, ControlArbiter, DriveMode};
use crate::drivers::{ActuatorOutput, AudioRelay, PassthroughBridge};
use crate::error::Result;
use crate::mechanism::{Mechanism, Mechanisms};
use crate::protocol::Query;

/// Interrupt-shared slot for state created after `main` starts.
pub type Shared<T> = Mutex<RefCell<Option<T>>>;

/// Run `f` on the shared value inside a critical section. Returns `None` until the slot is
/// filled.
pub fn with_shared<T, F, U>(slot: &Shared<T>, f: F) -> Option<U>
where
    F: FnOnce(&mut T) -> U,
{
    critical_section::with(|cs| slot.borrow_ref_mut(cs).as_mut().map(f))
}

pub struct Puppet<I, O: ActuatorOutput, R> {
    bridge: PassthroughBridge<I, O>,
    arbiter: ControlArbiter<R>,
    actuators: Mechanisms<ActuatorController<O::Pwm>>,
}

impl<I, O, R> Puppet<I, O, R>
where
    I: InputPin,
    O: ActuatorOutput,
    R: OutputPin,
{
    /// Boot state: passthrough attached on all three mechanisms, local audio, all actuators
    /// `Idle`.
    ///
    /// The puppet is returned even if a pin write fails during boot, together with the error.
    pub fn new(
        inputs: Mechanisms<I>,
        outputs: Mechanisms<O>,
        relay: AudioRelay<R>,
        timing: Mechanisms<MotionTiming>,
    ) -> (Self, Result<()>) {
        let mut bridge = PassthroughBridge::new(inputs);
        let attached = bridge.attach_all(outputs);
        let puppet = Self {
            bridge,
            arbiter: ControlArbiter::new(relay),
            actuators: timing.map(|_, t| ActuatorController::new(t)),
        };
        (puppet, attached)
    }

    #[inline]
    pub fn mode(&self) -> DriveMode {
        self.arbiter.mode()
    }

    #[inline]
    pub fn bridge(&self) -> &PassthroughBridge<I, O> {
        &self.bridge
    }

    #[inline]
    pub fn actuator(&self, mechanism: Mechanism) -> &ActuatorController<O::Pwm> {
        self.actuators.get(mechanism)
    }

    pub fn assume_control(&mut self) -> Result<()> {
        self.arbiter
            .assume_control(&mut self.bridge, &mut self.actuators)
    }

    pub fn release_control(&mut self) -> Result<()> {
        self.arbiter
            .release_control(&mut self.bridge, &mut self.actuators)
    }

    /// Forward a raise/lower request to one mechanism.
    pub fn request(
        &mut self,
        mechanism: Mechanism,
        command: ActuatorCommand,
        now_ms: u32,
    ) -> Result<()> {
        self.actuators
            .get_mut(mechanism)
            .request(command, now_ms)
    }

    /// Sensor edge on `mechanism`. Touches the passthrough bridge only.
    #[inline]
    pub fn on_edge(&mut self, mechanism: Mechanism) -> Result<()> {
        self.bridge.on_edge(mechanism)
    }

    /// One pass of the main loop: advance all three state machines, logging each transition.
    pub fn poll<W: Write>(&mut self, now_ms: u32, log: &mut W) {
        self.actuators.for_each_mut(|mech, actuator| {
            if let Some(state) = actuator.poll(now_ms) {
                let _ = writeln!(log, "{}: {:?}\r", mech.name(), state);
            }
        });
    }

    /// Status byte answering a read request.
    pub fn status(&self, query: Query) -> u8 {
        match query {
            Query::ControlStatus => self.mode().status(),
            Query::ActuatorStatus(mechanism) => self.actuator(mechanism).status(),
        }
    }
}
