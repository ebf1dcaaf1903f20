// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Drive-mode arbitration between the puppet's own switches and an external host.
//!
//! Switching hands the three actuator output lines from one owner to the other. Taking control
//! detaches every line from the passthrough bridge before any of them is converted to PWM, so a
//! line is never driven by both at once.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::control::ActuatorController;
use crate::drivers::{ActuatorOutput, AudioRelay, PassthroughBridge};
use crate::error::{keep_first, Result};
use crate::mechanism::Mechanisms;
use crate::protocol::messages::{CONTROL_IDLE, CONTROL_UNDER_CONTROL};

/// Who owns the actuator outputs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum DriveMode {
    /// Sensor switches drive the motors through the passthrough bridge.
    #[default]
    Local,
    /// The host drives the motors through the actuator state machines.
    ExternalControl,
}

impl DriveMode {
    /// Status byte reported on the control-status register.
    pub fn status(self) -> u8 {
        match self {
            DriveMode::Local => CONTROL_IDLE,
            DriveMode::ExternalControl => CONTROL_UNDER_CONTROL,
        }
    }
}

/// Owner of the drive mode and the audio relay.
pub struct ControlArbiter<R> {
    mode: DriveMode,
    relay: AudioRelay<R>,
}

impl<R: OutputPin> ControlArbiter<R> {
    /// Start in [`DriveMode::Local`]. The relay is expected to be on its local route.
    pub fn new(relay: AudioRelay<R>) -> Self {
        Self {
            mode: DriveMode::Local,
            relay,
        }
    }

    #[inline]
    pub fn mode(&self) -> DriveMode {
        self.mode
    }

    #[inline]
    pub fn relay(&self) -> &AudioRelay<R> {
        &self.relay
    }

    /// Hand the outputs to the actuator controllers and route external audio.
    ///
    /// No-op if already under external control. Every step runs even if one fails, and the
    /// first failure is returned.
    pub fn assume_control<I, O>(
        &mut self,
        bridge: &mut PassthroughBridge<I, O>,
        actuators: &mut Mechanisms<ActuatorController<O::Pwm>>,
    ) -> Result<()>
    where
        I: InputPin,
        O: ActuatorOutput,
    {
        if self.mode == DriveMode::ExternalControl {
            return Ok(());
        }

        // Detach every line before attaching any PWM.
        let mut released = bridge.detach_all();

        let mut first = Ok(());
        actuators.for_each_mut(|mech, actuator| {
            if let Some(output) = released.get_mut(mech).take() {
                keep_first(&mut first, actuator.attach(output.into_pwm()));
            }
        });
        keep_first(&mut first, self.relay.route_external());

        self.mode = DriveMode::ExternalControl;
        first
    }

    /// Return the outputs to the passthrough bridge and route local audio.
    ///
    /// No-op unless under external control.
    pub fn release_control<I, O>(
        &mut self,
        bridge: &mut PassthroughBridge<I, O>,
        actuators: &mut Mechanisms<ActuatorController<O::Pwm>>,
    ) -> Result<()>
    where
        I: InputPin,
        O: ActuatorOutput,
    {
        if self.mode != DriveMode::ExternalControl {
            return Ok(());
        }

        let mut first = self.relay.route_local();

        actuators.for_each_mut(|mech, actuator| {
            if let Some((pwm, parked)) = actuator.detach() {
                keep_first(&mut first, parked);
                keep_first(&mut first, bridge.attach(mech, O::from_pwm(pwm)));
            }
        });

        self.mode = DriveMode::Local;
        first
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MotionTiming;
    use crate::control::{ActuatorCommand, ActuatorState};
    use crate::mechanism::Mechanism;
    use crate::mock::{MockInput, MockOutput, MockPwm};

    struct Rig {
        arbiter: ControlArbiter<MockOutput>,
        bridge: PassthroughBridge<MockInput, MockOutput>,
        actuators: Mechanisms<ActuatorController<MockPwm>>,
        inputs: Mechanisms<MockInput>,
        outputs: Mechanisms<MockOutput>,
        relay: [MockOutput; 2],
    }

    fn rig() -> Rig {
        let inputs = Mechanisms::new(MockInput::new(), MockInput::new(), MockInput::new());
        let outputs = Mechanisms::new(MockOutput::new(), MockOutput::new(), MockOutput::new());
        let relay = [MockOutput::new(), MockOutput::new()];

        let mut bridge = PassthroughBridge::new(inputs.clone());
        bridge.attach_all(outputs.clone()).unwrap();
        let timing = MotionTiming::new(100, 100);

        Rig {
            arbiter: ControlArbiter::new(AudioRelay::active_low(relay.clone()).unwrap()),
            bridge,
            actuators: Mechanisms::new(
                ActuatorController::new(timing),
                ActuatorController::new(timing),
                ActuatorController::new(timing),
            ),
            inputs,
            outputs,
            relay,
        }
    }

    impl Rig {
        fn assume(&mut self) -> Result<()> {
            self.arbiter
                .assume_control(&mut self.bridge, &mut self.actuators)
        }

        fn release(&mut self) -> Result<()> {
            self.arbiter
                .release_control(&mut self.bridge, &mut self.actuators)
        }
    }

    #[test]
    fn boots_local() {
        let r = rig();
        assert_eq!(r.arbiter.mode(), DriveMode::Local);
        assert_eq!(r.arbiter.mode().status(), CONTROL_IDLE);
        assert!(!r.arbiter.relay().is_external());
        for mech in Mechanism::ALL {
            assert!(r.bridge.is_attached(mech));
            assert!(!r.actuators.get(mech).is_attached());
        }
    }

    #[test]
    fn assume_moves_every_line_to_pwm_and_switches_audio() {
        let mut r = rig();
        r.assume().unwrap();

        assert_eq!(r.arbiter.mode(), DriveMode::ExternalControl);
        assert_eq!(r.arbiter.mode().status(), CONTROL_UNDER_CONTROL);
        assert!(r.arbiter.relay().is_external());
        assert!(!r.relay[0].level() && !r.relay[1].level());
        for mech in Mechanism::ALL {
            assert!(!r.bridge.is_attached(mech));
            assert!(r.actuators.get(mech).is_attached());
            assert!(r.outputs.get(mech).is_pwm());
            assert_eq!(r.outputs.get(mech).duty(), 0);
        }
    }

    #[test]
    fn assume_twice_hands_over_once() {
        let mut r = rig();
        r.assume().unwrap();
        r.assume().unwrap();
        for mech in Mechanism::ALL {
            let s = r.outputs.get(mech).state();
            assert_eq!(s.pwm_attaches, 1);
            assert_eq!(s.pwm_detaches, 0);
        }
    }

    #[test]
    fn release_while_local_is_a_no_op() {
        let mut r = rig();
        let writes = r.outputs.head.state().level_writes;
        r.release().unwrap();
        assert_eq!(r.arbiter.mode(), DriveMode::Local);
        assert_eq!(r.outputs.head.state().level_writes, writes);
        assert_eq!(r.outputs.head.state().pwm_detaches, 0);
    }

    #[test]
    fn release_restores_passthrough() {
        let mut r = rig();
        r.assume().unwrap();

        // Edges while under control do nothing.
        r.inputs.mouth.set(true);
        r.bridge.on_edge(Mechanism::Mouth).unwrap();
        assert!(!r.outputs.mouth.level());

        r.release().unwrap();
        assert_eq!(r.arbiter.mode(), DriveMode::Local);
        assert!(!r.arbiter.relay().is_external());
        assert!(r.relay[0].level() && r.relay[1].level());
        for mech in Mechanism::ALL {
            assert!(r.bridge.is_attached(mech));
            assert!(!r.actuators.get(mech).is_attached());
            assert!(!r.outputs.get(mech).is_pwm());
        }
        // Re-attaching picked up the switch that moved while under control.
        assert!(r.outputs.mouth.level());

        r.inputs.mouth.set(false);
        r.bridge.on_edge(Mechanism::Mouth).unwrap();
        assert!(!r.outputs.mouth.level());
    }

    #[test]
    fn assume_drives_lines_to_match_state_accepted_while_local() {
        let mut r = rig();
        r.actuators
            .head
            .request(ActuatorCommand::Raise, 0)
            .unwrap();
        assert_eq!(r.actuators.head.state(), ActuatorState::UpRequested);

        r.assume().unwrap();
        assert_eq!(r.outputs.head.duty(), 255);
        assert_eq!(r.outputs.tail.duty(), 0);
    }

    #[test]
    fn release_parks_channels_at_zero_duty() {
        let mut r = rig();
        r.assume().unwrap();
        r.actuators
            .head
            .request(ActuatorCommand::Raise, 0)
            .unwrap();
        r.actuators.head.poll(600);
        assert_eq!(r.outputs.head.duty(), 255);

        r.release().unwrap();
        assert_eq!(r.outputs.head.duty(), 0);

        // Lowered while local, then handed back: the line never sees the old full duty.
        r.actuators
            .head
            .request(ActuatorCommand::Lower, 700)
            .unwrap();
        r.assume().unwrap();
        assert_eq!(r.outputs.head.duty(), 0);
        assert_eq!(r.actuators.head.state(), ActuatorState::DownRequested);
    }

    #[test]
    fn relay_failure_still_completes_the_switch() {
        let mut r = rig();
        r.relay[1].set_failing(true);
        assert!(r.assume().is_err());
        assert_eq!(r.arbiter.mode(), DriveMode::ExternalControl);
        for mech in Mechanism::ALL {
            assert!(r.actuators.get(mech).is_attached());
        }
    }
}
