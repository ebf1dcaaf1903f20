// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin and PWM doubles for host tests.
//!
//! Each double shares an `Rc` handle with the test so it can be observed after being moved into
//! the code under test.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::digital::{self, ErrorType, InputPin, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};

use crate::drivers::ActuatorOutput;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MockError;

impl digital::Error for MockError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

impl pwm::Error for MockError {
    fn kind(&self) -> pwm::ErrorKind {
        pwm::ErrorKind::Other
    }
}

/// Sensor input whose level the test sets.
#[derive(Clone, Default)]
pub struct MockInput {
    level: Rc<Cell<bool>>,
}

impl MockInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, high: bool) {
        self.level.set(high);
    }
}

impl ErrorType for MockInput {
    type Error = MockError;
}

impl InputPin for MockInput {
    fn is_high(&mut self) -> Result<bool, MockError> {
        Ok(self.level.get())
    }

    fn is_low(&mut self) -> Result<bool, MockError> {
        Ok(!self.level.get())
    }
}

/// Everything observable about one output line.
#[derive(Debug, Default)]
pub struct OutputState {
    pub level: bool,
    pub level_writes: usize,
    pub pwm_attached: bool,
    pub pwm_attaches: usize,
    pub pwm_detaches: usize,
    pub duty: u16,
    pub duty_writes: usize,
    pub fail: bool,
}

/// Output line that can be handed over to PWM drive.
#[derive(Clone, Default)]
pub struct MockOutput {
    state: Rc<RefCell<OutputState>>,
}

impl MockOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> std::cell::Ref<'_, OutputState> {
        self.state.borrow()
    }

    pub fn level(&self) -> bool {
        self.state.borrow().level
    }

    pub fn duty(&self) -> u16 {
        self.state.borrow().duty
    }

    pub fn is_pwm(&self) -> bool {
        self.state.borrow().pwm_attached
    }

    /// Make every subsequent write fail.
    pub fn set_failing(&self, fail: bool) {
        self.state.borrow_mut().fail = fail;
    }
}

impl ErrorType for MockOutput {
    type Error = MockError;
}

impl OutputPin for MockOutput {
    fn set_low(&mut self) -> Result<(), MockError> {
        let mut s = self.state.borrow_mut();
        if s.fail {
            return Err(MockError);
        }
        s.level = false;
        s.level_writes += 1;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), MockError> {
        let mut s = self.state.borrow_mut();
        if s.fail {
            return Err(MockError);
        }
        s.level = true;
        s.level_writes += 1;
        Ok(())
    }
}

impl ActuatorOutput for MockOutput {
    type Pwm = MockPwm;

    fn into_pwm(self) -> MockPwm {
        {
            let mut s = self.state.borrow_mut();
            s.pwm_attached = true;
            s.pwm_attaches += 1;
        }
        MockPwm { state: self.state }
    }

    fn from_pwm(pwm: MockPwm) -> Self {
        {
            let mut s = pwm.state.borrow_mut();
            s.pwm_attached = false;
            s.pwm_detaches += 1;
        }
        MockOutput { state: pwm.state }
    }
}

/// 8-bit PWM channel sharing its line with a [`MockOutput`].
pub struct MockPwm {
    state: Rc<RefCell<OutputState>>,
}

impl MockPwm {
    /// A free-standing channel, for tests that never hand it back to GPIO.
    pub fn standalone() -> (Self, MockOutput) {
        let out = MockOutput::new();
        out.state.borrow_mut().pwm_attached = true;
        (
            MockPwm {
                state: out.state.clone(),
            },
            out,
        )
    }
}

impl pwm::ErrorType for MockPwm {
    type Error = MockError;
}

impl SetDutyCycle for MockPwm {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), MockError> {
        let mut s = self.state.borrow_mut();
        if s.fail {
            return Err(MockError);
        }
        s.duty = duty;
        s.duty_writes += 1;
        Ok(())
    }
}
