// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Simulated board for integration tests: pins, an in-memory bus and a virtual clock.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::i2c::{self, I2c, NoAcknowledgeSource, Operation};
use embedded_hal::pwm::{self, SetDutyCycle};

use fishproxy::config::{Config, BUS_ADDRESS};
use fishproxy::drivers::{ActuatorOutput, AudioRelay};
use fishproxy::protocol::CommandProtocol;
use fishproxy::{Mechanism, Mechanisms, Puppet};

/// Sensor line from the puppet's own controller.
#[derive(Clone, Default)]
pub struct Sensor(Rc<Cell<bool>>);

impl Sensor {
    pub fn set(&self, high: bool) {
        self.0.set(high);
    }
}

impl digital::ErrorType for Sensor {
    type Error = Infallible;
}

impl InputPin for Sensor {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.get())
    }
}

#[derive(Debug, Default)]
pub struct Line {
    pub level: bool,
    pub pwm: bool,
    pub duty: u16,
}

/// Output line, plain GPIO or PWM depending on who owns it.
#[derive(Clone, Default)]
pub struct Wire(Rc<RefCell<Line>>);

impl Wire {
    pub fn level(&self) -> bool {
        self.0.borrow().level
    }

    pub fn is_pwm(&self) -> bool {
        self.0.borrow().pwm
    }

    pub fn duty(&self) -> u16 {
        self.0.borrow().duty
    }
}

impl digital::ErrorType for Wire {
    type Error = Infallible;
}

impl OutputPin for Wire {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().level = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().level = true;
        Ok(())
    }
}

pub struct WirePwm(Wire);

impl pwm::ErrorType for WirePwm {
    type Error = Infallible;
}

impl SetDutyCycle for WirePwm {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        self.0 .0.borrow_mut().duty = duty;
        Ok(())
    }
}

impl ActuatorOutput for Wire {
    type Pwm = WirePwm;

    fn into_pwm(self) -> WirePwm {
        self.0.borrow_mut().pwm = true;
        WirePwm(self)
    }

    fn from_pwm(pwm: WirePwm) -> Self {
        pwm.0 .0.borrow_mut().pwm = false;
        pwm.0
    }
}

pub type SimPuppet = Puppet<Sensor, Wire, Wire>;

/// The firmware side: puppet, protocol handler, clock and console.
pub struct Device {
    pub puppet: SimPuppet,
    pub protocol: CommandProtocol,
    pub now_ms: u32,
    pub console: String,
}

impl Device {
    pub fn write(&mut self, bytes: &[u8]) {
        self.protocol
            .on_receive(&mut self.puppet, bytes, self.now_ms, &mut self.console);
    }

    pub fn read(&mut self, register: u8) -> Option<u8> {
        self.write(&[register]);
        self.protocol.on_request(&self.puppet, &mut self.console)
    }

    pub fn edge(&mut self, mechanism: Mechanism) {
        self.puppet.on_edge(mechanism).unwrap();
    }

    /// Advance the clock and run one main-loop pass.
    pub fn advance(&mut self, ms: u32) {
        self.now_ms = self.now_ms.wrapping_add(ms);
        self.puppet.poll(self.now_ms, &mut self.console);
    }
}

pub struct Board {
    pub device: Rc<RefCell<Device>>,
    pub sensors: Mechanisms<Sensor>,
    pub outputs: Mechanisms<Wire>,
    pub relays: [Wire; 2],
}

impl Board {
    pub fn boot() -> Self {
        Self::boot_at(0)
    }

    pub fn boot_at(now_ms: u32) -> Self {
        let sensors = Mechanisms::<Sensor>::default();
        let outputs = Mechanisms::<Wire>::default();
        let relays = [Wire::default(), Wire::default()];
        let relay = AudioRelay::active_low(relays.clone()).unwrap();
        let (puppet, booted) = Puppet::new(
            sensors.clone(),
            outputs.clone(),
            relay,
            Config::default().timing,
        );
        booted.unwrap();
        let device = Device {
            puppet,
            protocol: CommandProtocol::new(),
            now_ms,
            console: String::new(),
        };
        Self {
            device: Rc::new(RefCell::new(device)),
            sensors,
            outputs,
            relays,
        }
    }

    pub fn dev(&self) -> std::cell::RefMut<'_, Device> {
        self.device.borrow_mut()
    }

    pub fn bus(&self) -> SimBus {
        SimBus {
            device: Rc::clone(&self.device),
        }
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay {
            device: Rc::clone(&self.device),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Nack;

impl i2c::Error for Nack {
    fn kind(&self) -> i2c::ErrorKind {
        i2c::ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
    }
}

/// Bus controller wired straight to the device's protocol handler.
pub struct SimBus {
    device: Rc<RefCell<Device>>,
}

impl i2c::ErrorType for SimBus {
    type Error = Nack;
}

impl I2c for SimBus {
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Nack> {
        if address != BUS_ADDRESS {
            return Err(Nack);
        }
        let mut dev = self.device.borrow_mut();
        for op in operations {
            match op {
                Operation::Write(bytes) => dev.write(bytes),
                Operation::Read(buf) => {
                    let Device {
                        puppet,
                        protocol,
                        console,
                        ..
                    } = &mut *dev;
                    for (i, b) in buf.iter_mut().enumerate() {
                        let value = if i == 0 {
                            protocol.on_request(puppet, console)
                        } else {
                            None
                        };
                        *b = value.unwrap_or(0xFF);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Delay that moves the device clock forward and lets its main loop run once.
pub struct SimDelay {
    device: Rc<RefCell<Device>>,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.device.borrow_mut().advance(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.device.borrow_mut().advance(ms);
    }
}
