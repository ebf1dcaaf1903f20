// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host-side driver for the FishProxy.
//!
//! Runs on the bus controller (e.g. a single-board computer) and drives the puppet through the
//! same register protocol the firmware serves. Every motion call blocks until the firmware
//! reports the motion complete, polling the status register at a fixed interval.
//!
//! ```ignore
//! let mut fish = PuppetClient::new(i2c, delay, BUS_ADDRESS, ClientConfig::default());
//! fish.flush_bus()?;
//! fish.assume_control()?;
//! fish.mouth_open()?;
//! fish.mouth_close()?;
//! fish.leave_control()?;
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::config::ClientConfig;
use crate::control::{ActuatorCommand, ActuatorState, DriveMode};
use crate::mechanism::Mechanism;
use crate::protocol::messages::{CONTROL_IDLE, CONTROL_UNDER_CONTROL};
use crate::protocol::{Command, Query};

/// Delay between the status reads issued by [`PuppetClient::flush_bus`].
const FLUSH_PAUSE_MS: u32 = 200;

#[derive(Debug, thiserror::Error)]
pub enum ClientError<E> {
    #[error("bus error: {0:?}")]
    Bus(E),
    #[error("unknown status byte {0:#04X}")]
    UnknownStatus(u8),
    #[error("timed out waiting for register {register:#04X}")]
    Timeout { register: u8 },
}

pub struct PuppetClient<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    config: ClientConfig,
}

impl<I2C: I2c, D: DelayNs> PuppetClient<I2C, D> {
    pub fn new(i2c: I2C, delay: D, address: u8, config: ClientConfig) -> Self {
        Self {
            i2c,
            delay,
            address,
            config,
        }
    }

    pub fn free(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Issue one command write.
    pub fn send(&mut self, command: Command) -> Result<(), ClientError<I2C::Error>> {
        self.i2c
            .write(self.address, &command.encode())
            .map_err(ClientError::Bus)
    }

    /// Read one status register.
    pub fn read(&mut self, query: Query) -> Result<u8, ClientError<I2C::Error>> {
        let mut buf = [0u8];
        self.i2c
            .write_read(self.address, &[query.register()], &mut buf)
            .map_err(ClientError::Bus)?;
        Ok(buf[0])
    }

    pub fn mode(&mut self) -> Result<DriveMode, ClientError<I2C::Error>> {
        match self.read(Query::ControlStatus)? {
            CONTROL_IDLE => Ok(DriveMode::Local),
            CONTROL_UNDER_CONTROL => Ok(DriveMode::ExternalControl),
            other => Err(ClientError::UnknownStatus(other)),
        }
    }

    pub fn actuator_state(
        &mut self,
        mechanism: Mechanism,
    ) -> Result<ActuatorState, ClientError<I2C::Error>> {
        let byte = self.read(Query::ActuatorStatus(mechanism))?;
        ActuatorState::from_status(byte).ok_or(ClientError::UnknownStatus(byte))
    }

    /// Read every status register once, pausing between reads.
    ///
    /// Some bus adapters return stale bytes for the first reads after the device boots.
    pub fn flush_bus(&mut self) -> Result<(), ClientError<I2C::Error>> {
        let queries = [
            Query::ControlStatus,
            Query::ActuatorStatus(Mechanism::Mouth),
            Query::ActuatorStatus(Mechanism::Tail),
            Query::ActuatorStatus(Mechanism::Head),
        ];
        for query in queries {
            self.read(query)?;
            self.delay.delay_ms(FLUSH_PAUSE_MS);
        }
        Ok(())
    }

    pub fn assume_control(&mut self) -> Result<(), ClientError<I2C::Error>> {
        self.send(Command::AssumeControl)?;
        self.wait_for_mode(DriveMode::ExternalControl)
    }

    pub fn leave_control(&mut self) -> Result<(), ClientError<I2C::Error>> {
        self.send(Command::ReleaseControl)?;
        self.wait_for_mode(DriveMode::Local)
    }

    /// Raise a mechanism and wait until it reports `Up`.
    pub fn raise(&mut self, mechanism: Mechanism) -> Result<(), ClientError<I2C::Error>> {
        self.send(Command::Actuate(mechanism, ActuatorCommand::Raise))?;
        self.wait_for_actuator(mechanism, ActuatorState::Up)
    }

    /// Lower a mechanism and wait until it is back to `Idle`.
    pub fn lower(&mut self, mechanism: Mechanism) -> Result<(), ClientError<I2C::Error>> {
        self.send(Command::Actuate(mechanism, ActuatorCommand::Lower))?;
        self.wait_for_actuator(mechanism, ActuatorState::Idle)
    }

    #[inline]
    pub fn head_up(&mut self) -> Result<(), ClientError<I2C::Error>> {
        self.raise(Mechanism::Head)
    }

    #[inline]
    pub fn head_down(&mut self) -> Result<(), ClientError<I2C::Error>> {
        self.lower(Mechanism::Head)
    }

    #[inline]
    pub fn tail_up(&mut self) -> Result<(), ClientError<I2C::Error>> {
        self.raise(Mechanism::Tail)
    }

    #[inline]
    pub fn tail_down(&mut self) -> Result<(), ClientError<I2C::Error>> {
        self.lower(Mechanism::Tail)
    }

    #[inline]
    pub fn mouth_open(&mut self) -> Result<(), ClientError<I2C::Error>> {
        self.raise(Mechanism::Mouth)
    }

    #[inline]
    pub fn mouth_close(&mut self) -> Result<(), ClientError<I2C::Error>> {
        self.lower(Mechanism::Mouth)
    }

    fn wait_for_mode(&mut self, want: DriveMode) -> Result<(), ClientError<I2C::Error>> {
        for _ in 0..self.config.max_polls {
            if self.mode()? == want {
                return Ok(());
            }
            self.delay.delay_ms(self.config.poll_interval_ms);
        }
        Err(ClientError::Timeout {
            register: Query::ControlStatus.register(),
        })
    }

    fn wait_for_actuator(
        &mut self,
        mechanism: Mechanism,
        want: ActuatorState,
    ) -> Result<(), ClientError<I2C::Error>> {
        for _ in 0..self.config.max_polls {
            if self.actuator_state(mechanism)? == want {
                return Ok(());
            }
            self.delay.delay_ms(self.config.poll_interval_ms);
        }
        Err(ClientError::Timeout {
            register: Query::ActuatorStatus(mechanism).register(),
        })
    }
}
