// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Bus transaction handler for the FishProxy command protocol.
//!
//! This module turns raw bus transactions into puppet operations. The bus controller writes
//! `[register, value]` to issue a command, and reads a status register by writing the one-byte
//! register address followed by a one-byte read.
//!
//! Malformed or unknown transactions are dropped without any reply, and hardware errors raised
//! while applying a command are only logged.

use core::fmt::Write;

use embedded_hal::digital::{InputPin, OutputPin};

use crate::control::DriveMode;
use crate::drivers::ActuatorOutput;
use crate::protocol::messages::{Command, Query};
use crate::puppet::Puppet;

#[derive(Default)]
pub struct CommandProtocol {
    /// Register address latched by a one-byte write, consumed by the next read
    pending_read: Option<u8>,
}

impl CommandProtocol {
    pub const fn new() -> Self {
        Self { pending_read: None }
    }

    /// Register latched for the next read, if any.
    #[inline]
    pub fn pending_read(&self) -> Option<u8> {
        self.pending_read
    }

    /// Handle bytes written by the bus controller.
    ///
    /// A one-byte write only selects the register for the next read. Longer writes are
    /// commands; bytes after the first two are ignored.
    pub fn on_receive<I, O, R, W>(
        &mut self,
        puppet: &mut Puppet<I, O, R>,
        bytes: &[u8],
        now_ms: u32,
        log: &mut W,
    ) where
        I: InputPin,
        O: ActuatorOutput,
        R: OutputPin,
        W: Write,
    {
        let (register, value) = match *bytes {
            [] => return,
            [register] => {
                self.pending_read = Some(register);
                return;
            }
            [register, value, ..] => (register, value),
        };
        self.pending_read = None;

        let _ = writeln!(log, "registerAddress: {:#04X}\r", register);
        let _ = writeln!(log, "registerValue: {:#04X}\r", value);

        let Some(command) = Command::decode(register, value) else {
            return;
        };

        let applied = match command {
            Command::AssumeControl if puppet.mode() != DriveMode::ExternalControl => {
                puppet.assume_control()
            }
            Command::ReleaseControl if puppet.mode() == DriveMode::ExternalControl => {
                puppet.release_control()
            }
            Command::AssumeControl | Command::ReleaseControl => Ok(()),
            Command::Actuate(mechanism, cmd) => puppet.request(mechanism, cmd, now_ms),
        };

        if let Err(e) = applied {
            let _ = writeln!(log, "error applying {:?}: {}\r", command, e);
        }
    }

    /// Handle a read request, consuming the latched register.
    ///
    /// Returns `None` when no register was latched or it is not a status register; the bus
    /// driver decides what the controller sees in that case.
    pub fn on_request<I, O, R, W>(
        &mut self,
        puppet: &Puppet<I, O, R>,
        log: &mut W,
    ) -> Option<u8>
    where
        I: InputPin,
        O: ActuatorOutput,
        R: OutputPin,
        W: Write,
    {
        let register = self.pending_read.take()?;
        Self::read(puppet, register, log)
    }

    /// Answer a read of `register`.
    pub fn read<I, O, R, W>(puppet: &Puppet<I, O, R>, register: u8, log: &mut W) -> Option<u8>
    where
        I: InputPin,
        O: ActuatorOutput,
        R: OutputPin,
        W: Write,
    {
        let _ = write!(log, "Requesting register: {:#04X}, value: ", register);
        match Query::decode(register) {
            Some(query) => {
                let value = puppet.status(query);
                let _ = writeln!(log, "{:#04X}\r", value);
                Some(value)
            }
            None => {
                let _ = writeln!(log, "none\r");
                None
            }
        }
    }
}
