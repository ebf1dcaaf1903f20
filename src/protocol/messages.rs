// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Register map of the FishProxy command bus.

use crate::control::ActuatorCommand;
use crate::mechanism::Mechanism;

// Write registers
pub const REG_MOUTH: u8 = 0x01;
pub const REG_CONTROL: u8 = 0x02;
pub const REG_TAIL: u8 = 0x03;
pub const REG_HEAD: u8 = 0x04;

// Read registers
pub const REG_MOUTH_STATUS: u8 = 0x50;
pub const REG_CONTROL_STATUS: u8 = 0x51;
pub const REG_TAIL_STATUS: u8 = 0x52;
pub const REG_HEAD_STATUS: u8 = 0x53;

// Actuator register values
pub const MOTOR_IDLE: u8 = 0x00;
pub const MOTOR_UP_REQUESTED: u8 = 0x01;
pub const MOTOR_UP: u8 = 0x02;
pub const MOTOR_DOWN_REQUESTED: u8 = 0x03;
pub const MOTOR_DOWN: u8 = 0x04;

// Control register values
pub const CONTROL_IDLE: u8 = 0x10;
pub const CONTROL_REQUESTED: u8 = 0x11;
pub const CONTROL_UNDER_CONTROL: u8 = 0x12;
pub const CONTROL_LEAVE: u8 = 0x13;

/// Write register addressing a mechanism.
pub fn actuator_register(mechanism: Mechanism) -> u8 {
    match mechanism {
        Mechanism::Head => REG_HEAD,
        Mechanism::Tail => REG_TAIL,
        Mechanism::Mouth => REG_MOUTH,
    }
}

/// Read register reporting a mechanism's status.
pub fn status_register(mechanism: Mechanism) -> u8 {
    match mechanism {
        Mechanism::Head => REG_HEAD_STATUS,
        Mechanism::Tail => REG_TAIL_STATUS,
        Mechanism::Mouth => REG_MOUTH_STATUS,
    }
}

/// A decoded write transaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    AssumeControl,
    ReleaseControl,
    Actuate(Mechanism, ActuatorCommand),
}

impl Command {
    /// Decode a register/value pair. Unknown registers or values yield `None`.
    pub fn decode(register: u8, value: u8) -> Option<Self> {
        let mechanism = match register {
            REG_CONTROL => {
                return match value {
                    CONTROL_REQUESTED => Some(Command::AssumeControl),
                    CONTROL_LEAVE => Some(Command::ReleaseControl),
                    _ => None,
                };
            }
            REG_HEAD => Mechanism::Head,
            REG_TAIL => Mechanism::Tail,
            REG_MOUTH => Mechanism::Mouth,
            _ => return None,
        };
        ActuatorCommand::from_byte(value).map(|cmd| Command::Actuate(mechanism, cmd))
    }

    /// Encode as the `[register, value]` pair a bus controller writes.
    pub fn encode(self) -> [u8; 2] {
        match self {
            Command::AssumeControl => [REG_CONTROL, CONTROL_REQUESTED],
            Command::ReleaseControl => [REG_CONTROL, CONTROL_LEAVE],
            Command::Actuate(mechanism, cmd) => [actuator_register(mechanism), cmd.byte()],
        }
    }
}

/// A decoded read request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Query {
    ControlStatus,
    ActuatorStatus(Mechanism),
}

impl Query {
    pub fn decode(register: u8) -> Option<Self> {
        match register {
            REG_CONTROL_STATUS => Some(Query::ControlStatus),
            REG_HEAD_STATUS => Some(Query::ActuatorStatus(Mechanism::Head)),
            REG_TAIL_STATUS => Some(Query::ActuatorStatus(Mechanism::Tail)),
            REG_MOUTH_STATUS => Some(Query::ActuatorStatus(Mechanism::Mouth)),
            _ => None,
        }
    }

    pub fn register(self) -> u8 {
        match self {
            Query::ControlStatus => REG_CONTROL_STATUS,
            Query::ActuatorStatus(mechanism) => status_register(mechanism),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_control_values() {
        assert_eq!(
            Command::decode(REG_CONTROL, CONTROL_REQUESTED),
            Some(Command::AssumeControl)
        );
        assert_eq!(
            Command::decode(REG_CONTROL, CONTROL_LEAVE),
            Some(Command::ReleaseControl)
        );
        // Status values are not commands.
        assert_eq!(Command::decode(REG_CONTROL, CONTROL_UNDER_CONTROL), None);
        assert_eq!(Command::decode(REG_CONTROL, CONTROL_IDLE), None);
    }

    #[test]
    fn decodes_actuator_registers() {
        assert_eq!(
            Command::decode(REG_HEAD, MOTOR_UP_REQUESTED),
            Some(Command::Actuate(Mechanism::Head, ActuatorCommand::Raise))
        );
        assert_eq!(
            Command::decode(REG_MOUTH, MOTOR_DOWN_REQUESTED),
            Some(Command::Actuate(Mechanism::Mouth, ActuatorCommand::Lower))
        );
        assert_eq!(Command::decode(REG_TAIL, MOTOR_UP), None);
        assert_eq!(Command::decode(0x7F, MOTOR_UP_REQUESTED), None);
    }

    #[test]
    fn status_registers_are_not_writable() {
        assert_eq!(Command::decode(REG_HEAD_STATUS, MOTOR_UP_REQUESTED), None);
        assert_eq!(Query::decode(REG_HEAD), None);
    }

    #[test]
    fn query_register_matches_decode() {
        for mech in Mechanism::ALL {
            let q = Query::ActuatorStatus(mech);
            assert_eq!(Query::decode(q.register()), Some(q));
        }
        assert_eq!(Query::decode(REG_CONTROL_STATUS), Some(Query::ControlStatus));
    }
}
