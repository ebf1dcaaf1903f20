// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Logic
//!
//! This module provides the puppet's state machines.
//!
//! ## Modules
//!
//! - [`actuator`] - Timed raise/lower state machine for one mechanism.
//! - [`arbiter`] - Drive-mode arbitration between passthrough and external control.

pub mod actuator;
pub mod arbiter;

pub use actuator::{ActuatorCommand, ActuatorController, ActuatorState};
pub use arbiter::{ControlArbiter, DriveMode};
