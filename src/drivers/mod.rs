// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Level Drivers
//!
//! This module contains the puppet's device abstractions. They sit above the board `hw/` layer
//! and are generic over `embedded-hal` pins so that they run unchanged in host tests.
//!
//! ## Existing drivers
//!
//! - [`output`] – actuator output lines that hand over between GPIO and PWM
//! - [`passthrough`] – sensor switch to motor passthrough used in local mode
//! - [`relay`] – two-channel audio routing relay

pub mod output;
pub mod passthrough;
pub mod relay;

pub use output::ActuatorOutput;
pub use passthrough::{Mirror, PassthroughBridge};
pub use relay::{ActiveLevel, AudioRelay};
