// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

pub mod handler;
pub mod messages;

pub use handler::CommandProtocol;
pub use messages::{Command, Query};
