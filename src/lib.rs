// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # FishProxy Firmware
//!
//! This crate contains the firmware for the FishProxy, a bus-controlled interposer that sits
//! between an animatronic singing fish's own controller and its three motors (head, tail and
//! mouth). Left alone, the proxy mirrors the fish's own motor signals so the puppet behaves as
//! stock. Once a bus controller takes over, the proxy drives the motors itself through timed
//! PWM motions and switches the speaker audio over to an external source.
//!
//! The puppet logic is hardware-independent and runs on the host for tests; the STM32F777 board
//! support lives behind the `board` feature.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`mechanism`] | The three mechanisms and per-mechanism storage |
//! | [`drivers`] | Passthrough bridge and audio relay over `embedded-hal` pins |
//! | [`control`]   | Actuator state machines and drive-mode arbitration |
//! | [`protocol`] | Register map and bus transaction handling |
//! | [`puppet`] | All mutable firmware state in one record |
//! | [`client`] | Host-side driver for the bus controller |
//! | [`console`] | Bounded log buffer drained outside critical sections |
//! | `hw` | MCU-level wrappers for GPIO, TIM4 PWM, I2C target, EXTI, SysTick and USART |
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features board --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod client;
pub mod config;
pub mod console;
pub mod control;
pub mod drivers;
pub mod error;
pub mod mechanism;
pub mod protocol;
pub mod puppet;

#[cfg(feature = "board")]
pub mod hw;

#[cfg(test)]
mod mock;

pub use client::{ClientError, PuppetClient};
pub use error::{Error, Result};
pub use mechanism::{Mechanism, Mechanisms};
pub use puppet::Puppet;
