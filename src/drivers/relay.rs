// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Audio routing relay.
//!
//! Two relay channels (left/right) switch the puppet's speaker between its own sound board and
//! the external audio source.

use embedded_hal::digital::{OutputPin, PinState};

use crate::error::{keep_first, Error, Result};

/// Whether the relay coil is energized by driving its input high or low.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    High,
    Low,
}

/// Relay pair that remembers its active level and current route.
pub struct AudioRelay<P> {
    pins: [P; 2],
    active: ActiveLevel,
    external: bool,
}

impl<P: OutputPin> AudioRelay<P> {
    /// Create a relay wrapper, initializing it to the local route.
    pub fn new(pins: [P; 2], active: ActiveLevel) -> Result<Self> {
        let mut relay = Self {
            pins,
            active,
            external: false,
        };
        relay.set(false)?;
        Ok(relay)
    }

    /// Relay boards with optocoupled, active-low inputs.
    pub fn active_low(pins: [P; 2]) -> Result<Self> {
        Self::new(pins, ActiveLevel::Low)
    }

    /// Energize (`true`) or release (`false`) both relay channels.
    pub fn set(&mut self, external: bool) -> Result<()> {
        let level = match (self.active, external) {
            (ActiveLevel::High, on) => PinState::from(on),
            (ActiveLevel::Low, on) => PinState::from(!on),
        };
        let mut first = Ok(());
        for pin in self.pins.iter_mut() {
            keep_first(&mut first, pin.set_state(level).map_err(Error::gpio));
        }
        self.external = external;
        first
    }

    #[inline]
    pub fn route_external(&mut self) -> Result<()> {
        self.set(true)
    }

    #[inline]
    pub fn route_local(&mut self) -> Result<()> {
        self.set(false)
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.external
    }
}
