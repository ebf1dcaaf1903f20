// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Error types for hardware services consumed by the core.

use embedded_hal::{digital, pwm};

/// Failure reported by a pin or PWM channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("GPIO error: {0:?}")]
    Gpio(digital::ErrorKind),
    #[error("PWM error: {0:?}")]
    Pwm(pwm::ErrorKind),
}

impl Error {
    #[inline]
    pub fn gpio<E: digital::Error>(e: E) -> Self {
        Error::Gpio(e.kind())
    }

    #[inline]
    pub fn pwm<E: pwm::Error>(e: E) -> Self {
        Error::Pwm(e.kind())
    }
}

pub type Result<T> = core::result::Result<T, Error>;

/// Remembers the first failure of a multi-step operation that must run to completion.
pub(crate) fn keep_first(first: &mut Result<()>, step: Result<()>) {
    if first.is_ok() {
        *first = step;
    }
}
