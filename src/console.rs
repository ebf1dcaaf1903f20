// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Bounded console buffer for interrupt contexts.
//!
//! The bus handler and the poll pass format their console lines into a [`LogBuffer`] while they
//! hold the puppet's critical section. The main loop then takes the buffer and writes it to the
//! blocking USART with interrupts enabled, so no console output ever runs with interrupts
//! masked.
//!
//! ```ignore
//! let pending = critical_section::with(|cs| {
//!     let mut log = LOG.borrow_ref_mut(cs);
//!     puppet.poll(now, &mut *log);
//!     log.take()
//! });
//! pending.drain_into(&mut usart);
//! ```

use core::fmt;

use heapless::String;

/// Bytes of console text held between two drains.
pub const LOG_CAPACITY: usize = 512;

/// Written after the buffered text when lines were dropped for lack of space.
pub const TRUNCATED_MARKER: &str = "<log truncated>\r\n";

pub struct LogBuffer<const N: usize = LOG_CAPACITY> {
    text: String<N>,
    /// Set once a write did not fit; later writes are dropped until the next take
    truncated: bool,
}

impl<const N: usize> LogBuffer<N> {
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            truncated: false,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && !self.truncated
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Move the buffered text out, leaving this buffer empty.
    pub fn take(&mut self) -> Self {
        core::mem::replace(self, Self::new())
    }

    /// Write the buffered text to `out`, then the truncation marker if anything was dropped.
    pub fn drain_into<W: fmt::Write>(self, out: &mut W) {
        let _ = out.write_str(&self.text);
        if self.truncated {
            let _ = out.write_str(TRUNCATED_MARKER);
        }
    }
}

impl<const N: usize> Default for LogBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Write for LogBuffer<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated || self.text.push_str(s).is_err() {
            self.truncated = true;
        }
        Ok(())
    }
}
