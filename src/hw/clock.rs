// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Millisecond clock driven by SysTick.
//!
//! The counter wraps after ~49.7 days; compare instants with `wrapping_sub`.

use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::peripheral::{syst::SystClkSource, SYST};

static MILLIS: AtomicU32 = AtomicU32::new(0);

/// Start SysTick at 1 kHz from the core clock.
pub fn start(mut syst: SYST, hclk_hz: u32) {
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(hclk_hz / 1_000 - 1);
    syst.clear_current();
    syst.enable_counter();
    syst.enable_interrupt();
}

/// Called from the SysTick exception.
#[inline]
pub fn tick() {
    MILLIS.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn now_ms() -> u32 {
    MILLIS.load(Ordering::Relaxed)
}
