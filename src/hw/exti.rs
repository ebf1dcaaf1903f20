// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Both-edge interrupts on the GPIOC sensor lines.
//!
//! PC0, PC1 and PC2 map to EXTI0, EXTI1 and EXTI2, one interrupt vector each.

use stm32f7xx_hal::pac;

/// SYSCFG_EXTICRx selector for port C.
const PORT_C: u32 = 0b0010;

/// Route EXTI `lines` (all below 4) to GPIOC and trigger on both edges.
pub fn listen_both_edges(syscfg: &pac::SYSCFG, exti: &pac::EXTI, lines: &[u8]) {
    // SAFETY: single-bit enable in a shared register, done once before interrupts are enabled.
    let rcc = unsafe { &*pac::RCC::ptr() };
    rcc.apb2enr.modify(|_, w| w.syscfgen().set_bit());

    for &line in lines {
        let sel = 4 * u32::from(line);
        let mask = 1u32 << line;
        unsafe {
            syscfg
                .exticr1
                .modify(|r, w| w.bits((r.bits() & !(0b1111 << sel)) | PORT_C << sel));
            exti.rtsr.modify(|r, w| w.bits(r.bits() | mask));
            exti.ftsr.modify(|r, w| w.bits(r.bits() | mask));
            exti.imr.modify(|r, w| w.bits(r.bits() | mask));
        }
    }
}

/// Acknowledge a pending edge on `line`.
#[inline]
pub fn clear_pending(line: u8) {
    // SAFETY: PR is write-one-to-clear, other lines are unaffected.
    unsafe { (*pac::EXTI::ptr()).pr.write(|w| w.bits(1 << line)) };
}
