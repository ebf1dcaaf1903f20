// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! I2C1 in target (slave) mode.
//!
//! The peripheral stretches the clock while `ADDR` is set, so the event interrupt can answer a
//! read request before the first byte is clocked out. A controller `write_read` arrives as a
//! one-byte write followed by a repeated start; the received byte is reported as
//! [`TargetEvent::Received`] before the [`TargetEvent::ReadRequested`] for the same address match.
//!
//! Call [`I2cTarget::service`] from `I2C1_EV` until it returns `None`.

use heapless::Vec;
use stm32f7xx_hal::pac;

use crate::hw::pins::I2c1Pins;

/// Byte sent when the controller reads with no status register selected.
pub const UNDEFINED_RESPONSE: u8 = 0xFF;

/// Bytes kept from one write transaction; commands need at most two.
pub const RX_CAPACITY: usize = 8;

/// Timing for 100 kHz standard mode from a 16 MHz I2CCLK.
const TIMINGR_100KHZ: u32 = 0x0030_3D5B;

#[derive(Debug, PartialEq, Eq)]
pub enum TargetEvent {
    /// A write transaction finished with these bytes.
    Received(Vec<u8, RX_CAPACITY>),
    /// The controller wants to read; answer with [`I2cTarget::respond`].
    ReadRequested,
}

pub struct I2cTarget {
    i2c: pac::I2C1,
    /// PB8/PB9 in open-drain AF4 for as long as the target runs
    _pins: I2c1Pins,
    rx: Vec<u8, RX_CAPACITY>,
    tx: u8,
}

impl I2cTarget {
    /// Enable I2C1 as a target on `address` (7-bit) with event and error interrupts.
    pub fn new(i2c: pac::I2C1, pins: I2c1Pins, address: u8) -> Self {
        // SAFETY: single-bit enable in a shared register, done once before interrupts are enabled.
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.i2c1en().set_bit());

        i2c.cr1.modify(|_, w| w.pe().clear_bit());
        unsafe {
            i2c.timingr.write(|w| w.bits(TIMINGR_100KHZ));
            // OA1EN | 7-bit OA1
            i2c.oar1.write(|w| w.bits(1 << 15 | u32::from(address) << 1));
        }
        i2c.cr1.modify(|_, w| {
            w.addrie()
                .set_bit()
                .rxie()
                .set_bit()
                .txie()
                .set_bit()
                .stopie()
                .set_bit()
                .nackie()
                .set_bit()
                .errie()
                .set_bit()
                .pe()
                .set_bit()
        });

        Self {
            i2c,
            _pins: pins,
            rx: Vec::new(),
            tx: UNDEFINED_RESPONSE,
        }
    }

    /// Byte to send for the pending read.
    #[inline]
    pub fn respond(&mut self, byte: u8) {
        self.tx = byte;
    }

    /// Handle one pending peripheral event.
    pub fn service(&mut self) -> Option<TargetEvent> {
        let isr = self.i2c.isr.read();

        if isr.rxne().bit_is_set() {
            let byte = self.i2c.rxdr.read().rxdata().bits();
            // Bytes past the buffer are dropped; only the first two matter.
            let _ = self.rx.push(byte);
        }

        if isr.addr().bit_is_set() {
            if isr.dir().bit_is_set() {
                if !self.rx.is_empty() {
                    // Repeated start: finish the write half first, ADDR stays set.
                    return Some(TargetEvent::Received(core::mem::take(&mut self.rx)));
                }
                self.tx = UNDEFINED_RESPONSE;
                // Flush TXDR so the first byte comes from the response.
                self.i2c.isr.modify(|_, w| w.txe().set_bit());
                self.i2c.icr.write(|w| w.addrcf().set_bit());
                return Some(TargetEvent::ReadRequested);
            }
            self.rx.clear();
            self.i2c.icr.write(|w| w.addrcf().set_bit());
        }

        if isr.txis().bit_is_set() {
            unsafe { self.i2c.txdr.write(|w| w.bits(u32::from(self.tx))) };
            self.tx = UNDEFINED_RESPONSE;
        }

        if isr.nackf().bit_is_set() {
            self.i2c.icr.write(|w| w.nackcf().set_bit());
        }

        if isr.stopf().bit_is_set() {
            self.i2c.icr.write(|w| w.stopcf().set_bit());
            if !self.rx.is_empty() {
                return Some(TargetEvent::Received(core::mem::take(&mut self.rx)));
            }
        }

        None
    }

    /// Clear bus errors from `I2C1_ER` and drop the partial transaction.
    pub fn clear_errors(&mut self) {
        self.i2c
            .icr
            .write(|w| w.berrcf().set_bit().arlocf().set_bit().ovrcf().set_bit());
        self.rx.clear();
    }
}
