// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! TIM4 PWM for the actuator outputs.
//!
//! All three channels share one timer running at [`PWM_FREQUENCY_HZ`] with an 8-bit duty range.
//! The auto-reload is one count below full duty so duty `255` holds the output high for the
//! whole period.

use core::convert::Infallible;

use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use stm32f7xx_hal::{pac, rcc::Clocks};

use crate::config::{PWM_FREQUENCY_HZ, PWM_RESOLUTION_BITS};

const MAX_DUTY: u16 = (1 << PWM_RESOLUTION_BITS) - 1;

/// OCxM = PWM mode 1, OCxPE set.
const OC_PWM1_PRELOAD: u32 = 0b110 << 4 | 1 << 3;

/// Configure and start TIM4 with CH1..CH3 in PWM mode 1, all at zero duty.
pub fn init_tim4(tim: pac::TIM4, clocks: &Clocks) {
    // SAFETY: single-bit enable in a shared register, done once before interrupts are enabled.
    let rcc = unsafe { &*pac::RCC::ptr() };
    rcc.apb1enr.modify(|_, w| w.tim4en().set_bit());

    let counts = PWM_FREQUENCY_HZ * u32::from(MAX_DUTY);
    let psc = (clocks.timclk1().raw() / counts).saturating_sub(1);

    unsafe {
        tim.psc.write(|w| w.bits(psc));
        tim.arr.write(|w| w.bits(u32::from(MAX_DUTY) - 1));
        tim.ccr1.write(|w| w.bits(0));
        tim.ccr2.write(|w| w.bits(0));
        tim.ccr3.write(|w| w.bits(0));
        tim.ccmr1_output()
            .write(|w| w.bits(OC_PWM1_PRELOAD | OC_PWM1_PRELOAD << 8));
        tim.ccmr2_output().write(|w| w.bits(OC_PWM1_PRELOAD));
        // CC1E | CC2E | CC3E
        tim.ccer.write(|w| w.bits(1 | 1 << 4 | 1 << 8));
    }
    tim.egr.write(|w| w.ug().set_bit());
    tim.cr1.modify(|_, w| w.arpe().set_bit().cen().set_bit());
}

/// One TIM4 compare channel (1..=3).
pub struct PwmChannel {
    channel: u8,
}

impl PwmChannel {
    pub(crate) fn new(channel: u8) -> Self {
        Self { channel }
    }

    #[inline]
    pub fn channel(&self) -> u8 {
        self.channel
    }
}

impl ErrorType for PwmChannel {
    type Error = Infallible;
}

impl SetDutyCycle for PwmChannel {
    #[inline]
    fn max_duty_cycle(&self) -> u16 {
        MAX_DUTY
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        let duty = u32::from(duty.min(MAX_DUTY));
        // SAFETY: each channel owns its own CCR register.
        let tim = unsafe { &*pac::TIM4::ptr() };
        unsafe {
            match self.channel {
                1 => tim.ccr1.write(|w| w.bits(duty)),
                2 => tim.ccr2.write(|w| w.bits(duty)),
                _ => tim.ccr3.write(|w| w.bits(duty)),
            }
        }
        Ok(())
    }
}
