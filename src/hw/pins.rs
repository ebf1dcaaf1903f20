// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the FishProxy board (STM32F777).
//!
//! | Mechanism | Sensor | Actuator | EXTI | TIM4 |
//! | --------- | ------ | -------- | ---- | ---- |
//! | Head | PC0 | PD12 | 0 | CH1 |
//! | Tail | PC1 | PD13 | 1 | CH2 |
//! | Mouth | PC2 | PD14 | 2 | CH3 |
//!
//! Audio relays on PD3/PD4, I2C1 on PB8 (SCL) / PB9 (SDA), console on USART1 PA9/PA10.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiob, Alternate, OpenDrain},
    pac,
    prelude::*,
};

use crate::hw::gpio::{ActuatorLine, RelayLine, SensorLine};
use crate::mechanism::{Mechanism, Mechanisms};

/// EXTI line (and GPIOC pin) carrying each mechanism's sensor.
pub const fn sensor_line(mechanism: Mechanism) -> u8 {
    match mechanism {
        Mechanism::Head => 0,
        Mechanism::Tail => 1,
        Mechanism::Mouth => 2,
    }
}

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC, dp.GPIOD);
/// ```
pub struct BoardPins {
    pub sensors: Mechanisms<SensorLine>,
    pub actuators: Mechanisms<ActuatorLine>,
    pub relays: [RelayLine; 2],
    pub i2c1: I2c1Pins,
    pub usart1: Usart1Pins,
}

pub struct I2c1Pins {
    pub scl: gpiob::PB8<Alternate<4, OpenDrain>>,
    pub sda: gpiob::PB9<Alternate<4, OpenDrain>>,
}

pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(
        gpioa: pac::GPIOA,
        gpiob: pac::GPIOB,
        gpioc: pac::GPIOC,
        gpiod: pac::GPIOD,
    ) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpioc = gpioc.split();
        let gpiod = gpiod.split();

        // Typestates are only used to program mode and AF; the lines take over from here.
        let _ = gpioc.pc0.into_floating_input();
        let _ = gpioc.pc1.into_floating_input();
        let _ = gpioc.pc2.into_floating_input();
        let _ = gpiod.pd12.into_alternate::<2>();
        let _ = gpiod.pd13.into_alternate::<2>();
        let _ = gpiod.pd14.into_alternate::<2>();
        let _ = gpiod.pd3.into_push_pull_output();
        let _ = gpiod.pd4.into_push_pull_output();

        Self {
            sensors: Mechanisms::new(SensorLine::new(0), SensorLine::new(1), SensorLine::new(2)),
            actuators: Mechanisms::new(
                ActuatorLine::new(12),
                ActuatorLine::new(13),
                ActuatorLine::new(14),
            ),
            relays: [RelayLine::new(3), RelayLine::new(4)],

            i2c1: I2c1Pins {
                scl: gpiob.pb8.into_alternate_open_drain::<4>(),
                sda: gpiob.pb9.into_alternate_open_drain::<4>(),
            },

            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },
        }
    }
}
