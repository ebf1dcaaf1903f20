// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

#![no_main]
#![no_std]

use core::cell::RefCell;
use core::fmt::Write;

use cortex_m::peripheral::NVIC;
use cortex_m_rt::{entry, exception};
use critical_section::Mutex;
use panic_halt as _;

use hal::{
    pac::{self, interrupt},
    prelude::*,
    serial::{Config as SerialConfig, Serial},
};
use stm32f7xx_hal as hal;

use fishproxy::config::{Config, CONSOLE_BAUD};
use fishproxy::console::LogBuffer;
use fishproxy::drivers::AudioRelay;
use fishproxy::hw::{
    clock, exti, i2c_target::UNDEFINED_RESPONSE, pins::sensor_line, pwm, ActuatorLine,
    BoardPins, I2cTarget, RelayLine, SensorLine, TargetEvent, Usart,
};
use fishproxy::protocol::CommandProtocol;
use fishproxy::puppet::{with_shared, Shared};
use fishproxy::{Mechanism, Puppet};

type BoardPuppet = Puppet<SensorLine, ActuatorLine, RelayLine>;

static PUPPET: Shared<BoardPuppet> = Mutex::new(RefCell::new(None));
/// Console lines produced inside critical sections; only `main` writes them to the USART.
static LOG: Mutex<RefCell<LogBuffer>> = Mutex::new(RefCell::new(LogBuffer::new()));
static TARGET: Shared<I2cTarget> = Mutex::new(RefCell::new(None));
static PROTOCOL: Mutex<RefCell<CommandProtocol>> =
    Mutex::new(RefCell::new(CommandProtocol::new()));

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();
    let config = Config::default();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();

    // GPIO
    let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC, dp.GPIOD);

    // USART1 (DBG)
    let usart_cfg = SerialConfig {
        baud_rate: CONSOLE_BAUD.bps(),
        ..Default::default()
    };
    let serial = Serial::new(dp.USART1, (pins.usart1.tx, pins.usart1.rx), &clocks, usart_cfg);
    let mut console = Usart::new(serial);

    // TIM4 PWM, idle until control is assumed
    pwm::init_tim4(dp.TIM4, &clocks);

    // Puppet in passthrough
    let relay = match AudioRelay::active_low(pins.relays) {
        Ok(relay) => relay,
        Err(e) => {
            let _ = writeln!(console, "relay error: {}\r", e);
            loop {
                cortex_m::asm::wfi();
            }
        }
    };
    let (puppet, booted) = Puppet::new(pins.sensors, pins.actuators, relay, config.timing);
    if let Err(e) = booted {
        let _ = writeln!(console, "boot error: {}\r", e);
    }

    // I2C1 target
    let target = I2cTarget::new(dp.I2C1, pins.i2c1, config.bus_address);

    critical_section::with(|cs| {
        PUPPET.borrow_ref_mut(cs).replace(puppet);
        TARGET.borrow_ref_mut(cs).replace(target);
    });

    exti::listen_both_edges(
        &dp.SYSCFG,
        &dp.EXTI,
        &Mechanism::ALL.map(sensor_line),
    );
    clock::start(cp.SYST, clocks.hclk().raw());

    console.println("READY_FOR_COMMANDS");

    // SAFETY: all shared state is initialised above.
    unsafe {
        NVIC::unmask(pac::Interrupt::EXTI0);
        NVIC::unmask(pac::Interrupt::EXTI1);
        NVIC::unmask(pac::Interrupt::EXTI2);
        NVIC::unmask(pac::Interrupt::I2C1_EV);
        NVIC::unmask(pac::Interrupt::I2C1_ER);
    }

    loop {
        let now = clock::now_ms();
        let pending = critical_section::with(|cs| {
            let mut log = LOG.borrow_ref_mut(cs);
            if let Some(puppet) = PUPPET.borrow_ref_mut(cs).as_mut() {
                puppet.poll(now, &mut *log);
            }
            (!log.is_empty()).then(|| log.take())
        });
        // Blocking USART writes run with interrupts enabled.
        if let Some(pending) = pending {
            pending.drain_into(&mut console);
        }
    }
}

fn on_sensor_edge(mechanism: Mechanism) {
    exti::clear_pending(sensor_line(mechanism));
    with_shared(&PUPPET, |puppet| {
        let _ = puppet.on_edge(mechanism);
    });
}

#[interrupt]
fn EXTI0() {
    on_sensor_edge(Mechanism::Head);
}

#[interrupt]
fn EXTI1() {
    on_sensor_edge(Mechanism::Tail);
}

#[interrupt]
fn EXTI2() {
    on_sensor_edge(Mechanism::Mouth);
}

#[interrupt]
fn I2C1_EV() {
    let now = clock::now_ms();
    critical_section::with(|cs| {
        let mut target = TARGET.borrow_ref_mut(cs);
        let mut puppet = PUPPET.borrow_ref_mut(cs);
        let mut log = LOG.borrow_ref_mut(cs);
        let mut protocol = PROTOCOL.borrow_ref_mut(cs);
        let (Some(target), Some(puppet)) = (target.as_mut(), puppet.as_mut()) else {
            return;
        };

        while let Some(event) = target.service() {
            match event {
                TargetEvent::Received(bytes) => {
                    protocol.on_receive(puppet, &bytes, now, &mut *log);
                }
                TargetEvent::ReadRequested => {
                    let value = protocol
                        .on_request(puppet, &mut *log)
                        .unwrap_or(UNDEFINED_RESPONSE);
                    target.respond(value);
                }
            }
        }
    });
}

#[interrupt]
fn I2C1_ER() {
    with_shared(&TARGET, I2cTarget::clear_errors);
}

#[exception]
fn SysTick() {
    clock::tick();
}
