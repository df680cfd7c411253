//! vfdclock - VFD Tube Clock Firmware
//!
//! Drives an 8-digit IV-21 vacuum fluorescent tube through a MAX6921
//! shift register, regulates the tube's boost supply from an MCP3221 ADC,
//! and takes commands over a framed UART protocol.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::rtc::{self, Rtc};
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{Instant, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use vfdclock_core::config::{BoostHardware, IndicatorHardware};
use vfdclock_core::traits::{DutyOutput, VoltageSensor};
use vfdclock_core::{ClockConfig, ClockEngine, PinMap, XorShift32};
use vfdclock_drivers::{Max6921, Mcp3221, PwmDuty};

use crate::board::{IndicatorLed, RtcClock, DISPLAY_SPI_HZ};

mod board;
mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    RTC_IRQ => rtc::InterruptHandler;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("vfdclock firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = ClockConfig::default();
    let hardware = BoostHardware::default();
    let indicator = IndicatorHardware::default();

    // Indicator LED stays lit until setup completes
    let mut led_config = pwm::Config::default();
    led_config.top = board::pwm_top(indicator.pwm_frequency_hz);
    let (led_out, _) = Pwm::new_output_a(p.PWM_SLICE1, p.PIN_18, led_config).split();
    let mut led: IndicatorLed = PwmDuty::new(unwrap!(led_out));
    led.set_duty(indicator.boot_duty);

    let pins = match config.pin_map() {
        Ok(pins) => pins,
        Err(e) => {
            warn!("Invalid pin map ({:?}), using IV-21 defaults", e);
            PinMap::iv21()
        }
    };
    info!(
        "Tube: {} digits, {} segments",
        pins.digit_count(),
        pins.segment_count()
    );

    // Filament must be heated for the tube to light. Held for the life of main.
    let _filament = Output::new(p.PIN_14, Level::High);
    info!("Filament on");

    // MAX6921: mode 0, MSB first, TX only
    let mut spi_config = spi::Config::default();
    spi_config.frequency = DISPLAY_SPI_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, spi_config);
    let load = Output::new(p.PIN_9, Level::High);
    let mut display = Max6921::new(spi, load);
    if let Err(e) = display.begin() {
        warn!("MAX6921 init failed: {:?}", Debug2Format(&e));
    }
    info!("MAX6921 initialized");

    // MCP3221 on the boost feedback divider
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c::Config::default());
    let mut sensor = Mcp3221::new(i2c, hardware.adc_address, hardware.adc_vref_mv)
        .with_samples(hardware.adc_samples);
    if sensor.is_connected() {
        info!("MCP3221 found at {:#x}", sensor.address());
    } else {
        warn!("MCP3221 not found at {:#x}", sensor.address());
    }

    // Boost switch
    let mut pwm_config = pwm::Config::default();
    pwm_config.top = board::pwm_top(hardware.pwm_frequency_hz);
    pwm_config.compare_a = 0;
    let (boost_out, _) = Pwm::new_output_a(p.PWM_SLICE2, p.PIN_20, pwm_config).split();
    let boost = PwmDuty::new(unwrap!(boost_out));
    info!("Boost PWM at {} Hz", hardware.pwm_frequency_hz);

    let clock = RtcClock::new(Rtc::new(p.RTC, Irqs));

    // Seed from boot timing and ADC noise
    let noise = sensor.read_raw().unwrap_or(0);
    let seed = (Instant::now().as_ticks() as u32) ^ (u32::from(noise) << 16);
    let rng = XorShift32::new(seed);

    let engine = ClockEngine::new(&config, pins, display, sensor, boost, clock, rng);

    // Control UART
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for control surface");

    // Spawn tasks
    spawner.spawn(tasks::control_rx_task(rx)).unwrap();
    spawner.spawn(tasks::control_tx_task(tx)).unwrap();
    spawner.spawn(tasks::control_loop_task(engine)).unwrap();

    led.set_duty(0);
    info!("All tasks spawned, firmware running");

    // Main keeps the filament pin; all other work happens in spawned tasks
    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
