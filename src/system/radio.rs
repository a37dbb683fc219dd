//! Transceiver bring-up
//!
//! Turns the radio resource group into a configured [`Standby`] radio: SPI0 in
//! mode 0 behind a task-local bus mutex, CSN and CE as outputs, IRQ as a
//! pulled-up input.
//!
//! A transceiver that does not come up is fatal. The error is logged and the
//! MCU resets after [`RESET_DELAY`], giving the module another power cycle.

use core::fmt::Debug;

use calliope_radio::{RadioConfig, Standby};
use defmt::{error, info, Debug2Format};
use embassy_embedded_hal::shared_bus::asynch::spi::SpiDevice;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{self, Async, Spi};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Delay, Timer};

use crate::system::config::{RESET_DELAY, SPI_FREQUENCY};
use crate::system::resources::RadioResources;

/// SPI bus shared by the transceiver's device handle
pub type SpiBus = Mutex<NoopRawMutex, Spi<'static, SPI0, Async>>;

/// Transceiver SPI device
pub type RadioSpi<'a> = SpiDevice<'a, NoopRawMutex, Spi<'static, SPI0, Async>, Output<'static>>;

/// Configured, powered-down transceiver
pub type Radio<'a> = Standby<RadioSpi<'a>, Output<'static>, Delay>;

/// Radio hardware, ready to be brought up
pub struct RadioParts {
    pub bus: SpiBus,
    pub csn: Output<'static>,
    pub ce: Output<'static>,
    /// Active low, asserted when a packet arrived
    pub irq: Input<'static>,
}

/// Sets up SPI0 and the control lines
pub fn split(r: RadioResources) -> RadioParts {
    let mut config = spi::Config::default();
    config.frequency = SPI_FREQUENCY;
    config.phase = spi::Phase::CaptureOnFirstTransition;
    config.polarity = spi::Polarity::IdleLow;

    let spi = Spi::new(r.spi, r.sck_pin, r.mosi_pin, r.miso_pin, r.tx_dma, r.rx_dma, config);

    RadioParts {
        bus: Mutex::new(spi),
        csn: Output::new(r.csn_pin, Level::High),
        ce: Output::new(r.ce_pin, Level::Low),
        irq: Input::new(r.irq_pin, Pull::Up),
    }
}

/// Probes and configures the transceiver, resetting the MCU if it fails
pub async fn bring_up<'a>(
    bus: &'a SpiBus,
    csn: Output<'static>,
    ce: Output<'static>,
    config: RadioConfig,
) -> Radio<'a> {
    let device = SpiDevice::new(bus, csn);
    match Standby::new(device, ce, Delay, config).await {
        Ok(radio) => {
            info!(
                "nRF24L01+ ready: group {}, band {}, power {}",
                config.group,
                config.band,
                config.tx_power.level()
            );
            radio
        }
        Err(e) => fail("nRF24L01+ bring-up failed", e).await,
    }
}

/// Logs a fatal radio error and resets the MCU
pub async fn fail(context: &str, error: impl Debug) -> ! {
    error!("{}: {:?}", context, Debug2Format(&error));
    Timer::after(RESET_DELAY).await;
    cortex_m::peripheral::SCB::sys_reset()
}
