//! Hardware Resource Management
//!
//! Assigns the RP2350 pins and peripherals to the tasks that own them, so each
//! task gets exactly the hardware it drives and nothing else.
//!
//! # Resource Groups
//! - Radio: nRF24L01+ transceiver on SPI0 with chip enable and IRQ lines
//! - Display: SSD1306 status OLED on I2C0
//!
//! # Pin Map (Pico 2)
//! | Signal      | GPIO |
//! |-------------|------|
//! | nRF24 MISO  | 16   |
//! | nRF24 CSN   | 17   |
//! | nRF24 SCK   | 18   |
//! | nRF24 MOSI  | 19   |
//! | nRF24 CE    | 20   |
//! | nRF24 IRQ   | 21   |
//! | OLED SDA    | 12   |
//! | OLED SCL    | 13   |

use assign_resources::assign_resources;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::InterruptHandler as I2cInterruptHandler;
use embassy_rp::peripherals::{self, I2C0};
use embassy_rp::{Peri, Peripherals};

assign_resources! {
    /// nRF24L01+ transceiver
    radio: RadioResources {
        spi: SPI0,
        sck_pin: PIN_18,
        mosi_pin: PIN_19,
        miso_pin: PIN_16,
        csn_pin: PIN_17,
        ce_pin: PIN_20,
        irq_pin: PIN_21,
        tx_dma: DMA_CH0,
        rx_dma: DMA_CH1,
    },
    /// SSD1306 128x64 status display
    display: DisplayResources {
        i2c: I2C0,
        sda_pin: PIN_12,
        scl_pin: PIN_13,
    },
}

bind_interrupts!(pub struct Irqs {
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
});

/// Splits the peripherals into the per-task resource groups
pub fn split(p: Peripherals) -> AssignedResources {
    split_resources!(p)
}
