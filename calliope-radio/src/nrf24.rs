//! nRF24L01+ register-level driver
//!
//! Minimal async driver for the nRF24L01+ 2.4 GHz transceiver, covering what a
//! micro:bit compatible link needs: fixed 32-byte payloads, no auto
//! acknowledgement, no hardware CRC, one receive pipe.
//!
//! # Wiring
//! - SPI mode 0, up to 10 MHz, chip select handled by the [`SpiDevice`]
//! - CE: chip enable, high while receiving or transmitting
//! - IRQ (optional): active low, not used by the driver itself

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::{Operation, SpiDevice};

use crate::address::ADDRESS_WIDTH;
use crate::error::RadioError;
use crate::frame::PACKET_SIZE;

/// Register addresses
pub mod register {
    pub const CONFIG: u8 = 0x00;
    pub const EN_AA: u8 = 0x01;
    pub const EN_RXADDR: u8 = 0x02;
    pub const SETUP_AW: u8 = 0x03;
    pub const SETUP_RETR: u8 = 0x04;
    pub const RF_CH: u8 = 0x05;
    pub const RF_SETUP: u8 = 0x06;
    pub const STATUS: u8 = 0x07;
    pub const RX_ADDR_P0: u8 = 0x0A;
    pub const TX_ADDR: u8 = 0x10;
    pub const RX_PW_P0: u8 = 0x11;
    pub const FIFO_STATUS: u8 = 0x17;
    pub const DYNPD: u8 = 0x1C;
    pub const FEATURE: u8 = 0x1D;
}

/// SPI commands
pub mod command {
    pub const R_REGISTER: u8 = 0x00;
    pub const W_REGISTER: u8 = 0x20;
    pub const R_RX_PAYLOAD: u8 = 0x61;
    pub const W_TX_PAYLOAD: u8 = 0xA0;
    pub const FLUSH_TX: u8 = 0xE1;
    pub const FLUSH_RX: u8 = 0xE2;
    pub const NOP: u8 = 0xFF;
}

// CONFIG bits
const MASK_RX_DR: u8 = 1 << 6;
const MASK_TX_DS: u8 = 1 << 5;
const MASK_MAX_RT: u8 = 1 << 4;
const PWR_UP: u8 = 1 << 1;
const PRIM_RX: u8 = 1 << 0;

// STATUS bits
const RX_DR: u8 = 1 << 6;
const TX_DS: u8 = 1 << 5;
const MAX_RT: u8 = 1 << 4;

// RF_SETUP data rate bits (RF_DR_LOW and RF_DR_HIGH clear)
const RF_DR_1MBPS: u8 = 0;

// FIFO_STATUS bits
const FIFO_TX_FULL: u8 = 1 << 5;
const FIFO_TX_EMPTY: u8 = 1 << 4;
const FIFO_RX_EMPTY: u8 = 1 << 0;

/// SETUP_AW value for 5-byte addresses
const ADDRESS_WIDTH_5: u8 = 0b11;

/// Highest RF channel the chip accepts
pub const MAX_CHANNEL: u8 = 125;

/// Power-down to standby start-up time (Tpd2stby), rounded up
const POWER_UP_DELAY_US: u32 = 1_500;

/// Time the chip needs after reset before it accepts SPI commands
const POWER_ON_RESET_DELAY_MS: u32 = 100;

/// Primary mode of a powered-up chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Transmit,
    Receive,
}

/// Decoded STATUS register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status(pub u8);

impl Status {
    /// A packet arrived in the RX FIFO
    pub fn data_ready(&self) -> bool {
        self.0 & RX_DR != 0
    }

    /// A packet left the TX FIFO
    pub fn data_sent(&self) -> bool {
        self.0 & TX_DS != 0
    }
}

/// Decoded FIFO_STATUS register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoStatus(pub u8);

impl FifoStatus {
    pub fn tx_full(&self) -> bool {
        self.0 & FIFO_TX_FULL != 0
    }

    pub fn tx_empty(&self) -> bool {
        self.0 & FIFO_TX_EMPTY != 0
    }

    pub fn rx_empty(&self) -> bool {
        self.0 & FIFO_RX_EMPTY != 0
    }
}

/// Result type of all driver operations
pub type Result<T, SPI, CE> = core::result::Result<T, DriverError<SPI, CE>>;

/// Error of a driver on `SPI` with chip-enable pin `CE`
pub type DriverError<SPI, CE> = RadioError<
    <SPI as embedded_hal_async::spi::ErrorType>::Error,
    <CE as embedded_hal::digital::ErrorType>::Error,
>;

/// nRF24L01+ on an SPI device with a chip-enable pin
pub struct Nrf24<SPI, CE, D> {
    spi: SPI,
    ce: CE,
    delay: D,
}

impl<SPI, CE, D> Nrf24<SPI, CE, D>
where
    SPI: SpiDevice,
    CE: OutputPin,
    D: DelayNs,
{
    /// Takes over the chip, checks it answers, and leaves it powered down with
    /// empty FIFOs
    pub async fn new(spi: SPI, ce: CE, delay: D) -> Result<Self, SPI, CE> {
        let mut device = Self { spi, ce, delay };
        device.ce_disable()?;
        device.delay.delay_ms(POWER_ON_RESET_DELAY_MS).await;

        // The address width register never reads back 0b00, so a value that
        // sticks means something nRF24-shaped is on the bus
        device.write_register(register::SETUP_AW, ADDRESS_WIDTH_5).await?;
        if device.read_register(register::SETUP_AW).await? != ADDRESS_WIDTH_5 {
            return Err(RadioError::NotDetected);
        }

        device.write_register(register::CONFIG, 0).await?;
        device.write_register(register::FEATURE, 0).await?;
        device.write_register(register::DYNPD, 0).await?;
        device.flush_tx().await?;
        device.flush_rx().await?;
        device.clear_interrupts().await?;
        Ok(device)
    }

    /// Gives the bus, pin and delay back
    pub fn release(self) -> (SPI, CE, D) {
        (self.spi, self.ce, self.delay)
    }

    /// Reads a single-byte register
    pub async fn read_register(&mut self, register: u8) -> Result<u8, SPI, CE> {
        let mut buf = [command::R_REGISTER | register, 0];
        self.spi.transfer_in_place(&mut buf).await.map_err(RadioError::Spi)?;
        Ok(buf[1])
    }

    /// Writes a single-byte register
    pub async fn write_register(&mut self, register: u8, value: u8) -> Result<(), SPI, CE> {
        self.spi
            .write(&[command::W_REGISTER | register, value])
            .await
            .map_err(RadioError::Spi)
    }

    /// Reads a 5-byte address register
    pub async fn read_address(&mut self, register: u8) -> Result<[u8; ADDRESS_WIDTH], SPI, CE> {
        let mut address = [0u8; ADDRESS_WIDTH];
        self.spi
            .transaction(&mut [
                Operation::Write(&[command::R_REGISTER | register]),
                Operation::Read(&mut address),
            ])
            .await
            .map_err(RadioError::Spi)?;
        Ok(address)
    }

    /// Writes a 5-byte address register
    pub async fn write_address(
        &mut self,
        register: u8,
        address: &[u8; ADDRESS_WIDTH],
    ) -> Result<(), SPI, CE> {
        self.spi
            .transaction(&mut [
                Operation::Write(&[command::W_REGISTER | register]),
                Operation::Write(address),
            ])
            .await
            .map_err(RadioError::Spi)
    }

    /// Reads the STATUS register (clocked out with a NOP)
    pub async fn status(&mut self) -> Result<Status, SPI, CE> {
        self.command(command::NOP).await
    }

    /// Reads the FIFO_STATUS register
    pub async fn fifo_status(&mut self) -> Result<FifoStatus, SPI, CE> {
        Ok(FifoStatus(self.read_register(register::FIFO_STATUS).await?))
    }

    /// Clears the data ready, data sent and retransmit interrupt flags
    pub async fn clear_interrupts(&mut self) -> Result<(), SPI, CE> {
        self.write_register(register::STATUS, RX_DR | TX_DS | MAX_RT).await
    }

    pub async fn flush_tx(&mut self) -> Result<(), SPI, CE> {
        self.command(command::FLUSH_TX).await.map(|_| ())
    }

    pub async fn flush_rx(&mut self) -> Result<(), SPI, CE> {
        self.command(command::FLUSH_RX).await.map(|_| ())
    }

    /// Queues a packet in the TX FIFO
    pub async fn write_payload(&mut self, packet: &[u8; PACKET_SIZE]) -> Result<(), SPI, CE> {
        self.spi
            .transaction(&mut [
                Operation::Write(&[command::W_TX_PAYLOAD]),
                Operation::Write(packet),
            ])
            .await
            .map_err(RadioError::Spi)
    }

    /// Pops the oldest packet from the RX FIFO
    pub async fn read_payload(&mut self) -> Result<[u8; PACKET_SIZE], SPI, CE> {
        let mut packet = [0u8; PACKET_SIZE];
        self.spi
            .transaction(&mut [
                Operation::Write(&[command::R_RX_PAYLOAD]),
                Operation::Read(&mut packet),
            ])
            .await
            .map_err(RadioError::Spi)?;
        Ok(packet)
    }

    /// Tunes to 2400 MHz + `channel` MHz
    pub async fn set_channel(&mut self, channel: u8) -> Result<(), SPI, CE> {
        self.write_register(register::RF_CH, channel.min(MAX_CHANNEL)).await
    }

    /// Sets 1 Mbit/s and the output power (0 = -18 dBm .. 3 = 0 dBm)
    pub async fn set_rf(&mut self, power: u8) -> Result<(), SPI, CE> {
        let value = RF_DR_1MBPS | (power.min(3) << 1);
        self.write_register(register::RF_SETUP, value).await
    }

    /// Disables auto acknowledgement on all pipes
    pub async fn disable_auto_ack(&mut self) -> Result<(), SPI, CE> {
        self.write_register(register::EN_AA, 0).await
    }

    /// Sets auto retransmit delay (in 250 µs steps) and count; 0/0 disables it
    pub async fn set_auto_retransmit(&mut self, delay: u8, count: u8) -> Result<(), SPI, CE> {
        self.write_register(register::SETUP_RETR, (delay.min(15) << 4) | count.min(15))
            .await
    }

    /// Enables receive pipe 0 only, with a static payload width
    pub async fn enable_pipe0(&mut self, width: u8) -> Result<(), SPI, CE> {
        self.write_register(register::EN_RXADDR, 0b0000_0001).await?;
        self.write_register(register::RX_PW_P0, width.min(PACKET_SIZE as u8)).await
    }

    pub async fn set_rx_address(&mut self, address: &[u8; ADDRESS_WIDTH]) -> Result<(), SPI, CE> {
        self.write_address(register::RX_ADDR_P0, address).await
    }

    pub async fn set_tx_address(&mut self, address: &[u8; ADDRESS_WIDTH]) -> Result<(), SPI, CE> {
        self.write_address(register::TX_ADDR, address).await
    }

    /// Powers the chip up in the given mode with hardware CRC disabled
    ///
    /// Only the interrupt relevant to the mode reaches the IRQ pin.
    pub async fn power_up(&mut self, mode: Mode) -> Result<(), SPI, CE> {
        let config = match mode {
            Mode::Transmit => PWR_UP | MASK_RX_DR | MASK_MAX_RT,
            Mode::Receive => PWR_UP | PRIM_RX | MASK_TX_DS | MASK_MAX_RT,
        };
        self.write_register(register::CONFIG, config).await?;
        self.delay.delay_us(POWER_UP_DELAY_US).await;
        Ok(())
    }

    /// Powers the chip down, keeping its configuration
    pub async fn power_down(&mut self) -> Result<(), SPI, CE> {
        self.ce_disable()?;
        self.write_register(register::CONFIG, 0).await
    }

    pub fn ce_enable(&mut self) -> Result<(), SPI, CE> {
        self.ce.set_high().map_err(RadioError::Pin)
    }

    pub fn ce_disable(&mut self) -> Result<(), SPI, CE> {
        self.ce.set_low().map_err(RadioError::Pin)
    }

    /// Waits for `us` microseconds with the driver's delay
    pub async fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us).await;
    }

    /// Sends a bare command byte and returns the STATUS clocked out with it
    async fn command(&mut self, command: u8) -> Result<Status, SPI, CE> {
        let mut buf = [command];
        self.spi.transfer_in_place(&mut buf).await.map_err(RadioError::Spi)?;
        Ok(Status(buf[0]))
    }
}
