//! micro:bit radio on top of the nRF24L01+
//!
//! The transceiver is configured the way the micro:bit DAL configures the nRF51
//! radio: 1 Mbit/s, no acknowledgement or retransmission, the group address on
//! pipe 0, and CRC plus whitening done in software (see [`crate::frame`]).
//!
//! A radio starts in [`Standby`] and is turned into a [`Transmitter`] or a
//! [`Receiver`]; both can go back to standby.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::SpiDevice;

use crate::address::Address;
use crate::broadcast::DatagramRadio;
use crate::error::RadioError;
use crate::frame::{self, Frame, PACKET_SIZE};
use crate::nrf24::{self, Mode, Nrf24};

/// Highest frequency band the micro:bit radio accepts
pub const MAX_BAND: u8 = 83;

/// RX settling time after CE goes high (Tstby2a)
const RX_SETTLE_US: u32 = 130;

/// Transmit power on the micro:bit scale
///
/// Levels 0..=7 correspond to -30 dBm .. +4 dBm on the nRF51. The nRF24L01+
/// only has four steps (-18 dBm .. 0 dBm), so two micro:bit levels share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxPower(u8);

impl TxPower {
    pub const MIN: TxPower = TxPower(0);
    pub const MAX: TxPower = TxPower(7);

    /// Power level, `None` above 7
    pub const fn new(level: u8) -> Option<Self> {
        if level <= Self::MAX.0 {
            Some(Self(level))
        } else {
            None
        }
    }

    /// Level on the micro:bit scale
    pub const fn level(self) -> u8 {
        self.0
    }

    /// RF_PWR field value for the nRF24L01+
    pub const fn nrf24_level(self) -> u8 {
        self.0 / 2
    }
}

impl Default for TxPower {
    /// micro:bit default
    fn default() -> Self {
        TxPower(6)
    }
}

/// Settings shared with the Calliope on the other end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RadioConfig {
    /// Radio group; only devices in the same group hear each other
    pub group: u8,
    /// Frequency band, 2400 MHz + band MHz
    pub band: u8,
    pub tx_power: TxPower,
}

impl Default for RadioConfig {
    /// micro:bit defaults: group 0, band 7, power 6
    fn default() -> Self {
        Self {
            group: 0,
            band: 7,
            tx_power: TxPower::default(),
        }
    }
}

/// Outcome of handing a datagram to the transceiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendOutcome {
    /// The packet is in the TX FIFO and goes out immediately
    Queued,
    /// The TX FIFO is full, nothing was written
    QueueFull,
}

type RadioResult<T, SPI, CE> = nrf24::Result<T, SPI, CE>;

/// Configured, powered-down radio
pub struct Standby<SPI, CE, D> {
    device: Nrf24<SPI, CE, D>,
    config: RadioConfig,
}

impl<SPI, CE, D> Standby<SPI, CE, D>
where
    SPI: SpiDevice,
    CE: OutputPin,
    D: DelayNs,
{
    /// Probes the transceiver and configures it for micro:bit packets
    pub async fn new(
        spi: SPI,
        ce: CE,
        delay: D,
        config: RadioConfig,
    ) -> RadioResult<Self, SPI, CE> {
        if config.band > MAX_BAND {
            return Err(RadioError::InvalidBand(config.band));
        }

        let mut device = Nrf24::new(spi, ce, delay).await?;
        device.set_channel(config.band).await?;
        device.set_auto_retransmit(0, 0).await?;
        device.set_rf(config.tx_power.nrf24_level()).await?;
        device.disable_auto_ack().await?;
        device.enable_pipe0(PACKET_SIZE as u8).await?;
        apply_group(&mut device, config.group).await?;

        Ok(Self { device, config })
    }

    pub fn config(&self) -> &RadioConfig {
        &self.config
    }

    /// Direct register access, e.g. for diagnostics
    pub fn device(&mut self) -> &mut Nrf24<SPI, CE, D> {
        &mut self.device
    }

    /// Powers up as transmitter and keeps CE high, so every queued packet is
    /// sent right away
    pub async fn into_transmitter(mut self) -> RadioResult<Transmitter<SPI, CE, D>, SPI, CE> {
        self.device.power_up(Mode::Transmit).await?;
        self.device.ce_enable()?;
        Ok(Transmitter {
            device: self.device,
            config: self.config,
        })
    }

    /// Powers up as receiver and starts listening
    pub async fn into_receiver(mut self) -> RadioResult<Receiver<SPI, CE, D>, SPI, CE> {
        self.device.power_up(Mode::Receive).await?;
        self.device.ce_enable()?;
        self.device.delay_us(RX_SETTLE_US).await;
        Ok(Receiver {
            device: self.device,
            config: self.config,
        })
    }

    /// Gives the bus, pin and delay back
    pub fn release(self) -> (SPI, CE, D) {
        self.device.release()
    }
}

/// Radio sending micro:bit datagrams
pub struct Transmitter<SPI, CE, D> {
    device: Nrf24<SPI, CE, D>,
    config: RadioConfig,
}

impl<SPI, CE, D> Transmitter<SPI, CE, D>
where
    SPI: SpiDevice,
    CE: OutputPin,
    D: DelayNs,
{
    pub fn config(&self) -> &RadioConfig {
        &self.config
    }

    /// Switches to another radio group
    pub async fn set_group(&mut self, group: u8) -> RadioResult<(), SPI, CE> {
        apply_group(&mut self.device, group).await?;
        self.config.group = group;
        Ok(())
    }

    /// Sets the transmit power; the register is only written on a change
    pub async fn set_tx_power(&mut self, power: TxPower) -> RadioResult<(), SPI, CE> {
        if power.nrf24_level() != self.config.tx_power.nrf24_level() {
            self.device.set_rf(power.nrf24_level()).await?;
        }
        self.config.tx_power = power;
        Ok(())
    }

    /// Sends `payload` as one datagram to the current group
    pub async fn transmit(&mut self, payload: &[u8]) -> RadioResult<SendOutcome, SPI, CE> {
        let packet = frame::encode(payload, &Address::new(self.config.group))?;
        if self.device.fifo_status().await?.tx_full() {
            return Ok(SendOutcome::QueueFull);
        }
        self.device.clear_interrupts().await?;
        self.device.write_payload(&packet).await?;
        Ok(SendOutcome::Queued)
    }

    /// Stops transmitting and powers down, dropping queued packets
    pub async fn into_standby(mut self) -> RadioResult<Standby<SPI, CE, D>, SPI, CE> {
        self.device.power_down().await?;
        self.device.flush_tx().await?;
        Ok(Standby {
            device: self.device,
            config: self.config,
        })
    }
}

impl<SPI, CE, D> DatagramRadio for Transmitter<SPI, CE, D>
where
    SPI: SpiDevice,
    CE: OutputPin,
    D: DelayNs,
{
    type Error = RadioError<SPI::Error, CE::Error>;

    async fn set_group(&mut self, group: u8) -> Result<(), Self::Error> {
        Transmitter::set_group(self, group).await
    }

    async fn set_tx_power(&mut self, power: TxPower) -> Result<(), Self::Error> {
        Transmitter::set_tx_power(self, power).await
    }

    async fn send(&mut self, payload: &[u8]) -> Result<SendOutcome, Self::Error> {
        self.transmit(payload).await
    }
}

/// Radio listening for micro:bit datagrams
pub struct Receiver<SPI, CE, D> {
    device: Nrf24<SPI, CE, D>,
    config: RadioConfig,
}

impl<SPI, CE, D> Receiver<SPI, CE, D>
where
    SPI: SpiDevice,
    CE: OutputPin,
    D: DelayNs,
{
    pub fn config(&self) -> &RadioConfig {
        &self.config
    }

    /// Takes the next packet from the RX FIFO
    ///
    /// Returns `Ok(None)` when nothing is waiting. A packet that fails its
    /// checksum is consumed and reported as [`RadioError::Frame`].
    pub async fn receive(&mut self) -> RadioResult<Option<Frame>, SPI, CE> {
        if self.device.fifo_status().await?.rx_empty() {
            return Ok(None);
        }
        let packet = self.device.read_payload().await?;
        self.device.clear_interrupts().await?;
        let frame = frame::decode(&packet, &Address::new(self.config.group))?;
        Ok(Some(frame))
    }

    /// Stops listening and powers down, dropping unread packets
    pub async fn into_standby(mut self) -> RadioResult<Standby<SPI, CE, D>, SPI, CE> {
        self.device.power_down().await?;
        self.device.flush_rx().await?;
        Ok(Standby {
            device: self.device,
            config: self.config,
        })
    }
}

/// Points both the RX pipe and the TX address at the group
async fn apply_group<SPI, CE, D>(
    device: &mut Nrf24<SPI, CE, D>,
    group: u8,
) -> RadioResult<(), SPI, CE>
where
    SPI: SpiDevice,
    CE: OutputPin,
    D: DelayNs,
{
    let address = Address::new(group).register_bytes();
    device.set_rx_address(&address).await?;
    device.set_tx_address(&address).await
}
