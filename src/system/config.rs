//! Firmware configuration
//!
//! Everything the Calliope program fixes at compile time: radio group, transmit
//! power and the pause between two datagrams. A Calliope that should receive
//! the counter needs the same group (and the default frequency band 7).

use calliope_radio::{BroadcastConfig, RadioConfig, TxPower};
use embassy_time::Duration;

/// Radio group the counter is sent to
pub const RADIO_GROUP: u8 = 7;

/// Transmit power on the micro:bit scale (0..=7)
pub const TX_POWER: TxPower = TxPower::MAX;

/// Frequency band, 2400 MHz + band MHz (micro:bit default)
pub const FREQUENCY_BAND: u8 = 7;

/// Pause after every datagram (ms)
///
/// Same as the loop yield of the Calliope program.
pub const ITERATION_SLEEP_MS: u32 = 1;

/// Text shown once the broadcaster runs
pub const STATUS_TEXT: &str = "run";

/// Text shown once the receiver listens
pub const RECEIVER_STATUS_TEXT: &str = "listen";

/// Transceiver settings
pub const RADIO: RadioConfig = RadioConfig {
    group: RADIO_GROUP,
    band: FREQUENCY_BAND,
    tx_power: TX_POWER,
};

/// Broadcast loop settings
pub const BROADCAST: BroadcastConfig = BroadcastConfig {
    group: RADIO_GROUP,
    tx_power: TX_POWER,
    interval_ms: ITERATION_SLEEP_MS,
};

/// SPI clock for the nRF24L01+ (max 10 MHz)
pub const SPI_FREQUENCY: u32 = 2_000_000;

/// I2C clock for the status display (fast mode)
pub const I2C_FREQUENCY: u32 = 400_000;

/// Time to flush the logs before resetting after a fatal radio error
pub const RESET_DELAY: Duration = Duration::from_secs(1);

/// Receiver poll interval in case an IRQ edge is missed
pub const RX_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Log every n-th sent value at info level, the others at trace level
pub const LOG_EVERY: u32 = 1_000;
