//! Counter broadcast loop
//!
//! Sends the decimal text of a counter as one datagram per iteration, the way
//! the Calliope counter program does:
//!
//! 1. set the transmit power
//! 2. send the counter text to the group
//! 3. advance the counter
//! 4. sleep for the configured interval
//!
//! The group is applied once in [`Broadcaster::start`]. Failures are handed
//! back to the caller and never retried: the counter advances and the pause is
//! taken on every iteration, so a value the radio rejected is simply skipped.

use embedded_hal_async::delay::DelayNs;

use crate::counter::Counter;
use crate::radio::{SendOutcome, TxPower};

/// Radio that can send datagrams to a group
#[allow(async_fn_in_trait)]
pub trait DatagramRadio {
    type Error;

    /// Switches to a radio group
    async fn set_group(&mut self, group: u8) -> Result<(), Self::Error>;

    /// Sets the transmit power
    async fn set_tx_power(&mut self, power: TxPower) -> Result<(), Self::Error>;

    /// Sends one datagram
    async fn send(&mut self, payload: &[u8]) -> Result<SendOutcome, Self::Error>;
}

/// Fixed broadcast settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BroadcastConfig {
    pub group: u8,
    pub tx_power: TxPower,
    /// Pause after every iteration, in milliseconds
    pub interval_ms: u32,
}

/// What one iteration did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepOutcome {
    /// The value was handed to the radio
    Sent(u32),
    /// The radio had no room; the value is skipped
    Busy(u32),
}

/// Sends an incrementing counter forever
pub struct Broadcaster<R> {
    radio: R,
    config: BroadcastConfig,
    counter: Counter,
}

impl<R: DatagramRadio> Broadcaster<R> {
    /// Applies the group and returns a broadcaster starting at 0
    pub async fn start(mut radio: R, config: BroadcastConfig) -> Result<Self, R::Error> {
        radio.set_group(config.group).await?;
        Ok(Self {
            radio,
            config,
            counter: Counter::new(),
        })
    }

    pub fn config(&self) -> &BroadcastConfig {
        &self.config
    }

    /// Value the next datagram carries
    pub fn counter(&self) -> Counter {
        self.counter
    }

    pub fn radio(&mut self) -> &mut R {
        &mut self.radio
    }

    /// One iteration without the pause
    ///
    /// The counter moves on whatever the radio answered; a value that could
    /// not be sent is skipped.
    pub async fn step(&mut self) -> Result<StepOutcome, R::Error> {
        let value = self.counter.value();
        let outcome = self.send_current().await;
        self.counter.advance();
        outcome.map(|sent| match sent {
            SendOutcome::Queued => StepOutcome::Sent(value),
            SendOutcome::QueueFull => StepOutcome::Busy(value),
        })
    }

    /// One iteration followed by the pause, which happens whatever the
    /// iteration's outcome
    pub async fn cycle<D: DelayNs>(&mut self, delay: &mut D) -> Result<StepOutcome, R::Error> {
        let outcome = self.step().await;
        delay.delay_ms(self.config.interval_ms).await;
        outcome
    }

    async fn send_current(&mut self) -> Result<SendOutcome, R::Error> {
        self.radio.set_tx_power(self.config.tx_power).await?;
        let payload = self.counter.payload();
        self.radio.send(payload.as_bytes()).await
    }
}
