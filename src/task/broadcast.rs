//! Counter broadcast
//!
//! Brings up the transceiver in transmit mode and sends the counter as decimal
//! text to the configured radio group, forever.
use crate::system::config::{BROADCAST, LOG_EVERY, RADIO, STATUS_TEXT};
use crate::system::radio;
use crate::system::resources::RadioResources;
use crate::system::status;
use calliope_radio::{Broadcaster, StepOutcome};
use defmt::{error, info, trace, warn, Debug2Format};
use embassy_time::Delay;

/// Sends 0, 1, 2, ... one datagram per iteration.
///
/// Failures are logged and never retried: the next iteration sends the next
/// number, as the Calliope program does.
#[embassy_executor::task]
pub async fn broadcast(r: RadioResources) {
    let parts = radio::split(r);
    let standby = radio::bring_up(&parts.bus, parts.csn, parts.ce, RADIO).await;

    let transmitter = match standby.into_transmitter().await {
        Ok(transmitter) => transmitter,
        Err(e) => radio::fail("entering transmit mode failed", e).await,
    };
    let mut broadcaster = match Broadcaster::start(transmitter, BROADCAST).await {
        Ok(broadcaster) => broadcaster,
        Err(e) => radio::fail("setting radio group failed", e).await,
    };

    info!(
        "broadcasting to group {} every {} ms",
        BROADCAST.group, BROADCAST.interval_ms
    );
    status::show(STATUS_TEXT);

    let mut delay = Delay;
    loop {
        match broadcaster.cycle(&mut delay).await {
            Ok(StepOutcome::Sent(value)) if value % LOG_EVERY == 0 => info!("sent {}", value),
            Ok(StepOutcome::Sent(value)) => trace!("sent {}", value),
            Ok(StepOutcome::Busy(value)) => warn!("TX queue full, skipped {}", value),
            Err(e) => error!("send failed: {:?}", Debug2Format(&e)),
        }
    }
}
