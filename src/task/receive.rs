//! Datagram receiver
//!
//! Listens on the configured group and shows every datagram it decodes, the
//! counterpart of the broadcast task for checking a link without a Calliope.
use crate::system::config::{RADIO, RECEIVER_STATUS_TEXT, RX_POLL_INTERVAL};
use crate::system::radio;
use crate::system::resources::RadioResources;
use crate::system::status;
use calliope_radio::RadioError;
use defmt::{error, info, warn, Debug2Format};
use embassy_futures::select::select;
use embassy_time::Timer;

#[embassy_executor::task]
pub async fn receive(r: RadioResources) {
    let mut parts = radio::split(r);
    let standby = radio::bring_up(&parts.bus, parts.csn, parts.ce, RADIO).await;

    let mut receiver = match standby.into_receiver().await {
        Ok(receiver) => receiver,
        Err(e) => radio::fail("entering receive mode failed", e).await,
    };

    info!("listening on group {}, band {}", RADIO.group, RADIO.band);
    status::show(RECEIVER_STATUS_TEXT);

    loop {
        // IRQ stays low until the RX_DR flag is cleared, the timer covers a missed edge
        select(parts.irq.wait_for_low(), Timer::after(RX_POLL_INTERVAL)).await;

        loop {
            match receiver.receive().await {
                Ok(Some(frame)) => match frame.text() {
                    Some(text) => {
                        info!("group {}: {}", frame.group, text);
                        status::show(text);
                    }
                    None => info!("group {}: {=[u8]:x}", frame.group, frame.payload.as_slice()),
                },
                Ok(None) => break,
                Err(RadioError::Frame(e)) => warn!("dropped packet: {}", e),
                Err(e) => {
                    error!("receive failed: {:?}", Debug2Format(&e));
                    break;
                }
            }
        }
    }
}
