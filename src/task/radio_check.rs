//! Transceiver bring-up check
//!
//! Configures the nRF24L01+ like the broadcaster does, then dumps the
//! registers that decide whether a Calliope can hear it. Useful when wiring a
//! new board: a wrong pin shows up as a failed probe, a wrong setting as an
//! unexpected register value.
use crate::system::config::RADIO;
use crate::system::radio;
use crate::system::resources::RadioResources;
use crate::system::status;
use calliope_radio::nrf24::register;
use calliope_radio::Address;
use defmt::{info, warn, Debug2Format};
use embassy_time::{Duration, Timer};

/// Time between two register dumps
const DUMP_INTERVAL: Duration = Duration::from_secs(2);

#[embassy_executor::task]
pub async fn radio_check(r: RadioResources) {
    let parts = radio::split(r);
    let mut standby = radio::bring_up(&parts.bus, parts.csn, parts.ce, RADIO).await;
    status::show("nRF24 ok");

    let address = Address::new(RADIO.group);
    let expected = address.register_bytes();

    loop {
        let device = standby.device();
        let registers = [
            ("CONFIG", register::CONFIG),
            ("EN_AA", register::EN_AA),
            ("EN_RXADDR", register::EN_RXADDR),
            ("SETUP_AW", register::SETUP_AW),
            ("SETUP_RETR", register::SETUP_RETR),
            ("RF_CH", register::RF_CH),
            ("RF_SETUP", register::RF_SETUP),
            ("STATUS", register::STATUS),
            ("RX_PW_P0", register::RX_PW_P0),
            ("FIFO_STATUS", register::FIFO_STATUS),
        ];
        for (name, reg) in registers {
            match device.read_register(reg).await {
                Ok(value) => info!("{=str} = {=u8:#x}", name, value),
                Err(e) => warn!("reading {=str} failed: {:?}", name, Debug2Format(&e)),
            }
        }

        match device.read_address(register::TX_ADDR).await {
            Ok(read) if read == expected => {
                info!("TX_ADDR = {=[u8]:x} (group {})", &read[..], address.group())
            }
            Ok(read) => warn!(
                "TX_ADDR = {=[u8]:x}, expected {=[u8]:x} for group {}",
                &read[..],
                &expected[..],
                address.group()
            ),
            Err(e) => warn!("reading TX_ADDR failed: {:?}", Debug2Format(&e)),
        }

        match (device.status().await, device.fifo_status().await) {
            (Ok(status), Ok(fifo)) => info!(
                "rx ready {}, tx sent {}, tx empty {}, rx empty {}",
                status.data_ready(),
                status.data_sent(),
                fifo.tx_empty(),
                fifo.rx_empty()
            ),
            (Err(e), _) | (_, Err(e)) => warn!("reading status failed: {:?}", Debug2Format(&e)),
        }

        Timer::after(DUMP_INTERVAL).await;
    }
}
