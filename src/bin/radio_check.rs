//! Transceiver check firmware
//!
//! Probes the nRF24L01+ and logs its configuration every two seconds.

#![no_std]
#![no_main]

use calliope_counter::system::resources;
use calliope_counter::task::{radio_check::radio_check, status_display::status_display};
use defmt::info;
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::config::Config;
use {defmt_rtt as _, panic_probe as _};

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Config::default());
    let r = resources::split(p);

    info!("RP2350 initialized - radio check running");

    spawner.spawn(status_display(r.display)).unwrap();
    spawner.spawn(radio_check(r.radio)).unwrap();
}
