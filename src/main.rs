//! Counter broadcaster entry point
//!
//! Sends 0, 1, 2, ... as radio datagrams a Calliope mini or micro:bit in the
//! same group can receive.

#![no_std]
#![no_main]

use calliope_counter::system::resources;
use calliope_counter::task::{broadcast::broadcast, status_display::status_display};
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::config::Config;
use {defmt_rtt as _, panic_probe as _};

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

/// Firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Config::default());
    let r = resources::split(p);

    spawner.spawn(status_display(r.display)).unwrap();
    spawner.spawn(broadcast(r.radio)).unwrap();
}
