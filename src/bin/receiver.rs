//! Datagram receiver entry point
//!
//! Listens on the broadcaster's group and shows what arrives. Run it on a
//! second board to check a broadcaster without a Calliope at hand.

#![no_std]
#![no_main]

use calliope_counter::system::resources;
use calliope_counter::task::{receive::receive, status_display::status_display};
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

    spawner.spawn(status_display(r.display)).unwrap();
    spawner.spawn(receive(r.radio)).unwrap();
}
