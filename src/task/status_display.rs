//! Status display
//!
//! Shows the latest status text on the SSD1306 OLED. The display is optional:
//! without one the task logs a warning and ends, the radio keeps running.
use crate::system::config::I2C_FREQUENCY;
use crate::system::resources::{DisplayResources, Irqs};
use crate::system::status;
use defmt::{info, warn, Debug2Format};
use embassy_rp::i2c::{self, I2c};
use embedded_graphics::{
    mono_font::{ascii::FONT_9X18_BOLD, MonoTextStyleBuilder},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use ssd1306::{prelude::*, I2CDisplayInterface, Ssd1306Async};

#[embassy_executor::task]
pub async fn status_display(r: DisplayResources) {
    let mut config = i2c::Config::default();
    config.frequency = I2C_FREQUENCY;
    let i2c = I2c::new_async(r.i2c, r.scl_pin, r.sda_pin, Irqs, config);

    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306Async::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    if let Err(e) = display.init().await {
        warn!("no status display: {:?}", Debug2Format(&e));
        return;
    }
    info!("status display ready");

    let text_style = MonoTextStyleBuilder::new()
        .font(&FONT_9X18_BOLD)
        .text_color(BinaryColor::On)
        .build();

    loop {
        let text = status::wait().await;

        display.clear_buffer();
        // 9x18 font, two rows of 14 characters
        let split = text.char_indices().nth(14).map_or(text.len(), |(i, _)| i);
        let (first, second) = text.split_at(split);
        for (row, line) in [first, second].into_iter().enumerate() {
            let origin = Point::new(0, 18 * row as i32);
            let row_text = Text::with_baseline(line, origin, text_style, Baseline::Top);
            if let Err(e) = row_text.draw(&mut display) {
                warn!("drawing status row {} failed: {:?}", row, Debug2Format(&e));
            }
        }

        if let Err(e) = display.flush().await {
            warn!("display flush failed: {:?}", Debug2Format(&e));
        }
    }
}
