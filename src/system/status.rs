//! Status text
//!
//! Latest-value signal between the radio tasks and the status display. A new
//! text replaces one the display has not picked up yet, so a slow display never
//! holds up the radio.
use calliope_radio::MAX_PAYLOAD;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use heapless::String;

/// Longest text shown; a full datagram payload fits
pub const MAX_STATUS_LEN: usize = MAX_PAYLOAD;

pub type StatusText = String<MAX_STATUS_LEN>;

/// Signal carrying the text to show next
static STATUS_CHANGED: Signal<CriticalSectionRawMutex, StatusText> = Signal::new();

/// Shows `text` on the status display, cut to [`MAX_STATUS_LEN`] bytes
pub fn show(text: &str) {
    let mut status = StatusText::new();
    for c in text.chars() {
        if status.push(c).is_err() {
            break;
        }
    }
    STATUS_CHANGED.signal(status);
}

/// Waits for the next text to show
pub async fn wait() -> StatusText {
    STATUS_CHANGED.wait().await
}
