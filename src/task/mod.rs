pub mod broadcast;
pub mod radio_check;
pub mod receive;
pub mod status_display;
