//! Core system components shared by all binaries
pub mod config;
pub mod radio;
pub mod resources;
pub mod status;
