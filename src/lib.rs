//! Calliope counter firmware
//!
//! Hardware glue and tasks shared by the broadcaster, the receiver and the
//! radio check binaries. The radio protocol itself lives in `calliope-radio`.

#![no_std]

/// System core modules
pub mod system;
/// Task implementations
pub mod task;
