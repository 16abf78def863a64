//! Driver for the NXP PN512 contactless front-end over SPI.
//!
//! Built on the [`embedded-hal`](https://crates.io/crates/embedded-hal) 1.0
//! traits: any `SpiDevice` plus a `DelayNs` source will do. The host owns bus
//! configuration (250 kHz clock, 8-bit words, mode 0, chip select held low
//! across each logical operation) and hands the driver a live device.
#![cfg_attr(not(test), no_std)]

pub mod commands;
pub mod errors;
pub mod pn512;
pub mod registers;

pub use errors::Error;
pub use pn512::Pn512;
