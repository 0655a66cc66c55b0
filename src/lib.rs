//! Serial Intel-HEX bootloader for the HaDes-V RISC-V SoC.
//!
//! The loader copies itself from boot storage to the top of RAM, then
//! receives a program as Intel-HEX records over the UART, writes it below
//! itself and jumps to it. Everything here except the register-level
//! drivers is plain logic and runs on the host under `cargo test`.

#![cfg_attr(not(test), no_std)]

pub mod consts;
pub mod dispatch;
pub mod error;
pub mod ihex;
pub mod logger;
pub mod mem;
pub mod reloc;
pub mod serial;
pub mod session;

pub use error::BootError;
