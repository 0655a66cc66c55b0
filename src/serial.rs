use crate::consts::UART_BASE;
use crate::error::BootError;

/// A blocking, byte-at-a-time serial channel.
///
/// Receiving spins until a byte arrives or the line reports a fault.
/// Transmitting is only ever used for diagnostics.
pub trait SerialLink {
    fn receive_byte(&mut self) -> Result<u8, BootError>;
    fn transmit_byte(&mut self, byte: u8);

    fn transmit_str(&mut self, s: &str) {
        for c in s.as_bytes() {
            self.transmit_byte(*c);
        }
    }
}

mod offsets {
    pub const DATA: usize = 0x0;
    pub const RX_STATUS: usize = 0x2;
    pub const TX_STATUS: usize = 0x3;
}

bitflags::bitflags! {
    pub struct RxStatus: u8 {
        const ERROR = 1 << 0;
        const INTERRUPT_ENABLE = 1 << 1;
        const FULL = 1 << 2;
    }
}

bitflags::bitflags! {
    pub struct TxStatus: u8 {
        const ERROR = 1 << 0;
        const INTERRUPT_ENABLE = 1 << 1;
        const EMPTY = 1 << 2;
    }
}

/// The HaDes-V UART: one data register and two status bytes, polled only.
pub struct HadesUart {
    base: usize,
}

impl HadesUart {
    pub const fn new(base: usize) -> Self {
        Self { base }
    }

    fn rx_status(&self) -> RxStatus {
        let raw = unsafe { core::ptr::read_volatile((self.base + offsets::RX_STATUS) as *const u8) };
        RxStatus::from_bits_truncate(raw)
    }

    fn tx_status(&self) -> TxStatus {
        let raw = unsafe { core::ptr::read_volatile((self.base + offsets::TX_STATUS) as *const u8) };
        TxStatus::from_bits_truncate(raw)
    }

    pub fn putchar(&self, c: u8) {
        while !self.tx_status().contains(TxStatus::EMPTY) {}

        unsafe {
            core::ptr::write_volatile((self.base + offsets::DATA) as *mut u8, c);
        }
    }

    pub fn getchar(&self) -> Result<u8, BootError> {
        loop {
            let status = self.rx_status();
            if status.contains(RxStatus::FULL) {
                return Ok(unsafe { core::ptr::read_volatile((self.base + offsets::DATA) as *const u8) });
            }

            if status.contains(RxStatus::ERROR) {
                return Err(BootError::LineError);
            }
        }
    }
}

impl SerialLink for HadesUart {
    fn receive_byte(&mut self) -> Result<u8, BootError> {
        self.getchar()
    }

    fn transmit_byte(&mut self, byte: u8) {
        self.putchar(byte)
    }
}

static SERIAL: HadesUart = HadesUart::new(UART_BASE);

pub fn putc(c: u8) {
    SERIAL.putchar(c);
}

pub fn print(s: &str) {
    for c in s.as_bytes() {
        putc(*c);
    }
}

use core::fmt::Write;
struct SerialStdout;

impl Write for SerialStdout {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        print(s);
        Ok(())
    }
}

pub fn fprint(args: core::fmt::Arguments) -> core::fmt::Result {
    SerialStdout.write_fmt(args)
}

#[macro_export]
macro_rules! uprint {
    ($($arg:tt)*) => ({
        // Nowhere to report a failed diagnostic to.
        let _ = $crate::serial::fprint(format_args!($($arg)*));
    });
}

#[macro_export]
macro_rules! uprintln {
    () => ($crate::uprint!("\n"));
    ($($arg:tt)*) => ($crate::uprint!("{}\n", format_args!($($arg)*)));
}
