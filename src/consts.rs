// Peripheral registers are word-addressed on the bus.
pub const UART_BASE: usize = 0x0008_4000 << 2;

pub const RECORD_START: u8 = b':';
pub const MAX_RECORD_PAYLOAD: usize = 255;
