use core::ops::Range;

use crate::error::BootError;

/// The half-open span of RAM a transfer may write: everything from the
/// start of RAM up to, but not including, the resident loader.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct RamWindow {
    start: u32,
    end: u32,
}

impl RamWindow {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, address: u32) -> bool {
        self.start <= address && address < self.end
    }
}

impl From<RamWindow> for Range<u32> {
    fn from(window: RamWindow) -> Self {
        window.start..window.end
    }
}

/// Byte-wide stores into the device address space.
pub trait MemoryBus {
    fn store(&mut self, address: u32, value: u8);
}

/// Writes one byte of a transfer. Anything outside `window` is refused and
/// leaves memory untouched.
pub fn program_byte<M: MemoryBus>(window: &RamWindow, bus: &mut M, address: u32, value: u8) -> Result<(), BootError> {
    if !window.contains(address) {
        return Err(BootError::OutOfBounds { address });
    }
    bus.store(address, value);
    Ok(())
}

/// The real address space, written through volatile stores.
pub struct PhysicalMemory {
    _private: (),
}

impl PhysicalMemory {
    /// # Safety
    ///
    /// Every address later handed to `store` must be plain RAM that nothing
    /// else is using. `program_byte` ensures this for the RAM window.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl MemoryBus for PhysicalMemory {
    fn store(&mut self, address: u32, value: u8) {
        unsafe { core::ptr::write_volatile(address as usize as *mut u8, value) }
    }
}
