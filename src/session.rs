use crate::dispatch::Launch;
use crate::error::BootError;
use crate::ihex::{Record, RecordReader};
use crate::mem::{program_byte, MemoryBus, RamWindow};
use crate::serial::SerialLink;

/// Address bookkeeping for one transfer.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct AddressState {
    /// Added to every data record offset. Set by address-extension records.
    pub base_address: u32,
    /// Where the program is entered once the transfer completes.
    pub start_address: u32,
}

impl AddressState {
    pub fn new(window: &RamWindow) -> Self {
        Self {
            base_address: 0,
            start_address: window.start(),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Progress {
    Continue,
    Complete,
}

/// CS:IP to a linear address, `CS * 16 + IP`.
fn segment_to_linear(address: u32) -> u32 {
    ((address >> 16) << 4).wrapping_add((address << 16) >> 16)
}

/// One transfer, from the first record marker to an end-of-file record or
/// the first error. Starting over means building a new `Session`.
pub struct Session<'a, L, M> {
    link: &'a mut L,
    memory: &'a mut M,
    window: RamWindow,
    state: AddressState,
}

impl<'a, L: SerialLink, M: MemoryBus> Session<'a, L, M> {
    pub fn new(link: &'a mut L, memory: &'a mut M, window: RamWindow) -> Self {
        Self {
            link,
            memory,
            state: AddressState::new(&window),
            window,
        }
    }

    pub fn state(&self) -> AddressState {
        self.state
    }

    pub fn apply(&mut self, record: Record<'_>) -> Result<Progress, BootError> {
        match record {
            Record::Data { offset, bytes } => {
                let base = self.state.base_address.wrapping_add(offset as u32);
                for (i, byte) in bytes.iter().enumerate() {
                    program_byte(&self.window, &mut *self.memory, base.wrapping_add(i as u32), *byte)?;
                }
            }
            Record::EndOfFile => return Ok(Progress::Complete),
            Record::ExtendedSegmentAddress(segment) => {
                self.state.base_address = (segment as u32) << 4;
                log::debug!("base address {:#010x}", self.state.base_address);
            }
            Record::ExtendedLinearAddress(upper) => {
                self.state.base_address = (upper as u32) << 16;
                log::debug!("base address {:#010x}", self.state.base_address);
            }
            Record::StartSegmentAddress(cs_ip) => {
                self.state.start_address = segment_to_linear(cs_ip);
                log::debug!("start address {:#010x}", self.state.start_address);
            }
            Record::StartLinearAddress(address) => {
                self.state.start_address = address;
                log::debug!("start address {:#010x}", self.state.start_address);
            }
        }
        Ok(Progress::Continue)
    }

    /// Consumes records until end-of-file and returns the entry point.
    pub fn run(&mut self) -> Result<u32, BootError> {
        loop {
            let record = RecordReader::new(&mut *self.link).read()?;
            if self.apply(record.record())? == Progress::Complete {
                return Ok(self.state.start_address);
            }
        }
    }
}

/// One complete attempt: announce, receive, and on success enter the program.
///
/// Returns when the transfer failed or the program came back.
pub fn boot_once<L, M, J>(link: &mut L, memory: &mut M, window: RamWindow, launcher: &mut J) -> Result<(), BootError>
where
    L: SerialLink,
    M: MemoryBus,
    J: Launch,
{
    log::info!("Bootloader started!");
    log::info!("Ready to receive .hex file...");

    let entry = match Session::new(link, memory, window).run() {
        Ok(entry) => entry,
        Err(err) => {
            log::error!("{}", err);
            return Err(err);
        }
    };

    log::info!("Programmed device successfully!");
    launcher.launch(entry);
    Ok(())
}

/// Runs boot sessions forever. A failed transfer and a program that
/// returns are handled the same way: wait for the host to send again.
pub fn serve<L, M, J>(link: &mut L, memory: &mut M, window: RamWindow, launcher: &mut J) -> !
where
    L: SerialLink,
    M: MemoryBus,
    J: Launch,
{
    loop {
        // Already reported by boot_once.
        let _ = boot_once(link, memory, window, launcher);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;

    impl SerialLink for Silent {
        fn receive_byte(&mut self) -> Result<u8, BootError> {
            Err(BootError::LineError)
        }

        fn transmit_byte(&mut self, _byte: u8) {}
    }

    struct Ram {
        base: u32,
        bytes: [u8; 0x40],
    }

    impl MemoryBus for Ram {
        fn store(&mut self, address: u32, value: u8) {
            self.bytes[(address - self.base) as usize] = value;
        }
    }

    fn ram() -> Ram {
        Ram {
            base: 0x1000,
            bytes: [0; 0x40],
        }
    }

    #[test]
    fn fresh_state() {
        let state = AddressState::new(&RamWindow::new(0x1000, 0x1040));
        assert_eq!(state.base_address, 0);
        assert_eq!(state.start_address, 0x1000);
    }

    #[test]
    fn segment_conversion() {
        assert_eq!(segment_to_linear(0x1234_5678), 0x0001_79b8);
        assert_eq!(segment_to_linear(0x0000_8000), 0x0000_8000);
        assert_eq!(segment_to_linear(0xffff_ffff), 0x0010_ffef);
    }

    #[test]
    fn address_records_update_state() {
        let mut link = Silent;
        let mut memory = ram();
        let mut session = Session::new(&mut link, &mut memory, RamWindow::new(0x1000, 0x1040));

        assert_eq!(session.apply(Record::ExtendedLinearAddress(0x0010)), Ok(Progress::Continue));
        assert_eq!(session.state().base_address, 0x0010_0000);

        assert_eq!(session.apply(Record::ExtendedSegmentAddress(0x0100)), Ok(Progress::Continue));
        assert_eq!(session.state().base_address, 0x0000_1000);

        assert_eq!(session.apply(Record::StartLinearAddress(0x1020)), Ok(Progress::Continue));
        assert_eq!(session.state().start_address, 0x1020);

        assert_eq!(session.apply(Record::StartSegmentAddress(0x0100_0004)), Ok(Progress::Continue));
        assert_eq!(session.state().start_address, 0x1004);

        assert_eq!(session.apply(Record::EndOfFile), Ok(Progress::Complete));
    }

    #[test]
    fn data_lands_at_base_plus_offset() {
        let mut link = Silent;
        let mut memory = ram();
        {
            let mut session = Session::new(&mut link, &mut memory, RamWindow::new(0x1000, 0x1040));
            session.apply(Record::ExtendedSegmentAddress(0x0100)).unwrap();
            session
                .apply(Record::Data {
                    offset: 0x0020,
                    bytes: &[1, 2, 3],
                })
                .unwrap();
        }
        assert_eq!(&memory.bytes[0x20..0x23], &[1, 2, 3]);
    }

    #[test]
    fn data_past_window_keeps_earlier_bytes() {
        let mut link = Silent;
        let mut memory = ram();
        {
            let mut session = Session::new(&mut link, &mut memory, RamWindow::new(0x1000, 0x1040));
            session.apply(Record::ExtendedSegmentAddress(0x0100)).unwrap();
            assert_eq!(
                session.apply(Record::Data {
                    offset: 0x003e,
                    bytes: &[7, 8, 9],
                }),
                Err(BootError::OutOfBounds { address: 0x1040 })
            );
        }
        assert_eq!(&memory.bytes[0x3e..], &[7, 8]);
    }

    #[test]
    fn run_stops_on_line_error() {
        let mut link = Silent;
        let mut memory = ram();
        let mut session = Session::new(&mut link, &mut memory, RamWindow::new(0x1000, 0x1040));
        assert_eq!(session.run(), Err(BootError::LineError));
    }
}
