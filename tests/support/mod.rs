#![allow(dead_code)]

use std::collections::VecDeque;

use hades_boot::dispatch::Launch;
use hades_boot::mem::{MemoryBus, RamWindow};
use hades_boot::serial::SerialLink;
use hades_boot::BootError;

pub const RAM_START: u32 = 0x0000_0000;
pub const BOOT_START: u32 = 0x0000_8000;

pub fn window() -> RamWindow {
    RamWindow::new(RAM_START, BOOT_START)
}

/// Serial link fed from a byte script. Running dry reads as a line error,
/// which is how a test transfer ends.
#[derive(Default)]
pub struct ScriptedLink {
    input: VecDeque<u8>,
    pub output: Vec<u8>,
}

impl ScriptedLink {
    pub fn new(text: &str) -> Self {
        Self {
            input: text.bytes().collect(),
            output: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.input.len()
    }
}

impl SerialLink for ScriptedLink {
    fn receive_byte(&mut self) -> Result<u8, BootError> {
        self.input.pop_front().ok_or(BootError::LineError)
    }

    fn transmit_byte(&mut self, byte: u8) {
        self.output.push(byte);
    }
}

/// RAM image covering the whole window plus one page past it, so stray
/// writes beyond the window would be visible.
pub struct ImageMemory {
    base: u32,
    pub bytes: Vec<u8>,
    pub stores: usize,
}

impl ImageMemory {
    pub fn new() -> Self {
        Self::with_base(RAM_START)
    }

    pub fn with_base(base: u32) -> Self {
        Self {
            base,
            bytes: vec![0; (BOOT_START - RAM_START) as usize + 0x1000],
            stores: 0,
        }
    }

    pub fn at(&self, address: u32, len: usize) -> &[u8] {
        let start = (address - self.base) as usize;
        &self.bytes[start..start + len]
    }
}

impl MemoryBus for ImageMemory {
    fn store(&mut self, address: u32, value: u8) {
        self.bytes[(address - self.base) as usize] = value;
        self.stores += 1;
    }
}

#[derive(Default)]
pub struct RecordingLauncher {
    pub entries: Vec<u32>,
}

impl Launch for RecordingLauncher {
    fn launch(&mut self, entry: u32) {
        self.entries.push(entry);
    }
}

pub fn checksum(kind: u8, offset: u16, payload: &[u8]) -> u8 {
    let sum = payload
        .iter()
        .chain(&[payload.len() as u8, (offset >> 8) as u8, offset as u8, kind])
        .fold(0u8, |acc, b| acc.wrapping_add(*b));
    sum.wrapping_neg()
}

/// Formats one record with an explicit checksum byte.
pub fn record_with_checksum(kind: u8, offset: u16, payload: &[u8], checksum: u8) -> String {
    let mut line = format!(":{:02X}{:04X}{:02X}", payload.len(), offset, kind);
    for b in payload {
        line.push_str(&format!("{:02X}", b));
    }
    line.push_str(&format!("{:02X}\n", checksum));
    line
}

pub fn record(kind: u8, offset: u16, payload: &[u8]) -> String {
    record_with_checksum(kind, offset, payload, checksum(kind, offset, payload))
}

pub fn data(offset: u16, payload: &[u8]) -> String {
    record(0, offset, payload)
}

pub fn end_of_file() -> String {
    record(1, 0, &[])
}

pub fn extended_linear(upper: u16) -> String {
    record(4, 0, &upper.to_be_bytes())
}

pub fn extended_segment(segment: u16) -> String {
    record(2, 0, &segment.to_be_bytes())
}

pub fn start_linear(address: u32) -> String {
    record(5, 0, &address.to_be_bytes())
}

pub fn start_segment(cs_ip: u32) -> String {
    record(3, 0, &cs_ip.to_be_bytes())
}
