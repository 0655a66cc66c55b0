//! Intel-HEX record decoding straight off the serial link.
//!
//! A record is `:LLOOOOTT<payload>CC` in uppercase ASCII hex. Bytes before the
//! `:` marker are skipped, which is how the reader resynchronises after noise
//! or a previous record's line ending. Everything after the marker is strict.

use enum_repr::EnumRepr;

use crate::consts::{MAX_RECORD_PAYLOAD, RECORD_START};
use crate::error::BootError;
use crate::serial::SerialLink;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[EnumRepr(type = "u8")]
pub enum RecordType {
    Data = 0,
    EndOfFile = 1,
    ExtendedSegmentAddress = 2,
    StartSegmentAddress = 3,
    ExtendedLinearAddress = 4,
    StartLinearAddress = 5,
}

impl RecordType {
    /// The `(length, offset)` pair a record of this type must carry.
    /// Data records may carry anything.
    fn required_layout(self) -> Option<(u8, u16)> {
        match self {
            RecordType::Data => None,
            RecordType::EndOfFile => Some((0, 0)),
            RecordType::ExtendedSegmentAddress | RecordType::ExtendedLinearAddress => Some((2, 0)),
            RecordType::StartSegmentAddress | RecordType::StartLinearAddress => Some((4, 0)),
        }
    }

    pub fn check_layout(self, length: u8, offset: u16) -> Result<(), BootError> {
        match self.required_layout() {
            Some(required) if required != (length, offset) => Err(BootError::StructuralMismatch {
                kind: self,
                length,
                offset,
            }),
            _ => Ok(()),
        }
    }
}

/// A decoded record, one per variant of the transfer format.
#[derive(Debug, PartialEq, Eq)]
pub enum Record<'a> {
    Data { offset: u16, bytes: &'a [u8] },
    EndOfFile,
    ExtendedSegmentAddress(u16),
    StartSegmentAddress(u32),
    ExtendedLinearAddress(u16),
    StartLinearAddress(u32),
}

/// One framed record whose layout and checksum have already been verified.
pub struct HexRecord {
    length: u8,
    offset: u16,
    kind: RecordType,
    payload: [u8; MAX_RECORD_PAYLOAD],
    checksum: u8,
}

impl HexRecord {
    pub fn length(&self) -> u8 {
        self.length
    }

    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn kind(&self) -> RecordType {
        self.kind
    }

    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.length as usize]
    }

    pub fn record(&self) -> Record<'_> {
        let payload = self.payload();
        match self.kind {
            RecordType::Data => Record::Data {
                offset: self.offset,
                bytes: payload,
            },
            RecordType::EndOfFile => Record::EndOfFile,
            RecordType::ExtendedSegmentAddress => Record::ExtendedSegmentAddress(big_endian(payload) as u16),
            RecordType::StartSegmentAddress => Record::StartSegmentAddress(big_endian(payload)),
            RecordType::ExtendedLinearAddress => Record::ExtendedLinearAddress(big_endian(payload) as u16),
            RecordType::StartLinearAddress => Record::StartLinearAddress(big_endian(payload)),
        }
    }
}

fn big_endian(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0, |acc, b| (acc << 8) | *b as u32)
}

/// Value of one uppercase hex digit.
pub fn hex_digit(c: u8) -> Result<u8, BootError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(BootError::HexDecode { byte: c }),
    }
}

/// Pulls whole records off a serial link.
pub struct RecordReader<'a, L> {
    link: &'a mut L,
    sum: u8,
}

impl<'a, L: SerialLink> RecordReader<'a, L> {
    pub fn new(link: &'a mut L) -> Self {
        Self { link, sum: 0 }
    }

    fn sync(&mut self) -> Result<(), BootError> {
        while self.link.receive_byte()? != RECORD_START {}
        Ok(())
    }

    /// Two hex digits, folded into the running checksum as they arrive.
    fn byte(&mut self) -> Result<u8, BootError> {
        let upper = hex_digit(self.link.receive_byte()?)?;
        let lower = hex_digit(self.link.receive_byte()?)?;
        let value = (upper << 4) | lower;
        self.sum = self.sum.wrapping_add(value);
        Ok(value)
    }

    /// Reads the next record.
    ///
    /// The type and layout are judged as soon as the header is in, so a
    /// malformed record is abandoned before its payload is consumed. Nothing
    /// is handed out until the checksum has been verified.
    pub fn read(&mut self) -> Result<HexRecord, BootError> {
        self.sync()?;
        self.sum = 0;

        let length = self.byte()?;
        let offset_upper = self.byte()?;
        let offset_lower = self.byte()?;
        let offset = u16::from_be_bytes([offset_upper, offset_lower]);

        let code = self.byte()?;
        let kind = RecordType::from_repr(code).ok_or(BootError::UnsupportedRecordType { code })?;
        kind.check_layout(length, offset)?;

        let mut payload = [0u8; MAX_RECORD_PAYLOAD];
        for slot in payload.iter_mut().take(length as usize) {
            *slot = self.byte()?;
        }

        let checksum = self.byte()?;
        if self.sum != 0 {
            return Err(BootError::Checksum { sum: self.sum });
        }

        log::trace!("record {:?} len {:#04x} at {:#06x}", kind, length, offset);

        Ok(HexRecord {
            length,
            offset,
            kind,
            payload,
            checksum,
        })
    }
}
