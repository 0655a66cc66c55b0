use crate::ihex::RecordType;

/// Every way a boot session can be abandoned.
///
/// None of these are fatal to the device: the session driver reports the
/// error once and starts over, waiting for the next record marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootError {
    /// The receiver flagged a line fault while we were waiting for a byte.
    LineError,
    /// A character outside `0-9A-F` where a hex digit was expected.
    HexDecode { byte: u8 },
    UnsupportedRecordType { code: u8 },
    /// Length or offset disagrees with what the record type requires.
    StructuralMismatch {
        kind: RecordType,
        length: u8,
        offset: u16,
    },
    /// Write target outside the RAM window.
    OutOfBounds { address: u32 },
    /// Record bytes did not sum to zero; `sum` is what they summed to.
    Checksum { sum: u8 },
}

impl core::fmt::Display for BootError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BootError::LineError => write!(f, "Error while receiving UART byte"),
            BootError::HexDecode { .. } => write!(f, "Invalid hex character"),
            BootError::UnsupportedRecordType { .. } => write!(f, "Unsupported record type"),
            BootError::StructuralMismatch { .. } => write!(f, "Malformed record"),
            BootError::OutOfBounds { .. } => write!(f, "Can't write outside of RAM"),
            BootError::Checksum { .. } => write!(f, "Wrong checksum"),
        }
    }
}
