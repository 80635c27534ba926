use std::fmt;

use thiserror::Error;

/// Step of the bootloader flash procedure that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashStep {
    Erase,
    RangeQuery,
    SetAddress,
    WriteBlock { address: u32 },
    ReadBlock { address: u32 },
}

impl fmt::Display for FlashStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashStep::Erase => write!(f, "erase failed"),
            FlashStep::RangeQuery => write!(f, "get_address_range failed"),
            FlashStep::SetAddress => write!(f, "set address failed"),
            FlashStep::WriteBlock { address } => write!(f, "write failed at 0x{address:08x}"),
            FlashStep::ReadBlock { address } => write!(f, "read failed at 0x{address:08x}"),
        }
    }
}

#[derive(Error, Debug)]
pub enum FcdError {
    #[error("Communication error: {0}")]
    Communication(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error(
        "Command {opcode} rejected: response command {response_opcode}, status {status}"
    )]
    Protocol {
        opcode: u8,
        response_opcode: u8,
        status: u8,
    },

    #[error("Command {opcode} returned unexpected value {value}")]
    UnexpectedValue { opcode: u8, value: u8 },

    #[error("Invalid address range 0x{start:08x} - 0x{end:08x}")]
    InvalidRange { start: u32, end: u32 },

    #[error("Firmware image of {size} bytes is smaller than flash end 0x{end:08x}")]
    ImageTooSmall { size: usize, end: u32 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Firmware error: {0}")]
    FirmwareError(String),

    #[error("{step}: {source}")]
    Flash {
        step: FlashStep,
        #[source]
        source: Box<FcdError>,
    },

    #[error("Verify failed for {path}: flash differs from image at 0x{address:08x}")]
    VerifyMismatch { path: String, address: u32 },
}

impl FcdError {
    pub(crate) fn at_step(step: FlashStep) -> impl FnOnce(FcdError) -> FcdError {
        move |source| FcdError::Flash {
            step,
            source: Box::new(source),
        }
    }
}

pub type FcdResult<T> = std::result::Result<T, FcdError>;
