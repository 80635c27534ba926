use std::fs;
use std::path::Path;

use ihex::{Reader, Record};
use tracing::debug;

use crate::constants::FLASH_FILL_BYTE;
use crate::error::{FcdError, FcdResult};

/// Firmware image indexed by absolute flash address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashImage {
    data: Vec<u8>,
}

impl FlashImage {
    pub fn from_binary(data: Vec<u8>) -> Self {
        FlashImage { data }
    }

    /// Parse intel hex text, placing each data record at its absolute address
    pub fn from_intel_hex(hex_content: &str) -> FcdResult<Self> {
        let mut data = Vec::new();
        let mut base: usize = 0;

        for record in Reader::new(hex_content) {
            let record = record.map_err(|e| {
                FcdError::FirmwareError(format!("Failed parsing record in hex file {:?}", e))
            })?;
            match record {
                Record::Data { offset, value } => {
                    let start = base + offset as usize;
                    let end = start + value.len();
                    if data.len() < end {
                        data.resize(end, FLASH_FILL_BYTE);
                    }
                    data[start..end].copy_from_slice(&value);
                }
                Record::ExtendedSegmentAddress(segment) => base = (segment as usize) << 4,
                Record::ExtendedLinearAddress(upper) => base = (upper as usize) << 16,
                Record::EndOfFile => break,
                _ => {}
            }
        }

        Ok(FlashImage { data })
    }

    /// Load an image file; `.hex`/`.ihex` files are parsed as intel hex, anything else is raw binary
    pub fn load(path: &Path) -> FcdResult<Self> {
        let is_hex = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("hex") || ext.eq_ignore_ascii_case("ihex"));

        let image = if is_hex {
            let hex_content = fs::read_to_string(path).map_err(|e| {
                FcdError::FirmwareError(format!("Could not read {}: {}", path.display(), e))
            })?;
            Self::from_intel_hex(&hex_content)?
        } else {
            let data = fs::read(path).map_err(|e| {
                FcdError::FirmwareError(format!("Could not read {}: {}", path.display(), e))
            })?;
            Self::from_binary(data)
        };

        debug!("Loaded {} byte image from {}", image.len(), path.display());
        Ok(image)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
