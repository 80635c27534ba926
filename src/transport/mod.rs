pub mod hid;
#[cfg(test)]
pub(crate) mod mock;

use crate::error::FcdResult;

/// Raw HID report I/O with an opened dongle
pub trait Transport {
    /// Write one report, returning the number of bytes accepted
    fn write(&mut self, data: &[u8]) -> FcdResult<usize>;

    /// Blocking read of one report into `buffer`, returning the number of bytes read
    fn read(&mut self, buffer: &mut [u8]) -> FcdResult<usize>;
}

/// Opens and enumerates devices, handing out owned transports
pub trait DeviceBackend {
    /// Open the first attached device matching the identifiers
    fn open(&mut self, vendor_id: u16, product_id: u16) -> FcdResult<Box<dyn Transport>>;

    /// Open a specific device by its platform path
    fn open_path(&mut self, path: &str) -> FcdResult<Box<dyn Transport>>;

    /// Paths of all currently attached devices matching the identifiers
    fn enumerate(&mut self, vendor_id: u16, product_id: u16) -> FcdResult<Vec<String>>;
}
