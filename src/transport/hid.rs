use std::ffi::CString;

use hidapi::{HidApi, HidDevice};
use tracing::{debug, trace};

use super::{DeviceBackend, Transport};
use crate::error::{FcdError, FcdResult};

/// hidapi device handle; the device is closed when this is dropped
pub struct HidTransport {
    device: HidDevice,
}

impl Transport for HidTransport {
    fn write(&mut self, data: &[u8]) -> FcdResult<usize> {
        let written = self
            .device
            .write(data)
            .map_err(|e| FcdError::Communication(format!("HID write failed: {}", e)))?;
        trace!("Sent bytes {:?}", &data[..written.min(data.len())]);
        Ok(written)
    }

    fn read(&mut self, buffer: &mut [u8]) -> FcdResult<usize> {
        let size = self
            .device
            .read(buffer)
            .map_err(|e| FcdError::Communication(format!("HID read failed: {}", e)))?;
        trace!("Received bytes {:?}", &buffer[..size]);
        Ok(size)
    }
}

/// Device access through the system HID library
pub struct HidBackend {
    api: HidApi,
}

impl HidBackend {
    pub fn new() -> FcdResult<Self> {
        let api = HidApi::new().map_err(|e| {
            FcdError::Communication(format!("Failed to initialise HID library: {}", e))
        })?;
        Ok(HidBackend { api })
    }
}

impl DeviceBackend for HidBackend {
    fn open(&mut self, vendor_id: u16, product_id: u16) -> FcdResult<Box<dyn Transport>> {
        let device = self.api.open(vendor_id, product_id).map_err(|e| {
            FcdError::DeviceNotFound(format!("{:04x}:{:04x} ({})", vendor_id, product_id, e))
        })?;
        debug!("Opened first device {:04x}:{:04x}", vendor_id, product_id);
        Ok(Box::new(HidTransport { device }))
    }

    fn open_path(&mut self, path: &str) -> FcdResult<Box<dyn Transport>> {
        let c_path = CString::new(path)
            .map_err(|_| FcdError::InvalidArgument(format!("Invalid device path {:?}", path)))?;
        let device = self
            .api
            .open_path(&c_path)
            .map_err(|e| FcdError::DeviceNotFound(format!("{} ({})", path, e)))?;
        debug!("Opened device {}", path);
        Ok(Box::new(HidTransport { device }))
    }

    fn enumerate(&mut self, vendor_id: u16, product_id: u16) -> FcdResult<Vec<String>> {
        // Dongles re-enumerate after every reset
        self.api
            .refresh_devices()
            .map_err(|e| FcdError::Communication(format!("Failed to enumerate devices: {}", e)))?;

        let paths = self
            .api
            .device_list()
            .filter(|info| info.vendor_id() == vendor_id && info.product_id() == product_id)
            .map(|info| info.path().to_string_lossy().into_owned())
            .collect::<Vec<_>>();

        debug!("Found {} matching device(s)", paths.len());
        Ok(paths)
    }
}
