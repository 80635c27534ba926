use tracing::{debug, info};

use crate::constants::{FCD_USB_PID, FCD_USB_VID, RESPONSE_DATA_LEN};
use crate::error::{FcdError, FcdResult};
use crate::protocol::{self, Command};
use crate::transport::{DeviceBackend, Transport};

/// An open dongle.
///
/// The session exclusively owns its transport; dropping the session closes
/// the device. The protocol has no request ids, so a session must never be
/// driven from more than one place at a time.
pub struct Session {
    transport: Box<dyn Transport>,
    path: Option<String>,
}

impl Session {
    /// Open the dongle at `path`, or the first attached dongle when `path` is `None`
    pub fn open(backend: &mut dyn DeviceBackend, path: Option<&str>) -> FcdResult<Self> {
        let transport = match path {
            Some(path) => backend.open_path(path)?,
            None => backend.open(FCD_USB_VID, FCD_USB_PID)?,
        };

        debug!("Opened session on {}", path.unwrap_or("first device"));
        Ok(Session {
            transport,
            path: path.map(str::to_owned),
        })
    }

    /// Open and confirm the device answers the protocol.
    ///
    /// A device that opens but does not answer the identification query is
    /// treated as absent.
    pub fn open_verified(backend: &mut dyn DeviceBackend, path: Option<&str>) -> FcdResult<Self> {
        let mut session = Self::open(backend, path)?;
        let identity = session.query().map_err(|e| {
            FcdError::DeviceNotFound(format!(
                "{} does not answer identification query ({})",
                path.unwrap_or("first device"),
                e
            ))
        })?;
        info!("Connected to {}", identity);
        Ok(session)
    }

    /// Wrap an already opened transport
    pub fn with_transport(transport: Box<dyn Transport>, path: Option<String>) -> Self {
        Session { transport, path }
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn exchange(
        &mut self,
        opcode: u8,
        skip: usize,
        input: &[u8],
        output_len: usize,
    ) -> FcdResult<Vec<u8>> {
        protocol::exchange(self.transport.as_mut(), opcode, skip, input, output_len)
    }

    pub fn get(&mut self, opcode: u8, output_len: usize) -> FcdResult<Vec<u8>> {
        protocol::get(self.transport.as_mut(), opcode, output_len)
    }

    pub fn set(&mut self, opcode: u8, input: &[u8]) -> FcdResult<()> {
        protocol::set(self.transport.as_mut(), opcode, input)
    }

    pub fn set_skip(&mut self, opcode: u8, input: &[u8], skip: usize) -> FcdResult<()> {
        protocol::set_skip(self.transport.as_mut(), opcode, input, skip)
    }

    /// Identification string, e.g. "FCDAPP 18.09" or "FCDBL"
    pub fn query(&mut self) -> FcdResult<String> {
        self.query_with_capacity(RESPONSE_DATA_LEN)
    }

    /// Identification string read into a buffer of `capacity` bytes.
    ///
    /// The final byte of the buffer is reserved for the terminator, so the
    /// string is at most `capacity - 1` bytes long.
    pub fn query_with_capacity(&mut self, capacity: usize) -> FcdResult<String> {
        if capacity == 0 {
            return Err(FcdError::InvalidArgument(
                "Query buffer must hold at least one byte".to_string(),
            ));
        }

        let mut response = self.get(Command::Query.into(), capacity)?;
        if response.is_empty() {
            return Err(FcdError::Communication(
                "Identification query returned no data".to_string(),
            ));
        }
        let last = response.len() - 1;
        response[last] = 0;

        let end = response.iter().position(|b| *b == 0).unwrap_or(last);
        Ok(String::from_utf8_lossy(&response[..end]).into_owned())
    }

    /// Release the device
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!("Closed session on {}", self.path().unwrap_or("first device"));
    }
}

/// Close a session if there is one; closing nothing is not an error
pub fn close(session: Option<Session>) {
    if let Some(session) = session {
        session.close();
    }
}

/// Call `visit` with the path of every attached dongle, stopping at the first error
pub fn for_each_device<F>(backend: &mut dyn DeviceBackend, mut visit: F) -> FcdResult<()>
where
    F: FnMut(&mut dyn DeviceBackend, &str) -> FcdResult<()>,
{
    let paths = backend.enumerate(FCD_USB_VID, FCD_USB_PID)?;
    for path in paths {
        visit(backend, &path)?;
    }
    Ok(())
}
