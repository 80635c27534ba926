//! Scripted transport for unit tests.
//!
//! Responses are queued up front and replayed in order, one per read. Every
//! written frame is recorded so tests can assert on the exact wire bytes.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::{DeviceBackend, Transport};
use crate::constants::STATUS_SUCCESS;
use crate::error::{FcdError, FcdResult};

#[derive(Debug, Default)]
pub(crate) struct MockState {
    pub written: Vec<Vec<u8>>,
    pub responses: VecDeque<Vec<u8>>,
    /// Report this many bytes fewer than requested on every write
    pub short_write: usize,
    pub reads: usize,
}

impl MockState {
    pub fn opcodes(&self) -> Vec<u8> {
        self.written.iter().map(|frame| frame[1]).collect()
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    pub state: Rc<RefCell<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response echoing `opcode`
    pub fn respond(&self, opcode: u8, payload: &[u8]) -> &Self {
        self.respond_raw([&[opcode, STATUS_SUCCESS][..], payload].concat())
    }

    pub fn respond_raw(&self, response: Vec<u8>) -> &Self {
        self.state.borrow_mut().responses.push_back(response);
        self
    }

    pub fn written(&self) -> Vec<Vec<u8>> {
        self.state.borrow().written.clone()
    }

    pub fn opcodes(&self) -> Vec<u8> {
        self.state.borrow().opcodes()
    }
}

impl Transport for MockTransport {
    fn write(&mut self, data: &[u8]) -> FcdResult<usize> {
        let mut state = self.state.borrow_mut();
        state.written.push(data.to_vec());
        Ok(data.len().saturating_sub(state.short_write))
    }

    fn read(&mut self, buffer: &mut [u8]) -> FcdResult<usize> {
        let mut state = self.state.borrow_mut();
        state.reads += 1;
        let Some(response) = state.responses.pop_front() else {
            return Err(FcdError::Communication("No response queued".to_string()));
        };
        let len = response.len().min(buffer.len());
        buffer[..len].copy_from_slice(&response[..len]);
        Ok(len)
    }
}

/// Backend handing out clones of pre-built mock transports by path
#[derive(Default)]
pub(crate) struct MockBackend {
    pub devices: Vec<(String, MockTransport)>,
    pub opened: Vec<String>,
}

impl MockBackend {
    pub fn with_device(mut self, path: &str, transport: MockTransport) -> Self {
        self.devices.push((path.to_string(), transport));
        self
    }
}

impl DeviceBackend for MockBackend {
    fn open(&mut self, _vendor_id: u16, _product_id: u16) -> FcdResult<Box<dyn Transport>> {
        let path = self
            .devices
            .first()
            .map(|(path, _)| path.clone())
            .ok_or_else(|| FcdError::DeviceNotFound("no devices".to_string()))?;
        self.open_path(&path)
    }

    fn open_path(&mut self, path: &str) -> FcdResult<Box<dyn Transport>> {
        let transport = self
            .devices
            .iter()
            .find(|(candidate, _)| candidate == path)
            .map(|(_, transport)| transport.clone())
            .ok_or_else(|| FcdError::DeviceNotFound(path.to_string()))?;
        self.opened.push(path.to_string());
        Ok(Box::new(transport))
    }

    fn enumerate(&mut self, _vendor_id: u16, _product_id: u16) -> FcdResult<Vec<String>> {
        Ok(self.devices.iter().map(|(path, _)| path.clone()).collect())
    }
}
