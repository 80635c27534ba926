//! Command/response framing for the dongle's HID protocol.
//!
//! Every exchange writes one 65 byte report (report id 0, command byte,
//! 63 payload bytes) and reads back `payload + 2` bytes: the echoed command
//! byte, a status byte and the response payload.

use tracing::{debug, trace};

use crate::constants::{
    COMMAND_DATA_LEN, FRAME_LEN, RESPONSE_DATA_LEN, RESPONSE_HEADER_LEN, STATUS_SUCCESS,
};
use crate::error::{FcdError, FcdResult};
use crate::transport::Transport;

/// Fixed command opcodes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Returns an identification string such as "FCDAPP 18.09"
    Query = 1,

    // Bootloader
    ResetApplication = 8,
    EraseApplication = 24,
    SetByteAddress = 25,
    GetByteAddressRange = 26,
    /// Payload starts one byte later than every other command
    WriteBlock = 27,
    ReadBlock = 28,

    // Application
    SetFrequencyKhz = 100,
    SetFrequencyHz = 101,
    GetFrequencyHz = 102,
    GetIfRssi = 104,
    GetPllLock = 105,
    SetDcCorrection = 106,
    GetDcCorrection = 107,
    SetIqCorrection = 108,
    GetIqCorrection = 109,
    ResetBootloader = 255,
}

impl From<Command> for u8 {
    fn from(command: Command) -> u8 {
        command as u8
    }
}

/// Build the outgoing report.
///
/// `skip` zero bytes precede the payload. Input that does not fit in the
/// remaining payload space is truncated.
pub(crate) fn build_frame(opcode: u8, skip: usize, input: &[u8]) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    frame[1] = opcode;

    let skip = skip.min(COMMAND_DATA_LEN);
    let len = input.len().min(COMMAND_DATA_LEN - skip);
    let start = 2 + skip;
    frame[start..start + len].copy_from_slice(&input[..len]);
    frame
}

fn validate_response(opcode: u8, response: &[u8]) -> FcdResult<()> {
    let (response_opcode, status) = (response[0], response[1]);
    if response_opcode != opcode || status != STATUS_SUCCESS {
        return Err(FcdError::Protocol {
            opcode,
            response_opcode,
            status,
        });
    }
    Ok(())
}

/// Perform one write/read exchange and return `output_len` bytes of response payload.
///
/// `output_len` is capped at the 62 byte response payload.
pub fn exchange(
    transport: &mut dyn Transport,
    opcode: u8,
    skip: usize,
    input: &[u8],
    output_len: usize,
) -> FcdResult<Vec<u8>> {
    let frame = build_frame(opcode, skip, input);
    debug!(
        "Command {} with {} payload byte(s), expecting {}",
        opcode,
        input.len(),
        output_len
    );

    let written = transport.write(&frame)?;
    if written < frame.len() {
        return Err(FcdError::Communication(format!(
            "Short write for command {}: {} of {} bytes",
            opcode,
            written,
            frame.len()
        )));
    }

    let output_len = output_len.min(RESPONSE_DATA_LEN);
    let mut response = vec![0u8; output_len + RESPONSE_HEADER_LEN];
    let read = transport.read(&mut response)?;
    if read < response.len() {
        return Err(FcdError::Communication(format!(
            "Short read for command {}: {} of {} bytes",
            opcode,
            read,
            response.len()
        )));
    }
    trace!("Response {:?}", response);

    validate_response(opcode, &response)?;

    response.drain(..RESPONSE_HEADER_LEN);
    Ok(response)
}

/// Exchange with no input payload
pub fn get(transport: &mut dyn Transport, opcode: u8, output_len: usize) -> FcdResult<Vec<u8>> {
    exchange(transport, opcode, 0, &[], output_len)
}

/// Exchange with no output payload
pub fn set(transport: &mut dyn Transport, opcode: u8, input: &[u8]) -> FcdResult<()> {
    set_skip(transport, opcode, input, 0)
}

pub fn set_skip(
    transport: &mut dyn Transport,
    opcode: u8,
    input: &[u8],
    skip: usize,
) -> FcdResult<()> {
    exchange(transport, opcode, skip, input, 0)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;

    #[test]
    fn test_frame_layout() {
        let frame = build_frame(25, 0, &[0x60, 0x00, 0x00, 0x00]);
        assert_eq!(frame.len(), 65);
        assert_eq!(&frame[..6], &[0, 25, 0x60, 0, 0, 0]);
        assert!(frame[6..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_frame_skip_offsets_payload() {
        let frame = build_frame(27, 1, &[0xaa, 0xbb]);
        assert_eq!(&frame[..5], &[0, 27, 0, 0xaa, 0xbb]);
    }

    #[test]
    fn test_frame_truncates_oversized_input() {
        let input = [0x55u8; 80];
        let frame = build_frame(27, 1, &input);
        assert_eq!(frame[2], 0);
        assert!(frame[3..].iter().all(|b| *b == 0x55));

        let frame = build_frame(101, 0, &input);
        assert!(frame[2..].iter().all(|b| *b == 0x55));
    }

    #[test]
    fn test_exchange_returns_payload() {
        let mock = MockTransport::new();
        mock.respond(102, &[0x40, 0x42, 0x0f, 0x00]);

        let mut transport = mock.clone();
        let output = get(&mut transport, 102, 4).unwrap();

        assert_eq!(output, vec![0x40, 0x42, 0x0f, 0x00]);
        assert_eq!(mock.written().len(), 1);
        assert_eq!(mock.written()[0].len(), FRAME_LEN);
    }

    #[test]
    fn test_short_write_is_transport_error() {
        let mock = MockTransport::new();
        mock.respond(1, b"FCDAPP");
        mock.state.borrow_mut().short_write = 1;

        let mut transport = mock.clone();
        let result = get(&mut transport, 1, 6);

        assert!(matches!(result, Err(FcdError::Communication(_))));
        // No response was consumed
        assert_eq!(mock.state.borrow().reads, 0);
    }

    #[test]
    fn test_short_read_is_transport_error() {
        let mock = MockTransport::new();
        mock.respond(26, &[0, 0, 0, 0]);

        let mut transport = mock.clone();
        let result = get(&mut transport, 26, 8);
        assert!(matches!(result, Err(FcdError::Communication(_))));
    }

    #[test]
    fn test_mismatched_opcode_is_protocol_error() {
        let mock = MockTransport::new();
        mock.respond(28, &[]);

        let mut transport = mock.clone();
        let result = set(&mut transport, 25, &[0, 0, 0, 0]);
        assert!(matches!(
            result,
            Err(FcdError::Protocol {
                opcode: 25,
                response_opcode: 28,
                status: 1
            })
        ));
    }

    #[test]
    fn test_failure_status_is_protocol_error() {
        let mock = MockTransport::new();
        mock.respond_raw(vec![24, 0]);

        let mut transport = mock.clone();
        let result = set(&mut transport, 24, &[]);
        assert!(matches!(
            result,
            Err(FcdError::Protocol { status: 0, .. })
        ));
    }

    #[test]
    fn test_output_capped_at_response_payload() {
        let mock = MockTransport::new();
        mock.respond(1, &[b'x'; 62]);

        let mut transport = mock.clone();
        let output = get(&mut transport, 1, 200).unwrap();
        assert_eq!(output.len(), RESPONSE_DATA_LEN);
    }
}
