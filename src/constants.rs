/// FUNcube dongle USB identifiers
pub const FCD_USB_VID: u16 = 0x04d8;
pub const FCD_USB_PID: u16 = 0xfb56;

/// One HID report: report id, command byte and command payload
pub const FRAME_LEN: usize = 65;
pub const COMMAND_DATA_LEN: usize = 63;

/// Command echo and status byte precede every response payload
pub const RESPONSE_HEADER_LEN: usize = 2;
pub const RESPONSE_DATA_LEN: usize = 62;

pub const STATUS_SUCCESS: u8 = 1;

/// Bootloader flash block size
pub const BLOCK_SIZE: usize = 48;

/// Time allowed for the dongle to re-enumerate after a reset
pub const DEFAULT_RESET_DELAY_MS: u64 = 2000;

/// Unprogrammed flash fill for gaps in Intel HEX images
pub(crate) const FLASH_FILL_BYTE: u8 = 0xff;
