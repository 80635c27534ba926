//! Bootloader commands and the block-wise flash write/verify procedure.
//!
//! Both procedures follow the same sequence: query the flash address range,
//! validate it against the image, set the device address to the start of the
//! range and then walk the range in 48 byte blocks. The device advances its
//! address after each block read or write. Image offsets are absolute flash
//! addresses, so the image must be at least `end` bytes long.

use std::iter::StepBy;
use std::ops::Range;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::codec::{decode_u32, encode_u32};
use crate::constants::BLOCK_SIZE;
use crate::error::{FcdError, FcdResult, FlashStep};
use crate::protocol::Command;
use crate::session::{Session, for_each_device};
use crate::transport::DeviceBackend;

/// Application flash range reported by the bootloader, `start` inclusive and `end` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    pub start: u32,
    pub end: u32,
}

impl AddressRange {
    /// Check `start < end` and that the range is a whole number of blocks
    pub fn validate(&self) -> FcdResult<()> {
        if self.start >= self.end || (self.end - self.start) as usize % BLOCK_SIZE != 0 {
            return Err(FcdError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    pub fn block_count(&self) -> usize {
        (self.end.saturating_sub(self.start)) as usize / BLOCK_SIZE
    }

    /// Start address of every block in ascending order
    pub fn blocks(&self) -> StepBy<Range<u32>> {
        (self.start..self.end).step_by(BLOCK_SIZE)
    }
}

/// Result of comparing device flash with an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Match,
    /// First block that differs; no further blocks are read
    Mismatch { address: u32 },
}

pub fn erase_application(session: &mut Session) -> FcdResult<()> {
    session.set(Command::EraseApplication.into(), &[])
}

pub fn set_address(session: &mut Session, address: u32) -> FcdResult<()> {
    session.set(Command::SetByteAddress.into(), &encode_u32(address))
}

pub fn get_address_range(session: &mut Session) -> FcdResult<AddressRange> {
    let raw = session.get(Command::GetByteAddressRange.into(), 8)?;
    Ok(AddressRange {
        start: decode_u32(&raw[0..4]),
        end: decode_u32(&raw[4..8]),
    })
}

pub fn read_block(session: &mut Session) -> FcdResult<[u8; BLOCK_SIZE]> {
    let raw = session.get(Command::ReadBlock.into(), BLOCK_SIZE)?;
    let mut block = [0u8; BLOCK_SIZE];
    block.copy_from_slice(&raw);
    Ok(block)
}

/// Write one block at the current device address.
///
/// The firmware expects the block data one byte further into the report than
/// any other command's payload. The reason is unknown; the padding byte is
/// sent as zero.
pub fn write_block(session: &mut Session, block: &[u8; BLOCK_SIZE]) -> FcdResult<()> {
    session.set_skip(Command::WriteBlock.into(), block, 1)
}

/// Query, validate and select the flash range for a block walk over `image`
fn prepare_range(session: &mut Session, image: &[u8]) -> FcdResult<AddressRange> {
    let range = get_address_range(session).map_err(FcdError::at_step(FlashStep::RangeQuery))?;
    range.validate()?;

    if image.len() < range.end as usize {
        return Err(FcdError::ImageTooSmall {
            size: image.len(),
            end: range.end,
        });
    }

    set_address(session, range.start).map_err(FcdError::at_step(FlashStep::SetAddress))?;
    debug!(
        "Flash range 0x{:08x} - 0x{:08x}, {} block(s)",
        range.start,
        range.end,
        range.block_count()
    );
    Ok(range)
}

fn image_block(image: &[u8], address: u32) -> FcdResult<&[u8; BLOCK_SIZE]> {
    image
        .get(address as usize..)
        .and_then(|rest| rest.first_chunk::<BLOCK_SIZE>())
        .ok_or(FcdError::ImageTooSmall {
            size: image.len(),
            end: address + BLOCK_SIZE as u32,
        })
}

pub fn flash_write(session: &mut Session, image: &[u8]) -> FcdResult<()> {
    flash_write_with_progress(session, image, |_, _| {})
}

/// Write `image` to flash, calling `progress(done, total)` after every block
pub fn flash_write_with_progress<F>(
    session: &mut Session,
    image: &[u8],
    mut progress: F,
) -> FcdResult<()>
where
    F: FnMut(usize, usize),
{
    let range = prepare_range(session, image)?;
    let total = range.block_count();

    info!("Writing {} blocks", total);
    for (index, address) in range.blocks().enumerate() {
        write_block(session, image_block(image, address)?)
            .map_err(FcdError::at_step(FlashStep::WriteBlock { address }))?;
        progress(index + 1, total);
    }

    Ok(())
}

pub fn flash_verify(session: &mut Session, image: &[u8]) -> FcdResult<VerifyOutcome> {
    flash_verify_with_progress(session, image, |_, _| {})
}

/// Compare flash with `image`, stopping at the first differing block
pub fn flash_verify_with_progress<F>(
    session: &mut Session,
    image: &[u8],
    mut progress: F,
) -> FcdResult<VerifyOutcome>
where
    F: FnMut(usize, usize),
{
    let range = prepare_range(session, image)?;
    let total = range.block_count();

    info!("Verifying {} blocks", total);
    for (index, address) in range.blocks().enumerate() {
        let block =
            read_block(session).map_err(FcdError::at_step(FlashStep::ReadBlock { address }))?;
        if &block != image_block(image, address)? {
            info!("Flash differs from image at 0x{:08x}", address);
            return Ok(VerifyOutcome::Mismatch { address });
        }
        progress(index + 1, total);
    }

    Ok(VerifyOutcome::Match)
}

/// Open every attached dongle, send `command` and wait for re-enumeration.
///
/// The dongle disconnects as soon as it accepts a reset, so the command's
/// result is ignored, as are devices that cannot be opened.
fn reset_all(backend: &mut dyn DeviceBackend, command: Command, delay: Duration) -> FcdResult<()> {
    for_each_device(backend, |backend, path| {
        match Session::open(backend, Some(path)) {
            Ok(mut session) => {
                if let Err(e) = session.set(command.into(), &[]) {
                    debug!("Reset of {} not acknowledged: {}", path, e);
                }
            }
            Err(e) => warn!("Skipping reset of {}: {}", path, e),
        }
        Ok(())
    })?;

    thread::sleep(delay);
    Ok(())
}

/// Restart every attached dongle in bootloader mode
pub fn reset_to_bootloader(backend: &mut dyn DeviceBackend, delay_ms: u64) -> FcdResult<()> {
    info!("Resetting to bootloader");
    reset_all(
        backend,
        Command::ResetBootloader,
        Duration::from_millis(delay_ms),
    )
}

/// Restart every attached dongle in application mode
pub fn reset_to_application(backend: &mut dyn DeviceBackend, delay_ms: u64) -> FcdResult<()> {
    info!("Resetting to application");
    reset_all(
        backend,
        Command::ResetApplication,
        Duration::from_millis(delay_ms),
    )
}

/// Identification and, in bootloader mode, flash layout of one dongle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub identity: String,
    pub range: Option<AddressRange>,
    pub first_block: Option<[u8; BLOCK_SIZE]>,
}

/// Collect diagnostics. Range and block are only available from the bootloader.
pub fn device_info(session: &mut Session) -> FcdResult<DeviceInfo> {
    let identity = session.query()?;

    let range = get_address_range(session).ok();
    let first_block = match range {
        Some(range) => set_address(session, range.start)
            .and_then(|_| read_block(session))
            .ok(),
        None => None,
    };

    Ok(DeviceInfo {
        identity,
        range,
        first_block,
    })
}
