use std::path::Path;

use bootloader::{
    VerifyOutcome, erase_application, flash_verify_with_progress, flash_write_with_progress,
    reset_to_application, reset_to_bootloader,
};
use constants::DEFAULT_RESET_DELAY_MS;
use error::{FcdError, FcdResult, FlashStep};
use tracing::info;
use util::block_progress;

pub use firmware::FlashImage;
pub use session::Session;
pub use transport::{DeviceBackend, Transport, hid::HidBackend};

pub mod bootloader;
pub mod codec;
pub mod constants;
pub mod error;
pub mod firmware;
pub mod protocol;
pub mod registers;
pub mod session;
pub mod transport;
pub mod tuner;
pub(crate) mod util;

#[derive(Debug, Clone, Copy)]
struct Actions {
    erase: bool,
    write: bool,
    verify: bool,
    progress_bar: bool,
}

/// Full firmware upgrade of every attached dongle.
///
/// By default every dongle is reset into its bootloader, erased, written,
/// verified and reset back into the application.
pub struct Flasher {
    backend: Box<dyn DeviceBackend>,
    reset_delay_ms: Option<u64>,
    actions: Actions,
}

impl Flasher {
    /// Flasher using the system HID library
    pub fn new() -> FcdResult<Self> {
        Ok(Self::with_backend(Box::new(HidBackend::new()?)))
    }

    pub fn with_backend(backend: Box<dyn DeviceBackend>) -> Self {
        Flasher {
            backend,
            reset_delay_ms: Some(DEFAULT_RESET_DELAY_MS),
            actions: Actions {
                erase: true,
                write: true,
                verify: true,
                progress_bar: false,
            },
        }
    }

    pub fn progress_bar(&mut self, enable: bool) {
        self.actions.progress_bar = enable;
    }

    /// Delay after each reset, or `None` to leave the dongles in their current mode
    pub fn reset_delay(&mut self, delay_ms: Option<u64>) {
        self.reset_delay_ms = delay_ms;
    }

    pub fn erase_before_programming(&mut self, enable: bool) {
        self.actions.erase = enable;
    }

    pub fn write_image(&mut self, enable: bool) {
        self.actions.write = enable;
    }

    pub fn verify_after_programming(&mut self, enable: bool) {
        self.actions.verify = enable;
    }

    /// Flash with an image read from `file_path`
    pub fn flash_file(&mut self, file_path: &Path) -> FcdResult<()> {
        let image = FlashImage::load(file_path)?;
        self.flash(Some(&image))
    }

    /// Run the enabled actions. An image is required when writing or verifying.
    pub fn flash(&mut self, image: Option<&FlashImage>) -> FcdResult<()> {
        let actions = self.actions;
        if !(actions.erase || actions.write || actions.verify || self.reset_delay_ms.is_some()) {
            return Err(FcdError::InvalidArgument("Nothing to do".to_string()));
        }
        let image = match image {
            Some(image) => image.as_bytes(),
            None if actions.write || actions.verify => {
                return Err(FcdError::InvalidArgument(
                    "No image given for write or verify".to_string(),
                ));
            }
            None => &[],
        };

        if let Some(delay_ms) = self.reset_delay_ms {
            reset_to_bootloader(self.backend.as_mut(), delay_ms)?;
        }

        let mut devices = 0;
        let result = session::for_each_device(self.backend.as_mut(), |backend, path| {
            devices += 1;
            flash_device(backend, path, image, actions)
        })
        .and_then(|_| {
            if devices == 0 && (actions.erase || actions.write || actions.verify) {
                Err(FcdError::DeviceNotFound(
                    "No FUNcube dongle attached".to_string(),
                ))
            } else {
                Ok(())
            }
        });

        // Always try to bring the dongles back, even after a failure
        if let Some(delay_ms) = self.reset_delay_ms {
            let reset = reset_to_application(self.backend.as_mut(), delay_ms);
            result?;
            return reset;
        }

        result
    }
}

fn flash_device(
    backend: &mut dyn DeviceBackend,
    path: &str,
    image: &[u8],
    actions: Actions,
) -> FcdResult<()> {
    let mut session = Session::open(backend, Some(path))?;

    if actions.erase {
        info!("Erasing {}", path);
        erase_application(&mut session).map_err(FcdError::at_step(FlashStep::Erase))?;
    }

    if actions.write {
        info!("Writing {}", path);
        flash_write_with_progress(
            &mut session,
            image,
            block_progress(actions.progress_bar, "Writing"),
        )?;
    }

    if actions.verify {
        info!("Verifying {}", path);
        let outcome = flash_verify_with_progress(
            &mut session,
            image,
            block_progress(actions.progress_bar, "Verifying"),
        )?;
        if let VerifyOutcome::Mismatch { address } = outcome {
            return Err(FcdError::VerifyMismatch {
                path: path.to_string(),
                address,
            });
        }
        info!("Verified {}", path);
    }

    Ok(())
}
