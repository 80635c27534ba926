use std::path::PathBuf;

use clap::Parser;
use fcdman::{Flasher, constants::DEFAULT_RESET_DELAY_MS, error::FcdResult};

#[derive(Parser, Debug, Clone)]
pub(crate) struct FlashOptions {
    /// Firmware image (raw binary, or intel hex with a .hex extension)
    #[clap(short, long)]
    input: Option<PathBuf>,

    /// Milliseconds to wait for the dongles to re-enumerate after each reset
    #[clap(short, long, default_value_t = DEFAULT_RESET_DELAY_MS)]
    delay: u64,

    #[clap(long, default_value_t = false)]
    no_reset: bool,

    #[clap(long, default_value_t = false)]
    no_erase: bool,

    #[clap(long, default_value_t = false)]
    no_write: bool,

    #[clap(long, default_value_t = false)]
    no_verify: bool,
}

pub(crate) fn handle_flash(opts: FlashOptions) -> FcdResult<()> {
    let mut flasher = Flasher::new()?;

    flasher.progress_bar(true);
    flasher.reset_delay((!opts.no_reset).then_some(opts.delay));
    flasher.erase_before_programming(!opts.no_erase);
    flasher.write_image(!opts.no_write);
    flasher.verify_after_programming(!opts.no_verify);

    match opts.input {
        Some(path) => flasher.flash_file(&path),
        None => flasher.flash(None),
    }
}
