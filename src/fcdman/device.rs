use clap::{Parser, ValueEnum};
use fcdman::{
    HidBackend, Session,
    bootloader::{device_info, reset_to_application, reset_to_bootloader},
    constants::DEFAULT_RESET_DELAY_MS,
    error::FcdResult,
    registers::{get_frequency_hz, set_frequency_hz},
    session::for_each_device,
};

#[derive(Parser, Debug, Clone)]
pub(crate) struct InfoOptions {}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub(crate) enum ResetTarget {
    Bootloader,
    Application,
}

#[derive(Parser, Debug, Clone)]
pub(crate) struct ResetOptions {
    /// Mode to restart into
    target: ResetTarget,

    /// Milliseconds to wait for the dongles to re-enumerate
    #[clap(short, long, default_value_t = DEFAULT_RESET_DELAY_MS)]
    delay: u64,
}

#[derive(Parser, Debug, Clone)]
pub(crate) struct FrequencyOptions {
    /// Device path, defaults to the first attached dongle
    #[clap(short, long)]
    path: Option<String>,

    /// Frequency to tune to, in Hz
    #[clap(short, long)]
    set: Option<u32>,
}

pub(crate) fn handle_info(_opts: InfoOptions) -> FcdResult<()> {
    let mut backend = HidBackend::new()?;

    for_each_device(&mut backend, |backend, path| {
        let mut session = Session::open(backend, Some(path))?;
        let info = device_info(&mut session)?;

        println!("[{}]\t{}", path, info.identity);
        if let Some(range) = info.range {
            println!("\tRange: 0x{:08x} - 0x{:08x}", range.start, range.end);
        }
        if let Some(block) = info.first_block {
            for line in block.chunks(16) {
                let bytes = line
                    .iter()
                    .map(|b| format!("{:02x}", b))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("{}", bytes);
            }
        }
        Ok(())
    })
}

pub(crate) fn handle_reset(opts: ResetOptions) -> FcdResult<()> {
    let mut backend = HidBackend::new()?;

    match opts.target {
        ResetTarget::Bootloader => reset_to_bootloader(&mut backend, opts.delay),
        ResetTarget::Application => reset_to_application(&mut backend, opts.delay),
    }
}

pub(crate) fn handle_frequency(opts: FrequencyOptions) -> FcdResult<()> {
    let mut backend = HidBackend::new()?;
    let mut session = Session::open_verified(&mut backend, opts.path.as_deref())?;

    if let Some(frequency) = opts.set {
        set_frequency_hz(&mut session, frequency)?;
    }
    println!("{} Hz", get_frequency_hz(&mut session)?);

    Ok(())
}
