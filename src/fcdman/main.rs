use clap::Parser;
use device::{FrequencyOptions, InfoOptions, ResetOptions, handle_frequency, handle_info, handle_reset};
use fcdman::error::FcdResult;
use flash::{FlashOptions, handle_flash};

mod device;
mod flash;

#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[clap(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug, Clone)]
enum Command {
    /// Upgrade or verify the firmware of every attached dongle
    #[command(name = "flash", alias = "f")]
    Flash(FlashOptions),

    /// Show identification and flash layout of every attached dongle
    #[command(name = "info", alias = "i")]
    Info(InfoOptions),

    /// Reset every attached dongle into bootloader or application mode
    #[command(name = "reset")]
    Reset(ResetOptions),

    /// Get or set the tuned frequency
    #[command(name = "frequency", alias = "freq")]
    Frequency(FrequencyOptions),
}

fn main() -> FcdResult<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Command::Flash(opts) => handle_flash(opts)?,
        Command::Info(opts) => handle_info(opts)?,
        Command::Reset(opts) => handle_reset(opts)?,
        Command::Frequency(opts) => handle_frequency(opts)?,
    }

    Ok(())
}
