use clap::Parser;
use flexi_logger::{AdaptiveFormat, Logger, WriteMode};
use hasami_shogi::prelude::*;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let options = EngineOptions::parse();

    let _logger = Logger::try_with_env_or_str(options.log_level.clone().unwrap_or_else(|| "info".into()).as_str())?
        .write_mode(WriteMode::BufferAndFlush)
        .log_to_stderr()
        .adaptive_format_for_stderr(match cfg!(debug_assertions) {
            true => AdaptiveFormat::WithThread,
            false => AdaptiveFormat::Default,
        })
        .start()?;

    let mut driver = Driver::new(options.depth);

    // Invariant violations are fatal domain errors (spec.md §7) and must not
    // be caught by the engine itself; catch_unwind here belongs entirely to
    // the driver, to turn one into the required exit code and message.
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| driver.run())) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            log::error!("I/O failure: {e}");
            std::process::exit(1);
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                .unwrap_or("unknown invariant violation");
            eprintln!("{message}");
            std::process::exit(2);
        }
    }
}
