use clilog::{CliHandler, Level, Logger, Style};

fn main() -> clilog::Result<()> {
    let h = CliHandler::builder()
        .level(Level::DEBUG)
        .label("bridge")
        .style(Style::vivid_background())
        .from_env()
        .build()?;

    if let Err(e) = Logger::new(h).install() {
        eprintln!("logger already installed: {e}");
    }

    // Anything using the `log` facade now renders through the handler.
    log::trace!("trace folds into debug");
    log::info!(port = 8080, tls = true; "listening");
    log::warn!(disk = "sda1", used = 0.92; "disk almost full");
    log::error!("shutting down");
    Ok(())
}
