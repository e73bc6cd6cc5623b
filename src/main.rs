use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gazette::cli::Cli;
use gazette::config::AppConfig;
use gazette::feed::session;
use gazette::poll::PollLoop;
use gazette::printer::{EscPosPrinter, PrinterPort};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::load(&cli.config);

    let mut printer: Option<Box<dyn PrinterPort + Send>> = match config.printer_path() {
        Some(path) => {
            info!("Initializing printer at {}", path);
            Some(Box::new(EscPosPrinter::open(path)?))
        }
        None => {
            info!("No printer path set, posts go to the log only");
            None
        }
    };

    let result = run(&cli, &mut config, &mut printer).await;

    // The poll loop never returns, so reaching this point means startup
    // failed. Release the printer before exiting.
    if let Some(port) = printer.as_deref_mut() {
        if let Err(e) = port.close() {
            warn!("Failed to close printer: {}", e);
        }
    }

    result
}

async fn run(
    cli: &Cli,
    config: &mut AppConfig,
    printer: &mut Option<Box<dyn PrinterPort + Send>>,
) -> anyhow::Result<()> {
    let client = session::establish(config).await?;
    info!("Logged in");

    // Persist the refreshed session before the first poll so a crash later
    // does not lose the credential.
    config.store(&cli.config)?;

    let mut poll = PollLoop::new(client, printer.take(), config.location.clone());
    poll.run().await;
    Ok(())
}
