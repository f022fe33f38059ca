use anyhow::{Context, Result};
use audio_loop::{
    app::App, config::DemoConfig, device_manager::cpal_dm::CpalAudioDeviceManager,
    overlay::TerminalOverlay,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Logs go to stderr, stdout belongs to the overlay
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "audio_loop=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = DemoConfig::default();

    // Keeps the output stream alive for the whole run
    let mut manager = CpalAudioDeviceManager::new();
    let mut app = App::new(config, &mut manager, TerminalOverlay::stdout())
        .context("Failed to start audio infinite loop demo")?;

    let result = app.run();
    app.shutdown();
    result.context("Audio infinite loop demo stopped")
}
