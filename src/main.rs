use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use quadim_studio::utils::config::{self, StudioConfig};
use quadim_studio::utils::ProcessingClient;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod style;
mod ui;

fn init_tracing(filter: &str) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .ok()
        .or_else(|| EnvFilter::try_new(filter).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    let stderr_layer = fmt::layer().with_file(true).with_line_number(true);

    // File logging is best effort; stderr always works
    let file_writer = config::log_dir().ok().and_then(|dir| {
        fs::create_dir_all(&dir).ok()?;
        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("quadim-studio")
            .filename_suffix("log")
            .build(dir)
            .ok()
    });
    let (file_layer, guard) = match file_writer {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

pub fn main() -> Result<()> {
    let (config, load_error) = match StudioConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (StudioConfig::default().with_env_overrides(), Some(e)),
    };

    let _log_guard = init_tracing(&config.log_filter);
    if let Some(e) = load_error {
        warn!("Using default configuration: {:#}", e);
    }

    let client = Arc::new(
        ProcessingClient::from_config(&config).context("Failed to set up processing client")?,
    );

    iced::application(
        move || ui::QuadimStudio::new(config.clone(), Arc::clone(&client)),
        ui::QuadimStudio::update,
        ui::QuadimStudio::view,
    )
    .title(ui::QuadimStudio::title)
    .window_size(iced::Size::new(720f32, 860f32))
    .theme(|_: &ui::QuadimStudio| style::custom_theme())
    .centered()
    .run()
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))
}
