mod app;
mod config;
mod event;
mod gemini;
mod session;
mod theme;
mod ui;

use anyhow::{anyhow, Context, Result};
use app::GeminiUiApp;
use clap::Parser;
use config::{AppConfig, Cli};
use eframe::egui;
use gemini::GeminiClient;
use std::sync::mpsc;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    init_tracing();
    let config = AppConfig::from(Cli::parse());
    tracing::info!(
        model = %config.gemini.model,
        endpoint = %config.gemini.endpoint,
        api_key_present = !config.api_key.is_empty(),
        "starting gemini-ui"
    );

    let (tx, rx) = mpsc::channel();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("gemini-ui-runtime")
        .build()
        .context("failed to build tokio runtime")?;

    let gemini = GeminiClient::new(config.gemini.clone(), tx, runtime.handle().clone());
    let app = GeminiUiApp::new(rx, gemini, config);
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 780.0])
            .with_min_inner_size([900.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Gemini UI Demo",
        native_options,
        Box::new(move |creation_context| {
            app.install_theme(&creation_context.egui_ctx);
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow!("ui event loop failed: {err}"))?;

    tracing::info!("session closed");
    Ok(())
}
