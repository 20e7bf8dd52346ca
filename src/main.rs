mod action;
mod app;
mod backend;
mod config;
mod data;
mod error;
mod event;
mod filter;
mod messages;
mod models;
mod pages;
mod profile;
mod router;
mod samples;
mod session;
mod theme;

use app::SkillBridgeApp;
use backend::supabase::SupabaseClient;
use config::AppConfig;
use eframe::egui;
use error::ConfigError;
use event::{AppEvent, EventSender};
use pages::Services;
use std::sync::{mpsc, Arc};
use tokio::runtime::Handle;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Everything the pages need, or the reason the window has to stay blocked.
fn connect(
    config: Result<AppConfig, ConfigError>,
    tx: mpsc::Sender<AppEvent>,
    runtime: Handle,
) -> Result<Services, ConfigError> {
    let config = config?;
    let backend = SupabaseClient::new(&config)?;
    info!(url = %config.supabase_url, "connecting to supabase");
    Ok(Services {
        backend: Arc::new(backend),
        config,
        runtime,
        events: EventSender::new(tx),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let (tx, rx) = mpsc::channel();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("skillbridge-runtime")
        .build()?;

    let app = match connect(AppConfig::from_env(), tx, runtime.handle().clone()) {
        Ok(services) => SkillBridgeApp::new(rx, services),
        Err(err) => {
            error!(error = %err, "configuration is incomplete");
            SkillBridgeApp::blocked(rx, err)
        }
    };
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([1024.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SkillBridge",
        native_options,
        Box::new(move |creation_context| {
            app.install(&creation_context.egui_ctx);
            Ok(Box::new(app))
        }),
    )?;

    Ok(())
}
