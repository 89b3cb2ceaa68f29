mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::{DirectoryGuiApp, StartupConfig};

#[derive(Parser, Debug)]
#[command(about = "Desktop viewer for a remotely fetched user directory")]
struct Args {
    /// Directory endpoint serving the `{ "results": [...] }` batch.
    #[arg(long)]
    endpoint: Option<String>,

    /// How many records to request from the endpoint.
    #[arg(long)]
    results: Option<u32>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let config = StartupConfig::load(args.endpoint, args.results);
    tracing::info!(
        endpoint = %config.endpoint,
        results = config.result_count,
        "starting user directory viewer"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(config.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("User Directory")
            .with_inner_size([1080.0, 720.0])
            .with_min_inner_size([760.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "User Directory",
        options,
        Box::new(move |_cc| Ok(Box::new(DirectoryGuiApp::new(config, cmd_tx, ui_rx)?))),
    )
}
