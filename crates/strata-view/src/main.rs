//! strata-view - interactive site visualization dashboard
//!
//! Entry point. Loads configuration and all input data synchronously,
//! then launches the iced application; a failed load or an unreachable
//! annotation database is fatal to startup.

mod config;
mod loader;
mod ui;

use ui::StrataApp;

fn title(_app: &StrataApp) -> String {
    String::from("strata-view - Site Viewer")
}

fn main() -> iced::Result {
    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("strata-view starting up");

    let config_path = config::default_config_path();
    let config = config::load_config(&config_path);

    // Synchronous startup load; no degraded mode on failure
    let assets = match loader::load(&config) {
        Ok(assets) => assets,
        Err(e) => {
            log::error!("Startup load failed: {:#}", e);
            std::process::exit(1);
        }
    };

    iced::application(
        move || StrataApp::new(config.clone(), assets.clone()),
        StrataApp::update,
        StrataApp::view,
    )
    .title(title)
    .window_size(iced::Size::new(1280.0, 800.0))
    .theme(StrataApp::theme)
    .run()
}
