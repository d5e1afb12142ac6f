use std::str::FromStr;
use tracing::{info, warn, Level};
use valorant_miniapp::config::{self, Config};

fn main() {
    // Load bundled config, falling back to built-in defaults
    let (config, load_error) = match Config::load() {
        Ok(c) => (c, None),
        Err(e) => (Config::from_env(), Some(e)),
    };

    // Initialize logging
    let level = Level::from_str(&config.logging.level).ok();
    if let Err(e) = dioxus_logger::init(level.unwrap_or(Level::INFO)) {
        eprintln!("failed to initialize logger: {e}");
    }
    if level.is_none() {
        warn!(level = %config.logging.level, "unknown log level, using info");
    }
    if let Some(e) = load_error {
        warn!(error = %e, "invalid miniapp.toml, using defaults");
    }

    info!("valorant-miniapp v{} starting", env!("CARGO_PKG_VERSION"));
    info!(api = %config.api.base_url, destination = %config.bet.destination, "config loaded");

    config::install(config);
    dioxus::launch(valorant_miniapp::ui::App);
}
