mod app;
mod keyboard;
mod logging;
mod screen;
mod style;
mod theme;
mod widgets;
mod window_state;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Parser;

use popcorn_api::OmdbClient;
use popcorn_core::config::AppConfig;
use popcorn_core::persisted::PersistedState;
use popcorn_core::storage::{KeyValueStore, MemoryStore, SqliteStore};
use popcorn_core::title::TitleRegistry;

use crate::window_state::WindowGeometry;

#[derive(Parser)]
#[command(name = "popcorn", version, about = "Search movies and keep a rated watched list")]
struct Cli {
    /// Config file to use instead of the one in the platform config directory
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log filter such as `debug` or `popcorn_core=trace` (RUST_LOG wins)
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

fn main() -> iced::Result {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.log_level.as_deref(), &AppConfig::log_dir());

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) if cli.config.is_some() => {
            tracing::error!("Cannot load config: {e}");
            std::process::exit(2);
        }
        Err(e) => {
            tracing::warn!("Ignoring broken user config, using defaults: {e}");
            AppConfig::default()
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("popcorn-rt")
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Cannot start async runtime: {e}");
            std::process::exit(1);
        }
    };

    let mut startup_error = None;
    let api_key = config.api_key().unwrap_or_else(|e| {
        tracing::warn!("{e}");
        startup_error = Some(e.to_string());
        String::new()
    });
    let client = match OmdbClient::new(api_key, &config.api.base_url) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!("Cannot create OMDb client: {e}");
            std::process::exit(2);
        }
    };

    let store: Arc<dyn KeyValueStore> = match AppConfig::ensure_db_path()
        .and_then(|path| SqliteStore::open(&path))
    {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!("Cannot open store, changes will not be saved: {e}");
            Arc::new(MemoryStore::new())
        }
    };

    let window = PersistedState::init(
        Arc::clone(&store),
        window_state::STORAGE_KEY,
        WindowGeometry::default(),
    );
    let geometry = *window.get();
    let mut win = iced::window::Settings {
        size: geometry.size(),
        exit_on_close_request: false,
        ..Default::default()
    };
    win.position = match geometry.position() {
        Some(pos) => iced::window::Position::Specific(pos),
        None => iced::window::Position::Centered,
    };

    let flags = app::Flags {
        titles: TitleRegistry::new(config.ui.app_title.clone()),
        config,
        client,
        store,
        window: Arc::new(Mutex::new(window)),
        runtime: runtime.handle().clone(),
        startup_error,
    };

    iced::application(
        move || app::Popcorn::new(flags.clone()),
        app::Popcorn::update,
        app::Popcorn::view,
    )
    .title(app::Popcorn::title)
    .subscription(app::Popcorn::subscription)
    .theme(app::Popcorn::theme)
    .font(lucide_icons::LUCIDE_FONT_BYTES)
    .window(win)
    .run()
}
