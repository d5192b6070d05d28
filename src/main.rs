mod api;
mod app;
mod config;
mod logging;
mod storage;
mod ui;

use crate::api::{ApiClient, ApiManager};
use crate::app::action::Action;
use crate::app::clock::SystemClock;
use crate::app::event::AppEvent;
use crate::app::handler;
use crate::app::state::AppState;
use crate::app::store::Store;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use anyhow::Result;
use crossterm::{
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    let cfg = config::load_config()?;
    let log_path = logging::init(&cfg.logging)?;
    info!(log = ?log_path, api = %cfg.api.base_url, "qr-builder starting");

    let client = ApiClient::new(&cfg.api)?;
    let storage = open_storage(&cfg.storage)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, cfg, client, storage).await;

    restore_terminal()?;

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

fn open_storage(cfg: &config::StorageConfig) -> Result<Box<dyn KeyValueStore>> {
    if !cfg.persist {
        info!("persistence disabled, keeping session in memory");
        return Ok(Box::new(MemoryStore::new()));
    }
    let path = cfg.path.clone().unwrap_or_else(storage::default_store_path);
    match FileStore::open(&path) {
        Ok(store) => {
            info!(path = %store.path().display(), "opened state file");
            Ok(Box::new(store))
        }
        Err(e) => {
            // Unreadable state is discarded.
            warn!("{:#}; starting with an empty state file", e);
            std::fs::remove_file(&path).ok();
            Ok(Box::new(FileStore::open(&path)?))
        }
    }
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: config::AppConfig,
    client: ApiClient,
    storage: Box<dyn KeyValueStore>,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    let ttl = Duration::from_secs(cfg.ui.notification_ttl_secs);
    let tick = Duration::from_millis(cfg.ui.tick_ms.max(1));
    let store = Store::new(storage, Box::new(SystemClock), ttl).with_theme(cfg.ui.default_theme.clone());
    let mut state = AppState::new(cfg, store);
    let api = ApiManager::new(client, event_tx.clone());

    // Spawn terminal input task
    let term_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        while let Some(Ok(event)) = reader.next().await {
            if term_tx.send(AppEvent::Terminal(event)).is_err() {
                break;
            }
        }
    });

    // Spawn tick task
    let tick_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        loop {
            interval.tick().await;
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    for action in handler::initialize(&mut state) {
        api.dispatch(action);
    }

    // Initial render
    terminal.draw(|f| ui::render(f, &state))?;

    // Main event loop
    while let Some(event) = event_rx.recv().await {
        let actions = handler::handle_event(&mut state, event);

        for action in actions {
            match action {
                Action::Quit => state.should_quit = true,
                request => api.dispatch(request),
            }
        }

        if state.should_quit {
            info!("quitting");
            break;
        }

        // Conditional render (only if dirty)
        if state.dirty {
            terminal.draw(|f| ui::render(f, &state))?;
            state.dirty = false;
        }
    }

    Ok(())
}
