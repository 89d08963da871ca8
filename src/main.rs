mod app;
mod bridge;
mod cli;
mod clipboard;
mod commands;
mod error;
mod logging;
mod notification;
mod runner;
mod scenario;
mod scenario_ui;
mod state;
mod storage;
mod tui;

use clap::Parser;
use color_eyre::Result;
use crossterm::event;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

use app::App;
use cli::{AppConfig, Cli, Commands};
use clipboard::{ClipboardBackend, MemoryClipboard, SystemClipboard};
use notification::Notifier;
use runner::{AppCommand, AppEvent, run_worker};
use state::ScenarioStore;
use storage::{FileStorage, KeyValueStorage};
use tui::{DefaultTerminal, restore_terminal, setup_terminal};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = cli.resolve()?;

    match cli.command() {
        Commands::Tui => run_tui(&config).await,
        Commands::Export { output } => {
            logging::init_stderr(config.log_level);
            commands::export(&config, output.as_deref())
        }
        Commands::Import { file } => {
            logging::init_stderr(config.log_level);
            commands::import(&config, &file)
        }
        Commands::Reset => {
            logging::init_stderr(config.log_level);
            commands::reset(&config)
        }
        Commands::Path => {
            println!("{}", commands::storage_path(&config)?.display());
            Ok(())
        }
    }
}

fn open_clipboard(config: &AppConfig) -> Arc<dyn ClipboardBackend> {
    if config.memory_clipboard {
        return Arc::new(MemoryClipboard::new());
    }
    match SystemClipboard::new() {
        Ok(clipboard) => Arc::new(clipboard),
        Err(e) => {
            warn!("System clipboard unavailable, using an in-process one: {}", e);
            Arc::new(MemoryClipboard::new())
        }
    }
}

async fn run_tui(config: &AppConfig) -> Result<()> {
    let _log_guard = logging::init_file(config.log_level, &config.log_file)?;
    info!("Starting editor with data dir {}", config.data_dir.display());

    let store = ScenarioStore::load(
        FileStorage::new(&config.data_dir),
        config.storage_key.clone(),
    );

    let (tx_cmd, rx_cmd) = mpsc::unbounded_channel::<AppCommand>();
    let (tx_evt, rx_evt) = mpsc::unbounded_channel::<AppEvent>();
    tokio::spawn(run_worker(rx_cmd, tx_evt, open_clipboard(config)));

    let mut app = App::new(store, Notifier::new(config.notification_ttl), tx_cmd, rx_evt);

    tui::install_panic_hook();
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app).await;
    restore_terminal(terminal)?;

    info!("Exiting with {} scenarios", app.store.len());
    result
}

async fn event_loop<S: KeyValueStorage>(
    terminal: &mut DefaultTerminal,
    app: &mut App<S>,
) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        app.tick();

        let timeout = Duration::from_millis(80);
        if event::poll(timeout)? {
            let ev = event::read()?;
            if app.on_event(ev) {
                break;
            }
        }

        app.drain_events();
        tokio::task::yield_now().await;
    }
    Ok(())
}
