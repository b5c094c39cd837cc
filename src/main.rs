#![warn(clippy::all, clippy::pedantic)]

use std::io;
use std::os::fd::AsRawFd;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use blockfall::app::App;
use blockfall::config::{self, Config};
use blockfall::engine::GameEngine;
use blockfall::storage::{BestStore, MemoryBestStore, TomlBestStore};
use blockfall::ui;
use crossterm::{
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use log::{debug, error, info};
use ratatui::{Terminal, prelude::*};

fn main() -> Result<()> {
    // Create log file and redirect stderr to it
    let log_path = "blockfall.log";
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)
        .with_context(|| format!("failed to create log file {log_path}"))?;

    // Safety: dup2 on two descriptors we own; stderr now points at the log file
    unsafe {
        libc::dup2(log_file.as_raw_fd(), io::stderr().as_raw_fd());
    }

    // Configure the logger to use stderr (which is now redirected to our file)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .format_module_path(false)
        .init();

    info!("Starting Blockfall");

    // Initialize configuration system
    match config::loader::load_config_from_file() {
        Ok(loaded) => {
            if let Ok(mut global) = config::CONFIG.write() {
                *global = loaded;
            }
            info!("Configuration loaded successfully");
        }
        Err(e) => error!("Failed to load configuration: {e}; continuing with defaults"),
    }
    let config = Config::current();

    let store: Box<dyn BestStore> = if config.storage.persist_best {
        let store = TomlBestStore::at_default_location();
        info!("Best stats file: {}", store.path().display());
        Box::new(store)
    } else {
        info!("Best stats kept in memory only");
        Box::new(MemoryBestStore::new())
    };

    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Without event types every key arrives as a press, repeats included
    let enhanced_keys = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced_keys {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    } else {
        info!("Terminal does not report key event types; held keys repeat as presses");
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(GameEngine::new(store), config);
    let res = run_app(&mut terminal, app);

    // Restore terminal
    if enhanced_keys {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!("Game error: {err:?}");
    }
    info!("Exiting Blockfall");

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    // Drop anything typed before the game was on screen
    while event::poll(Duration::from_millis(0))? {
        let _ = event::read()?;
    }

    let mut last_frame = Instant::now();

    loop {
        if Config::check_and_reload() {
            app.config = Config::current();
            debug!("Configuration reloaded");
        }

        let frame_interval = app.config.controls.frame_interval();
        let timeout = frame_interval.saturating_sub(last_frame.elapsed());

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                debug!("Key event: {key:?}");
                app.handle_key(key, Instant::now());
            }
        }

        if app.should_quit {
            return Ok(());
        }

        if last_frame.elapsed() >= frame_interval {
            app.on_tick();
            let state = app.render_state();
            terminal.draw(|f| ui::render(f, &state, &app.config.display))?;
            last_frame = Instant::now();
        }
    }
}
