mod card;
mod config;
mod controller;
mod error;
mod fetch;
mod images;
mod models;
mod ports;
mod ui;
mod utils;
mod view;

#[cfg(test)]
mod testing;

use clap::Parser;
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::error::Error;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{
    ExplorerConfig, DEFAULT_API_BASE, DEFAULT_ARTWORK_FALLBACK_BASE, DEFAULT_IMAGE_TIMEOUT,
    DEFAULT_MAX_RANDOM_ID, DEFAULT_SPRITE_FALLBACK_BASE,
};
use crate::controller::Explorer;
use crate::fetch::HttpClient;
use crate::ports::SystemRandom;
use crate::ui::{draw_ui, lock_view, to_core_key, typed_char, App, SharedView, TuiDisplay};

/// Look up Pokémon from PokeAPI in the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Endpoint that `<name or id>` is appended to.
    #[arg(long, env = "POKEMON_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Upper bound for random lookups.
    #[arg(long = "max-id", env = "POKEMON_MAX_ID", default_value_t = DEFAULT_MAX_RANDOM_ID)]
    max_random_id: u32,

    /// Base for the generated official-artwork fallback (`<base><id>.png`).
    #[arg(long, default_value = DEFAULT_ARTWORK_FALLBACK_BASE)]
    artwork_base: String,

    /// Base for the generated sprite fallback (`<base><id>.png`).
    #[arg(long, default_value = DEFAULT_SPRITE_FALLBACK_BASE)]
    sprite_base: String,

    /// Milliseconds one image candidate may take before the next is tried.
    #[arg(long = "image-timeout-ms", default_value_t = DEFAULT_IMAGE_TIMEOUT.as_millis() as u64)]
    image_timeout_ms: u64,

    /// Log file used while the terminal UI is running.
    #[arg(long, default_value = "data/explorer.log")]
    log_file: PathBuf,

    /// Look up a single name or id, print it and exit.
    #[arg(long, value_name = "QUERY", conflicts_with = "random")]
    lookup: Option<String>,

    /// Look up a single random Pokémon, print it and exit.
    #[arg(long)]
    random: bool,
}

fn init_tracing(log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pokemon_explorer=info".into());

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let one_shot = cli.lookup.is_some() || cli.random;
    init_tracing(if one_shot { None } else { Some(cli.log_file.as_path()) })?;

    let config = ExplorerConfig::new(&cli.api_base, cli.max_random_id)?
        .with_fallback_bases(&cli.artwork_base, &cli.sprite_base)?
        .with_image_timeout(Duration::from_millis(cli.image_timeout_ms))?;
    let http = Arc::new(HttpClient::new());
    let view = SharedView::default();
    let explorer = Arc::new(Explorer::new(
        config,
        http.clone(),
        http,
        Arc::new(TuiDisplay::new(view.clone())),
        Arc::new(SystemRandom::new()),
    ));
    explorer.start();

    if one_shot {
        let result = match &cli.lookup {
            Some(query) => explorer.search(query).await,
            None => explorer.random_search().await.map(|_| ()),
        };
        println!("{}", lock_view(&view).display);
        return result.map_err(Into::into);
    }

    tracing::info!("starting terminal UI");

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(view);
    let result = run_app(&mut terminal, &app, &explorer);

    // Restore terminal
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(LeaveAlternateScreen)?;
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &App,
    explorer: &Arc<Explorer>,
) -> Result<(), Box<dyn Error>> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        draw_ui(terminal, app)?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    break;
                }

                let (core_key, modifiers) = to_core_key(&key);
                if explorer.shortcut_for(core_key, modifiers).is_some() {
                    let ex = explorer.clone();
                    tokio::spawn(async move {
                        ex.on_key(core_key, modifiers).await;
                    });
                } else if app.input_focused() {
                    match key.code {
                        KeyCode::Enter => submit(app, explorer),
                        KeyCode::F(1) => toggle_help(explorer),
                        KeyCode::Esc => app.set_input_focused(false),
                        KeyCode::Backspace => app.backspace(),
                        KeyCode::Char(_) => {
                            if let Some(c) = typed_char(&key) {
                                app.type_char(c);
                            }
                        }
                        _ => {}
                    }
                } else {
                    match key.code {
                        KeyCode::Char('q') => break,
                        KeyCode::F(1) | KeyCode::Char('h') => toggle_help(explorer),
                        KeyCode::Char('/') => app.set_input_focused(true),
                        KeyCode::Char('r') => {
                            let ex = explorer.clone();
                            tokio::spawn(async move {
                                ex.on_request_random().await;
                            });
                        }
                        KeyCode::Enter => submit(app, explorer),
                        _ => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
    Ok(())
}

/// Start a search for the current input unless one is already running.
fn submit(app: &App, explorer: &Arc<Explorer>) {
    if app.is_busy() {
        return;
    }
    let text = app.input();
    let ex = explorer.clone();
    tokio::spawn(async move {
        ex.on_submit_search(&text).await;
    });
}

fn toggle_help(explorer: &Explorer) {
    if explorer.is_help_visible() {
        explorer.on_dismiss_help();
    } else {
        explorer.on_request_help();
    }
}
