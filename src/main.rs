mod audio;
mod audio_api;
mod config;
mod loader;
mod middle;
mod pipeline;
mod shared;
mod tui;

use std::path::{Path, PathBuf};

use anyhow::Context;
use crossterm::terminal;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use audio::CpalTransport;
use middle::Middle;
use pipeline::LoopScheduler;
use shared::InputEvent;

const LOG_FILE: &str = "padloop.log";

fn main() {
    if let Err(e) = run() {
        log::error!("fatal: {e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let samples_dir: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    init_logging(&samples_dir)?;
    install_panic_hook();

    let config = config::load_config(&samples_dir)?;
    log::info!("bpm {}, samples in {}", config.bpm, samples_dir.display());
    let audio = audio::start_audio()?;

    let mut scheduler = LoopScheduler::new(CpalTransport::new(audio, samples_dir, config.clone()));
    scheduler.set_immediate_stop(config.immediate_stop);
    let mut middle = Middle::new(scheduler);

    terminal::enable_raw_mode()?;
    let _guard = RawModeGuard; // auto drops when out of scope
    crossterm::execute!(std::io::stdout(), crossterm::event::EnableMouseCapture)?;

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let tick_rate = std::time::Duration::from_millis(16); // ~60fps
    let mut tui_state = tui::mode::TuiState::default();

    loop {
        let ds = middle.display_state();

        term.draw(|frame| {
            tui::view::render(frame, frame.area(), &ds, &mut tui_state);
        })?;

        let events = tui::input::poll_input(tick_rate, &mut tui_state)?;
        for event in events {
            if event == InputEvent::Quit {
                middle.shutdown();
                drop(term);
                return Ok(());
            }
            middle.handle_input(event);
        }

        // loop boundaries run here, on this thread, one at a time
        middle.tick();
    }
}

fn init_logging(dir: &Path) -> anyhow::Result<()> {
    // stderr belongs to the terminal ui, so log to a file
    let path = dir.join(LOG_FILE);
    let file = std::fs::File::create(&path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        log::error!("CRASH: {panic_info}");
        let _ = terminal::disable_raw_mode();
        default_hook(panic_info);
    }));
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(std::io::stdout(), crossterm::event::DisableMouseCapture);
        let _ = terminal::disable_raw_mode();
    }
}
