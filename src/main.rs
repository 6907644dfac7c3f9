//! coregauge: per-core CPU load gauges for the terminal window.
//!
//! Samples every logical core's "% Processor Time" once a second (PDH on
//! Windows, `sysinfo` elsewhere), draws each core as a 50-character `#` bar
//! and titles the window with the processor's name.
//!
//! Keys: q / Esc / F10 / Ctrl-C close the window.

#![allow(dead_code)]

mod app;
mod config;
mod input;
mod logging;
mod system;
mod ticker;
mod ui;

use std::io;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use app::App;
use config::Config;
use system::processor::{lookup_processor_name, window_title};
use system::sampler::Sampler;
use system::PlatformBackend;
use ticker::Ticker;

fn main() -> Result<()> {
    logging::init();
    let config = Config::default();

    // Name lookup and counter setup both happen before the window appears;
    // neither can keep it from appearing.
    let title = window_title(lookup_processor_name, &config);
    let mut sampler = match Sampler::open(PlatformBackend::new()) {
        Ok(sampler) => Some(sampler),
        Err(e) => {
            error!(error = %e, "counter setup failed, gauges disabled");
            None
        }
    };
    let mut app = App::new(title, config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle(&app.title))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let result = run_app(&mut terminal, &mut app, sampler.as_mut());

    // The loop is gone, so no more ticks: release the counters exactly once
    if let Some(sampler) = sampler.as_mut() {
        sampler.close();
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    info!("exiting");
    Ok(())
}

/// Main event loop: timer ticks sample and redraw, keys may close the window,
/// resizes repaint the last frame.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    mut sampler: Option<&mut Sampler<PlatformBackend>>,
) -> Result<()> {
    let mut ticker = Ticker::new(app.config.timer_id, app.config.update_interval, Instant::now());
    info!(timer = ticker.id(), period_ms = app.config.update_interval.as_millis() as u64, "timer started");

    // First paint samples straight away instead of waiting a full period
    if let Some(sampler) = sampler.as_deref_mut() {
        app.on_tick(sampler);
    }
    terminal.draw(|f| ui::draw(f, app))?;

    loop {
        let mut needs_redraw = false;

        if event::poll(ticker.timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) => {
                    // On Windows, crossterm fires Press and Release; only handle Press
                    if key.kind == KeyEventKind::Press {
                        input::handle_input(app, key);
                    }
                }
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }

        if ticker.poll(Instant::now()).is_some() {
            if let Some(sampler) = sampler.as_deref_mut() {
                needs_redraw |= app.on_tick(sampler);
            }
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw(f, app))?;
        }
    }
}
