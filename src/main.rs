pub mod app;
pub mod engine;
pub mod runtime;
pub mod theme;
pub mod ui;

use crate::{
    app::App,
    engine::{TimerConfig, REFRESH_INTERVALS},
    runtime::{AppEvent, CrosstermEventSource, Runner},
    theme::Theme,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Instant,
};

/// pomodoro timer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "An interactive pomodoro timer with work/break cycles, a live progress bar, in-app settings, and color themes."
)]
pub struct Cli {
    /// work session length in minutes
    #[clap(short = 'w', long, default_value_t = 25, value_parser = clap::value_parser!(u64).range(1..=90))]
    work_minutes: u64,

    /// break session length in minutes
    #[clap(short = 'b', long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..=90))]
    break_minutes: u64,

    /// screen refresh interval in seconds (1, 5, 10, 30 or 60)
    #[clap(short = 'r', long, default_value_t = 1)]
    refresh: u64,

    /// color theme
    #[clap(short = 't', long, value_enum, default_value_t = Theme::Light)]
    theme: Theme,
}

impl Cli {
    fn to_timer_config(&self) -> TimerConfig {
        TimerConfig {
            work_secs: self.work_minutes * 60,
            break_secs: self.break_minutes * 60,
            refresh_secs: self.refresh,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !REFRESH_INTERVALS.contains(&cli.refresh) {
        let mut cmd = Cli::command();
        cmd.error(
            ErrorKind::ValueValidation,
            format!(
                "refresh interval must be one of 1, 5, 10, 30 or 60 (got {})",
                cli.refresh
            ),
        )
        .exit();
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(cli.to_timer_config(), cli.theme);
    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new());

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step(app.refresh_interval()) {
            AppEvent::Tick => {
                let was_running = app.engine.phase() == crate::engine::Phase::Running;
                app.on_tick(Instant::now());
                // nothing moves outside Running, skip the redraw
                if was_running {
                    terminal.draw(|f| f.render_widget(&*app, f.area()))?;
                }
            }
            AppEvent::Resize => {
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            AppEvent::Key(key) => {
                app.handle_key(key, Instant::now());
                if app.should_quit {
                    break;
                }
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
        }
    }

    Ok(())
}
