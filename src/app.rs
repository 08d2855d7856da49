use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::engine::{Phase, TimerConfig, TimerEngine, REFRESH_INTERVALS};
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Timer,
    Settings,
}

/// Which row of the settings overlay has the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    WorkMinutes,
    BreakMinutes,
    RefreshInterval,
    Theme,
}

impl SettingsField {
    fn next(self) -> Self {
        match self {
            SettingsField::WorkMinutes => SettingsField::BreakMinutes,
            SettingsField::BreakMinutes => SettingsField::RefreshInterval,
            SettingsField::RefreshInterval => SettingsField::Theme,
            SettingsField::Theme => SettingsField::WorkMinutes,
        }
    }

    fn prev(self) -> Self {
        match self {
            SettingsField::WorkMinutes => SettingsField::Theme,
            SettingsField::BreakMinutes => SettingsField::WorkMinutes,
            SettingsField::RefreshInterval => SettingsField::BreakMinutes,
            SettingsField::Theme => SettingsField::RefreshInterval,
        }
    }
}

/// Application state: the engine plus presentation state. Key handling
/// only routes the operations valid for the current phase, so the
/// engine's InvalidTransition guard is never hit from the UI.
#[derive(Debug)]
pub struct App {
    pub engine: TimerEngine,
    pub theme: Theme,
    pub screen: Screen,
    pub selected: SettingsField,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: TimerConfig, theme: Theme) -> Self {
        Self {
            engine: TimerEngine::new(config),
            theme,
            screen: Screen::Timer,
            selected: SettingsField::WorkMinutes,
            should_quit: false,
        }
    }

    /// Tick cadence for the event loop, from the live config.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.engine.config().refresh_secs)
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.engine.tick(now);
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Timer => self.handle_timer_key(key, now),
            Screen::Settings => self.handle_settings_key(key),
        }
    }

    fn handle_timer_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('o') => {
                self.screen = Screen::Settings;
            }
            // primary action follows the phase, like the original's
            // single prominent button
            KeyCode::Char(' ') | KeyCode::Enter => match self.engine.phase() {
                Phase::Ready => self.engine.start(now),
                Phase::Running => {
                    // guarded by the phase match above
                    let _ = self.engine.pause(now);
                }
                Phase::Paused => {
                    let _ = self.engine.resume(now);
                }
            },
            KeyCode::Char('n') if self.engine.phase() != Phase::Ready => {
                self.engine.next(now);
            }
            KeyCode::Char('r') if self.engine.phase() != Phase::Ready => {
                self.engine.reset();
            }
            _ => {}
        }
    }

    fn handle_settings_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('o') => {
                self.screen = Screen::Timer;
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.selected = self.selected.prev();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.selected = self.selected.next();
            }
            KeyCode::Left | KeyCode::Char('-') => self.adjust(-1),
            KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => self.adjust(1),
            _ => {}
        }
    }

    fn adjust(&mut self, direction: i64) {
        match self.selected {
            SettingsField::WorkMinutes => {
                let minutes = self.engine.config().work_secs / 60;
                self.engine
                    .set_work_minutes(minutes.saturating_add_signed(direction));
            }
            SettingsField::BreakMinutes => {
                let minutes = self.engine.config().break_secs / 60;
                self.engine
                    .set_break_minutes(minutes.saturating_add_signed(direction));
            }
            SettingsField::RefreshInterval => {
                let current = self.engine.config().refresh_secs;
                let idx = REFRESH_INTERVALS
                    .iter()
                    .position(|&s| s == current)
                    .unwrap_or(0);
                let len = REFRESH_INTERVALS.len() as i64;
                let next = (idx as i64 + direction).rem_euclid(len) as usize;
                // values come straight from the enumerated set, cannot fail
                let _ = self.engine.set_refresh_secs(REFRESH_INTERVALS[next]);
            }
            SettingsField::Theme => {
                self.theme = self.theme.cycled();
            }
        }
    }
}
