use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Widget},
};

use crate::app::{App, Screen, SettingsField};
use crate::engine::Phase;
use crate::theme::Palette;

const HORIZONTAL_MARGIN: u16 = 5;

/// MM:SS with unbounded minutes; 90 minutes renders as "90:00".
pub fn format_mm_ss(total_seconds: u64) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = self.theme.palette();

        Block::default()
            .style(Style::default().bg(palette.background).fg(palette.text))
            .render(area, buf);

        render_timer(self, &palette, area, buf);

        if self.screen == Screen::Settings {
            render_settings(self, &palette, area, buf);
        }
    }
}

fn render_timer(app: &App, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let snap = app.engine.snapshot();

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let accent_bold = bold.fg(palette.accent);
    let dim = Style::default().fg(palette.dim);

    let top = area.height.saturating_sub(9) / 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(top.saturating_sub(1)),
            Constraint::Length(1), // mode label
            Constraint::Length(1),
            Constraint::Length(1), // clock
            Constraint::Length(1),
            Constraint::Length(1), // progress
            Constraint::Length(1),
            Constraint::Length(1), // key hints
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(Span::styled("focusmato", dim)).render(chunks[0], buf);

    Paragraph::new(Span::styled(snap.mode.label(), accent_bold))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    let clock = if snap.phase == Phase::Paused {
        format!("{} (paused)", format_mm_ss(snap.seconds_left))
    } else {
        format_mm_ss(snap.seconds_left)
    };
    Paragraph::new(Span::styled(clock, bold.fg(palette.text)))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

    Gauge::default()
        .gauge_style(Style::default().fg(palette.gauge).bg(palette.background))
        .ratio(snap.progress)
        .label(Span::styled(
            format!("{:.0}%", snap.progress * 100.0),
            Style::default().fg(palette.text),
        ))
        .render(chunks[6], buf);

    // only the operations valid for the current phase are offered
    let hints = match snap.phase {
        Phase::Ready => "space start   o settings   q quit",
        Phase::Running => "space pause   n next   r reset   o settings   q quit",
        Phase::Paused => "space resume   n next   r reset   o settings   q quit",
    };
    Paragraph::new(Span::styled(hints, dim))
        .alignment(Alignment::Center)
        .render(chunks[8], buf);
}

fn render_settings(app: &App, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let config = app.engine.config();

    let rows = [
        (
            SettingsField::WorkMinutes,
            "Pomodoro (min)",
            (config.work_secs / 60).to_string(),
        ),
        (
            SettingsField::BreakMinutes,
            "Break (min)",
            (config.break_secs / 60).to_string(),
        ),
        (
            SettingsField::RefreshInterval,
            "Refresh (sec)",
            config.refresh_secs.to_string(),
        ),
        (SettingsField::Theme, "Color mode", app.theme.to_string()),
    ];

    let popup = centered_rect(34, rows.len() as u16 + 3, area);
    Clear.render(popup, buf);

    let block = Block::default()
        .title(" Settings ")
        .borders(Borders::ALL)
        .style(Style::default().bg(palette.background).fg(palette.text))
        .border_style(Style::default().fg(palette.accent));
    let inner = block.inner(popup);
    block.render(popup, buf);

    let mut lines: Vec<Line> = rows
        .iter()
        .map(|(field, name, value)| {
            let style = if *field == app.selected {
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.text)
            };
            let marker = if *field == app.selected { "> " } else { "  " };
            Line::from(Span::styled(
                format!("{}{:<16}{:>12}", marker, name, value),
                style,
            ))
        })
        .collect();
    lines.push(Line::from(Span::styled(
        "←/→ change   ↑/↓ select   esc close",
        Style::default().fg(palette.dim),
    )));

    Paragraph::new(lines).render(inner, buf);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
