use clap::ValueEnum;
use ratatui::style::Color;

/// Color mode. Presentation only; the engine knows nothing about it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum Theme {
    Light,
    Dark,
    Red,
}

/// Colors used by the renderer for one theme.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub accent: Color,
    pub dim: Color,
    pub gauge: Color,
}

impl Theme {
    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                background: Color::White,
                text: Color::Black,
                accent: Color::Black,
                dim: Color::DarkGray,
                gauge: Color::Green,
            },
            Theme::Dark => Palette {
                background: Color::Rgb(0x0e, 0x11, 0x17),
                text: Color::Rgb(0xfa, 0xfa, 0xfa),
                accent: Color::Rgb(0xfa, 0xfa, 0xfa),
                dim: Color::Gray,
                gauge: Color::Green,
            },
            Theme::Red => Palette {
                background: Color::Rgb(0x1a, 0x0f, 0x0f),
                text: Color::Rgb(0xff, 0xec, 0xec),
                accent: Color::Rgb(0xff, 0x4b, 0x4b),
                dim: Color::Rgb(0xaa, 0x77, 0x77),
                gauge: Color::Rgb(0xff, 0x4b, 0x4b),
            },
        }
    }

    pub fn cycled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Red,
            Theme::Red => Theme::Light,
        }
    }
}
