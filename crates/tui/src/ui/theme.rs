use ratatui::style::Color;

use crate::appearance::ThemeMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub border: Color,
    pub placeholder: Color,
    pub accent: Color,
    pub success: Color,
    pub error: Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            background: Color::Rgb(255, 255, 255),
            text: Color::Rgb(0, 0, 0),
            border: Color::Rgb(204, 204, 204),
            placeholder: Color::Rgb(102, 102, 102),
            accent: Color::Rgb(0, 122, 255),
            success: Color::Rgb(40, 140, 60),
            error: Color::Rgb(200, 40, 40),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(18, 18, 18),
            text: Color::Rgb(255, 255, 255),
            border: Color::Rgb(102, 102, 102),
            placeholder: Color::Rgb(170, 170, 170),
            accent: Color::Rgb(80, 160, 160),
            success: Color::Rgb(90, 190, 110),
            error: Color::Rgb(230, 90, 90),
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }
}
