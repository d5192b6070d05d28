use crate::app::notifications::NotificationKind;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

/// Palette for one render pass, picked from the stored theme name.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub bg: Color,
    pub panel_bg: Color,
    pub text: Color,
    pub text_muted: Color,
    pub accent: Color,
    pub border: Color,
    pub bar_bg: Color,
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,
}

impl Theme {
    pub const DARK: Theme = Theme {
        bg: Color::Rgb(22, 24, 30),
        panel_bg: Color::Rgb(28, 31, 38),
        text: Color::Rgb(220, 222, 228),
        text_muted: Color::Rgb(120, 126, 140),
        accent: Color::Rgb(80, 200, 210),
        border: Color::Rgb(60, 66, 80),
        bar_bg: Color::Rgb(40, 44, 54),
        success: Color::Rgb(90, 210, 130),
        error: Color::Rgb(235, 100, 100),
        warning: Color::Rgb(230, 180, 80),
        info: Color::Rgb(100, 170, 230),
    };

    pub const LIGHT: Theme = Theme {
        bg: Color::Rgb(250, 250, 252),
        panel_bg: Color::Rgb(255, 255, 255),
        text: Color::Rgb(30, 34, 42),
        text_muted: Color::Rgb(110, 116, 130),
        accent: Color::Rgb(0, 120, 140),
        border: Color::Rgb(200, 204, 214),
        bar_bg: Color::Rgb(228, 231, 238),
        success: Color::Rgb(20, 140, 70),
        error: Color::Rgb(200, 40, 40),
        warning: Color::Rgb(180, 120, 0),
        info: Color::Rgb(30, 100, 200),
    };

    /// `dark` picks the dark palette, anything else is light.
    pub fn from_name(name: &str) -> Theme {
        if name.eq_ignore_ascii_case("dark") {
            Self::DARK
        } else {
            Self::LIGHT
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.bg)
    }

    pub fn panel(&self, focused: bool) -> Style {
        Style::default().fg(self.text).bg(if focused { self.panel_bg } else { self.bg })
    }

    pub fn border(&self, focused: bool) -> Style {
        Style::default().fg(if focused { self.accent } else { self.border })
    }

    pub fn border_type(&self, focused: bool) -> BorderType {
        if focused {
            BorderType::Thick
        } else {
            BorderType::Rounded
        }
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.text).add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    pub fn label(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar(&self) -> Style {
        Style::default().fg(self.text).bg(self.bar_bg)
    }

    pub fn kind(&self, kind: NotificationKind) -> Style {
        let color = match kind {
            NotificationKind::Success => self.success,
            NotificationKind::Error => self.error,
            NotificationKind::Warning => self.warning,
            NotificationKind::Info => self.info,
        };
        Style::default().fg(color)
    }
}
