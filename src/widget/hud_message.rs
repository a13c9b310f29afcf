use std::time::{Duration, Instant};

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::theme::Base16Palette;

/// How long a message stays over the status bar
pub const HUD_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudMode {
    Info,
    Error,
}

/// Short-lived message shown in place of the status line
#[derive(Debug, Clone)]
pub struct HudMessage {
    pub text: String,
    pub expires_at: Instant,
    pub mode: HudMode,
}

impl HudMessage {
    pub fn new(text: impl Into<String>, duration: Duration, mode: HudMode) -> Self {
        Self {
            text: text.into(),
            expires_at: Instant::now() + duration,
            mode,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, HUD_DURATION, HudMode::Info)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, HUD_DURATION, HudMode::Error)
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    pub fn styled_line(&self, palette: &Base16Palette) -> Line<'static> {
        let style = match self.mode {
            HudMode::Info => Style::default()
                .fg(palette.base_06)
                .bg(palette.base_02)
                .add_modifier(Modifier::BOLD),
            HudMode::Error => Style::default()
                .fg(palette.base_07)
                .bg(palette.base_08)
                .add_modifier(Modifier::BOLD),
        };

        Line::from(vec![Span::styled(format!(" {} ", self.text), style)]).centered()
    }

    pub fn render(&self, f: &mut Frame, area: Rect, palette: &Base16Palette) {
        f.render_widget(
            Paragraph::new(self.styled_line(palette))
                .style(Style::default().bg(palette.base_01)),
            area,
        );
    }
}
