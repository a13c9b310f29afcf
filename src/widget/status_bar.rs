use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::strip::Status;
use crate::theme::Base16Palette;

/// One-line summary under the strip: title on the left, pending page count
/// in the middle, position and zoom on the right
pub fn status_line(status: &Status, pending_count: Option<usize>, width: u16) -> String {
    let right = format!(
        "{} / {}  {}%{}",
        status.page,
        status.page_count,
        status.scale_percent,
        if status.rotation.rem_euclid(360.0) != 0.0 {
            format!("  {}°", status.rotation.rem_euclid(360.0))
        } else {
            String::new()
        }
    );
    let middle = pending_count.map(|n| format!(" :{n}")).unwrap_or_default();
    let left = status.title.as_deref().unwrap_or_default();

    let width = width as usize;
    let fixed = middle.chars().count() + right.chars().count() + 2;
    let title: String = left.chars().take(width.saturating_sub(fixed)).collect();
    let pad = width.saturating_sub(fixed - 2 + title.chars().count() + 1);
    format!(" {title}{middle}{}{right}", " ".repeat(pad))
}

pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    status: &Status,
    pending_count: Option<usize>,
    palette: &Base16Palette,
) {
    let text = status_line(status, pending_count, area.width);
    let line = Line::from(vec![Span::styled(
        text,
        Style::default()
            .fg(palette.base_06)
            .bg(palette.base_01)
            .add_modifier(Modifier::BOLD),
    )]);
    f.render_widget(
        Paragraph::new(line).style(Style::default().bg(palette.base_01)),
        area,
    );
}
