//! Terminal events to viewer actions

pub mod count_prefix;

pub use count_prefix::CountPrefix;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

/// Which panel receives navigation keys
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Strip,
    Outline,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
    PageUp,
    PageDown,
    ZoomIn,
    ZoomOut,
    RotateClockwise,
    RotateCounterClockwise,
    /// Part of a page number
    Digit(u32),
    /// Go to the typed page, or the first page when nothing was typed
    GotoPage,
    GotoFirst,
    GotoLast,
    ToggleOutline,
    SwitchFocus,
    OutlineUp,
    OutlineDown,
    OutlineExpand,
    OutlineCollapse,
    OutlineActivate,
    Resize(u16, u16),
}

pub fn map_event(event: &Event, focus: Focus) -> Option<Action> {
    match event {
        Event::Key(key) => map_key(key, focus),
        Event::Mouse(mouse) => map_mouse(mouse),
        Event::Resize(cols, rows) => Some(Action::Resize(*cols, *rows)),
        _ => None,
    }
}

pub fn map_key(key: &KeyEvent, focus: Focus) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if focus == Focus::Outline {
        if let Some(action) = map_outline_key(key) {
            return Some(action);
        }
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let action = match key.code {
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char('=' | '+') if ctrl => Action::ZoomIn,
        KeyCode::Char('-') if ctrl => Action::ZoomOut,
        _ if ctrl => return None,

        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Up | KeyCode::Char('k') => Action::ScrollUp,
        KeyCode::Down | KeyCode::Char('j') => Action::ScrollDown,
        KeyCode::Left | KeyCode::Char('h') => Action::ScrollLeft,
        KeyCode::Right | KeyCode::Char('l') => Action::ScrollRight,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown | KeyCode::Char(' ') => Action::PageDown,
        KeyCode::Char('+') => Action::ZoomIn,
        KeyCode::Char('-') => Action::ZoomOut,
        KeyCode::Char('r') => Action::RotateClockwise,
        KeyCode::Char('R') => Action::RotateCounterClockwise,
        KeyCode::Char(c @ '0'..='9') => Action::Digit(c.to_digit(10)?),
        KeyCode::Char('g') | KeyCode::Enter => Action::GotoPage,
        KeyCode::Home => Action::GotoFirst,
        KeyCode::Char('G') | KeyCode::End => Action::GotoLast,
        KeyCode::Char('b') => Action::ToggleOutline,
        KeyCode::Tab => Action::SwitchFocus,
        _ => return None,
    };
    Some(action)
}

fn map_outline_key(key: &KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    let action = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Action::OutlineUp,
        KeyCode::Down | KeyCode::Char('j') => Action::OutlineDown,
        KeyCode::Right | KeyCode::Char('l') => Action::OutlineExpand,
        KeyCode::Left | KeyCode::Char('h') => Action::OutlineCollapse,
        KeyCode::Enter => Action::OutlineActivate,
        _ => return None,
    };
    Some(action)
}

/// Wheel scrolls vertically; with shift it pans, with ctrl it zooms
pub fn map_mouse(mouse: &MouseEvent) -> Option<Action> {
    let ctrl = mouse.modifiers.contains(KeyModifiers::CONTROL);
    let shift = mouse.modifiers.contains(KeyModifiers::SHIFT);
    let action = match mouse.kind {
        MouseEventKind::ScrollUp if ctrl => Action::ZoomIn,
        MouseEventKind::ScrollDown if ctrl => Action::ZoomOut,
        MouseEventKind::ScrollUp if shift => Action::ScrollLeft,
        MouseEventKind::ScrollDown if shift => Action::ScrollRight,
        MouseEventKind::ScrollUp => Action::ScrollUp,
        MouseEventKind::ScrollDown => Action::ScrollDown,
        MouseEventKind::ScrollLeft => Action::ScrollLeft,
        MouseEventKind::ScrollRight => Action::ScrollRight,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    fn strip(code: KeyCode) -> Option<Action> {
        map_event(&key(code, KeyModifiers::NONE), Focus::Strip)
    }

    fn wheel(kind: MouseEventKind, modifiers: KeyModifiers) -> Option<Action> {
        map_event(
            &Event::Mouse(MouseEvent {
                kind,
                column: 3,
                row: 4,
                modifiers,
            }),
            Focus::Strip,
        )
    }

    #[test]
    fn navigation_keys() {
        assert_eq!(strip(KeyCode::Down), Some(Action::ScrollDown));
        assert_eq!(strip(KeyCode::Char('k')), Some(Action::ScrollUp));
        assert_eq!(strip(KeyCode::Char('h')), Some(Action::ScrollLeft));
        assert_eq!(strip(KeyCode::Char(' ')), Some(Action::PageDown));
        assert_eq!(strip(KeyCode::PageUp), Some(Action::PageUp));
        assert_eq!(strip(KeyCode::Char('G')), Some(Action::GotoLast));
        assert_eq!(strip(KeyCode::Char('7')), Some(Action::Digit(7)));
    }

    #[test]
    fn zoom_with_and_without_ctrl() {
        assert_eq!(strip(KeyCode::Char('+')), Some(Action::ZoomIn));
        assert_eq!(
            map_key(
                &KeyEvent::new(KeyCode::Char('='), KeyModifiers::CONTROL),
                Focus::Strip
            ),
            Some(Action::ZoomIn)
        );
        assert_eq!(
            map_key(
                &KeyEvent::new(KeyCode::Char('-'), KeyModifiers::CONTROL),
                Focus::Strip
            ),
            Some(Action::ZoomOut)
        );
        // plain '=' does nothing
        assert_eq!(strip(KeyCode::Char('=')), None);
    }

    #[test]
    fn ctrl_c_quits_and_other_ctrl_keys_are_ignored() {
        assert_eq!(
            map_event(&key(KeyCode::Char('c'), KeyModifiers::CONTROL), Focus::Strip),
            Some(Action::Quit)
        );
        assert_eq!(
            map_event(&key(KeyCode::Char('j'), KeyModifiers::CONTROL), Focus::Strip),
            None
        );
    }

    #[test]
    fn outline_focus_overrides_navigation() {
        let down = key(KeyCode::Char('j'), KeyModifiers::NONE);
        assert_eq!(map_event(&down, Focus::Outline), Some(Action::OutlineDown));
        let enter = key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(map_event(&enter, Focus::Outline), Some(Action::OutlineActivate));
        assert_eq!(map_event(&enter, Focus::Strip), Some(Action::GotoPage));

        // zoom still reaches the strip
        let plus = key(KeyCode::Char('+'), KeyModifiers::NONE);
        assert_eq!(map_event(&plus, Focus::Outline), Some(Action::ZoomIn));
    }

    #[test]
    fn release_events_are_ignored() {
        let mut release = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(map_key(&release, Focus::Strip), None);
    }

    #[test]
    fn wheel_modifiers() {
        assert_eq!(
            wheel(MouseEventKind::ScrollDown, KeyModifiers::NONE),
            Some(Action::ScrollDown)
        );
        assert_eq!(
            wheel(MouseEventKind::ScrollDown, KeyModifiers::SHIFT),
            Some(Action::ScrollRight)
        );
        assert_eq!(
            wheel(MouseEventKind::ScrollUp, KeyModifiers::CONTROL),
            Some(Action::ZoomIn)
        );
        assert_eq!(
            wheel(MouseEventKind::Moved, KeyModifiers::NONE),
            None
        );
    }

    #[test]
    fn resize_passes_through() {
        assert_eq!(
            map_event(&Event::Resize(120, 40), Focus::Outline),
            Some(Action::Resize(120, 40))
        );
    }
}
