use std::time::{Duration, Instant};

use anyhow::Result;
use log::{debug, info};
use ratatui::{
    Frame, Terminal,
    layout::{Constraint, Direction, Layout, Rect},
};

use crate::event_source::{Event, EventSource};
use crate::inputs::{Action, CountPrefix, Focus, map_event};
use crate::pdf::DocumentBackend;
use crate::settings::Settings;
use crate::strip::{Command, Effect, Placement, ScrollDirection, StartPosition, Viewer};
use crate::theme::Base16Palette;
use crate::widget::hud_message::HudMessage;
use crate::widget::{HalfblockCanvas, OutlinePanel, render_status_bar};

/// Events handled per frame before the screen is redrawn
const MAX_EVENTS_PER_FRAME: usize = 50;

pub struct App<D: DocumentBackend> {
    viewer: Viewer<D>,
    settings: Settings,
    outline: OutlinePanel,
    show_outline: bool,
    focus: Focus,
    count: CountPrefix,
    palette: &'static Base16Palette,
    hud: Option<HudMessage>,
    placements: Vec<Placement>,
    needs_redraw: bool,
    should_quit: bool,
}

impl<D: DocumentBackend> App<D> {
    pub fn new(doc: D, start: StartPosition, settings: Settings) -> Self {
        let viewer = Viewer::open(doc, start, settings.viewer_config());
        let outline = OutlinePanel::new(viewer.outline().clone());
        let show_outline = settings.show_outline && !outline.is_empty();
        info!("Using theme {}", settings.theme.name());

        Self {
            viewer,
            palette: settings.theme.palette(),
            settings,
            outline,
            show_outline,
            focus: if show_outline {
                Focus::Outline
            } else {
                Focus::Strip
            },
            count: CountPrefix::new(),
            hud: None,
            placements: Vec::new(),
            needs_redraw: true,
            should_quit: false,
        }
    }

    pub fn handle_event(&mut self, event: &Event) {
        if let Some(action) = map_event(event, self.focus) {
            self.handle_action(action);
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        if !matches!(action, Action::Digit(_) | Action::GotoPage | Action::Resize(..)) {
            self.count.clear();
        }

        let step = self.viewer.config().scroll_step;
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollUp => self.apply(Command::ScrollVertical(-step)),
            Action::ScrollDown => self.apply(Command::ScrollVertical(step)),
            Action::ScrollLeft => self.apply(Command::ScrollHorizontal(-step)),
            Action::ScrollRight => self.apply(Command::ScrollHorizontal(step)),
            Action::PageUp => self.apply(Command::ScrollPage(ScrollDirection::Up)),
            Action::PageDown => self.apply(Command::ScrollPage(ScrollDirection::Down)),
            Action::ZoomIn => self.apply(Command::ZoomIn),
            Action::ZoomOut => self.apply(Command::ZoomOut),
            Action::RotateClockwise => self.apply(Command::Rotate(90.0)),
            Action::RotateCounterClockwise => self.apply(Command::Rotate(-90.0)),
            Action::Digit(digit) => {
                self.count.push_digit(digit);
                self.needs_redraw = true;
            }
            Action::GotoPage => self.goto_typed_page(),
            Action::GotoFirst => self.apply(Command::SeekPage(0)),
            Action::GotoLast => self.apply(Command::SeekLast),
            Action::ToggleOutline => self.toggle_outline(),
            Action::SwitchFocus => {
                if self.show_outline {
                    self.focus = match self.focus {
                        Focus::Strip => Focus::Outline,
                        Focus::Outline => Focus::Strip,
                    };
                    self.needs_redraw = true;
                }
            }
            Action::OutlineUp => self.with_outline(OutlinePanel::select_prev),
            Action::OutlineDown => self.with_outline(OutlinePanel::select_next),
            Action::OutlineExpand => self.with_outline(OutlinePanel::expand),
            Action::OutlineCollapse => self.with_outline(OutlinePanel::collapse),
            Action::OutlineActivate => match self.outline.activate() {
                Some(page) => self.apply(Command::SeekPage(page)),
                None => self.with_outline(OutlinePanel::toggle),
            },
            Action::Resize(cols, rows) => {
                debug!("Terminal resized to {cols}x{rows}");
                self.needs_redraw = true;
            }
        }
    }

    fn apply(&mut self, command: Command) {
        for effect in self.viewer.apply(command) {
            match effect {
                Effect::Repaint => self.needs_redraw = true,
                Effect::PageChanged(page) => debug!("Now on page {}", page + 1),
            }
        }
    }

    fn with_outline(&mut self, f: impl FnOnce(&mut OutlinePanel)) {
        f(&mut self.outline);
        self.needs_redraw = true;
    }

    /// Seek to the 1-based page typed before `g`, or to the first page
    fn goto_typed_page(&mut self) {
        let page_count = self.viewer.state().page_count();
        match self.count.take() {
            None => self.apply(Command::SeekPage(0)),
            Some(n) if n <= page_count => self.apply(Command::SeekPage(n.saturating_sub(1))),
            Some(n) => {
                self.hud = Some(HudMessage::error(format!(
                    "No page {n} (document has {page_count})"
                )));
                self.needs_redraw = true;
            }
        }
    }

    fn toggle_outline(&mut self) {
        if self.outline.is_empty() {
            self.hud = Some(HudMessage::info("No outline in this document"));
        } else {
            self.show_outline = !self.show_outline;
            self.focus = if self.show_outline {
                Focus::Outline
            } else {
                Focus::Strip
            };
        }
        self.needs_redraw = true;
    }

    /// Drop an expired HUD message
    pub fn on_tick(&mut self) {
        if self.hud.as_ref().is_some_and(HudMessage::is_expired) {
            self.hud = None;
            self.needs_redraw = true;
        }
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(f.area());
        let (main_area, status_area) = (chunks[0], chunks[1]);

        let strip_area = if self.show_outline {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(30), Constraint::Min(1)])
                .split(main_area);
            let current_page = self.viewer.state().page();
            self.outline.render(
                f,
                columns[0],
                self.focus == Focus::Outline,
                self.palette,
                current_page,
            );
            columns[1]
        } else {
            main_area
        };

        self.draw_strip(f, strip_area);

        match &self.hud {
            Some(hud) if !hud.is_expired() => hud.render(f, status_area, self.palette),
            _ => render_status_bar(
                f,
                status_area,
                &self.viewer.status(),
                self.count.pending(),
                self.palette,
            ),
        }
        self.needs_redraw = false;
    }

    fn draw_strip(&mut self, f: &mut Frame, area: Rect) {
        let mut canvas = HalfblockCanvas::new(
            area.width,
            area.height,
            self.settings.cell_width_px,
            self.settings.cell_height_px,
            self.palette.base_00,
        )
        .with_hatch(self.palette.base_02, self.palette.base_01);

        self.viewer.apply(Command::Resize(canvas.viewport()));
        self.placements = self.viewer.paint(&mut canvas);
        f.render_widget(&canvas, area);
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn viewer(&self) -> &Viewer<D> {
        &self.viewer
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn is_outline_visible(&self) -> bool {
        self.show_outline
    }

    pub fn outline_panel(&self) -> &OutlinePanel {
        &self.outline
    }

    pub fn hud(&self) -> Option<&HudMessage> {
        self.hud.as_ref()
    }

    /// Pages placed by the last draw
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Release cached page images, returning how many were held
    pub fn close(&mut self) -> usize {
        self.viewer.close()
    }
}

pub fn run_app_with_event_source<B: ratatui::backend::Backend, D: DocumentBackend>(
    terminal: &mut Terminal<B>,
    app: &mut App<D>,
    event_source: &mut dyn EventSource,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let tick_rate = Duration::from_millis(50);
    let mut last_tick = Instant::now();
    let mut first_render = true;
    loop {
        // the viewport is only known after a draw, so draw before reading input
        if first_render || app.needs_redraw() {
            terminal.draw(|f| app.draw(f))?;
            first_render = false;
        }

        let mut events_processed = 0;
        while events_processed < MAX_EVENTS_PER_FRAME
            && event_source.poll(Duration::from_millis(0))?
        {
            let event = event_source.read()?;
            events_processed += 1;
            app.handle_event(&event);
            if app.should_quit() {
                return Ok(());
            }
        }

        if events_processed == 0 {
            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            event_source.poll(timeout)?;
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
}
