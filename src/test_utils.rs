//! Helpers shared by unit and integration tests

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use crate::pdf::{
    BASE_DPI, DocumentBackend, OutlineNode, PageRect, PixelTarget, RenderError, Transform,
};
use crate::strip::DEFAULT_DPI;

/// In-memory document with fixed page sizes.
///
/// Renders a flat colour derived from the page index and transform, counts
/// renders, and can be told to fail for particular pages.
pub struct FakeDocument {
    pages: Vec<PageRect>,
    failing: RefCell<HashSet<usize>>,
    unreadable: RefCell<HashSet<usize>>,
    renders: Cell<usize>,
    outline: Vec<OutlineNode>,
    title: Option<String>,
}

impl FakeDocument {
    /// Pages that render to exactly `width x height` pixels at scale 1.0
    /// and the default DPI
    pub fn with_pixel_pages(count: usize, width: u32, height: u32) -> Self {
        Self::with_pixel_sizes(vec![(width, height); count])
    }

    pub fn with_pixel_sizes(sizes: Vec<(u32, u32)>) -> Self {
        let to_units = BASE_DPI / DEFAULT_DPI;
        let pages = sizes
            .into_iter()
            .map(|(w, h)| PageRect::new(0.0, 0.0, w as f32 * to_units, h as f32 * to_units))
            .collect();
        Self {
            pages,
            failing: RefCell::new(HashSet::new()),
            unreadable: RefCell::new(HashSet::new()),
            renders: Cell::new(0),
            outline: Vec::new(),
            title: None,
        }
    }

    pub fn with_outline(mut self, outline: Vec<OutlineNode>) -> Self {
        self.outline = outline;
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Make renders of `page` fail (bounds stay available)
    pub fn set_failing(&self, page: usize, failing: bool) {
        let mut set = self.failing.borrow_mut();
        if failing {
            set.insert(page);
        } else {
            set.remove(&page);
        }
    }

    /// Make both bounds and renders of `page` fail
    pub fn set_unreadable(&self, page: usize, unreadable: bool) {
        let mut set = self.unreadable.borrow_mut();
        if unreadable {
            set.insert(page);
        } else {
            set.remove(&page);
        }
    }

    /// Successful renders so far
    pub fn render_count(&self) -> usize {
        self.renders.get()
    }

    /// Colour every pixel of `page` gets at `scale`, in BGRA
    pub fn page_colour(page: usize, transform: &Transform) -> [u8; 4] {
        let zoom = ((transform.a.abs() + transform.b.abs()) * 50.0).min(255.0) as u8;
        [(page * 40 % 200) as u8, zoom, 0x20, 0xff]
    }
}

impl DocumentBackend for FakeDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_bounds(&self, page: usize) -> Result<PageRect, RenderError> {
        if self.unreadable.borrow().contains(&page) {
            return Err(RenderError::backend(page, "unreadable page"));
        }
        self.pages
            .get(page)
            .copied()
            .ok_or(RenderError::PageOutOfRange {
                page,
                count: self.pages.len(),
            })
    }

    fn render_into(
        &self,
        page: usize,
        transform: &Transform,
        target: &mut PixelTarget<'_>,
    ) -> Result<(), RenderError> {
        self.page_bounds(page)?;
        if self.failing.borrow().contains(&page) {
            return Err(RenderError::backend(page, "injected failure"));
        }

        let colour = Self::page_colour(page, transform);
        for px in target.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&colour);
        }
        self.renders.set(self.renders.get() + 1);
        Ok(())
    }

    fn outline(&self) -> Vec<OutlineNode> {
        self.outline.clone()
    }

    fn title(&self) -> Option<String> {
        self.title.clone()
    }
}

pub mod test_helpers {
    use crate::event_source::{
        Event, KeyCode, KeyModifiers, MouseEventKind, SimulatedEventSource,
    };
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    /// Builder for creating test scenarios with simulated user input
    #[derive(Default)]
    pub struct TestScenarioBuilder {
        events: Vec<Event>,
    }

    impl TestScenarioBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn press_char(mut self, c: char) -> Self {
            self.events.push(SimulatedEventSource::char_key(c));
            self
        }

        pub fn press_ctrl_char(mut self, c: char) -> Self {
            self.events.push(SimulatedEventSource::ctrl_char_key(c));
            self
        }

        pub fn press_key(mut self, code: KeyCode) -> Self {
            self.events
                .push(SimulatedEventSource::key_event(code, KeyModifiers::empty()));
            self
        }

        pub fn press_enter(self) -> Self {
            self.press_key(KeyCode::Enter)
        }

        pub fn press_tab(self) -> Self {
            self.press_key(KeyCode::Tab)
        }

        /// Scroll down n steps (press 'j' n times)
        pub fn scroll_down(mut self, times: usize) -> Self {
            for _ in 0..times {
                self.events.push(SimulatedEventSource::char_key('j'));
            }
            self
        }

        /// Scroll up n steps (press 'k' n times)
        pub fn scroll_up(mut self, times: usize) -> Self {
            for _ in 0..times {
                self.events.push(SimulatedEventSource::char_key('k'));
            }
            self
        }

        pub fn page_down(self) -> Self {
            self.press_key(KeyCode::PageDown)
        }

        pub fn page_up(self) -> Self {
            self.press_key(KeyCode::PageUp)
        }

        /// Type a page number and jump with 'g'
        pub fn goto_page(mut self, page: usize) -> Self {
            for c in page.to_string().chars() {
                self.events.push(SimulatedEventSource::char_key(c));
            }
            self.events.push(SimulatedEventSource::char_key('g'));
            self
        }

        pub fn wheel(mut self, kind: MouseEventKind, modifiers: KeyModifiers) -> Self {
            self.events.push(SimulatedEventSource::wheel(kind, modifiers));
            self
        }

        pub fn resize(mut self, columns: u16, rows: u16) -> Self {
            self.events.push(SimulatedEventSource::resize(columns, rows));
            self
        }

        /// Quit the application (press 'q')
        pub fn quit(self) -> Self {
            self.press_char('q')
        }

        pub fn build(self) -> SimulatedEventSource {
            SimulatedEventSource::new(self.events)
        }
    }

    /// Create a test terminal for snapshot testing
    pub fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).unwrap()
    }

    /// Capture the current terminal buffer as text
    pub fn capture_terminal_state(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut lines = Vec::new();

        for y in 0..buffer.area.height {
            let mut line = String::new();
            for x in 0..buffer.area.width {
                line.push_str(buffer[(x, y)].symbol());
            }
            lines.push(line.trim_end().to_string());
        }

        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        lines.join("\n")
    }
}
