//! Vertical and horizontal scrolling across page boundaries

use super::CLEARANCE;
use super::state::ViewState;
use crate::pdf::{DocumentBackend, RenderError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

fn page_stride<D: DocumentBackend + ?Sized>(
    state: &mut ViewState,
    doc: &D,
    page: usize,
) -> Result<f32, RenderError> {
    let (_, height) = state.extent(doc, page)?;
    Ok((height + CLEARANCE) as f32)
}

/// Move the view `delta` pixels down the strip (negative moves up).
///
/// Each page occupies `height + CLEARANCE` pixels. The walk clamps at the top
/// of the first page and the bottom of the last one. The state is only
/// updated once the walk completes.
pub fn scroll_vertical<D: DocumentBackend + ?Sized>(
    state: &mut ViewState,
    doc: &D,
    delta: f32,
) -> Result<(), RenderError> {
    if !delta.is_finite() {
        return Ok(());
    }

    let last = state.last_page();
    let mut page = state.page();
    let mut stride = page_stride(state, doc, page)?;
    let mut offset = state.line() * (stride - 1.0).max(0.0) + delta;

    loop {
        if offset < 0.0 {
            if page == 0 {
                state.set_position(0, 0.0);
                return Ok(());
            }
            page -= 1;
            stride = page_stride(state, doc, page)?;
            offset += stride;
        } else if offset >= stride {
            if page >= last {
                state.set_position(last, 1.0);
                return Ok(());
            }
            offset -= stride;
            page += 1;
            stride = page_stride(state, doc, page)?;
        } else {
            // pages at most 1 px tall have no room for a line
            let line = if stride <= (CLEARANCE + 1) as f32 {
                0.0
            } else {
                offset / (stride - 1.0)
            };
            state.set_position(page, line);
            return Ok(());
        }
    }
}

/// Pan by `delta` pixels; small offsets snap back to centre
pub fn scroll_horizontal(state: &mut ViewState, delta: f32) {
    if delta.is_finite() {
        state.set_bias(state.bias() + delta);
    }
}

/// Scroll by `fraction` of the viewport height
pub fn scroll_page<D: DocumentBackend + ?Sized>(
    state: &mut ViewState,
    doc: &D,
    viewport_height: u32,
    fraction: f32,
    direction: ScrollDirection,
) -> Result<(), RenderError> {
    let amount = viewport_height as f32 * fraction;
    match direction {
        ScrollDirection::Down => scroll_vertical(state, doc, amount),
        ScrollDirection::Up => scroll_vertical(state, doc, -amount),
    }
}

/// Jump to `page` at `line`, clamping both
pub fn seek(state: &mut ViewState, page: usize, line: f32) {
    state.set_position(page, line);
}

/// Jump to the top of the last page
pub fn seek_last(state: &mut ViewState) {
    state.set_position(state.last_page(), 0.0);
}
