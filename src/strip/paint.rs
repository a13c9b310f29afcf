//! Paint planning: which pages land where in the viewport

use log::warn;

use super::CLEARANCE;
use super::cache::page_extent;
use super::state::ViewState;
use super::types::{RasterImage, Viewport};
use crate::pdf::{DocumentBackend, RenderError};

/// Where one page lands in the viewport, in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub page: usize,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// False when the page failed to render and only its frame is known
    pub rendered: bool,
}

/// A placement and its image, valid for the duration of one sink call
#[derive(Clone, Copy, Debug)]
pub struct PlacedPage<'a> {
    pub placement: Placement,
    pub image: Option<&'a RasterImage>,
}

/// Something pages can be painted onto
pub trait Surface {
    /// Copy a BGRA image with its top-left corner at `(x, y)`
    fn blit(&mut self, pixels: &[u8], width: u32, height: u32, x: i32, y: i32);

    /// Mark the area of a page that could not be rendered
    fn placeholder(&mut self, x: i32, y: i32, width: u32, height: u32);
}

/// Walk the pages visible in `viewport`, top to bottom.
///
/// Each page is fetched through the cache and handed to `sink` right away,
/// so the walk works even when more pages are visible than the cache holds.
/// Returns the number of placements produced.
pub fn plan<D, F>(
    state: &mut ViewState,
    doc: &D,
    viewport: Viewport,
    mut sink: F,
) -> Result<usize, RenderError>
where
    D: DocumentBackend + ?Sized,
    F: FnMut(PlacedPage<'_>),
{
    if state.page_count() == 0 {
        return Ok(0);
    }

    let params = state.render_params();
    let dpi = state.cache().dpi();
    let line = state.line();
    let bias = state.bias();
    let last = state.last_page();

    let mut page = state.page();
    let mut cursor: Option<i32> = None;
    let mut count = 0;

    loop {
        let frame = |width: u32, height: u32, cursor: Option<i32>| {
            let y = cursor.unwrap_or_else(|| {
                (-line * (height + CLEARANCE).saturating_sub(1) as f32) as i32
            });
            let half = (i64::from(viewport.width) - i64::from(width)) / 2;
            let x = (half as f32 - bias) as i32;
            Placement {
                page,
                x,
                y,
                width,
                height,
                rendered: true,
            }
        };

        let placed = match state.image(doc, page) {
            Ok(image) => {
                let placement = frame(image.width, image.height, cursor);
                sink(PlacedPage {
                    placement,
                    image: Some(image),
                });
                Some(placement)
            }
            Err(e) => match page_extent(doc, page, params, dpi) {
                Ok((width, height)) => {
                    warn!("Page {page} painted as placeholder: {e}");
                    let placement = Placement {
                        rendered: false,
                        ..frame(width, height, cursor)
                    };
                    sink(PlacedPage {
                        placement,
                        image: None,
                    });
                    Some(placement)
                }
                Err(bounds) => {
                    warn!("Page {page} skipped, no geometry: {bounds}");
                    None
                }
            },
        };

        if let Some(placement) = placed {
            count += 1;
            let next = placement
                .y
                .saturating_add((placement.height + CLEARANCE) as i32);
            if next >= viewport.height as i32 {
                return Ok(count);
            }
            cursor = Some(next);
        }
        if page >= last {
            return Ok(count);
        }
        page += 1;
    }
}

/// Placement geometry for the current view
pub fn layout<D: DocumentBackend + ?Sized>(
    state: &mut ViewState,
    doc: &D,
    viewport: Viewport,
) -> Result<Vec<Placement>, RenderError> {
    let mut placements = Vec::new();
    plan(state, doc, viewport, |placed| placements.push(placed.placement))?;
    Ok(placements)
}

/// Paint the current view onto `surface`
pub fn paint<D, S>(
    state: &mut ViewState,
    doc: &D,
    viewport: Viewport,
    surface: &mut S,
) -> Result<Vec<Placement>, RenderError>
where
    D: DocumentBackend + ?Sized,
    S: Surface + ?Sized,
{
    let mut placements = Vec::new();
    plan(state, doc, viewport, |placed| {
        let p = placed.placement;
        match placed.image {
            Some(image) => surface.blit(&image.pixels, image.width, image.height, p.x, p.y),
            None => surface.placeholder(p.x, p.y, p.width, p.height),
        }
        placements.push(p);
    })?;
    Ok(placements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strip::{RasterCache, seek};
    use crate::test_utils::FakeDocument;

    #[derive(Default)]
    struct RecordingSurface {
        blits: Vec<(u32, u32, i32, i32)>,
        placeholders: Vec<(i32, i32, u32, u32)>,
    }

    impl Surface for RecordingSurface {
        fn blit(&mut self, pixels: &[u8], width: u32, height: u32, x: i32, y: i32) {
            assert_eq!(pixels.len(), 4 * width as usize * height as usize);
            self.blits.push((width, height, x, y));
        }

        fn placeholder(&mut self, x: i32, y: i32, width: u32, height: u32) {
            self.placeholders.push((x, y, width, height));
        }
    }

    fn state(pages: usize, capacity: usize) -> ViewState {
        ViewState::new(pages, RasterCache::new(capacity))
    }

    #[test]
    fn two_pages_fill_viewport() {
        let doc = FakeDocument::with_pixel_pages(2, 400, 400);
        let mut s = state(2, 10);

        let placements = layout(&mut s, &doc, Viewport::new(600, 600)).unwrap();

        assert_eq!(placements.len(), 2);
        assert_eq!((placements[0].x, placements[0].y), (100, 0));
        assert_eq!((placements[1].page, placements[1].y), (1, 402));
    }

    #[test]
    fn stops_once_viewport_is_covered() {
        let doc = FakeDocument::with_pixel_pages(10, 400, 400);
        let mut s = state(10, 10);

        let placements = layout(&mut s, &doc, Viewport::new(600, 600)).unwrap();

        assert_eq!(placements.len(), 2);
        assert!(!s.cache().contains(2));
    }

    #[test]
    fn line_offsets_first_page() {
        let doc = FakeDocument::with_pixel_pages(3, 400, 399);
        let mut s = state(3, 10);
        seek(&mut s, 0, 0.5);

        let placements = layout(&mut s, &doc, Viewport::new(400, 300)).unwrap();

        // 0.5 * (399 + 2 - 1)
        assert_eq!(placements[0].y, -200);
        assert_eq!(placements[1].y, -200 + 401);
    }

    #[test]
    fn bias_shifts_pages_left() {
        let doc = FakeDocument::with_pixel_pages(1, 400, 100);
        let mut s = state(1, 10);
        s.set_bias(100.0);

        let placements = layout(&mut s, &doc, Viewport::new(801, 600)).unwrap();

        // (801 - 400) / 2 truncates to 200
        assert_eq!(placements[0].x, 100);
    }

    #[test]
    fn page_wider_than_viewport_centres_with_negative_offset() {
        let doc = FakeDocument::with_pixel_pages(1, 1001, 100);
        let mut s = state(1, 10);

        let placements = layout(&mut s, &doc, Viewport::new(400, 600)).unwrap();

        assert_eq!(placements[0].x, -300);
    }

    #[test]
    fn last_page_ends_plan() {
        let doc = FakeDocument::with_pixel_pages(3, 100, 100);
        let mut s = state(3, 10);
        seek(&mut s, 2, 0.0);

        let placements = layout(&mut s, &doc, Viewport::new(100, 1000)).unwrap();

        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].page, 2);
    }

    #[test]
    fn more_visible_pages_than_cache_capacity() {
        let doc = FakeDocument::with_pixel_pages(8, 50, 50);
        let mut s = state(8, 2);
        let mut surface = RecordingSurface::default();

        let placements = paint(&mut s, &doc, Viewport::new(100, 1000), &mut surface).unwrap();

        assert_eq!(placements.len(), 8);
        assert_eq!(surface.blits.len(), 8);
        assert!(surface.placeholders.is_empty());
        assert_eq!(s.cache().len(), 2);
    }

    #[test]
    fn failed_page_becomes_placeholder() {
        let doc = FakeDocument::with_pixel_pages(3, 100, 100);
        doc.set_failing(1, true);
        let mut s = state(3, 10);
        let mut surface = RecordingSurface::default();

        let placements = paint(&mut s, &doc, Viewport::new(100, 1000), &mut surface).unwrap();

        assert_eq!(placements.len(), 3);
        assert!(!placements[1].rendered);
        assert_eq!(surface.placeholders, vec![(0, 102, 100, 100)]);
        assert_eq!(surface.blits.len(), 2);
        assert_eq!(placements[2].y, 204);
    }

    #[test]
    fn page_without_geometry_is_skipped() {
        let doc = FakeDocument::with_pixel_pages(4, 100, 100);
        doc.set_unreadable(1, true);
        let mut s = state(4, 10);
        let mut surface = RecordingSurface::default();

        let placements = paint(&mut s, &doc, Viewport::new(100, 1000), &mut surface).unwrap();

        let pages: Vec<usize> = placements.iter().map(|p| p.page).collect();
        assert_eq!(pages, vec![0, 2, 3]);
        assert_eq!(placements[1].y, 102);
        assert_eq!(surface.blits.len(), 3);
        assert!(surface.placeholders.is_empty());
    }

    #[test]
    fn empty_document_plans_nothing() {
        let doc = FakeDocument::with_pixel_pages(0, 100, 100);
        let mut s = state(0, 10);

        assert!(layout(&mut s, &doc, Viewport::new(100, 100)).unwrap().is_empty());
    }
}
