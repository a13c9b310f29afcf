//! Document backend contract and the geometry shared with it

use super::error::RenderError;

/// Physical document units per inch (PDF points).
pub const BASE_DPI: f32 = 72.0;

/// Page rectangle in document units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl PageRect {
    #[must_use]
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Round outward to whole pixels, tolerating float noise at the edges
    #[must_use]
    pub fn round_out(&self) -> PixelRect {
        PixelRect {
            x0: (self.x0 + 0.001).floor() as i32,
            y0: (self.y0 + 0.001).floor() as i32,
            x1: (self.x1 - 0.001).ceil() as i32,
            y1: (self.y1 - 0.001).ceil() as i32,
        }
    }
}

/// Integer pixel rectangle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PixelRect {
    #[must_use]
    pub fn width(&self) -> u32 {
        (self.x1 - self.x0).max(0) as u32
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        (self.y1 - self.y0).max(0) as u32
    }
}

/// Affine transform `[a b c d e f]` mapping `(x, y)` to
/// `(a*x + c*y + e, b*x + d*y + f)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Rotation by `degrees`, exact for quarter turns
    #[must_use]
    pub fn rotate(degrees: f32) -> Self {
        let mut degrees = degrees % 360.0;
        if degrees < 0.0 {
            degrees += 360.0;
        }
        let (sin, cos) = if (degrees - 0.0).abs() < f32::EPSILON {
            (0.0, 1.0)
        } else if (degrees - 90.0).abs() < f32::EPSILON {
            (1.0, 0.0)
        } else if (degrees - 180.0).abs() < f32::EPSILON {
            (0.0, -1.0)
        } else if (degrees - 270.0).abs() < f32::EPSILON {
            (-1.0, 0.0)
        } else {
            degrees.to_radians().sin_cos()
        };
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Apply a uniform scale before this transform
    #[must_use]
    pub fn pre_scale(self, s: f32) -> Self {
        Self {
            a: self.a * s,
            b: self.b * s,
            c: self.c * s,
            d: self.d * s,
            ..self
        }
    }

    /// The page transform: rotation, then `scale * dpi / 72`
    #[must_use]
    pub fn for_page(scale: f32, rotation: f32, dpi: f32) -> Self {
        Self::rotate(rotation).pre_scale(scale * dpi / BASE_DPI)
    }

    #[must_use]
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Bounding box of a transformed rectangle
    #[must_use]
    pub fn apply_rect(&self, r: &PageRect) -> PageRect {
        let corners = [
            self.apply(r.x0, r.y0),
            self.apply(r.x1, r.y0),
            self.apply(r.x0, r.y1),
            self.apply(r.x1, r.y1),
        ];
        let mut out = PageRect::new(f32::MAX, f32::MAX, f32::MIN, f32::MIN);
        for (x, y) in corners {
            out.x0 = out.x0.min(x);
            out.y0 = out.y0.min(y);
            out.x1 = out.x1.max(x);
            out.y1 = out.y1.max(y);
        }
        out
    }
}

/// Destination for a page render: BGRA bytes covering `bbox`, row stride
/// `4 * bbox.width()`, already filled with the background value.
pub struct PixelTarget<'a> {
    pub bbox: PixelRect,
    pub pixels: &'a mut [u8],
}

impl PixelTarget<'_> {
    #[must_use]
    pub fn width(&self) -> u32 {
        self.bbox.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.bbox.height()
    }

    #[must_use]
    pub fn stride(&self) -> usize {
        self.width() as usize * 4
    }
}

/// One bookmark as delivered by a backend
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutlineNode {
    pub title: String,
    /// Target page (0-indexed), if the entry points inside the document
    pub page: Option<usize>,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn new(title: impl Into<String>, page: Option<usize>) -> Self {
        Self {
            title: title.into(),
            page,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<OutlineNode>) -> Self {
        self.children = children;
        self
    }
}

/// A paginated document that can paint its pages into pixel buffers
pub trait DocumentBackend {
    fn page_count(&self) -> usize;

    /// Page rectangle in document units
    fn page_bounds(&self, page: usize) -> Result<PageRect, RenderError>;

    /// Paint `page` transformed by `transform` into `target`
    fn render_into(
        &self,
        page: usize,
        transform: &Transform,
        target: &mut PixelTarget<'_>,
    ) -> Result<(), RenderError>;

    fn outline(&self) -> Vec<OutlineNode> {
        Vec::new()
    }

    fn title(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_page_at_96_dpi() {
        let bounds = PageRect::new(0.0, 0.0, 612.0, 792.0);
        let t = Transform::for_page(1.0, 0.0, 96.0);
        let bbox = t.apply_rect(&bounds).round_out();
        assert_eq!((bbox.width(), bbox.height()), (816, 1056));
    }

    #[test]
    fn quarter_turn_swaps_dimensions() {
        let bounds = PageRect::new(0.0, 0.0, 612.0, 792.0);
        let t = Transform::for_page(1.0, 90.0, 72.0);
        let bbox = t.apply_rect(&bounds).round_out();
        assert_eq!((bbox.width(), bbox.height()), (792, 612));
        assert_eq!(bbox.x0, -792);
    }

    #[test]
    fn negative_rotation_wraps() {
        assert_eq!(Transform::rotate(-90.0), Transform::rotate(270.0));
    }

    #[test]
    fn round_out_ignores_float_noise() {
        let r = PageRect::new(-0.0004, 0.0, 99.9996, 10.5);
        let p = r.round_out();
        assert_eq!((p.x0, p.x1, p.y1), (0, 100, 11));
    }
}
