//! Geometry supplied by the host.
//!
//! There is no layout engine here: the host (or a test) records where each
//! element sits in document coordinates, and the interaction layer reads it
//! back the way page scripts read `offsetHeight` and `getBoundingClientRect`.

/// Box of an element in document coordinates (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutBox {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutBox {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            height,
            ..Self::default()
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Box of an element relative to the visible viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub width: f64,
}

/// Visible window onto the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    scroll_y: f64,
    pub width: f64,
    pub height: f64,
    /// Total scrollable height; zero means unbounded.
    pub content_height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_y: 0.0,
            width: 1280.0,
            height: 800.0,
            content_height: 0.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn max_scroll(&self) -> Option<f64> {
        (self.content_height > 0.0).then(|| (self.content_height - self.height).max(0.0))
    }

    /// Clamp a requested scroll position to the scrollable range.
    pub fn clamp_scroll(&self, y: f64) -> f64 {
        let y = y.max(0.0);
        match self.max_scroll() {
            Some(max) => y.min(max),
            None => y,
        }
    }

    /// Move the viewport; returns whether the position changed.
    pub fn set_scroll_y(&mut self, y: f64) -> bool {
        let y = self.clamp_scroll(y);
        let changed = (y - self.scroll_y).abs() > f64::EPSILON;
        self.scroll_y = y;
        changed
    }

    pub fn rect_of(&self, layout: &LayoutBox) -> Rect {
        let top = layout.top - self.scroll_y;
        Rect {
            top,
            bottom: top + layout.height,
            left: layout.left,
            width: layout.width,
        }
    }
}
