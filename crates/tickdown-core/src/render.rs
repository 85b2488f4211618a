//! Render target abstraction.
//!
//! The engine owns exactly one text-bearing surface and only ever writes to
//! it: the formatted clock text, one boolean low-time marker, and one
//! optional color. It never reads the surface back, so implementations are
//! free to forward writes anywhere -- a terminal line, a GUI label, a test
//! buffer.

/// Surface the engine draws the clock onto.
pub trait RenderTarget {
    /// Replace the displayed text.
    fn set_text(&mut self, text: &str);

    /// Set or clear the low-time marker.
    fn set_low_marker(&mut self, marked: bool);

    /// Apply a color to the face, or restore the default with `None`.
    fn set_color(&mut self, color: Option<&str>);
}

/// In-memory surface recording the last written state.
///
/// Used by the engine tests and as a building block for host surfaces.
#[derive(Debug, Clone, Default)]
pub struct TextSurface {
    text: String,
    low_marked: bool,
    color: Option<String>,
}

impl TextSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn low_marked(&self) -> bool {
        self.low_marked
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }
}

impl RenderTarget for TextSurface {
    fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }

    fn set_low_marker(&mut self, marked: bool) {
        self.low_marked = marked;
    }

    fn set_color(&mut self, color: Option<&str>) {
        self.color = color.map(str::to_owned);
    }
}
