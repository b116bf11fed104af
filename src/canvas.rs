// Drawing collaborator boundary. The simulation paints through `Canvas` and
// never talks to wgpu directly, so the core runs headless under test.
use glam::Vec2;

pub type Color = [f32; 4];

// --- Rect geometry ---

/// Axis-aligned rectangle, top-left anchored, pixel units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Square with its top-left corner at `pos`.
    pub fn square(pos: Vec2, side: f32) -> Self {
        Self {
            pos,
            size: Vec2::splat(side),
        }
    }

    /// Square centered on `center`.
    pub fn centered(center: Vec2, side: f32) -> Self {
        Self {
            pos: center - Vec2::splat(side / 2.0),
            size: Vec2::splat(side),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Strict overlap; rectangles that merely share an edge do not collide.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && other.pos.x < self.pos.x + self.size.x
            && self.pos.y < other.pos.y + other.size.y
            && other.pos.y < self.pos.y + self.size.y
    }
}

// --- Canvas trait ---

/// Immediate-mode drawing surface with persistent contents: pixels stay until
/// painted over. Erasure is a background-colored fill.
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn draw_text(&mut self, text: &str, topleft: Vec2, font_px: f32, color: Color);
}

/// Canvas that swallows every call; for headless soak runs.
pub struct NullCanvas;

impl Canvas for NullCanvas {
    fn fill_rect(&mut self, _rect: Rect, _color: Color) {}
    fn draw_text(&mut self, _text: &str, _topleft: Vec2, _font_px: f32, _color: Color) {}
}

/// Canvas that records every call for assertions in tests.
#[derive(Default)]
pub struct RecordingCanvas {
    pub rects: Vec<(Rect, Color)>,
    pub texts: Vec<(String, Vec2)>,
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.rects.push((rect, color));
    }

    fn draw_text(&mut self, text: &str, topleft: Vec2, _font_px: f32, _color: Color) {
        self.texts.push((text.to_owned(), topleft));
    }
}
