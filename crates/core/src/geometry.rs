/// Axis-aligned rectangle in global screen coordinates (points).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn min_x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn min_y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// `true` when the two rectangles share an area greater than zero.
    /// Rectangles that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min_x() < other.max_x()
            && other.min_x() < self.max_x()
            && self.min_y() < other.max_y()
            && other.min_y() < self.max_y()
    }
}

/// A display the menu bar lives on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Screen {
    pub frame: Rect,
}

impl Screen {
    pub const fn new(frame: Rect) -> Self {
        Self { frame }
    }
}
