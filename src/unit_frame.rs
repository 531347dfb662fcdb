// Normalized rectangles: (0,0) is the top-leading corner, (1,1) the bottom-trailing one.
// Used to place gradient endpoints and to describe regions independently of surface size.

use crate::types::{Rect, Size};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UnitPoint {
    pub x: f32,
    pub y: f32,
}

impl UnitPoint {
    pub const TOP_LEADING: Self = Self::new(0.0, 0.0);
    pub const TOP: Self = Self::new(0.5, 0.0);
    pub const TOP_TRAILING: Self = Self::new(1.0, 0.0);
    pub const LEADING: Self = Self::new(0.0, 0.5);
    pub const CENTER: Self = Self::new(0.5, 0.5);
    pub const TRAILING: Self = Self::new(1.0, 0.5);
    pub const BOTTOM_LEADING: Self = Self::new(0.0, 1.0);
    pub const BOTTOM: Self = Self::new(0.5, 1.0);
    pub const BOTTOM_TRAILING: Self = Self::new(1.0, 1.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Leading,
    Bottom,
    Trailing,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitFrame {
    pub start: UnitPoint,
    pub end: UnitPoint,
}

impl Default for UnitFrame {
    fn default() -> Self {
        Self::new(UnitPoint::TOP_LEADING, UnitPoint::BOTTOM_TRAILING)
    }
}

impl UnitFrame {
    pub const fn new(start: UnitPoint, end: UnitPoint) -> Self {
        Self { start, end }
    }

    pub fn from_origin_size(origin: UnitPoint, size: Size) -> Self {
        Self::new(origin, UnitPoint::new(origin.x + size.width, origin.y + size.height))
    }

    /// Normalize `area`, given in the coordinates of a surface of `in_size`.
    pub fn from_area(area: Rect, in_size: Size) -> Self {
        Self::from_origin_size(
            UnitPoint::new(area.x / in_size.width, area.y / in_size.height),
            Size::new(area.width / in_size.width, area.height / in_size.height),
        )
    }

    /// Same padding on every edge of a surface of `in_size`.
    /// Padding is capped at half of each axis so the frame never inverts.
    pub fn from_padding(padding: f32, in_size: Size) -> Self {
        let x = padding.min(in_size.width / 2.0) / in_size.width;
        let y = padding.min(in_size.height / 2.0) / in_size.height;
        Self::new(UnitPoint::new(x, y), UnitPoint::new(1.0 - x, 1.0 - y))
    }

    /// A band hugging `edge`, `proportion` of the surface thick.
    pub fn from_edge(edge: Edge, proportion: f32) -> Self {
        let full = Self::default();
        match edge {
            Edge::Top => Self { end: UnitPoint::new(1.0, proportion), ..full },
            Edge::Leading => Self { end: UnitPoint::new(proportion, 1.0), ..full },
            Edge::Bottom => Self { start: UnitPoint::new(0.0, 1.0 - proportion), ..full },
            Edge::Trailing => Self { start: UnitPoint::new(1.0 - proportion, 0.0), ..full },
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.end.x - self.start.x, self.end.y - self.start.y)
    }

    /// Scale into absolute coordinates on a surface of `in_size`.
    pub fn transform(&self, in_size: Size) -> Rect {
        let size = self.size();
        Rect::new(
            self.start.x * in_size.width,
            self.start.y * in_size.height,
            size.width * in_size.width,
            size.height * in_size.height,
        )
    }
}
