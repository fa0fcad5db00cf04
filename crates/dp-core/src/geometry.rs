//! Pixel-space geometry helpers for guide boxes and handles.
//!
//! Rectangles are `kurbo::Rect` in chart pixel coordinates (y grows down).

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest width/height a resized guide box may shrink to.
pub const MIN_EXTENT: f64 = 1.0;

/// The edge of a rectangle that moves during a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl ResizeSide {
    /// The opposite edge along the same axis.
    pub const fn flip(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }

    /// Flip only when `reversed` is set.
    pub const fn flipped_if(self, reversed: bool) -> Self {
        if reversed { self.flip() } else { self }
    }

    /// The same edge on a chart whose axes are swapped: the edge a value
    /// grows towards stays the growing edge.
    pub const fn transposed(self) -> Self {
        match self {
            Self::Top => Self::Right,
            Self::Right => Self::Top,
            Self::Bottom => Self::Left,
            Self::Left => Self::Bottom,
        }
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Middle of the given edge of `rect`; where a resize handle sits.
    pub fn anchor_on(self, rect: Rect) -> Point {
        let c = rect.center();
        match self {
            Self::Left => Point::new(rect.x0, c.y),
            Self::Right => Point::new(rect.x1, c.y),
            Self::Top => Point::new(c.x, rect.y0),
            Self::Bottom => Point::new(c.x, rect.y1),
        }
    }
}

/// Move one edge of `rect` by `delta`, keeping the opposite edge fixed.
///
/// Only the delta component along the edge's axis is used. The extent is
/// measured signed, so a box flipped by a resize hook is resized from its
/// stored edges; the result is normalized and never thinner than
/// [`MIN_EXTENT`].
pub fn resize_rect(rect: Rect, side: ResizeSide, delta: Vec2) -> Rect {
    let (w, h) = (rect.x1 - rect.x0, rect.y1 - rect.y0);
    let out = match side {
        ResizeSide::Left => {
            let x = rect.x0 + delta.x;
            Rect::from_origin_size((x, rect.y0), Size::new((w - delta.x).max(MIN_EXTENT), h))
        }
        ResizeSide::Right => rect.with_size(Size::new((w + delta.x).max(MIN_EXTENT), h)),
        ResizeSide::Top => {
            let y = rect.y0 + delta.y;
            Rect::from_origin_size((rect.x0, y), Size::new(w, (h - delta.y).max(MIN_EXTENT)))
        }
        ResizeSide::Bottom => rect.with_size(Size::new(w, (h + delta.y).max(MIN_EXTENT))),
    };
    out.abs()
}

/// Union of all non-degenerate rectangles, or `None` when there are none.
///
/// A rectangle with zero origin and zero size is how hosts report a shape
/// that is not drawn (e.g. outside the plot); it must not pull the union
/// towards the chart origin.
pub fn union_bounds<I: IntoIterator<Item = Rect>>(rects: I) -> Option<Rect> {
    rects
        .into_iter()
        .filter(|r| *r != Rect::ZERO)
        .map(|r| r.abs())
        .reduce(|acc, r| acc.union(r))
}
