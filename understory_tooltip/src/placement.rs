// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip placement: where the overlay anchor goes relative to a trigger.
//!
//! Placement is a pure function of the trigger's on-screen rectangle, the
//! requested [`Direction`], a fixed margin, and a caller-supplied offset.
//! Coordinates are screen space with `y` growing downwards, so `Top` means a
//! smaller `y`.
//!
//! ```
//! use kurbo::{Point, Rect, Vec2};
//! use understory_tooltip::placement::{anchored_position, Direction, DEFAULT_MARGIN};
//!
//! let button = Rect::new(100.0, 100.0, 150.0, 120.0);
//! let above = anchored_position(Direction::Top, button, DEFAULT_MARGIN, Vec2::ZERO);
//! assert_eq!(above, Point::new(125.0, 70.0));
//! ```

use kurbo::{Point, Rect, Vec2};

/// Distance between a trigger's edge and the tooltip anchor.
pub const DEFAULT_MARGIN: f64 = 30.0;

/// Side of the trigger the tooltip is placed on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Above the trigger, horizontally centered.
    #[default]
    Top,
    /// Below the trigger, horizontally centered.
    Bottom,
    /// Left of the trigger, vertically centered.
    Left,
    /// Right of the trigger, vertically centered.
    Right,
}

/// How a trigger positions the tooltip on every render tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Anchor to a side of the trigger's rectangle.
    Anchored(Direction),
    /// Track the pointer; the trigger's rectangle is ignored.
    FollowPointer,
}

impl Default for Placement {
    fn default() -> Self {
        Self::Anchored(Direction::default())
    }
}

impl Placement {
    /// Compute the tooltip anchor for this placement.
    ///
    /// `anchor` is the trigger's rectangle and `pointer` the current pointer
    /// location, both in screen coordinates. `offset` is added last.
    #[must_use]
    pub fn resolve(self, anchor: Rect, pointer: Point, margin: f64, offset: Vec2) -> Point {
        match self {
            Self::Anchored(direction) => anchored_position(direction, anchor, margin, offset),
            Self::FollowPointer => follow_pointer_position(pointer, offset),
        }
    }
}

/// Position next to `anchor` on the side given by `direction`.
///
/// The point sits `margin` away from the chosen edge and is centered along
/// it; `offset` is then added.
#[must_use]
pub fn anchored_position(direction: Direction, anchor: Rect, margin: f64, offset: Vec2) -> Point {
    let origin = anchor.origin();
    let size = anchor.size();
    let base = match direction {
        Direction::Top => Point::new(origin.x + size.width / 2.0, origin.y - margin),
        Direction::Bottom => {
            Point::new(origin.x + size.width / 2.0, origin.y + size.height + margin)
        }
        Direction::Left => Point::new(origin.x - margin, origin.y + size.height / 2.0),
        Direction::Right => {
            Point::new(origin.x + size.width + margin, origin.y + size.height / 2.0)
        }
    };
    base + offset
}

/// Position that follows the pointer at a fixed offset.
#[must_use]
pub fn follow_pointer_position(pointer: Point, offset: Vec2) -> Point {
    pointer + offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    fn button() -> Rect {
        Rect::from_origin_size(Point::new(100.0, 100.0), Size::new(50.0, 20.0))
    }

    #[test]
    fn top_centers_above() {
        let p = anchored_position(Direction::Top, button(), DEFAULT_MARGIN, Vec2::ZERO);
        assert_eq!(p, Point::new(125.0, 70.0));
    }

    #[test]
    fn bottom_centers_below() {
        let p = anchored_position(Direction::Bottom, button(), DEFAULT_MARGIN, Vec2::ZERO);
        assert_eq!(p, Point::new(125.0, 150.0));
    }

    #[test]
    fn left_centers_vertically() {
        let p = anchored_position(Direction::Left, button(), DEFAULT_MARGIN, Vec2::ZERO);
        assert_eq!(p, Point::new(70.0, 110.0));
    }

    #[test]
    fn right_centers_vertically() {
        let p = anchored_position(Direction::Right, button(), DEFAULT_MARGIN, Vec2::ZERO);
        assert_eq!(p, Point::new(180.0, 110.0));
    }

    #[test]
    fn offset_is_applied_after_direction() {
        let p = anchored_position(Direction::Top, button(), DEFAULT_MARGIN, Vec2::new(-5.0, 2.5));
        assert_eq!(p, Point::new(120.0, 72.5));
    }

    #[test]
    fn custom_margin() {
        let p = anchored_position(Direction::Bottom, button(), 8.0, Vec2::ZERO);
        assert_eq!(p, Point::new(125.0, 128.0));
    }

    #[test]
    fn zero_sized_anchor_collapses_to_origin_plus_margin() {
        let anchor = Rect::from_origin_size(Point::new(10.0, 10.0), Size::ZERO);
        let p = anchored_position(Direction::Right, anchor, DEFAULT_MARGIN, Vec2::ZERO);
        assert_eq!(p, Point::new(40.0, 10.0));
    }

    #[test]
    fn follow_pointer_ignores_anchor() {
        let placement = Placement::FollowPointer;
        let p = placement.resolve(
            button(),
            Point::new(200.0, 200.0),
            DEFAULT_MARGIN,
            Vec2::new(5.0, 5.0),
        );
        assert_eq!(p, Point::new(205.0, 205.0));
    }

    #[test]
    fn default_placement_is_top() {
        assert_eq!(Placement::default(), Placement::Anchored(Direction::Top));
        let p = Placement::default().resolve(button(), Point::ZERO, DEFAULT_MARGIN, Vec2::ZERO);
        assert_eq!(p, Point::new(125.0, 70.0));
    }
}
