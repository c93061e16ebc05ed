//! Pure panel placement.
//!
//! [`plan`] answers one question: where can the instruction panel sit so it
//! never covers the control it is teaching? It is a pure function of
//! rectangles - no widget references, no side effects - which is what makes
//! the non-occlusion invariant independently testable.
//!
//! # Algorithm
//!
//! 1. Expand the target by `margin` into the no-go zone.
//! 2. Try, in order: right of the target, left, above, below, then the four
//!    screen corners. Each candidate is clamped into the screen (minus
//!    margin) before testing.
//! 3. The first candidate whose panel rectangle misses the no-go zone wins.
//! 4. If everything intersects (near-fullscreen target), fall back to the
//!    screen corner whose panel center is farthest from the target center.
//!    Ties keep the earliest corner in scan order, so the answer is
//!    deterministic and the search always terminates.

use sherpa_core::{Point, Rect, Size};

/// Default gap kept between the panel, the target, and screen edges.
pub const DEFAULT_MARGIN: i32 = 12;

/// The region the panel must never overlap: the target grown by `margin`.
#[must_use]
pub fn no_go_zone(target: Rect, margin: i32) -> Rect {
    target.expand(margin)
}

/// Compute the panel's top-left corner.
///
/// The returned point always lies within `screen` shrunk by `margin`
/// (clamped to its origin when the panel is larger than the screen).
#[must_use]
pub fn plan(target: Rect, panel: Size, screen: Rect, margin: i32) -> Point {
    let zone = no_go_zone(target, margin);
    let usable = screen.expand(-margin);

    for anchor in anchors(target, zone, panel, usable) {
        let origin = clamp_origin(anchor, panel, usable);
        if !Rect::from_origin_size(origin, panel).intersects(&zone) {
            return origin;
        }
    }

    farthest_corner(target, panel, usable)
}

/// Candidate anchors in preference order: the four sides, then the corners.
fn anchors(target: Rect, zone: Rect, panel: Size, usable: Rect) -> [Point; 8] {
    let corners = corner_origins(panel, usable);
    [
        Point::new(zone.right(), target.y),
        Point::new(zone.x - panel.width, target.y),
        Point::new(target.x, zone.y - panel.height),
        Point::new(target.x, zone.bottom()),
        corners[0],
        corners[1],
        corners[2],
        corners[3],
    ]
}

/// Panel origins for the four usable-area corners, in scan order
/// (top-left, top-right, bottom-left, bottom-right).
fn corner_origins(panel: Size, usable: Rect) -> [Point; 4] {
    [
        Point::new(usable.x, usable.y),
        Point::new(usable.right() - panel.width, usable.y),
        Point::new(usable.x, usable.bottom() - panel.height),
        Point::new(usable.right() - panel.width, usable.bottom() - panel.height),
    ]
}

/// Clamp a panel origin so the panel stays inside the usable area.
///
/// When the panel is wider or taller than the usable area it is pinned to
/// the usable origin; the result is always a valid, in-bounds point.
fn clamp_origin(origin: Point, panel: Size, usable: Rect) -> Point {
    let max_x = usable.right() - panel.width;
    let max_y = usable.bottom() - panel.height;
    let x = if max_x < usable.x {
        usable.x
    } else {
        origin.x.max(usable.x).min(max_x)
    };
    let y = if max_y < usable.y {
        usable.y
    } else {
        origin.y.max(usable.y).min(max_y)
    };
    Point::new(x, y)
}

/// The corner whose panel center is farthest from the target center.
fn farthest_corner(target: Rect, panel: Size, usable: Rect) -> Point {
    let target_center = target.center();
    let mut best = corner_origins(panel, usable)[0];
    let mut best_distance = -1.0f64;
    for corner in corner_origins(panel, usable) {
        let origin = clamp_origin(corner, panel, usable);
        let center = Rect::from_origin_size(origin, panel).center();
        let distance = center.distance_to(target_center);
        // Strictly-greater keeps the earliest corner on ties.
        if distance > best_distance {
            best_distance = distance;
            best = origin;
        }
    }
    best
}
