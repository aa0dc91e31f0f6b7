//! Navigation across a hexagon grid. A navigator moves a point from a start
//! position toward a destination one tick at a time, routing around the
//! corners of whichever hexagon it's currently on.
//!
//! ## Membership
//!
//! The grid doesn't store which hexagon a point (or corner) is on. Instead
//! it's recomputed on every query by proximity, see [locate_hexagon]. A
//! corner belongs to a hexagon if [locate_hexagon] resolves the corner's
//! position to that hexagon. Since a corner is exactly one radius away from
//! every hexagon that shares it, that's always the **first** of those
//! hexagons in generation order, so later hexagons can end up with fewer
//! than six corners.

mod state;

pub use self::state::{
    NavigationState, Navigator, Outcome, StepEvent, Trace,
    ARRIVAL_RADIUS_FACTOR, CORNER_REACHED_DISTANCE,
};
use crate::{
    grid::{Grid, HexIndex},
    util::unit::{CornerId, Point2},
};

/// A point is considered to be on a hexagon if it's within this many hex radii
/// of the hexagon's center. This is slightly more than 1 so that points on a
/// boundary (corners especially) don't slip through the cracks due to float
/// error.
pub const MEMBERSHIP_RADIUS_FACTOR: f64 = 1.1;

/// Find the hexagon that a point is on. Hexagons are checked in generation
/// order, and the first one whose center is within
/// [MEMBERSHIP_RADIUS_FACTOR] radii of the point wins. If the point isn't
/// that close to any hexagon, we fall back to the nearest center (ties going
/// to the earliest hexagon), so points past the edge of the grid still
/// resolve to something.
///
/// Only returns `None` if the grid is empty.
pub fn locate_hexagon(point: Point2, grid: &Grid) -> Option<HexIndex> {
    let threshold = grid.hex_radius() * MEMBERSHIP_RADIUS_FACTOR;
    let mut closest: Option<(HexIndex, f64)> = None;

    for (hex, &center) in grid.centers().iter().enumerate() {
        let distance = point.distance_to(center);
        if distance <= threshold {
            return Some(hex);
        }
        if closest.map_or(true, |(_, min_distance)| distance < min_distance) {
            closest = Some((hex, distance));
        }
    }

    closest.map(|(hex, _)| hex)
}

/// Get all the corners that are worth routing around from the given
/// position. These are the corners that belong to the current hexagon (see
/// module-level docs) **and** sit on the far side of the position from the
/// destination, i.e. the vector from the position to the corner points away
/// from the destination. Returned in corner ID order.
///
/// If the position and destination are the same, there's no "far side", so
/// this is always empty.
pub fn corner_candidates(
    position: Point2,
    destination: Point2,
    grid: &Grid,
) -> Vec<CornerId> {
    let current_hex = match locate_hexagon(position, grid) {
        Some(hex) => hex,
        None => return Vec::new(),
    };
    let to_destination = destination - position;

    grid.corners()
        .filter(|corner| {
            locate_hexagon(corner.position, grid) == Some(current_hex)
        })
        .filter(|corner| (corner.position - position).dot(to_destination) < 0.0)
        .map(|corner| corner.id)
        .collect()
}

/// Pick which corner of the current hexagon to route around next. Out of all
/// the [corner_candidates], this is the one whose heading from the position
/// is closest to the heading of the destination. Ties go to the lowest ID.
///
/// Headings are compared as raw `atan2` values, **without** wrapping the
/// difference around ±π. That means a candidate just across the `-x` axis
/// from the destination heading can look further away than it really is.
///
/// `None` is a perfectly normal outcome here, and means the caller should
/// head straight for the destination.
pub fn select_target_corner(
    position: Point2,
    destination: Point2,
    grid: &Grid,
) -> Option<CornerId> {
    let destination_angle = (destination - position).angle();

    corner_candidates(position, destination, grid)
        .into_iter()
        .filter_map(|id| {
            let corner = grid.corner(id)?;
            let angle_diff =
                ((corner - position).angle() - destination_angle).abs();
            Some((id, angle_diff))
        })
        // min_by keeps the first of equal elements, which gives us the lowest
        // ID on ties
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(id, _)| id)
}

/// Move a position one step **perpendicular** to the line running from
/// `pivot` to `target`. The step goes 90° clockwise (on screen) from that
/// line. Calling this repeatedly with the same inputs moves the position in a
/// straight line parallel to the pivot→target line, so it doesn't actually
/// approach the target. Navigation relies on crossing hexagon boundaries
/// to pick new targets.
///
/// If `target == pivot`, there's no direction to work with so the position
/// is returned unchanged.
pub fn orbit_step(
    position: Point2,
    target: Point2,
    pivot: Point2,
    step_size: f64,
) -> Point2 {
    match (target - pivot).normalize() {
        Some(direction) => position + direction.perpendicular() * step_size,
        None => position,
    }
}
