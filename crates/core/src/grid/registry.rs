use crate::util::unit::{CornerId, Point2};
use fnv::FnvBuildHasher;
use indexmap::{map::Entry, IndexMap};

/// Number of decimal places that corner positions are rounded to before
/// they're compared. Corners are built from trig functions, so two hexagons
/// that share a corner will calculate it with slightly different float error.
/// 5 places soaks that up without ever merging corners that are actually
/// distinct.
pub const CORNER_PRECISION: i32 = 5;

/// A corner position rounded to [CORNER_PRECISION] decimal places, stored as
/// fixed point integers so it can be hashed. Two candidate corners with the
/// same key are the same corner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CornerKey {
    x: i64,
    y: i64,
}

impl CornerKey {
    pub fn new(position: Point2) -> Self {
        let scale = 10f64.powi(CORNER_PRECISION);
        Self {
            x: (position.x * scale).round() as i64,
            y: (position.y * scale).round() as i64,
        }
    }
}

/// Deduplicating store of corners, scoped to a single generation pass. Every
/// candidate corner is resolved to an ID: the first candidate at a location
/// gets the next sequential ID, and every later candidate at (roughly) the
/// same location resolves to that same ID. The first candidate's exact
/// position is the one that gets kept.
///
/// The index of each entry in the map **is** its corner ID, which is why
/// this needs to be an ordered map.
#[derive(Clone, Debug, Default)]
pub struct CornerRegistry {
    corners: IndexMap<CornerKey, Point2, FnvBuildHasher>,
}

impl CornerRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            corners: IndexMap::with_capacity_and_hasher(
                capacity,
                FnvBuildHasher::default(),
            ),
        }
    }

    /// Get the ID for a candidate corner, registering it if this is the first
    /// time we've seen this location
    pub fn resolve(&mut self, position: Point2) -> CornerId {
        match self.corners.entry(CornerKey::new(position)) {
            Entry::Occupied(entry) => CornerId(entry.index()),
            Entry::Vacant(entry) => {
                let id = CornerId(entry.index());
                entry.insert(position);
                id
            }
        }
    }

    pub fn len(&self) -> usize {
        self.corners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    /// Consume the registry, returning every corner position. The index of
    /// each position in the vec is its corner ID.
    pub fn into_positions(self) -> Vec<Point2> {
        self.corners.into_iter().map(|(_, position)| position).collect()
    }
}
