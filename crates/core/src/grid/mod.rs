//! This module holds the hexagon grid model and the logic to build one.
//!
//! ## Layout
//!
//! Hexagons are flat-topped and laid out in columns. Neighboring columns are
//! `1.5r` apart horizontally, rows are `√3·r` apart vertically, and every odd
//! column is pushed down by half a row so the columns interlock:
//!
//! ```text
//!  __      __
//! /0 \__  /2 \__
//! \__/1 \_\__/3 \
//! /10\__/ /12\__/
//! \__/11\_\__/13\
//!    \__/    \__/
//! ```
//!
//! Hexagons are indexed in row-major generation order, so the index of the
//! hexagon at `(row, col)` is `row * cols + col`.
//!
//! ## Corners
//!
//! Adjacent hexagons share corners. Each physical corner location gets
//! exactly one [CornerId], handed out the first time that location comes up
//! during generation. Nothing records which hexagons own which corner beyond
//! the per-hexagon corner table; other consumers (e.g. the
//! [navigate](crate::navigate) module) recompute ownership by proximity.

mod direction;
mod registry;

pub use self::{
    direction::VertexDirection,
    registry::{CornerKey, CornerRegistry, CORNER_PRECISION},
};
use crate::{
    config::GridConfig,
    timed,
    util::{
        self,
        unit::{CornerId, Point2, Size2},
    },
};
use anyhow::{bail, Context};
use log::info;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use validator::Validate;

/// Index of a hexagon within a [Grid], in row-major generation order
pub type HexIndex = usize;

/// A single deduplicated corner, shared by one or more hexagons
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Corner {
    pub id: CornerId,
    pub position: Point2,
}

/// A fully built hexagon grid: the centers of every hexagon, plus a registry
/// of every unique corner. A grid is built once and never modified after
/// that, so it can be shared freely by anything that needs to read it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct Grid {
    /// The config used to build this grid
    config: GridConfig,

    /// Center of every hexagon. The index in this vec is the hexagon index.
    centers: Vec<Point2>,

    /// Position of every unique corner. The index in this vec is the corner
    /// ID.
    // Serialize with explicit IDs so external consumers don't have to rely
    // on ordering
    #[serde(with = "serde_corner_list")]
    corners: Vec<Point2>,

    /// The corner IDs for each hexagon, in [VertexDirection::CLOCKWISE]
    /// order. Indexed the same as `centers`.
    hex_corners: Vec<[CornerId; 6]>,
}

impl Grid {
    /// Build a new grid from a config. Returns an error if the config is
    /// invalid, i.e. it has a non-positive radius, or zero rows or columns.
    /// Use [build_grid] if you want to skip validation.
    pub fn generate(config: GridConfig) -> anyhow::Result<Self> {
        info!("Generating grid with config {:#?}", config);
        config.validate().context("invalid grid config")?;

        let grid = timed!(
            "Grid generation",
            log::Level::Info,
            GridBuilder::new(config).build()
        );
        if grid.is_empty() {
            // Validation should make this impossible
            bail!("grid config {:?} produced an empty grid", config);
        }

        info!(
            "Generated grid with {} hexagons and {} corners",
            grid.len(),
            grid.corners.len()
        );
        Ok(grid)
    }

    /// Get a reference to the config that defines this grid
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Distance from the center of each hexagon to each of its corners
    pub fn hex_radius(&self) -> f64 {
        self.config.hex_radius
    }

    /// Number of hexagons in the grid
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Center of every hexagon, in generation order
    pub fn centers(&self) -> &[Point2] {
        &self.centers
    }

    /// Get the center of a single hexagon. `None` if the index is out of
    /// bounds.
    pub fn center(&self, hex: HexIndex) -> Option<Point2> {
        self.centers.get(hex).copied()
    }

    /// Number of unique corners in the grid
    pub fn corner_count(&self) -> usize {
        self.corners.len()
    }

    /// Iterate over every unique corner, in ID order
    pub fn corners(&self) -> impl Iterator<Item = Corner> + '_ {
        self.corners
            .iter()
            .enumerate()
            .map(|(id, &position)| Corner {
                id: CornerId(id),
                position,
            })
    }

    /// Get the position of a corner. `None` if there is no corner with that
    /// ID.
    pub fn corner(&self, id: CornerId) -> Option<Point2> {
        self.corners.get(id.0).copied()
    }

    /// Get the IDs of a hexagon's six corners, in
    /// [VertexDirection::CLOCKWISE] order
    pub fn hex_corner_ids(&self, hex: HexIndex) -> Option<&[CornerId; 6]> {
        self.hex_corners.get(hex)
    }

    /// Get the positions of a hexagon's six corners, in
    /// [VertexDirection::CLOCKWISE] order. Positions come from the corner
    /// registry, so neighboring hexagons will use the exact same coordinates
    /// for their shared corners.
    pub fn hex_vertices(&self, hex: HexIndex) -> Option<[Point2; 6]> {
        let ids = self.hex_corners.get(hex)?;
        let mut vertices = [Point2::ORIGIN; 6];
        for (vertex, &id) in vertices.iter_mut().zip(ids) {
            *vertex = self.corner(id)?;
        }
        Some(vertices)
    }
}

/// Build a grid without any validation of the inputs. This can't fail, but
/// malformed inputs (e.g. a zero radius) will give you degenerate geometry.
/// See [Grid::generate] for a checked version.
pub fn build_grid(
    origin: Point2,
    hex_radius: f64,
    rows: usize,
    cols: usize,
    canvas: Size2,
) -> Grid {
    GridBuilder::new(GridConfig {
        origin,
        hex_radius,
        rows,
        cols,
        canvas,
    })
    .build()
}

/// Horizontal distance between the centers of hexagons in adjacent columns
pub fn column_spacing(hex_radius: f64) -> f64 {
    1.5 * hex_radius
}

/// Vertical distance between the centers of hexagons in adjacent rows
pub fn row_spacing(hex_radius: f64) -> f64 {
    3f64.sqrt() * hex_radius
}

/// Calculate the offset that's applied to every hexagon so that the grid is
/// centered on the canvas. This gets added on top of the grid origin.
pub fn centering_offset(config: &GridConfig) -> Point2 {
    let dx = column_spacing(config.hex_radius);
    let dy = row_spacing(config.hex_radius);
    // These widths are an approximation (they ignore the odd column stagger)
    // but they're what the layout has always used
    let grid_width =
        config.cols.saturating_sub(1) as f64 * dx + config.hex_radius;
    let grid_height =
        config.rows.saturating_sub(1) as f64 * dy + config.hex_radius;
    Point2::new(
        (config.canvas.width - grid_width) / 2.0,
        (config.canvas.height - grid_height) / 2.0,
    )
}

/// A container for building a single grid. All the mutable state (the corner
/// registry) lives here, so every build starts from a clean slate and two
/// grids never share IDs.
struct GridBuilder {
    config: GridConfig,
    centers: Vec<Point2>,
    corners: CornerRegistry,
    hex_corners: Vec<[CornerId; 6]>,
}

impl GridBuilder {
    fn new(config: GridConfig) -> Self {
        let capacity = util::grid_len(config.rows, config.cols);
        Self {
            config,
            centers: Vec::with_capacity(capacity),
            // Most corners are shared by 3 hexagons, and edge hexagons share
            // less, so 2 per hexagon is a decent guess
            corners: CornerRegistry::with_capacity(capacity * 2),
            hex_corners: Vec::with_capacity(capacity),
        }
    }

    fn build(mut self) -> Grid {
        let dx = column_spacing(self.config.hex_radius);
        let dy = row_spacing(self.config.hex_radius);
        let base = self.config.origin + centering_offset(&self.config);

        for row in 0..self.config.rows {
            for col in 0..self.config.cols {
                let mut center =
                    base + Point2::new(col as f64 * dx, row as f64 * dy);
                // Stagger the odd columns
                if col % 2 == 1 {
                    center.y += dy / 2.0;
                }
                self.add_hexagon(center);
            }
        }

        debug_assert_eq!(
            self.centers.len(),
            util::grid_len(self.config.rows, self.config.cols),
            "expected rows*cols hexagons"
        );
        Grid {
            config: self.config,
            centers: self.centers,
            corners: self.corners.into_positions(),
            hex_corners: self.hex_corners,
        }
    }

    /// Add one hexagon to the grid, registering each of its corners
    fn add_hexagon(&mut self, center: Point2) {
        let radius = self.config.hex_radius;
        let mut ids = [CornerId(0); 6];
        for (id, direction) in ids.iter_mut().zip(VertexDirection::iter()) {
            *id = self
                .corners
                .resolve(center.polar_offset(radius, direction.degrees()));
        }
        self.centers.push(center);
        self.hex_corners.push(ids);
    }
}

/// Unchecked mirror of [Grid], used as the first stage of deserialization.
/// Converting it into a [Grid] makes sure the corner table lines up with the
/// centers and only references corners that exist.
#[derive(Deserialize)]
struct GridData {
    config: GridConfig,
    centers: Vec<Point2>,
    #[serde(with = "serde_corner_list")]
    corners: Vec<Point2>,
    hex_corners: Vec<[CornerId; 6]>,
}

impl TryFrom<GridData> for Grid {
    type Error = anyhow::Error;

    fn try_from(data: GridData) -> anyhow::Result<Self> {
        if data.hex_corners.len() != data.centers.len() {
            bail!(
                "grid has {} centers but {} corner lists",
                data.centers.len(),
                data.hex_corners.len()
            );
        }
        let bad_corner = data
            .hex_corners
            .iter()
            .flatten()
            .find(|id| id.0 >= data.corners.len());
        if let Some(id) = bad_corner {
            bail!(
                "corner {} is referenced but grid only has {} corners",
                id,
                data.corners.len()
            );
        }

        Ok(Self {
            config: data.config,
            centers: data.centers,
            corners: data.corners,
            hex_corners: data.hex_corners,
        })
    }
}

/// Serialize a list of corner positions as a list of [Corner]s, so that each
/// ID is explicit in the output. Deserialization requires the IDs to be
/// sequential from 0, since the vec index is the ID.
mod serde_corner_list {
    use super::Corner;
    use crate::util::unit::{CornerId, Point2};
    use serde::{
        de, ser::SerializeSeq, Deserialize, Deserializer, Serializer,
    };

    pub fn serialize<S>(
        corners: &[Point2],
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(corners.len()))?;
        for (id, &position) in corners.iter().enumerate() {
            seq.serialize_element(&Corner {
                id: CornerId(id),
                position,
            })?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Point2>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let corners: Vec<Corner> = Vec::deserialize(deserializer)?;
        corners
            .into_iter()
            .enumerate()
            .map(|(expected, corner)| {
                if corner.id == CornerId(expected) {
                    Ok(corner.position)
                } else {
                    Err(de::Error::custom(format!(
                        "corner IDs must be sequential: expected {}, got {}",
                        CornerId(expected),
                        corner.id
                    )))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn default_grid() -> Grid {
        Grid::generate(GridConfig::default()).unwrap()
    }

    #[test]
    fn test_centering_offset() {
        let offset = centering_offset(&GridConfig::default());
        // (640 - (9 * 30 + 20)) / 2
        assert_approx_eq!(offset.x, 175.0);
        // (480 - (9 * 20√3 + 20)) / 2
        assert_approx_eq!(offset.y, (460.0 - 180.0 * 3f64.sqrt()) / 2.0);
    }

    #[test]
    fn test_center_layout() {
        let grid = default_grid();
        let config = grid.config();
        let dx = column_spacing(config.hex_radius);
        let dy = row_spacing(config.hex_radius);
        let first = grid.center(0).unwrap();

        // Next column over is staggered down by half a row
        let second = grid.center(1).unwrap();
        assert_approx_eq!(second.x - first.x, dx);
        assert_approx_eq!(second.y - first.y, dy / 2.0);

        // Back in line on the even columns
        let third = grid.center(2).unwrap();
        assert_approx_eq!(third.x - first.x, 2.0 * dx);
        assert_approx_eq!(third.y, first.y);

        // Row-major ordering, so index 10 is the start of row 1
        let next_row = grid.center(10).unwrap();
        assert_approx_eq!(next_row.x, first.x);
        assert_approx_eq!(next_row.y - first.y, dy);
    }

    #[test]
    fn test_neighbors_share_corners() {
        let grid = default_grid();
        let ids0 = grid.hex_corner_ids(0).unwrap();
        let ids1 = grid.hex_corner_ids(1).unwrap();
        // Hexagon 1 is down and to the right of hexagon 0, so 0's SSE corner
        // is 1's W corner, and 0's E corner is 1's NNW corner
        assert_eq!(ids0[VertexDirection::SSE.clockwise_index()], ids1[3]);
        assert_eq!(ids0[VertexDirection::E.clockwise_index()], ids1[4]);

        // Hexagon 10 is directly below hexagon 0
        let ids10 = grid.hex_corner_ids(10).unwrap();
        assert_eq!(ids0[1], ids10[5]);
        assert_eq!(ids0[2], ids10[4]);
    }

    #[test]
    fn test_single_hexagon() {
        let grid =
            build_grid(Point2::ORIGIN, 10.0, 1, 1, Size2::new(100.0, 100.0));
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.corner_count(), 6);
        assert_eq!(
            grid.hex_corner_ids(0).unwrap(),
            &[0, 1, 2, 3, 4, 5].map(CornerId)
        );
        let center = grid.center(0).unwrap();
        for (vertex, dir) in
            grid.hex_vertices(0).unwrap().iter().zip(VertexDirection::iter())
        {
            assert_approx_eq!(vertex.distance_to(center), 10.0);
            let expected = center.polar_offset(10.0, dir.degrees());
            assert_approx_eq!(vertex.x, expected.x);
            assert_approx_eq!(vertex.y, expected.y);
        }
    }

    #[test]
    fn test_out_of_bounds_lookups() {
        let grid = default_grid();
        assert_eq!(grid.center(100), None);
        assert_eq!(grid.hex_corner_ids(100), None);
        assert_eq!(grid.corner(CornerId(grid.corner_count())), None);
    }
}
