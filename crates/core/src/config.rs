use crate::util::unit::{Point2, Rect, Size2};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Top-level config for everything that can be generated or simulated. Each
/// sub-config is independent, so a CLI run only looks at the pieces it
/// needs. Two runs with the same config will always produce identical
/// output.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct HexNavConfig {
    /// Shape and placement of the hexagon grid
    #[validate]
    pub grid: GridConfig,

    /// Where the navigator starts, where it's headed, and how it moves
    #[validate]
    pub navigation: NavigationConfig,

    /// Shape and bounds of the triangular tessellation
    #[validate]
    pub tessellation: TessellationConfig,
}

/// Configuration that defines a hexagon grid. See
/// [Grid::generate](crate::Grid::generate) for how these fields are used.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GridConfig {
    /// Base position of the grid. The centering offset (derived from
    /// `canvas`) is added on top of this, so with an origin of `(0, 0)` the
    /// grid ends up centered on the canvas.
    pub origin: Point2,

    /// Distance from the center of a hexagon to any of its corners. This is
    /// also the length of each side.
    #[validate(range(min = 0.001))]
    pub hex_radius: f64,

    /// Number of rows of hexagons
    #[validate(range(min = 1))]
    pub rows: usize,

    /// Number of columns of hexagons. Odd columns are shifted down by half a
    /// row, which is what makes the columns interlock.
    #[validate(range(min = 1))]
    pub cols: usize,

    /// Size of the canvas that the grid will be drawn on. This is only used
    /// to calculate the centering offset, it does **not** clip the grid.
    pub canvas: Size2,
}

/// Configuration for a navigation run across a grid.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NavigationConfig {
    /// Starting position of the navigator, in canvas space
    pub start: Point2,

    /// Target position. The run ends once the navigator is within half a hex
    /// radius of this point.
    pub destination: Point2,

    /// Distance moved on every tick
    #[validate(range(min = 0.001))]
    pub step_size: f64,

    /// The maximum number of ticks to run before giving up. The stepping
    /// heuristic isn't guaranteed to converge, so without a cap some runs
    /// would go forever.
    #[validate(range(min = 1))]
    pub max_ticks: u32,
}

/// Configuration for a triangular tessellation. See
/// [Tessellation::generate](crate::Tessellation::generate).
#[derive(Copy, Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TessellationConfig {
    /// Length of each side of each (equilateral) triangle
    #[validate(range(min = 0.001))]
    pub side_length: f64,

    /// Area to fill with triangles. Any triangle that pokes outside these
    /// bounds is dropped entirely, so the edges will be ragged.
    pub bounds: Rect,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            origin: Point2::ORIGIN,
            hex_radius: 20.0,
            rows: 10,
            cols: 10,
            canvas: Size2::new(640.0, 480.0),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            start: Point2::new(200.0, 100.0),
            destination: Point2::new(300.0, 300.0),
            step_size: 1.0,
            max_ticks: 10_000,
        }
    }
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            side_length: 50.0,
            bounds: Rect::new(100.0, 100.0, 600.0, 400.0),
        }
    }
}
