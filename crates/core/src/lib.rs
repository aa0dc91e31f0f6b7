//! Hexnav builds flat-topped hexagon grids and navigates points across them.
//! A [Grid] is laid out from a [GridConfig], with every corner shared between
//! neighboring hexagons deduplicated into a single [CornerId]. A [Navigator]
//! then walks a point from a start position toward a destination, routing
//! around the corners of whichever hexagon it's currently on.
//!
//! ```
//! use hexnav::{Grid, GridConfig, NavigationConfig, Navigator};
//!
//! let grid = Grid::generate(GridConfig::default()).unwrap();
//! let navigator = Navigator::new(&grid, NavigationConfig::default()).unwrap();
//! let trace = navigator.simulate();
//! println!("{}", trace.outcome);
//! // From here you can render the trace however you like.
//! ```
//!
//! See [GridConfig] and [NavigationConfig] for details on how grids and runs
//! can be customized. There's also a triangular counterpart to the hex grid,
//! see [Tessellation].

mod config;
mod grid;
mod navigate;
mod render;
mod tessellation;
mod util;

#[cfg(feature = "svg")]
pub use crate::render::svg::SvgCanvas;
pub use crate::{
    config::{GridConfig, HexNavConfig, NavigationConfig, TessellationConfig},
    grid::{
        build_grid, centering_offset, column_spacing, row_spacing, Corner,
        CornerKey, CornerRegistry, Grid, HexIndex, VertexDirection,
        CORNER_PRECISION,
    },
    navigate::{
        corner_candidates, locate_hexagon, orbit_step, select_target_corner,
        NavigationState, Navigator, Outcome, StepEvent, Trace,
        ARRIVAL_RADIUS_FACTOR, CORNER_REACHED_DISTANCE,
        MEMBERSHIP_RADIUS_FACTOR,
    },
    render::{
        config::RenderConfig, extended_line, unit::Color3, Canvas,
        GridRenderer,
    },
    tessellation::{Orientation, Tessellation, Triangle},
    util::unit::{CornerId, Point2, Rect, Size2},
};

#[cfg(feature = "json")]
impl Grid {
    /// Serialize this grid into JSON. The output includes the config, every
    /// center, and every corner with its ID.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize a grid from JSON, as produced by [Self::to_json]
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(feature = "json")]
impl Trace {
    /// Serialize this trace into JSON
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(feature = "json")]
impl Tessellation {
    /// Serialize this tessellation into JSON
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
