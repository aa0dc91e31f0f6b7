pub mod config;
#[cfg(feature = "svg")]
pub mod svg;
pub mod unit;

use crate::{
    navigate::{corner_candidates, NavigationState, Trace},
    render::{config::RenderConfig, unit::Color3},
    tessellation::Tessellation,
    util::unit::{Point2, Size2},
    Grid,
};
use validator::Validate;

/// A surface that can be drawn on. This is all that [GridRenderer] needs from
/// an output format, so any backend that can draw these four primitives can
/// display grids and navigation runs. All coordinates are in canvas space.
pub trait Canvas {
    /// Draw the outline of a closed polygon
    fn polygon(&mut self, points: &[Point2], color: Color3, width: f64);

    /// Draw a filled circle
    fn circle(&mut self, center: Point2, radius: f64, color: Color3);

    /// Draw a straight line segment
    fn line(&mut self, from: Point2, to: Point2, color: Color3, width: f64);

    /// Draw a text label with its top-left corner at the given position
    fn label(&mut self, position: Point2, text: &str, color: Color3);
}

/// A grid renderer converts grids, navigation state and tessellations into
/// drawing calls on a [Canvas]. A renderer is created using a particular
/// [RenderConfig], and from there can draw any number of frames.
///
/// Config options cannot be changed after creating a renderer, but renderers
/// are very cheap to create so if you need to change the config, just create
/// a new renderer.
#[derive(Clone, Debug)]
pub struct GridRenderer {
    render_config: RenderConfig,
}

impl GridRenderer {
    pub const BACKGROUND_COLOR: Color3 = Color3::BEIGE;
    pub const EDGE_COLOR: Color3 = Color3::BLACK;
    pub const LABEL_COLOR: Color3 = Color3::RED;
    pub const START_COLOR: Color3 = Color3::BLUE;
    pub const DESTINATION_COLOR: Color3 = Color3::RED;
    pub const POSITION_COLOR: Color3 = Color3::BLUE;
    pub const RAISED_CORNER_COLOR: Color3 = Color3::GREEN;
    pub const RAISE_LINE_COLOR: Color3 = Color3::MAGENTA;
    pub const CANDIDATE_LINE_COLOR: Color3 = Color3::GREEN;
    pub const TRIANGLE_COLOR: Color3 = Color3::BLUE;

    /// Labels are nudged up and to the left so they sit over the corner
    const LABEL_OFFSET: Point2 = Point2::new(-5.0, -5.0);

    /// Initialize a new renderer with the given options. Returns an error if
    /// the render config is invalid.
    pub fn new(render_config: RenderConfig) -> anyhow::Result<Self> {
        render_config.validate()?;
        Ok(Self { render_config })
    }

    /// Get a reference to the config that this renderer uses
    pub fn render_config(&self) -> &RenderConfig {
        &self.render_config
    }

    /// Draw every hexagon's outline, plus corner labels if enabled
    pub fn draw_grid(&self, canvas: &mut impl Canvas, grid: &Grid) {
        for hex in 0..grid.len() {
            if let Some(vertices) = grid.hex_vertices(hex) {
                canvas.polygon(
                    &vertices,
                    Self::EDGE_COLOR,
                    self.render_config.line_width,
                );
            }
        }

        if self.render_config.show_corner_labels {
            for corner in grid.corners() {
                canvas.label(
                    corner.position + Self::LABEL_OFFSET,
                    &corner.id.0.to_string(),
                    Self::LABEL_COLOR,
                );
            }
        }
    }

    /// Draw a single frame of a navigation run on top of the grid: the start
    /// and destination markers, the corners queued up to be raised, the
    /// current position, and a line from the position to the next corner.
    pub fn draw_frame(
        &self,
        canvas: &mut impl Canvas,
        grid: &Grid,
        start: Point2,
        state: &NavigationState,
    ) {
        let marker = self.render_config.marker_radius;
        self.draw_grid(canvas, grid);

        if self.render_config.show_candidates {
            let (from, to) = extended_line(
                state.position(),
                state.destination(),
                grid.config().canvas,
            );
            canvas.line(from, to, Self::DESTINATION_COLOR, 2.0);
            for id in
                corner_candidates(state.position(), state.destination(), grid)
            {
                if let Some(corner) = grid.corner(id) {
                    let (from, to) = extended_line(
                        state.position(),
                        corner,
                        grid.config().canvas,
                    );
                    canvas.line(from, to, Self::CANDIDATE_LINE_COLOR, 1.0);
                }
            }
        }

        canvas.circle(start, marker, Self::START_COLOR);
        canvas.circle(state.destination(), marker, Self::DESTINATION_COLOR);
        for id in state.corners_to_raise() {
            if let Some(corner) = grid.corner(id) {
                canvas.circle(corner, marker, Self::RAISED_CORNER_COLOR);
            }
        }
        canvas.circle(state.position(), marker, Self::POSITION_COLOR);

        let next_corner = state
            .corners_to_raise()
            .next()
            .and_then(|id| grid.corner(id));
        if let Some(corner) = next_corner {
            canvas.line(state.position(), corner, Self::RAISE_LINE_COLOR, 2.0);
        }
    }

    /// Draw the full path of a finished run, with the start and destination
    /// marked
    pub fn draw_trace(&self, canvas: &mut impl Canvas, trace: &Trace) {
        let marker = self.render_config.marker_radius;
        for segment in trace.positions.windows(2) {
            canvas.line(segment[0], segment[1], Self::POSITION_COLOR, 1.0);
        }
        canvas.circle(trace.start, marker, Self::START_COLOR);
        canvas.circle(trace.destination, marker, Self::DESTINATION_COLOR);
    }

    /// Draw every triangle in a tessellation, plus a dot on each corner
    pub fn draw_tessellation(
        &self,
        canvas: &mut impl Canvas,
        tessellation: &Tessellation,
    ) {
        let bounds = tessellation.bounds();
        canvas.polygon(
            &[
                Point2::new(bounds.x, bounds.y),
                Point2::new(bounds.x + bounds.width, bounds.y),
                Point2::new(bounds.x + bounds.width, bounds.y + bounds.height),
                Point2::new(bounds.x, bounds.y + bounds.height),
            ],
            Self::EDGE_COLOR,
            self.render_config.line_width,
        );
        for triangle in tessellation.triangles() {
            canvas.polygon(
                &tessellation.triangle_vertices(triangle),
                Self::TRIANGLE_COLOR,
                self.render_config.line_width,
            );
        }
        for &corner in tessellation.corners() {
            canvas.circle(corner, 3.0, Self::EDGE_COLOR);
        }
    }
}

/// Get the segment of the infinite line through `start` and `end` that spans
/// the canvas from edge to edge. Vertical lines span top to bottom, all
/// others span left to right. If the two points are the same, you get a
/// vertical line through them.
pub fn extended_line(
    start: Point2,
    end: Point2,
    canvas: Size2,
) -> (Point2, Point2) {
    let delta = end - start;
    if delta.x == 0.0 {
        (
            Point2::new(start.x, 0.0),
            Point2::new(start.x, canvas.height),
        )
    } else if delta.y == 0.0 {
        (Point2::new(0.0, start.y), Point2::new(canvas.width, start.y))
    } else {
        let slope = delta.y / delta.x;
        let intercept = start.y - slope * start.x;
        (
            Point2::new(0.0, intercept),
            Point2::new(canvas.width, slope * canvas.width + intercept),
        )
    }
}
