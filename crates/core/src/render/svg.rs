use crate::{
    render::{unit::Color3, Canvas, GridRenderer},
    util::unit::{Point2, Size2},
    Grid, NavigationState, Tessellation, Trace,
};
use svg::{
    node::{
        self,
        element::{Circle, Line, Polygon, Rectangle, Text},
        Comment,
    },
    Document, Node,
};

/// Font size for corner labels, in canvas units
const LABEL_FONT_SIZE: f64 = 8.0;

/// A [Canvas] that builds up an SVG document. The view box matches the canvas
/// size exactly, so canvas coordinates map 1:1 onto the SVG.
#[derive(Clone, Debug)]
pub struct SvgCanvas {
    document: Document,
}

impl SvgCanvas {
    /// Create a blank canvas of the given size, filled with the background
    /// color
    pub fn new(size: Size2) -> Self {
        let document = Document::new()
            .set("viewBox", (0.0, 0.0, size.width, size.height))
            .set("width", size.width)
            .set("height", size.height)
            .add(
                Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", size.width)
                    .set("height", size.height)
                    .set("fill", GridRenderer::BACKGROUND_COLOR.to_html()),
            );
        Self { document }
    }

    /// Add a comment to the document. Handy for embedding the config that
    /// produced an image.
    pub fn comment(&mut self, text: impl Into<String>) {
        self.add(Comment::new(text.into()));
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    fn add(&mut self, node: impl Node) {
        // Document's builder methods take self by value
        self.document =
            std::mem::replace(&mut self.document, Document::new()).add(node);
    }
}

impl Canvas for SvgCanvas {
    fn polygon(&mut self, points: &[Point2], color: Color3, width: f64) {
        self.add(
            Polygon::new()
                .set(
                    "points",
                    points
                        .iter()
                        .map(|point| (point.x, point.y))
                        .collect::<Vec<_>>(),
                )
                .set("fill", "none")
                .set("stroke", color.to_html())
                .set("stroke-width", width),
        );
    }

    fn circle(&mut self, center: Point2, radius: f64, color: Color3) {
        self.add(
            Circle::new()
                .set("cx", center.x)
                .set("cy", center.y)
                .set("r", radius)
                .set("fill", color.to_html()),
        );
    }

    fn line(&mut self, from: Point2, to: Point2, color: Color3, width: f64) {
        self.add(
            Line::new()
                .set("x1", from.x)
                .set("y1", from.y)
                .set("x2", to.x)
                .set("y2", to.y)
                .set("stroke", color.to_html())
                .set("stroke-width", width),
        );
    }

    fn label(&mut self, position: Point2, text: &str, color: Color3) {
        self.add(
            Text::new()
                .set("x", position.x)
                .set("y", position.y)
                .set("font-size", LABEL_FONT_SIZE)
                .set("fill", color.to_html())
                .add(node::Text::new(text)),
        );
    }
}

impl GridRenderer {
    /// Render a grid as a 2D SVG, sized to the grid's canvas
    pub fn grid_to_svg(&self, grid: &Grid) -> Document {
        let mut canvas = SvgCanvas::new(grid.config().canvas);
        canvas.comment(format!("\n{:#?}\n", grid.config()));
        self.draw_grid(&mut canvas, grid);
        canvas.into_document()
    }

    /// Render a single frame of a navigation run
    pub fn frame_to_svg(
        &self,
        grid: &Grid,
        start: Point2,
        state: &NavigationState,
    ) -> Document {
        let mut canvas = SvgCanvas::new(grid.config().canvas);
        canvas.comment(format!("tick {}", state.ticks()));
        self.draw_frame(&mut canvas, grid, start, state);
        canvas.into_document()
    }

    /// Render a finished run: the final frame, with the full path drawn over
    /// it
    pub fn trace_to_svg(
        &self,
        grid: &Grid,
        trace: &Trace,
        final_state: &NavigationState,
    ) -> Document {
        let mut canvas = SvgCanvas::new(grid.config().canvas);
        canvas.comment(trace.outcome.to_string());
        self.draw_frame(&mut canvas, grid, trace.start, final_state);
        self.draw_trace(&mut canvas, trace);
        canvas.into_document()
    }

    /// Render a tessellation. The canvas is sized to fit the bounds plus
    /// their offset from the origin.
    pub fn tessellation_to_svg(&self, tessellation: &Tessellation) -> Document {
        let bounds = tessellation.bounds();
        let mut canvas = SvgCanvas::new(Size2::new(
            bounds.x + bounds.width,
            bounds.y + bounds.height,
        ));
        canvas.comment(format!("\n{:#?}\n", tessellation.config()));
        self.draw_tessellation(&mut canvas, tessellation);
        canvas.into_document()
    }
}
