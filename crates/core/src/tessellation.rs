//! Triangular tessellation of a rectangle. This is the triangle counterpart
//! to [Grid](crate::Grid): equilateral triangles, alternating pointing up and
//! down, with every shared vertex deduplicated into a single corner.

use crate::{
    config::TessellationConfig,
    grid::CornerRegistry,
    timed,
    util::unit::{CornerId, Point2, Rect},
};
use anyhow::Context;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Which way a triangle's apex points
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Up,
    Down,
}

/// One triangle in a tessellation. Its corners are listed apex first.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub orientation: Orientation,
    pub corners: [CornerId; 3],
}

/// A rectangle filled with triangles. Triangle IDs are their index in
/// [Self::triangles], in the order they were generated (row-major).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tessellation {
    config: TessellationConfig,
    triangles: Vec<Triangle>,
    corners: Vec<Point2>,
}

impl Tessellation {
    /// Fill the configured bounds with triangles. Returns an error if the
    /// config is invalid.
    pub fn generate(config: TessellationConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid tessellation config")?;

        let tessellation = timed!("Tessellation", log::Level::Info, {
            let side = config.side_length;
            let bounds = config.bounds;
            let row_height = side * 3f64.sqrt() / 2.0;
            let half_side = side / 2.0;
            let rows = (bounds.height / row_height).floor() as usize + 1;
            let cols = (bounds.width / half_side).floor() as usize + 1;

            let mut corners = CornerRegistry::with_capacity(rows * cols);
            let mut triangles = Vec::with_capacity(rows * cols);
            for row in 0..rows {
                for col in 0..cols {
                    let base = Point2::new(
                        bounds.x + col as f64 * half_side,
                        bounds.y + row as f64 * row_height,
                    );
                    let (orientation, vertices) =
                        triangle_vertices(base, side, (row + col) % 2 == 0);
                    if !vertices.iter().all(|&vertex| bounds.contains(vertex))
                    {
                        continue;
                    }

                    let mut ids = [CornerId(0); 3];
                    for (id, &vertex) in ids.iter_mut().zip(&vertices) {
                        *id = corners.resolve(vertex);
                    }
                    triangles.push(Triangle {
                        orientation,
                        corners: ids,
                    });
                }
            }

            if corners.is_empty() {
                warn!(
                    "Bounds {:?} are too small to fit a triangle with side {}",
                    bounds, side
                );
            }
            debug!(
                "Registered {} unique corners out of {} candidates",
                corners.len(),
                triangles.len() * 3
            );
            Self {
                config,
                triangles,
                corners: corners.into_positions(),
            }
        });

        info!(
            "Generated {} triangles with {} corners",
            tessellation.triangles.len(),
            tessellation.corners.len()
        );
        Ok(tessellation)
    }

    pub fn config(&self) -> &TessellationConfig {
        &self.config
    }

    pub fn bounds(&self) -> Rect {
        self.config.bounds
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Position of every unique corner. The index in this slice is the
    /// corner ID.
    pub fn corners(&self) -> &[Point2] {
        &self.corners
    }

    pub fn corner(&self, id: CornerId) -> Option<Point2> {
        self.corners.get(id.0).copied()
    }

    /// Get the positions of a triangle's three corners, apex first
    pub fn triangle_vertices(&self, triangle: &Triangle) -> [Point2; 3] {
        triangle.corners.map(|id| self.corners[id.0])
    }
}

/// Calculate the vertices of a single triangle. For upward triangles, `base`
/// is the apex and the other two vertices sit one row below it. For downward
/// ones the apex is one row below `base`, and the other two vertices are
/// level with `base`.
fn triangle_vertices(
    base: Point2,
    side: f64,
    upward: bool,
) -> (Orientation, [Point2; 3]) {
    let row_height = side * 3f64.sqrt() / 2.0;
    let half_side = side / 2.0;
    if upward {
        (
            Orientation::Up,
            [
                base,
                base + Point2::new(half_side, row_height),
                base + Point2::new(-half_side, row_height),
            ],
        )
    } else {
        (
            Orientation::Down,
            [
                base + Point2::new(0.0, row_height),
                base + Point2::new(half_side, 0.0),
                base + Point2::new(-half_side, 0.0),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_triangles_are_equilateral() {
        let tessellation =
            Tessellation::generate(TessellationConfig::default()).unwrap();
        assert!(!tessellation.triangles().is_empty());
        for triangle in tessellation.triangles() {
            let [a, b, c] = tessellation.triangle_vertices(triangle);
            assert_approx_eq!(a.distance_to(b), 50.0);
            assert_approx_eq!(b.distance_to(c), 50.0);
            assert_approx_eq!(c.distance_to(a), 50.0);
        }
    }

    #[test]
    fn test_all_inside_bounds() {
        let tessellation =
            Tessellation::generate(TessellationConfig::default()).unwrap();
        let bounds = tessellation.bounds();
        for &corner in tessellation.corners() {
            assert!(bounds.contains(corner), "{} out of bounds", corner);
        }
    }

    #[test]
    fn test_single_strip() {
        // One row tall, exactly two triangles wide. The outermost columns
        // poke out past the left and right edges so they get dropped, as
        // does the whole second row.
        let tessellation = Tessellation::generate(TessellationConfig {
            side_length: 2.0,
            bounds: Rect::new(0.0, 0.0, 3.0, 3f64.sqrt()),
        })
        .unwrap();
        let orientations: Vec<Orientation> = tessellation
            .triangles()
            .iter()
            .map(|triangle| triangle.orientation)
            .collect();
        assert_eq!(orientations, vec![Orientation::Down, Orientation::Up]);
        // The two triangles share an edge, so 4 unique corners
        assert_eq!(tessellation.corners().len(), 4);
        let first = tessellation.triangles()[0];
        let second = tessellation.triangles()[1];
        assert_eq!(first.corners[0], second.corners[2]);
        assert_eq!(first.corners[1], second.corners[0]);
    }

    #[test]
    fn test_bounds_too_small() {
        let tessellation = Tessellation::generate(TessellationConfig {
            side_length: 50.0,
            bounds: Rect::new(0.0, 0.0, 10.0, 10.0),
        })
        .unwrap();
        assert!(tessellation.triangles().is_empty());
        assert!(tessellation.corners().is_empty());
    }

    #[test]
    fn test_invalid_config() {
        assert!(Tessellation::generate(TessellationConfig {
            side_length: 0.0,
            ..Default::default()
        })
        .is_err());
    }
}
