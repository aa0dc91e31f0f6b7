use serde::{Deserialize, Serialize};
use validator::Validate;

/// Configuration specific to visually rendering grids and navigation runs.
/// These options have absolutely no bearing on generation or navigation,
/// only on the visual presentation.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RenderConfig {
    /// Should each corner be labelled with its ID?
    pub show_corner_labels: bool,

    /// Should navigation frames include the debug lines used for corner
    /// selection? That's an extended line toward the destination, plus one
    /// toward each candidate corner.
    pub show_candidates: bool,

    /// Radius of the markers drawn for the start, destination, current
    /// position and raised corners
    #[validate(range(min = 0.1))]
    pub marker_radius: f64,

    /// Stroke width for hexagon and triangle outlines
    #[validate(range(min = 0.1))]
    pub line_width: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            show_corner_labels: true,
            show_candidates: false,
            marker_radius: 5.0,
            line_width: 1.0,
        }
    }
}
