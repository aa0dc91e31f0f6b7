use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// The 6 directions you can go from the center of a hexagon to one of its
/// corners. Hexagons are flat-topped, so the first corner is due east and
/// the rest follow at 60 degree steps. Remember that `+y` is down in canvas
/// space, which makes increasing angles run **clockwise** on screen.
#[derive(
    Copy, Clone, Debug, EnumIter, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum VertexDirection {
    /// East (0°)
    E,
    /// South-southeast (60°)
    SSE,
    /// South-southwest (120°)
    SSW,
    /// West (180°)
    W,
    /// North-northwest (240°)
    NNW,
    /// North-northeast (300°)
    NNE,
}

impl VertexDirection {
    /// All directions, in the order that corners are generated
    pub const CLOCKWISE: [Self; 6] =
        [Self::E, Self::SSE, Self::SSW, Self::W, Self::NNW, Self::NNE];

    /// Angle from the hexagon center to this corner, in degrees
    pub fn degrees(self) -> f64 {
        60.0 * self.clockwise_index() as f64
    }

    /// Position of this direction in [Self::CLOCKWISE]
    pub fn clockwise_index(self) -> usize {
        match self {
            Self::E => 0,
            Self::SSE => 1,
            Self::SSW => 2,
            Self::W => 3,
            Self::NNW => 4,
            Self::NNE => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_iter_matches_clockwise() {
        assert_eq!(
            VertexDirection::iter().collect::<Vec<_>>(),
            VertexDirection::CLOCKWISE.to_vec()
        );
    }

    #[test]
    fn test_degrees() {
        let degrees: Vec<f64> =
            VertexDirection::iter().map(VertexDirection::degrees).collect();
        assert_eq!(degrees, vec![0.0, 60.0, 120.0, 180.0, 240.0, 300.0]);
    }
}
