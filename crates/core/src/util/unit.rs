use derive_more::{
    Add, AddAssign, Display, Div, DivAssign, From, Into, Mul, MulAssign, Neg,
    Sub, SubAssign,
};
use serde::{Deserialize, Serialize};

/// A point (or offset) in 2D canvas space. The grid and the navigator both
/// work in the same space that the canvas renders in: `+x` is right and `+y`
/// is **down**, so angles increase clockwise on screen.
///
/// This doubles as a vector type. There's no separate `Vector2`, because the
/// navigator constantly flips between the two interpretations (position minus
/// position is an offset, position plus offset is a position) and the extra
/// type would just mean a lot of conversions.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    PartialOrd,
    From,
    Into,
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", "self.x", "self.y")]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points
    pub fn distance_to(self, other: Self) -> f64 {
        (other - self).length()
    }

    /// Length of this point, treated as a vector from the origin
    pub fn length(self) -> f64 {
        nalgebra::Vector2::from(self).norm()
    }

    /// Dot product of two vectors
    pub fn dot(self, other: Self) -> f64 {
        nalgebra::Vector2::from(self).dot(&nalgebra::Vector2::from(other))
    }

    /// Scale this vector to unit length. Returns `None` for the zero vector,
    /// since it has no direction.
    pub fn normalize(self) -> Option<Self> {
        nalgebra::Vector2::from(self)
            .try_normalize(0.0)
            .map(Self::from)
    }

    /// Rotate this vector 90 degrees. In canvas space (`+y` down) this turns
    /// clockwise, e.g. `(1, 0)` becomes `(0, 1)`.
    pub fn perpendicular(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Heading of this vector in radians, in `(-π, π]`
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Get the point that is `distance` away from this one, at the given
    /// angle (in degrees)
    pub fn polar_offset(self, distance: f64, degrees: f64) -> Self {
        let radians = degrees.to_radians();
        Self::new(
            self.x + distance * radians.cos(),
            self.y + distance * radians.sin(),
        )
    }
}

impl From<nalgebra::Vector2<f64>> for Point2 {
    fn from(other: nalgebra::Vector2<f64>) -> Self {
        Self {
            x: other.x,
            y: other.y,
        }
    }
}

impl From<Point2> for nalgebra::Vector2<f64> {
    fn from(point: Point2) -> Self {
        nalgebra::Vector2::new(point.x, point.y)
    }
}

/// Width and height of a canvas, in canvas units
#[derive(Copy, Clone, Debug, Display, PartialEq, Serialize, Deserialize)]
#[display(fmt = "{}x{}", "self.width", "self.height")]
pub struct Size2 {
    pub width: f64,
    pub height: f64,
}

impl Size2 {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle. `(x, y)` is the top-left corner.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Is the point inside this rectangle? Edges count as inside.
    pub fn contains(&self, point: Point2) -> bool {
        (self.x..=self.x + self.width).contains(&point.x)
            && (self.y..=self.y + self.height).contains(&point.y)
    }
}

/// Unique ID for a deduplicated corner. IDs are handed out sequentially,
/// starting at 0, in the order corners are first encountered during
/// generation.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[display(fmt = "#{}", "self.0")]
pub struct CornerId(pub usize);

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use serde_test::{assert_tokens, Token};

    #[test]
    fn test_normalize() {
        let unit = Point2::new(3.0, 4.0).normalize().unwrap();
        assert_approx_eq!(unit.x, 0.6);
        assert_approx_eq!(unit.y, 0.8);
        assert_approx_eq!(unit.length(), 1.0);

        // Zero vector has no direction
        assert_eq!(Point2::ORIGIN.normalize(), None);
    }

    #[test]
    fn test_perpendicular() {
        assert_eq!(
            Point2::new(1.0, 0.0).perpendicular(),
            Point2::new(-0.0, 1.0)
        );
        let v = Point2::new(2.5, -7.0);
        assert_approx_eq!(v.dot(v.perpendicular()), 0.0);
    }

    #[test]
    fn test_polar_offset() {
        let p = Point2::new(10.0, 10.0).polar_offset(20.0, 60.0);
        assert_approx_eq!(p.x, 20.0);
        assert_approx_eq!(p.y, 10.0 + 20.0 * 3f64.sqrt() / 2.0);
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(100.0, 100.0, 600.0, 400.0);
        assert!(rect.contains(Point2::new(100.0, 100.0)));
        assert!(rect.contains(Point2::new(700.0, 500.0)));
        assert!(!rect.contains(Point2::new(700.1, 300.0)));
        assert!(!rect.contains(Point2::new(300.0, 99.9)));
    }

    #[test]
    fn test_serde_point() {
        assert_tokens(
            &Point2::new(1.5, -2.0),
            &[
                Token::Struct {
                    name: "Point2",
                    len: 2,
                },
                Token::Str("x"),
                Token::F64(1.5),
                Token::Str("y"),
                Token::F64(-2.0),
                Token::StructEnd,
            ],
        );
        assert_tokens(&CornerId(7), &[
            Token::NewtypeStruct { name: "CornerId" },
            Token::U64(7),
        ]);
    }
}
