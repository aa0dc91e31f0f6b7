use serde::{Deserialize, Serialize};

/// An RGB color. Values are stored as floats between 0 and 1 (inclusive).
/// This uses f32 because the extra precision from f64 is pointless.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color3 {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Color3 {
    pub const BLACK: Self = Self::new_int(0, 0, 0);
    pub const RED: Self = Self::new_int(255, 0, 0);
    pub const GREEN: Self = Self::new_int(0, 255, 0);
    pub const BLUE: Self = Self::new_int(0, 0, 255);
    pub const MAGENTA: Self = Self::new_int(255, 0, 255);
    pub const BEIGE: Self = Self::new_int(245, 245, 220);

    /// Create a new RGB color from integer components in the [0,255] range.
    pub const fn new_int(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
        }
    }

    /// Convert this number to a set of 3 bytes: `(red, green, blue)`
    pub fn to_ints(self) -> (u8, u8, u8) {
        // Round so that new_int -> to_ints is lossless
        (
            (self.red * 255.0).round() as u8,
            (self.green * 255.0).round() as u8,
            (self.blue * 255.0).round() as u8,
        )
    }

    /// Convert this color to an HTML color code: `#rrggbb`
    pub fn to_html(self) -> String {
        let (r, g, b) = self.to_ints();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_html() {
        assert_eq!(Color3::BLACK.to_html(), "#000000");
        assert_eq!(Color3::MAGENTA.to_html(), "#ff00ff");
        assert_eq!(Color3::BEIGE.to_html(), "#f5f5dc");
    }

    #[test]
    fn test_int_round_trip() {
        for value in [0, 1, 127, 128, 200, 245, 254, 255] {
            assert_eq!(
                Color3::new_int(value, value, value).to_ints(),
                (value, value, value)
            );
        }
    }
}
