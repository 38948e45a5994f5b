use std::fmt;

use serde::{Deserialize, Serialize};

use catalogue::LineId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

// Extending this is just a matter of adding rows
const LINE_COLORS: [(&str, Color); 16] = [
    ("15", Color::rgb(0xFF, 0x52, 0x52)),
    ("16", Color::rgb(0x4C, 0xAF, 0x50)),
    ("17", Color::rgb(0x21, 0x96, 0xF3)),
    ("18", Color::rgb(0xFF, 0xC1, 0x07)),
    ("19", Color::rgb(0x9C, 0x27, 0xB0)),
    ("20", Color::rgb(0xFF, 0x98, 0x00)),
    ("21", Color::rgb(0x00, 0xBC, 0xD4)),
    ("22", Color::rgb(0xE9, 0x1E, 0x63)),
    ("23", Color::rgb(0x8B, 0xC3, 0x4A)),
    ("24", Color::rgb(0x79, 0x55, 0x48)),
    ("25", Color::rgb(0x60, 0x7D, 0x8B)),
    ("26", Color::rgb(0x3F, 0x51, 0xB5)),
    ("27", Color::rgb(0x00, 0x96, 0x88)),
    ("28", Color::rgb(0x67, 0x3A, 0xB7)),
    ("29", Color::rgb(0xCD, 0xDC, 0x39)),
    ("30", Color::rgb(0xFF, 0x57, 0x22)),
];

pub const ROUTE_FALLBACK: Color = Color::rgb(0x00, 0xFF, 0x00);
pub const MARKER_FALLBACK: Color = Color::rgb(0x21, 0x96, 0xF3);

pub fn line_color(line: &LineId) -> Option<Color> {
    LINE_COLORS
        .iter()
        .find(|(id, _)| *id == line.as_str())
        .map(|(_, color)| *color)
}

pub fn route_color(line: &LineId) -> Color {
    line_color(line).unwrap_or(ROUTE_FALLBACK)
}

pub fn marker_color(line: &LineId) -> Color {
    line_color(line).unwrap_or(MARKER_FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_and_fallbacks() {
        assert_eq!(route_color(&"20".into()).to_hex(), "#FF9800");
        assert_eq!(marker_color(&"20".into()), route_color(&"20".into()));
        assert_eq!(route_color(&"99".into()).to_hex(), "#00FF00");
        assert_eq!(marker_color(&"99".into()).to_hex(), "#2196F3");
        assert_ne!(ROUTE_FALLBACK, MARKER_FALLBACK);
    }
}
