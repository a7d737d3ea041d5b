use serde::{Deserialize, Serialize};

/// The fixed palette entries can be painted with. Stored as hex strings;
/// anything outside the palette reads back as the default blue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Color {
    #[default]
    Blue,
    Green,
    Red,
    Amber,
    Violet,
    Pink,
    Cyan,
}

impl Color {
    pub const ALL: [Color; 7] = [
        Color::Blue,
        Color::Green,
        Color::Red,
        Color::Amber,
        Color::Violet,
        Color::Pink,
        Color::Cyan,
    ];

    pub fn hex(&self) -> &'static str {
        match self {
            Color::Blue => "#2563eb",
            Color::Green => "#10b981",
            Color::Red => "#ef4444",
            Color::Amber => "#f59e0b",
            Color::Violet => "#8b5cf6",
            Color::Pink => "#ec4899",
            Color::Cyan => "#06b6d4",
        }
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|color| color.hex().eq_ignore_ascii_case(hex))
    }
}

impl From<String> for Color {
    fn from(value: String) -> Self {
        Color::from_hex(&value).unwrap_or_default()
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.hex().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_round_trips_through_hex() {
        for color in Color::ALL {
            assert_eq!(Color::from_hex(color.hex()), Some(color));
        }
    }

    #[test]
    fn unknown_color_falls_back_to_blue() {
        let color: Color = serde_json::from_str(r##""#123456""##).unwrap();
        assert_eq!(color, Color::Blue);
        let color: Color = serde_json::from_str(r##""#EC4899""##).unwrap();
        assert_eq!(color, Color::Pink);
        assert_eq!(serde_json::to_string(&Color::Cyan).unwrap(), r##""#06b6d4""##);
    }
}
