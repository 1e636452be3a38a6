// src/render/color.rs

/// An sRGB colour with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parses `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }
}

// Palette
pub const BACKGROUND: Color = Color::rgb(246, 244, 239);
pub const GRID: Color = Color::rgb(222, 219, 210);
pub const SHADOW: Color = Color::rgba(0, 0, 0, 40);
pub const TABLE_STROKE: Color = Color::rgb(70, 64, 56);
pub const SELECTION: Color = Color::rgb(33, 118, 255);
pub const HANDLE_FILL: Color = Color::rgb(255, 255, 255);
pub const TEXT: Color = Color::rgb(40, 36, 32);
pub const AREA_FALLBACK: Color = Color::rgb(180, 180, 180);

pub const AVAILABLE: Color = Color::rgb(204, 232, 200);
pub const OCCUPIED: Color = Color::rgb(240, 190, 180);
pub const RESERVED: Color = Color::rgb(248, 222, 160);
pub const CLEANING: Color = Color::rgb(190, 214, 240);
