use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Linear RGB color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed 0xRRGGBB value.
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Pack back to 0xRRGGBB, rounding each channel.
    pub fn to_hex(self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Six lowercase hex digits, no prefix.
    pub fn hex_string(self) -> String {
        format!("{:06x}", self.to_hex())
    }

    pub fn lerp(self, to: Self, t: f32) -> Self {
        Self {
            r: self.r + (to.r - self.r) * t,
            g: self.g + (to.g - self.g) * t,
            b: self.b + (to.b - self.b) * t,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Parse `#rrggbb`, `0xrrggbb` or bare `rrggbb`.
    pub fn parse(s: &str) -> Option<Self> {
        let digits = s
            .trim()
            .trim_start_matches('#')
            .trim_start_matches("0x")
            .trim_start_matches("0X");
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_hex)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HexRepr {
    Packed(u32),
    Text(String),
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match HexRepr::deserialize(deserializer)? {
            HexRepr::Packed(hex) => Ok(Rgb::from_hex(hex)),
            HexRepr::Text(text) => Rgb::parse(&text)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid color '{text}'"))),
        }
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
