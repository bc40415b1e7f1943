//! Display attributes for communities.
//!
//! Community `i` (0-based, in partition order) gets a colour and a vertex
//! shape. Hue and shape vary first; once every hue/shape combination has
//! been handed out, the cycle repeats at lower saturation. The assignment
//! depends only on `i`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Vertex shapes used for communities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VertexShape {
    Disk,
    SolidSquare,
    SolidDiamond,
    SolidTriangle,
}

impl VertexShape {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Disk => "disk",
            Self::SolidSquare => "solid-square",
            Self::SolidDiamond => "solid-diamond",
            Self::SolidTriangle => "solid-triangle",
        }
    }
}

impl fmt::Display for VertexShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommunityStyle {
    pub color: Rgb,
    pub shape: VertexShape,
}

/// Hues in degrees, ordered so neighbouring communities contrast.
const HUES: [f64; 12] = [
    0.0, 120.0, 240.0, 60.0, 180.0, 300.0, 30.0, 150.0, 270.0, 90.0, 210.0, 330.0,
];

const SHAPES: [VertexShape; 4] = [
    VertexShape::Disk,
    VertexShape::SolidSquare,
    VertexShape::SolidDiamond,
    VertexShape::SolidTriangle,
];

const SATURATION_STEP: f64 = 0.2;
const MIN_SATURATION: f64 = 0.2;

/// Style for the community at `ordinal`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn community_style(ordinal: usize) -> CommunityStyle {
    let combinations = HUES.len() * SHAPES.len();
    let round = ordinal / combinations;
    let within = ordinal % combinations;

    let hue = HUES[within % HUES.len()];
    let shape = SHAPES[within / HUES.len()];
    let saturation = SATURATION_STEP
        .mul_add(-(round as f64), 1.0)
        .max(MIN_SATURATION);

    CommunityStyle {
        color: hsv_to_rgb(hue, saturation, 1.0),
        shape,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> Rgb {
    let chroma = value * saturation;
    let h = hue / 60.0;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = if h < 1.0 {
        (chroma, x, 0.0)
    } else if h < 2.0 {
        (x, chroma, 0.0)
    } else if h < 3.0 {
        (0.0, chroma, x)
    } else if h < 4.0 {
        (0.0, x, chroma)
    } else if h < 5.0 {
        (x, 0.0, chroma)
    } else {
        (chroma, 0.0, x)
    };
    let m = value - chroma;
    let channel = |c: f64| ((c + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb {
        r: channel(r),
        g: channel(g),
        b: channel(b),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
