#![forbid(unsafe_code)]

//! Packed RGBA colors.

/// A color packed as `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Dark gray (one third white).
    pub const DARK_GRAY: Self = Self::rgb(85, 85, 85);

    /// Create an opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create a color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32)
    }

    /// Grayscale color from a white level and alpha, both in `[0.0, 1.0]`.
    pub fn white(white: f32, alpha: f32) -> Self {
        let w = unit_to_byte(white);
        Self::rgba(w, w, w, unit_to_byte(alpha))
    }

    /// Color from unit-range components.
    pub fn from_unit(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::rgba(
            unit_to_byte(r),
            unit_to_byte(g),
            unit_to_byte(b),
            unit_to_byte(a),
        )
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Alpha as a unit float.
    #[inline]
    pub fn alpha(self) -> f32 {
        f32::from(self.a()) / 255.0
    }

    /// Multiply the alpha channel by `opacity` (clamped to `[0.0, 1.0]`).
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (f32::from(self.a()) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self::rgba(self.r(), self.g(), self.b(), a)
    }
}

fn unit_to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
