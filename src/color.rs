//! Colors attached to categories.

use serde::{Deserialize, Serialize};

/// A color packed as a 32-bit `0xAARRGGBB` value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Argb(pub u32);

impl Argb {
    /// Fully transparent black, the "no color picked yet" value.
    pub const TRANSPARENT: Argb = Argb(0x0000_0000);

    /// Build a color from its alpha, red, green and blue channels.
    pub const fn from_channels(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self((alpha as u32) << 24 | (red as u32) << 16 | (green as u32) << 8 | blue as u32)
    }

    /// The alpha channel.
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Whether this is exactly [Argb::TRANSPARENT].
    pub fn is_transparent(self) -> bool {
        self == Self::TRANSPARENT
    }
}

impl From<u32> for Argb {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Argb> for u32 {
    fn from(value: Argb) -> Self {
        value.0
    }
}
