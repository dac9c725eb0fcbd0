//! Residual magnitude → bit-length class lookup.

/// Number of magnitude categories (0 through 16).
pub const CATEGORY_COUNT: usize = 17;

/// Largest category; its code is emitted without payload bits.
pub const MAX_CATEGORY: u8 = 16;

const TABLE_LEN: usize = 1 << 16;

/// Lookup table mapping every 16-bit magnitude to the number of bits needed to
/// represent it. Built at compile time, so a single instance can be shared by
/// any number of concurrent encodes.
pub struct CategoryTable {
    classes: [u8; TABLE_LEN],
}

/// Shared read-only instance.
pub static CATEGORIES: CategoryTable = CategoryTable::new();

impl CategoryTable {
    pub const fn new() -> Self {
        let mut classes = [0u8; TABLE_LEN];
        let mut value = 1usize;
        let mut bits = 1u8;
        while value < TABLE_LEN {
            if value == 1 << bits {
                bits += 1;
            }
            classes[value] = bits;
            value += 1;
        }
        Self { classes }
    }

    /// Category of `magnitude`. Magnitudes above 65535 are outside the 16-bit
    /// sample domain and panic on the bounds check.
    #[inline]
    pub fn category(&self, magnitude: u32) -> u8 {
        self.classes[magnitude as usize]
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new()
    }
}
