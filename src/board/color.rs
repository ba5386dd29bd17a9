//! Disease colors (tribes in the Rome variant) and per-color storage.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::core::Variant;

/// A disease color. In the Rome variant each color is a barbarian tribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    Blue,
    Yellow,
    Black,
    Red,
    Purple,
}

/// All colors in index order.
pub const ALL_COLORS: [Color; 5] = [
    Color::Blue,
    Color::Yellow,
    Color::Black,
    Color::Red,
    Color::Purple,
];

impl Color {
    /// Index into a `ColorMap`.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Display name for this color under a variant's vocabulary.
    ///
    /// ```
    /// use outbreak::board::Color;
    /// use outbreak::core::Variant;
    ///
    /// assert_eq!(Color::Red.label(Variant::Classic), "red disease");
    /// assert_eq!(Color::Red.label(Variant::Rome), "Huns");
    /// ```
    #[must_use]
    pub const fn label(self, variant: Variant) -> &'static str {
        match variant {
            Variant::Rome => match self {
                Color::Blue => "Anglo-Saxons",
                Color::Yellow => "Vandals",
                Color::Black => "Goths",
                Color::Red => "Huns",
                Color::Purple => "Franks",
            },
            Variant::Classic | Variant::Iberia => match self {
                Color::Blue => "blue disease",
                Color::Yellow => "yellow disease",
                Color::Black => "black disease",
                Color::Red => "red disease",
                Color::Purple => "purple disease",
            },
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Black => "black",
            Color::Red => "red",
            Color::Purple => "purple",
        };
        f.write_str(name)
    }
}

/// Fixed-size storage with one entry per color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorMap<T> {
    data: [T; 5],
}

impl<T: Copy> ColorMap<T> {
    /// Every entry set to `value`.
    #[must_use]
    pub const fn splat(value: T) -> Self {
        Self { data: [value; 5] }
    }
}

impl<T> ColorMap<T> {
    /// Build from a factory function.
    pub fn from_fn(mut factory: impl FnMut(Color) -> T) -> Self {
        Self {
            data: ALL_COLORS.map(&mut factory),
        }
    }

    /// Iterate over (Color, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Color, &T)> {
        ALL_COLORS.iter().copied().zip(self.data.iter())
    }
}

impl ColorMap<u8> {
    /// Sum of all entries.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.data.iter().map(|&n| u32::from(n)).sum()
    }

    /// True if every entry is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&n| n == 0)
    }
}

impl<T> Index<Color> for ColorMap<T> {
    type Output = T;

    fn index(&self, color: Color) -> &T {
        &self.data[color.index()]
    }
}

impl<T> IndexMut<Color> for ColorMap<T> {
    fn index_mut(&mut self, color: Color) -> &mut T {
        &mut self.data[color.index()]
    }
}
