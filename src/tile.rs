//! Tile kinds: blank, five basic colours, and the two power tiles.

use rand::Rng;

/// Basic tile colour. Renderers index their palette by [`Color::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Orange,
    Green,
    Blue,
    Purple,
}

impl Color {
    pub const ALL: [Self; 5] = [Self::Red, Self::Orange, Self::Green, Self::Blue, Self::Purple];

    /// Uniformly random colour.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Index 0..5, used by the renderer for palette lookup.
    pub fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Orange => 1,
            Self::Green => 2,
            Self::Blue => 3,
            Self::Purple => 4,
        }
    }
}

/// One grid cell. Cells are reassigned, never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tile {
    #[default]
    Blank,
    Basic(Color),
    /// Clears its whole row and column when popped.
    Line,
    /// Clears the surrounding 3x3 when popped.
    Bomb,
}

impl Tile {
    /// Fresh random basic tile (what refills and the initial board use).
    pub fn random_basic<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::Basic(Color::random(rng))
    }

    #[inline]
    pub fn is_blank(self) -> bool {
        self == Self::Blank
    }

    #[inline]
    pub fn is_basic(self) -> bool {
        matches!(self, Self::Basic(_))
    }

    #[inline]
    pub fn is_power(self) -> bool {
        matches!(self, Self::Line | Self::Bomb)
    }

    /// Colour of a basic tile; None for blank and power tiles.
    pub fn color(self) -> Option<Color> {
        match self {
            Self::Basic(c) => Some(c),
            _ => None,
        }
    }
}
