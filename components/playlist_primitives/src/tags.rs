use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cosmetic color theme assigned to a playlist at creation time
///
/// Purely presentational; the gradient classes are what the web shell
/// renders for each theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Sunset,
    Twilight,
    Aurora,
    Citrus,
    Ocean,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Sunset,
        Theme::Twilight,
        Theme::Aurora,
        Theme::Citrus,
        Theme::Ocean,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Gradient utility classes rendered by the presentation layer
    pub fn gradient_classes(&self) -> &'static str {
        match self {
            Theme::Sunset => "from-purple-400 via-pink-500 to-red-600",
            Theme::Twilight => "from-blue-400 via-purple-500 to-pink-600",
            Theme::Aurora => "from-green-400 via-blue-500 to-purple-600",
            Theme::Citrus => "from-yellow-400 via-orange-500 to-pink-600",
            Theme::Ocean => "from-cyan-400 via-blue-500 to-purple-600",
        }
    }
}

/// Cosmetic rarity tag assigned to a playlist at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythic,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rarity::Common => "Common",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Mythic => "Mythic",
        };
        f.write_str(name)
    }
}
