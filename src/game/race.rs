//! Races and their cell-interaction features

use std::fmt;

use super::CellType;

/// Special abilities a race brings to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Forests cost one unit less to capture
    Forester,
    /// Mountains cost one unit less to capture
    Mountaineer,
    /// Feudal mountains yield one extra coin
    Miner,
    /// Required to enter water
    Swimmer,
    /// Forests and mountains cost one unit more to capture
    Clumsy,
}

/// A player's faction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Race {
    Human,
    Elf,
    Dwarf,
    Amphibian,
    Orc,
}

impl Race {
    /// Every race in the game, in pool order
    pub const ALL: [Race; 5] = [
        Race::Human,
        Race::Elf,
        Race::Dwarf,
        Race::Amphibian,
        Race::Orc,
    ];

    /// Number of units a player receives when picking this race
    pub fn unit_count(self) -> usize {
        match self {
            Race::Human => 5,
            Race::Elf | Race::Dwarf | Race::Amphibian => 4,
            Race::Orc => 6,
        }
    }

    pub fn features(self) -> &'static [Feature] {
        match self {
            Race::Human => &[],
            Race::Elf => &[Feature::Forester],
            Race::Dwarf => &[Feature::Mountaineer, Feature::Miner],
            Race::Amphibian => &[Feature::Swimmer],
            Race::Orc => &[Feature::Clumsy],
        }
    }

    pub fn has_feature(self, feature: Feature) -> bool {
        self.features().contains(&feature)
    }

    /// Returns true if units of this race may capture and hold the cell type
    pub fn can_enter(self, kind: CellType) -> bool {
        kind != CellType::Water || self.has_feature(Feature::Swimmer)
    }

    /// Adjustment to the catch difficulty of a cell type
    pub fn catch_modifier(self, kind: CellType) -> isize {
        self.features()
            .iter()
            .map(|feature| match (feature, kind) {
                (Feature::Forester, CellType::Forest) => -1,
                (Feature::Mountaineer, CellType::Mountain) => -1,
                (Feature::Clumsy, CellType::Forest | CellType::Mountain) => 1,
                _ => 0,
            })
            .sum()
    }

    /// Extra coins a feudal cell of the given type yields for this race
    pub fn coin_bonus(self, kind: CellType) -> u32 {
        if kind == CellType::Mountain && self.has_feature(Feature::Miner) {
            1
        } else {
            0
        }
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
