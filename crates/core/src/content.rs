//! Treasure catalog: the externally supplied table of collectible types.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasureType {
    pub name: String,
    pub color: [u8; 3],
    /// Relative selection weight during scattering.
    pub weight: u32,
    /// Gold value counted toward the level target.
    pub value: u32,
}

impl TreasureType {
    pub fn new(name: &str, color: [u8; 3], weight: u32, value: u32) -> Self {
        Self { name: name.to_string(), color, weight, value }
    }
}

/// Ordered list of treasure types; treasures refer to entries by index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreasureCatalog {
    types: Vec<TreasureType>,
}

impl TreasureCatalog {
    pub fn new(types: Vec<TreasureType>) -> Self {
        Self { types }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TreasureType> {
        self.types.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreasureType> {
        self.types.iter()
    }

    /// Value of the type at `index`; unknown indices are worth nothing.
    pub fn value_of(&self, index: usize) -> u32 {
        self.get(index).map_or(0, |treasure_type| treasure_type.value)
    }

    pub fn weights(&self) -> Vec<u32> {
        self.types.iter().map(|treasure_type| treasure_type.weight).collect()
    }

    /// Index of the most valuable type. Ties resolve to the earliest entry.
    pub fn most_valuable(&self) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (index, treasure_type) in self.types.iter().enumerate() {
            if best.is_none_or(|(_, value)| treasure_type.value > value) {
                best = Some((index, treasure_type.value));
            }
        }
        best.map(|(index, _)| index)
    }
}

impl Default for TreasureCatalog {
    fn default() -> Self {
        Self::new(vec![
            TreasureType::new("Copper Coins", [196, 120, 64], 50, 5),
            TreasureType::new("Gold Coins", [255, 215, 0], 30, 10),
            TreasureType::new("Silver Chalice", [200, 205, 215], 12, 25),
            TreasureType::new("Ruby", [220, 40, 60], 6, 50),
            TreasureType::new("Jeweled Crown", [160, 90, 255], 2, 120),
        ])
    }
}
