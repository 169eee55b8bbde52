//! Dungeon tiers and their fixed configuration table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Six ordinal difficulty bands, weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    E,
    D,
    C,
    B,
    A,
    S,
}

/// Static per-tier data handed to the engine by the content layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierConfig {
    pub tier: Tier,
    /// Minimum effective perception to enter
    pub perception_gate: u32,
    pub base_xp: u64,
    pub base_coins: u64,
    pub mobs: [&'static str; 3],
    pub boss: &'static str,
}

pub const TIER_TABLE: [TierConfig; 6] = [
    TierConfig {
        tier: Tier::E,
        perception_gate: 1,
        base_xp: 25,
        base_coins: 15,
        mobs: ["Goblin", "Rat", "Spider"],
        boss: "Goblin King",
    },
    TierConfig {
        tier: Tier::D,
        perception_gate: 5,
        base_xp: 50,
        base_coins: 30,
        mobs: ["Orc", "Wolf", "Skeleton"],
        boss: "Orc Chieftain",
    },
    TierConfig {
        tier: Tier::C,
        perception_gate: 15,
        base_xp: 100,
        base_coins: 60,
        mobs: ["Troll", "Bear", "Wraith"],
        boss: "Elder Troll",
    },
    TierConfig {
        tier: Tier::B,
        perception_gate: 30,
        base_xp: 200,
        base_coins: 120,
        mobs: ["Dragon", "Demon", "Lich"],
        boss: "Demon Lord",
    },
    TierConfig {
        tier: Tier::A,
        perception_gate: 50,
        base_xp: 300,
        base_coins: 180,
        mobs: ["Titan", "Phoenix", "Vampire"],
        boss: "Ancient Phoenix",
    },
    TierConfig {
        tier: Tier::S,
        perception_gate: 75,
        base_xp: 400,
        base_coins: 250,
        mobs: ["Ancient", "Void Lord", "Death"],
        boss: "Shadow Emperor",
    },
];

impl Tier {
    pub const ALL: [Tier; 6] = [Tier::E, Tier::D, Tier::C, Tier::B, Tier::A, Tier::S];

    /// Ordinal level: E = 0 through S = 5.
    pub fn level(&self) -> u8 {
        match self {
            Tier::E => 0,
            Tier::D => 1,
            Tier::C => 2,
            Tier::B => 3,
            Tier::A => 4,
            Tier::S => 5,
        }
    }

    pub fn from_level(level: u8) -> Option<Tier> {
        Tier::ALL.get(level as usize).copied()
    }

    pub fn config(&self) -> &'static TierConfig {
        &TIER_TABLE[self.level() as usize]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::E => "E",
            Tier::D => "D",
            Tier::C => "C",
            Tier::B => "B",
            Tier::A => "A",
            Tier::S => "S",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "E" => Ok(Tier::E),
            "D" => Ok(Tier::D),
            "C" => Ok(Tier::C),
            "B" => Ok(Tier::B),
            "A" => Ok(Tier::A),
            "S" => Ok(Tier::S),
            other => Err(format!("unknown tier '{other}'")),
        }
    }
}

/// Tiers whose perception gate is met by the given effective perception.
pub fn available_tiers(perception: u32) -> Vec<Tier> {
    Tier::ALL
        .into_iter()
        .filter(|tier| perception >= tier.config().perception_gate)
        .collect()
}
